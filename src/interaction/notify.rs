use tracing::{Instrument, error, instrument, warn};

use crate::{base::types::Event, runtime::Runtime};

/// Handle a host event without blocking the caller.
///
/// The pipeline runs on its own task; failures are logged and dropped.
#[instrument(skip_all)]
pub fn handle_event(event: Event, runtime: Runtime) -> tokio::task::JoinHandle<bool> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = runtime.notify(&event).await;

            // Log any errors.
            match result {
                Ok(true) => true,
                Ok(false) => {
                    warn!("Message was not delivered.");
                    false
                }
                Err(err) => {
                    error!("Error while handling: {}", err);
                    false
                }
            }
        }
        .in_current_span(),
    )
}
