//! Library root for `letschat-notify`.
//!
//! Letschat-notify announces changes from a collaboration platform in
//! Let's Chat rooms:
//! - New and changed tickets, with field changes and description diffs
//! - Added, edited and deleted wiki pages
//! - New and updated blog posts and blog comments
//! - Missed calls from the phone gateway
//!
//! Each event is rendered into a short, mention-preserving text message and
//! posted with a single bounded HTTP call. The chat service sits behind a
//! trait so that other services (or mocks) can be plugged in.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod render;
pub mod runtime;
pub mod service;

use base::{config::Config, types::{Event, Res}};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Builds the runtime from the configuration and runs one event through the
/// pipeline, returning whether the message was delivered (or suppressed).
pub async fn start(config: Config, event: Event) -> Res<bool> {
    info!("Starting letschat-notify ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Handle the event.
    runtime.notify(&event).await
}
