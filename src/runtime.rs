//! Runtime services and shared state for the notifier.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Event, Message, Res},
    },
    render::Renderer,
    service::chat::ChatClient,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the renderer and the chat client.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The message renderer.
    pub renderer: Renderer,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance posting to Let's Chat.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        let chat = ChatClient::letschat(&config)?;

        Ok(Self::with_chat(config, chat))
    }

    /// Create a runtime around an existing chat client.
    pub fn with_chat(config: Config, chat: ChatClient) -> Self {
        let renderer = Renderer::new(&config);

        Self { config, renderer, chat }
    }

    /// Render an event without sending it.
    pub fn render(&self, event: &Event) -> Res<Option<Message>> {
        Ok(self.renderer.render(event)?)
    }

    /// Render an event and post it.
    ///
    /// Suppressed events succeed without any post. Rendering errors are
    /// returned before anything is sent; delivery failures are `Ok(false)`.
    #[instrument(skip_all, fields(kind = ?event.kind()))]
    pub async fn notify(&self, event: &Event) -> Res<bool> {
        let Some(message) = self.render(event)? else {
            info!("Event suppressed, nothing to post.");
            return Ok(true);
        };

        let delivered = self.chat.send_message(&message.room, &message.text).await;

        if !delivered {
            warn!("Delivery to room `{}` failed.", message.room);
        }

        Ok(delivered)
    }
}
