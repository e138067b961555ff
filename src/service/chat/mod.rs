pub mod letschat;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the single delivery operation the notifier needs.
/// Implementing this trait allows different chat services to be used.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Post a message to a room.
    ///
    /// Returns `false` on any delivery failure. Implementations never panic
    /// or return errors, and never retry.
    async fn send_message(&self, room: &str, text: &str) -> bool;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
