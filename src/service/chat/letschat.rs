//! Let's Chat delivery over its REST-like HTTP API.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::base::{config::Config, types::Res};

use super::{ChatClient, GenericChatClient};

/// Password sent along with the token; the service only checks the token.
const PASSWORD_PLACEHOLDER: &str = "dummy";

// Extra methods on `ChatClient` applied by the Let's Chat implementation.

impl ChatClient {
    /// Creates a new Let's Chat client.
    pub fn letschat(config: &Config) -> Res<Self> {
        let client = LetsChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<LetsChatClient> for ChatClient {
    fn from(client: LetsChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// Let's Chat client implementation.
#[derive(Clone)]
pub struct LetsChatClient {
    client: reqwest::Client,
    webapi: String,
    token: String,
}

impl LetsChatClient {
    /// Create a new Let's Chat client with the configured timeout.
    #[instrument(name = "LetsChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_millis(config.request_timeout_ms)).build()?;

        Ok(Self {
            client,
            webapi: config.webapi.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Endpoint receiving the messages of a room.
    pub fn messages_url(&self, room: &str) -> String {
        format!("{}/{}/messages", self.webapi, room)
    }

    async fn post(&self, room: &str, text: &str) -> Res<()> {
        self.client
            .post(self.messages_url(room))
            .basic_auth(&self.token, Some(PASSWORD_PLACEHOLDER))
            .form(&[("text", text)])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for LetsChatClient {
    #[instrument(skip(self, text))]
    async fn send_message(&self, room: &str, text: &str) -> bool {
        match self.post(room, text).await {
            Ok(()) => {
                info!("Message posted.");
                true
            }
            Err(err) => {
                warn!("Failed to post message: {}", err);
                false
            }
        }
    }
}

// Tests.
