//! Demo provider: stands in for the remote model when no usable credential
//! is configured.
//!
//! It never touches the network. Responses say plainly that they are canned.

use async_trait::async_trait;
use stylecast_core::error::ProviderError;
use stylecast_core::message::{Message, Role};
use stylecast_core::provider::*;
use tracing::debug;

/// Longest slice of the user's text echoed back in a demo answer.
const ECHO_CHARS: usize = 120;

pub struct DemoProvider {
    reason: String,
}

impl DemoProvider {
    /// `reason` is shown to the user, e.g. "no API key configured".
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn render(&self, request: &ProviderRequest) -> String {
        let user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let echo: String = user.chars().take(ECHO_CHARS).collect();
        let ellipsis = if user.chars().count() > ECHO_CHARS { "..." } else { "" };
        let system_chars = request.system_text().map(|s| s.len()).unwrap_or(0);

        format!(
            "[demo mode: {}] The remote model was not called. \
             Your message was: \"{echo}{ellipsis}\". \
             A {system_chars}-character style instruction would have been sent with it. \
             Configure an API key to get real answers.",
            self.reason
        )
    }
}

#[async_trait]
impl Provider for DemoProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn is_demo(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        debug!(reason = %self.reason, "Answering with demo response");
        Ok(ProviderResponse {
            message: Message::assistant(self.render(&request)),
            usage: None,
            model: "demo".into(),
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(false)
    }
}
