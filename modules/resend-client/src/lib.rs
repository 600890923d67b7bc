pub mod error;
pub mod types;

pub use error::{ResendError, Result};
pub use types::{OutboundEmail, SendResponse};

use std::time::Duration;

use tracing::info;

const BASE_URL: &str = "https://api.resend.com";

pub struct ResendClient {
    client: reqwest::Client,
    api_key: String,
}

impl ResendClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Send one email. Returns the provider's message id.
    pub async fn send(&self, email: &OutboundEmail) -> Result<String> {
        let resp = self
            .client
            .post(format!("{BASE_URL}/emails"))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ResendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: SendResponse = resp.json().await?;
        info!(message_id = %data.id, "Email accepted");
        Ok(data.id)
    }
}
