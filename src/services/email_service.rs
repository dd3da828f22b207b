// taskflow-service/src/services/email_service.rs
//
// Outbound notification collaborator (Resend HTTP API). Best-effort at this
// layer: a failed send is logged and swallowed, and must never roll back
// the mutation that triggered it.
use log::{error, info, warn};
use serde_json::json;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

pub struct Mailer {
    http: reqwest::Client,
    api_key: Option<String>,
    from: String,
}

impl Mailer {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    pub async fn send_email(&self, to: &str, subject: &str, body: &str) {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                warn!("RESEND_API_KEY not configured, skipping email to: {}", to);
                return;
            }
        };

        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "text": body,
        });

        let result = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Email sent to {}: {}", to, subject);
            }
            Ok(response) => {
                error!("Email to {} rejected with status: {}", to, response.status());
            }
            Err(e) => {
                error!("Failed to send email to {}: {:?}", to, e);
            }
        }
    }
}
