// taskflow-service/src/services/scheduler_service.rs
//
// Client for the externally-hosted AI scheduling service. Tasks are passed
// through and the proposed ordering relayed; upstream failure surfaces as a
// service failure to the caller. No retry logic at this layer.
use crate::models::ServiceError;
use log::error;
use serde_json::json;

pub struct SchedulerClient {
    http: reqwest::Client,
    base_url: String,
}

impl SchedulerClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn propose_schedule(
        &self,
        tasks: &serde_json::Value,
    ) -> Result<serde_json::Value, ServiceError> {
        let response = self
            .http
            .post(format!("{}/api/schedule", self.base_url))
            .json(&json!({ "tasks": tasks }))
            .send()
            .await
            .map_err(|e| {
                error!("AI scheduler unreachable: {:?}", e);
                ServiceError::UpstreamFailure("AI".to_string())
            })?;

        if !response.status().is_success() {
            error!("AI scheduler returned status: {}", response.status());
            return Err(ServiceError::UpstreamFailure("AI".to_string()));
        }

        response.json().await.map_err(|e| {
            error!("AI scheduler returned invalid JSON: {:?}", e);
            ServiceError::UpstreamFailure("AI".to_string())
        })
    }
}
