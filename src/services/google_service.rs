// taskflow-service/src/services/google_service.rs
//
// Federated sign-in verifier. Constructed once with the configured client
// id and injected; the credential is checked against Google's tokeninfo
// endpoint and the audience compared to our client id.
use crate::models::ServiceError;
use log::{error, warn};
use serde::Deserialize;

const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Deserialize, Debug)]
pub struct GoogleTokenInfo {
    pub aud: String,
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
        }
    }

    pub async fn verify_credential(
        &self,
        credential: &str,
    ) -> Result<GoogleTokenInfo, ServiceError> {
        let client_id = match &self.client_id {
            Some(id) => id,
            None => {
                warn!("GOOGLE_CLIENT_ID not configured, rejecting Google sign-in");
                return Err(ServiceError::UpstreamFailure("Google sign-in".to_string()));
            }
        };

        let response = self
            .http
            .get(TOKENINFO_ENDPOINT)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| {
                error!("Google tokeninfo unreachable: {:?}", e);
                ServiceError::UpstreamFailure("Google sign-in".to_string())
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::BadRequest(
                "Invalid Google credential".to_string(),
            ));
        }

        let info: GoogleTokenInfo = response.json().await.map_err(|e| {
            error!("Google tokeninfo returned invalid JSON: {:?}", e);
            ServiceError::UpstreamFailure("Google sign-in".to_string())
        })?;

        if info.aud != *client_id {
            return Err(ServiceError::BadRequest(
                "Invalid Google credential".to_string(),
            ));
        }

        Ok(info)
    }
}
