//! HTTP implementation of the platform API.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::Credentials;
use crate::types::{Alias, Deployment, Instance};

use super::{ApiError, DeploymentsApi};

/// Per-request timeout; a hung platform endpoint fails the whole command.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the deployment inventory.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl HttpClient {
    /// Build a client from loaded credentials.
    ///
    /// Fails before any network access when no access token is configured.
    pub fn new(credentials: &Credentials) -> anyhow::Result<Self> {
        let token = credentials.require_token()?.to_string();
        let client = reqwest::Client::builder()
            .user_agent(concat!("berth/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base: credentials.api_base().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(
        &self,
        url: &str,
        query: Option<(&str, &str)>,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(%url, "GET");
        let mut request = self.client.get(url).bearer_auth(&self.token);
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }
        request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })
    }

    fn check_status(url: &str, status: StatusCode) -> Result<(), ApiError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct DeploymentsPayload {
    deployments: Vec<Deployment>,
}

#[derive(Debug, serde::Deserialize)]
struct InstancesPayload {
    instances: Vec<Instance>,
}

#[derive(Debug, serde::Deserialize)]
struct AliasesPayload {
    aliases: Vec<Alias>,
}

#[async_trait]
impl DeploymentsApi for HttpClient {
    async fn list_deployments(&self, app: Option<&str>) -> Result<Vec<Deployment>, ApiError> {
        let url = self.endpoint("/v3/deployments");
        let response = self.get(&url, app.map(|app| ("app", app))).await?;
        Self::check_status(&url, response.status())?;
        let payload: DeploymentsPayload = Self::decode(&url, response).await?;
        Ok(payload.deployments)
    }

    async fn find_deployment(&self, id_or_url: &str) -> Result<Option<Deployment>, ApiError> {
        let url = self.endpoint(&format!("/v3/deployments/{id_or_url}"));
        let response = self.get(&url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(&url, response.status())?;
        let deployment = Self::decode(&url, response).await?;
        Ok(Some(deployment))
    }

    async fn list_instances(&self, uid: &str) -> Result<Vec<Instance>, ApiError> {
        let url = self.endpoint(&format!("/v3/deployments/{uid}/instances"));
        let response = self.get(&url, None).await?;
        Self::check_status(&url, response.status())?;
        let payload: InstancesPayload = Self::decode(&url, response).await?;
        Ok(payload.instances)
    }

    async fn list_aliases(&self) -> Result<Vec<Alias>, ApiError> {
        let url = self.endpoint("/v3/aliases");
        let response = self.get(&url, None).await?;
        Self::check_status(&url, response.status())?;
        let payload: AliasesPayload = Self::decode(&url, response).await?;
        Ok(payload.aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base: &str) -> HttpClient {
        let credentials = Credentials {
            token: Some("tok_test".to_string()),
            api_base: Some(base.to_string()),
            ..Credentials::default()
        };
        HttpClient::new(&credentials).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = client_with_base("https://api.berth.dev");
        assert_eq!(
            client.endpoint("/v3/deployments"),
            "https://api.berth.dev/v3/deployments"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client_with_base("https://api.berth.dev/");
        assert_eq!(
            client.endpoint("/v3/aliases"),
            "https://api.berth.dev/v3/aliases"
        );
    }

    #[test]
    fn test_new_rejects_missing_token() {
        let credentials = Credentials::default();
        assert!(HttpClient::new(&credentials).is_err());
    }

    #[test]
    fn test_check_status_maps_auth_and_failure_codes() {
        let url = "https://api.berth.dev/v3/deployments";

        assert!(HttpClient::check_status(url, StatusCode::OK).is_ok());
        assert!(matches!(
            HttpClient::check_status(url, StatusCode::UNAUTHORIZED),
            Err(ApiError::Unauthorized { status: 401 })
        ));
        assert!(matches!(
            HttpClient::check_status(url, StatusCode::FORBIDDEN),
            Err(ApiError::Unauthorized { status: 403 })
        ));
        assert!(matches!(
            HttpClient::check_status(url, StatusCode::INTERNAL_SERVER_ERROR),
            Err(ApiError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_deployments_payload_decodes() {
        let raw = r#"{
            "deployments": [
                { "uid": "dep_1", "name": "api", "url": "api.example.dev", "state": "READY" }
            ]
        }"#;

        let payload: DeploymentsPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.deployments.len(), 1);
        assert_eq!(payload.deployments[0].uid, "dep_1");
    }

    #[test]
    fn test_instances_payload_decodes() {
        let raw = r#"{ "instances": [ { "url": "api-1.example.dev" } ] }"#;

        let payload: InstancesPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.instances[0].url, "api-1.example.dev");
    }

    #[test]
    fn test_aliases_payload_decodes() {
        let raw = r#"{
            "aliases": [
                { "uid": "al_1", "alias": "demo.example.dev", "deploymentId": "dep_9" }
            ]
        }"#;

        let payload: AliasesPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.aliases[0].deployment_id, "dep_9");
    }
}
