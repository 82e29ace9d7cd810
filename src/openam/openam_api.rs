use crate::error::Result;
use crate::http::api_client::{AcceptType, ApiClient};
use crate::openam::api_responses::Submission;
use crate::openam::ProviderConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Status line and body of one round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

/// The two OpenAM endpoints a login needs.
///
/// Implementations keep the provider's session cookie between calls.
#[async_trait]
pub trait OpenAmApi: Send + Sync {
    /// POSTs to the authenticate endpoint; `None` starts a new login.
    async fn authenticate(&self, submission: Option<&Submission>) -> Result<ApiReply>;
    async fn idp_sso_init(&self) -> Result<ApiReply>;
}

pub struct OpenAm {
    config: ProviderConfig,
    client: ApiClient,
}

impl OpenAm {
    pub fn new(config: ProviderConfig, timeout: Duration) -> Result<OpenAm> {
        let client = ApiClient::new(timeout)?;
        Ok(OpenAm { config, client })
    }
}

#[async_trait]
impl OpenAmApi for OpenAm {
    async fn authenticate(&self, submission: Option<&Submission>) -> Result<ApiReply> {
        let url = self.config.authenticate_url()?;

        let response = self
            .client
            .post_json(url, submission, AcceptType::Json)
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiReply { status, body })
    }

    async fn idp_sso_init(&self) -> Result<ApiReply> {
        let url = self.config.idp_sso_init_url()?;

        let response = self.client.get(url, None, AcceptType::Html).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::api_client::DEFAULT_TIMEOUT;
    use crate::openam::api_responses::{InputValue, SubmittedCallback, SubmittedInput};
    use httpmock::MockServer;
    use serde_json::json;

    fn open_am(server: &MockServer) -> OpenAm {
        let config = ProviderConfig::new(server.url("").as_str(), "/customers", "urn:sp").unwrap();
        OpenAm::new(config, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn test_new() {
        let config = ProviderConfig::new("https://sso.example.com", "/", "urn:sp").unwrap();
        assert!(OpenAm::new(config, DEFAULT_TIMEOUT).is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_posts_submission() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/openam/json/customers/authenticate")
                .header("content-type", "application/json")
                .json_body(json!({
                    "authId": "A1",
                    "callbacks": [{"type": "NameCallback", "input": [{"name": "IDToken1", "value": "bob"}]}]
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"tokenId":"T1"}"#);
        });

        let submission = Submission {
            auth_id: String::from("A1"),
            callbacks: vec![SubmittedCallback {
                kind: "NameCallback",
                input: vec![SubmittedInput {
                    name: String::from("IDToken1"),
                    value: InputValue::Text(String::from("bob")),
                }],
            }],
        };
        let reply = open_am(&server)
            .authenticate(Some(&submission))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"tokenId":"T1"}"#);
    }

    #[tokio::test]
    async fn test_idp_sso_init_sends_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/openam/idpssoinit")
                .query_param("spEntityID", "urn:sp")
                .query_param("redirected", "true")
                .query_param("metaAlias", "/customers/idp");
            then.status(200).body("<html></html>");
        });

        let reply = open_am(&server).idp_sso_init().await.unwrap();

        mock.assert();
        assert_eq!(reply.body, "<html></html>");
    }
}
