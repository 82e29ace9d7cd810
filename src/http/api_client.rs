use crate::error::Result;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub enum AcceptType {
    Json,
    Html,
}

/// Thin wrapper around a cookie-keeping [`Client`].
///
/// The identity provider tracks login progress in a session cookie, so one
/// `ApiClient` has to serve every request of a login attempt.
pub struct ApiClient {
    http_client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<ApiClient> {
        Ok(ApiClient {
            http_client: Client::builder()
                .cookie_store(true)
                .timeout(timeout)
                .build()?,
        })
    }

    /// POSTs `json` (or an empty body when `None`).
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        json: Option<&T>,
        accept_type: AcceptType,
    ) -> Result<Response> {
        let accept_header = ApiClient::accept_header(accept_type);

        let mut request = self.http_client.post(url).header(ACCEPT, accept_header);
        if let Some(json) = json {
            request = request.json(json);
        }

        let response = request.send().await?;

        Ok(response)
    }

    pub async fn get(
        &self,
        mut url: Url,
        params: Option<HashMap<String, String>>,
        accept_type: AcceptType,
    ) -> Result<Response> {
        let accept_header = ApiClient::accept_header(accept_type);

        for (key, value) in &params.unwrap_or_default() {
            url.query_pairs_mut()
                .append_pair(key.as_str(), value.as_str());
        }

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, accept_header)
            .send()
            .await?;

        Ok(response)
    }

    fn accept_header(accept_type: AcceptType) -> HeaderValue {
        match accept_type {
            AcceptType::Html => {
                HeaderValue::from_static("text/html,application/xhtml+xml,application/xml")
            }
            AcceptType::Json => HeaderValue::from_static("application/json"),
        }
    }
}
