use std::sync::Arc;

use campusfix_config::config;
use campusfix_result::{Error, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Client for the CampusFix REST API
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: Arc<str>,
}

impl RestBackend {
    /// Create a client for the API at `base_url`
    ///
    /// Cookies are kept between requests so the session survives sign in.
    pub async fn new(base_url: &str) -> Result<RestBackend> {
        let config = config().await;

        let client = Client::builder()
            .user_agent(concat!("CampusFix/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .timeout(config.api.request_timeout())
            .connect_timeout(config.api.connect_timeout())
            .build()
            .map_err(|err| {
                error!("Failed to build HTTP client: {err:?}");
                create_error!(InternalError)
            })?;

        Ok(RestBackend {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Base URL of the API (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request, turning unsuccessful statuses into errors
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            warn!("Request failed: {err}");
            Error::from_transport(&err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} responded with {status}", response.url());
            return Err(Error::from_status(status));
        }

        Ok(response)
    }

    /// Send a request and decode its JSON body
    pub(crate) async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request).await?.json().await.map_err(|err| {
            warn!("Could not decode response: {err}");
            create_error!(InvalidResponse)
        })
    }
}
