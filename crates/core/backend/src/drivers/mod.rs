mod reference;
mod rest;

use campusfix_config::config;
use campusfix_models::v0::LoginProvider;
use campusfix_result::Result;

pub use self::reference::*;
pub use self::rest::*;

/// Backend information to use to create a client
pub enum BackendInfo {
    /// Use the configured API host, or the reference backend if none is set
    Auto,
    /// Use the in-memory reference backend
    Reference,
    /// Talk to a REST API at the given base URL
    Rest { base_url: String },
}

/// Backend
#[derive(Clone)]
pub enum Backend {
    /// In-memory backend
    Reference(ReferenceBackend),
    /// REST API
    Rest(RestBackend),
}

impl BackendInfo {
    /// Create a backend client from the given information
    #[async_recursion]
    pub async fn connect(self) -> Result<Backend> {
        match self {
            BackendInfo::Auto => {
                let config = config().await;
                if config.hosts.api.is_empty() {
                    BackendInfo::Reference.connect().await
                } else {
                    BackendInfo::Rest {
                        base_url: config.hosts.api,
                    }
                    .connect()
                    .await
                }
            }
            BackendInfo::Reference => Ok(Backend::Reference(Default::default())),
            BackendInfo::Rest { base_url } => Ok(Backend::Rest(RestBackend::new(&base_url).await?)),
        }
    }
}

impl Backend {
    /// Base URL that relative media paths are resolved against
    pub fn base_url(&self) -> &str {
        match self {
            Backend::Reference(_) => REFERENCE_BASE_URL,
            Backend::Rest(rest) => rest.base_url(),
        }
    }

    /// Where the browser must be sent to sign in with a provider
    pub fn login_url(&self, provider: LoginProvider) -> String {
        crate::login_url(self.base_url(), provider)
    }
}
