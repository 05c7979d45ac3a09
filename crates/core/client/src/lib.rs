#[macro_use]
extern crate log;

#[macro_use]
extern crate campusfix_result;

mod analytics;
mod dashboard;
mod issues;
mod safety;
mod session;
mod submission;
pub mod view;

pub use analytics::*;
pub use dashboard::*;
pub use issues::*;
pub use safety::*;
pub use session::*;
pub use submission::*;

pub use campusfix_backend::{Backend, BackendInfo};

use campusfix_files::CompressionOptions;
use campusfix_result::Result;

/// Everything a front end needs, sharing one backend connection
#[derive(Clone)]
pub struct Client {
    pub backend: Backend,
    pub session: Session,
    pub dashboard: Dashboard,
    pub submitter: Submitter,
    pub safety: SafetyReporter,
}

impl Client {
    /// Connect to a backend and build every store using the current configuration
    pub async fn connect(info: BackendInfo) -> Result<Client> {
        let backend = info.connect().await?;
        Ok(Client::from_backend(backend).await)
    }

    /// Build every store on top of an existing backend
    pub async fn from_backend(backend: Backend) -> Client {
        let options = CompressionOptions::from_config().await;
        let issues = IssueStore::from_config(backend.clone()).await;

        Client {
            session: Session::new(backend.clone()),
            dashboard: Dashboard::new(issues.clone(), AnalyticsStore::new(backend.clone())),
            submitter: Submitter::new(backend.clone(), issues, options.clone()),
            safety: SafetyReporter::new(backend.clone(), options),
            backend,
        }
    }

    /// Issue list shared by every view
    pub fn issues(&self) -> &IssueStore {
        &self.dashboard.issues
    }
}
