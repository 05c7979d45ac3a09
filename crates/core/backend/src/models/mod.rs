mod analytics;
mod auth;
mod issues;
mod safety_reports;

pub use analytics::*;
pub use auth::*;
pub use issues::*;
pub use safety_reports::*;

use crate::{Backend, ReferenceBackend, RestBackend};

pub trait AbstractBackend:
    Sync
    + Send
    + analytics::AbstractAnalytics
    + auth::AbstractAuth
    + issues::AbstractIssues
    + safety_reports::AbstractSafety
{
}

impl AbstractBackend for ReferenceBackend {}
impl AbstractBackend for RestBackend {}

impl std::ops::Deref for Backend {
    type Target = dyn AbstractBackend;

    fn deref(&self) -> &Self::Target {
        match &self {
            Backend::Reference(dummy) => dummy,
            Backend::Rest(rest) => rest,
        }
    }
}
