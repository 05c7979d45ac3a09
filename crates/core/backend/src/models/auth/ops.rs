use campusfix_models::v0::{AdminStatus, User};
use campusfix_result::Result;

mod reference;
mod rest;

#[async_trait]
pub trait AbstractAuth: Sync + Send {
    /// Fetch the signed in user, `None` when signed out
    async fn fetch_current_user(&self) -> Result<Option<User>>;

    /// Check whether the signed in user is an administrator
    async fn fetch_admin_status(&self) -> Result<AdminStatus>;

    /// End the current session
    async fn logout(&self) -> Result<()>;
}
