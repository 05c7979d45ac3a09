use campusfix_models::v0::{AdminStatus, User};
use campusfix_result::Result;

use crate::ReferenceBackend;

use super::AbstractAuth;

#[async_trait]
impl AbstractAuth for ReferenceBackend {
    /// Fetch the signed in user, `None` when signed out
    async fn fetch_current_user(&self) -> Result<Option<User>> {
        self.begin_request("GET /auth/me").await?;
        Ok(self.session.lock().await.clone())
    }

    /// Check whether the signed in user is an administrator
    async fn fetch_admin_status(&self) -> Result<AdminStatus> {
        self.begin_request("GET /auth/is_admin").await?;
        Ok(AdminStatus {
            is_admin: self.is_admin().await,
        })
    }

    /// End the current session
    async fn logout(&self) -> Result<()> {
        self.begin_request("GET /auth/logout").await?;
        self.session.lock().await.take();
        Ok(())
    }
}
