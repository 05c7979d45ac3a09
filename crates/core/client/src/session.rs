use std::sync::Arc;

use campusfix_backend::Backend;
use campusfix_models::v0::{LoginProvider, User};
use campusfix_result::Result;
use tokio::sync::watch;

/// Signed in user, shared between views
#[derive(Clone)]
pub struct Session {
    backend: Backend,
    user: Arc<watch::Sender<Option<User>>>,
}

impl Session {
    pub fn new(backend: Backend) -> Session {
        Session {
            backend,
            user: Arc::new(watch::channel(None).0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    /// Ask the server who is signed in
    ///
    /// Any failure is treated as being signed out.
    pub async fn load(&self) -> Option<User> {
        let user = match self.backend.fetch_current_user().await {
            Ok(user) => user,
            Err(error) => {
                warn!("Could not load the current user: {error}");
                None
            }
        };

        self.user.send_replace(user.clone());
        user
    }

    /// Where the browser must be sent to sign in
    pub fn login_url(&self, provider: LoginProvider) -> String {
        self.backend.login_url(provider)
    }

    /// End the session on the server and forget the user
    pub async fn logout(&self) -> Result<()> {
        self.backend.logout().await?;
        self.user.send_replace(None);
        Ok(())
    }

    pub async fn is_admin(&self) -> Result<bool> {
        Ok(self.backend.fetch_admin_status().await?.is_admin)
    }
}

#[cfg(test)]
mod tests {
    use campusfix_backend::{Backend, ReferenceBackend, REFERENCE_BASE_URL};
    use campusfix_models::v0::LoginProvider;

    use super::Session;
    use crate::test_util::signed_in;

    #[tokio::test]
    async fn loads_and_clears_the_user() {
        let (_, backend) = signed_in(true).await;
        let session = Session::new(backend);

        assert_eq!(session.user(), None);
        let user = session.load().await.unwrap();
        assert_eq!(user.name, "Sam");
        assert!(session.is_admin().await.unwrap());

        session.logout().await.unwrap();
        assert_eq!(session.user(), None);
        assert_eq!(session.load().await, None);
        assert!(!session.is_admin().await.unwrap());
    }

    #[tokio::test]
    async fn failure_reads_as_signed_out() {
        let reference = ReferenceBackend::default();
        let session = Session::new(Backend::Reference(reference.clone()));

        reference.fail_next_requests(1);
        assert_eq!(session.load().await, None);
        assert_eq!(
            session.login_url(LoginProvider::Google),
            format!("{REFERENCE_BASE_URL}/auth/login/google")
        );
    }
}
