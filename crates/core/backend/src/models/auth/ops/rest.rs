use campusfix_models::v0::{AdminStatus, User};
use campusfix_result::{ErrorType, Result};

use crate::RestBackend;

use super::AbstractAuth;

#[async_trait]
impl AbstractAuth for RestBackend {
    /// Fetch the signed in user, `None` when signed out
    async fn fetch_current_user(&self) -> Result<Option<User>> {
        match self.json(self.client().get(self.url("/auth/me"))).await {
            Err(error) if error.error_type == ErrorType::NotAuthenticated => Ok(None),
            result => result,
        }
    }

    /// Check whether the signed in user is an administrator
    async fn fetch_admin_status(&self) -> Result<AdminStatus> {
        match self.json(self.client().get(self.url("/auth/is_admin"))).await {
            Err(error) if error.error_type == ErrorType::NotAuthenticated => {
                Ok(AdminStatus { is_admin: false })
            }
            result => result,
        }
    }

    /// End the current session
    async fn logout(&self) -> Result<()> {
        self.send(self.client().get(self.url("/auth/logout")))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    use crate::RestBackend;

    use super::AbstractAuth;

    async fn serve(signed_in: bool) -> String {
        let app = Router::new()
            .route(
                "/auth/me",
                get(move || async move {
                    if signed_in {
                        Json(json!({ "sub": "7", "name": "Ana", "picture": "https://a/b.png" }))
                    } else {
                        Json(json!(null))
                    }
                }),
            )
            .route(
                "/auth/is_admin",
                get(move || async move {
                    if signed_in {
                        Ok(Json(json!({ "is_admin": true })))
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        format!("http://{address}")
    }

    #[tokio::test]
    async fn reads_current_user() {
        let backend = RestBackend::new(&serve(true).await).await.unwrap();
        let user = backend.fetch_current_user().await.unwrap().unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, None);
        assert!(backend.fetch_admin_status().await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn signed_out_is_not_an_error() {
        let backend = RestBackend::new(&serve(false).await).await.unwrap();
        assert_eq!(backend.fetch_current_user().await.unwrap(), None);
        assert!(!backend.fetch_admin_status().await.unwrap().is_admin);
    }
}
