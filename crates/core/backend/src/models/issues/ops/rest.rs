use campusfix_models::v0::{
    DataEditIssueStatus, HeatmapPoint, IssueOut, SortBy, StatusResponse, UpvoteResponse,
};
use campusfix_result::Result;

use crate::{NewIssue, RestBackend};

use super::AbstractIssues;

#[async_trait]
impl AbstractIssues for RestBackend {
    /// Fetch every issue in the given order
    async fn fetch_issues(&self, sort: SortBy) -> Result<Vec<IssueOut>> {
        self.json(
            self.client()
                .get(self.url("/issues"))
                .query(&[("sort_by", sort.as_str())]),
        )
        .await
    }

    /// Create a new issue
    async fn insert_issue(&self, issue: NewIssue) -> Result<IssueOut> {
        let form = issue.into_form()?;
        self.json(self.client().post(self.url("/issues")).multipart(form))
            .await
    }

    /// Upvote an issue
    async fn upvote_issue(&self, id: i64) -> Result<UpvoteResponse> {
        self.json(self.client().post(self.url(&format!("/issues/{id}/upvote"))))
            .await
    }

    /// Change the status of an issue
    async fn update_issue_status(
        &self,
        id: i64,
        data: &DataEditIssueStatus,
    ) -> Result<StatusResponse> {
        self.json(
            self.client()
                .patch(self.url(&format!("/issues/{id}/status")))
                .json(data),
        )
        .await
    }

    /// Fetch the location of every issue
    async fn fetch_heatmap(&self) -> Result<Vec<HeatmapPoint>> {
        self.json(self.client().get(self.url("/heatmap"))).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Multipart, Path, Query, State};
    use axum::routing::{get, patch, post};
    use axum::{http::StatusCode, Json, Router};
    use campusfix_files::UploadFile;
    use campusfix_models::v0::{DataEditIssueStatus, IssueStatus, SortBy};
    use campusfix_result::ErrorType;
    use futures::lock::Mutex;
    use serde_json::{json, Value};

    use crate::{NewIssue, RestBackend};

    use super::AbstractIssues;

    #[derive(Clone, Default)]
    struct Received {
        fields: Arc<Mutex<Vec<(String, Option<String>, usize)>>>,
        queries: Arc<Mutex<Vec<String>>>,
        statuses: Arc<Mutex<Vec<Value>>>,
    }

    fn issue_json(id: i64, description: &str) -> Value {
        json!({
            "id": id,
            "description": description,
            "location": "A201",
            "image_url": "/static/images/tap.jpg",
            "category": "Plumbing",
            "severity": "Medium",
            "summary": "[Broken Tap] leak...",
            "upvotes": 0,
            "priority_score": 20.0,
            "status": "New",
            "timeline": ["Reported"],
            "created_at": "2026-01-01T00:00:00Z"
        })
    }

    async fn serve(received: Received) -> String {
        let app = Router::new()
            .route(
                "/issues",
                get(
                    |State(received): State<Received>,
                     Query(query): Query<std::collections::HashMap<String, String>>| async move {
                        received
                            .queries
                            .lock()
                            .await
                            .push(query.get("sort_by").cloned().unwrap_or_default());
                        Json(json!([issue_json(1, "first")]))
                    },
                )
                .post(
                    |State(received): State<Received>, mut multipart: Multipart| async move {
                        let mut description = String::new();
                        while let Some(field) = multipart.next_field().await.unwrap() {
                            let name = field.name().unwrap_or_default().to_string();
                            let file_name = field.file_name().map(str::to_string);
                            let data = field.bytes().await.unwrap();
                            if name == "description" {
                                description = String::from_utf8(data.to_vec()).unwrap();
                            }
                            received.fields.lock().await.push((name, file_name, data.len()));
                        }
                        Json(issue_json(7, &description))
                    },
                ),
            )
            .route(
                "/issues/:id/upvote",
                post(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        Err(StatusCode::NOT_FOUND)
                    } else {
                        Ok(Json(json!({ "message": "ok", "upvotes": 6, "new_priority": 32.0 })))
                    }
                }),
            )
            .route(
                "/issues/:id/status",
                patch(
                    |State(received): State<Received>, Json(body): Json<Value>| async move {
                        let status = body["status"].clone();
                        received.statuses.lock().await.push(body);
                        Json(json!({ "message": "Status updated", "status": status }))
                    },
                ),
            )
            .route("/heatmap", get(|| async { StatusCode::UNAUTHORIZED }))
            .with_state(received);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        format!("http://{address}")
    }

    #[tokio::test]
    async fn submits_multipart_form() {
        let received = Received::default();
        let backend = RestBackend::new(&serve(received.clone()).await).await.unwrap();

        let created = backend
            .insert_issue(NewIssue {
                description: "[Broken Tap] leak".to_string(),
                location: "A201".to_string(),
                image: Some(UploadFile::new("tap.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0])),
            })
            .await
            .unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(created.description, "[Broken Tap] leak");

        let fields = received.fields.lock().await.clone();
        assert_eq!(
            fields,
            vec![
                ("description".to_string(), None, 17),
                ("location".to_string(), None, 4),
                ("image".to_string(), Some("tap.jpg".to_string()), 6),
            ]
        );
    }

    #[tokio::test]
    async fn lists_with_sort_query() {
        let received = Received::default();
        let backend = RestBackend::new(&serve(received.clone()).await).await.unwrap();

        let issues = backend.fetch_issues(SortBy::Newest).await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].image_url.as_deref(), Some("/static/images/tap.jpg"));
        assert_eq!(received.queries.lock().await.clone(), vec!["newest"]);
    }

    #[tokio::test]
    async fn sends_status_body() {
        let received = Received::default();
        let backend = RestBackend::new(&serve(received.clone()).await).await.unwrap();

        let response = backend
            .update_issue_status(
                3,
                &DataEditIssueStatus {
                    status: IssueStatus::InProgress,
                    resolution_image_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(response.status, IssueStatus::InProgress);
        assert_eq!(
            received.statuses.lock().await.clone(),
            vec![json!({ "status": "In Progress" })]
        );
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let backend = RestBackend::new(&serve(Received::default()).await)
            .await
            .unwrap();

        let upvote = backend.upvote_issue(1).await.unwrap();
        assert_eq!(upvote.upvotes, 6);

        let missing = backend.upvote_issue(404).await.unwrap_err();
        assert_eq!(missing.error_type, ErrorType::UnknownIssue);

        let heatmap = backend.fetch_heatmap().await.unwrap_err();
        assert_eq!(heatmap.error_type, ErrorType::NotAuthenticated);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let backend = RestBackend::new(&format!("http://{address}")).await.unwrap();
        let error = backend.fetch_issues(SortBy::Priority).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::NetworkError);
    }
}
