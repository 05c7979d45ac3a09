use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use campusfix_backend::Backend;
use campusfix_config::config;
use campusfix_models::v0::{
    absolute_url, DataEditIssueStatus, Issue, IssueStatus, SortBy, UpvoteResponse,
};
use campusfix_result::Result;
use tokio::sync::watch;

/// Default bound on a list refresh
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared, observable list of issues
///
/// The list only changes through [`IssueStore::refresh`], which replaces it
/// wholesale, and [`IssueStore::patch`], which edits a single record.
#[derive(Clone)]
pub struct IssueStore {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Backend,
    issues: watch::Sender<Vec<Issue>>,
    loading: watch::Sender<bool>,
    sort: watch::Sender<SortBy>,
    refresh_timeout: Duration,

    in_flight: AtomicUsize,
    issued: AtomicU64,
    applied: AtomicU64,
}

/// Marks a refresh as in flight until dropped
struct Loading<'a>(&'a Inner);

impl<'a> Loading<'a> {
    fn start(inner: &'a Inner) -> Loading<'a> {
        inner.loading.send_if_modified(|loading| {
            inner.in_flight.fetch_add(1, Ordering::SeqCst);
            !std::mem::replace(loading, true)
        });

        Loading(inner)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let inner = self.0;
        inner.loading.send_if_modified(|loading| {
            if inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                std::mem::replace(loading, false)
            } else {
                false
            }
        });
    }
}

impl IssueStore {
    pub fn new(backend: Backend, sort: SortBy, refresh_timeout: Duration) -> IssueStore {
        IssueStore {
            inner: Arc::new(Inner {
                backend,
                issues: watch::channel(vec![]).0,
                loading: watch::channel(false).0,
                sort: watch::channel(sort).0,
                refresh_timeout,
                in_flight: AtomicUsize::new(0),
                issued: AtomicU64::new(0),
                applied: AtomicU64::new(0),
            }),
        }
    }

    /// Create a store using the `[store]` configuration section
    pub async fn from_config(backend: Backend) -> IssueStore {
        let config = config().await;
        let sort = config.store.default_sort.parse().unwrap_or_else(|error| {
            warn!("Ignoring store.default_sort: {error}");
            SortBy::default()
        });

        IssueStore::new(backend, sort, config.store.refresh_timeout())
    }

    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    /// Observe the list of issues
    pub fn subscribe(&self) -> watch::Receiver<Vec<Issue>> {
        self.inner.issues.subscribe()
    }

    /// Copy of the current list of issues
    pub fn snapshot(&self) -> Vec<Issue> {
        self.inner.issues.borrow().clone()
    }

    /// Copy of a single issue
    pub fn get(&self, id: i64) -> Option<Issue> {
        self.inner
            .issues
            .borrow()
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
    }

    /// Observe whether a refresh is in flight
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    /// Order requested from the server
    pub fn sort(&self) -> SortBy {
        *self.inner.sort.borrow()
    }

    /// Change the order used by later refreshes
    pub fn set_sort(&self, sort: SortBy) {
        self.inner.sort.send_replace(sort);
    }

    /// Replace the list with the server's
    ///
    /// On failure or timeout the current list is kept and the error is returned.
    pub async fn refresh(&self) -> Result<()> {
        let ticket = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let loading = Loading::start(&self.inner);

        let sort = self.sort();
        let result = match tokio::time::timeout(
            self.inner.refresh_timeout,
            self.inner.backend.fetch_issues(sort),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(create_error!(RequestTimedOut)),
        };

        let issues = match result {
            Ok(issues) => issues,
            Err(error) => {
                drop(loading);
                warn!("Failed to refresh issues: {error}");
                return Err(error);
            }
        };

        let base_url = self.inner.backend.base_url();
        let issues = issues
            .into_iter()
            .map(|issue| Issue::from_wire(issue, base_url))
            .collect();

        if !self.apply(ticket, issues) {
            debug!("Discarded stale refresh #{ticket}");
        }

        drop(loading);
        Ok(())
    }

    /// Replace the list unless a newer refresh was already applied
    fn apply(&self, ticket: u64, issues: Vec<Issue>) -> bool {
        let applied = &self.inner.applied;
        self.inner.issues.send_if_modified(|current| {
            if ticket <= applied.load(Ordering::SeqCst) {
                return false;
            }

            applied.store(ticket, Ordering::SeqCst);
            *current = issues;
            true
        })
    }

    /// Edit the issue with the given id, returns whether it was found
    pub fn patch(&self, id: i64, f: impl FnOnce(&mut Issue)) -> bool {
        self.inner.issues.send_if_modified(|issues| {
            match issues.iter_mut().find(|issue| issue.id == id) {
                Some(issue) => {
                    f(issue);
                    true
                }
                None => false,
            }
        })
    }

    /// Upvote an issue
    ///
    /// Once the server accepts, the local count goes up by one without refetching.
    pub async fn upvote(&self, id: i64) -> Result<UpvoteResponse> {
        let response = self
            .inner
            .backend
            .upvote_issue(id)
            .await
            .inspect_err(|error| warn!("Failed to upvote issue {id}: {error}"))?;

        if !self.patch(id, |issue| issue.upvotes += 1) {
            debug!("Upvoted issue {id} which is not in the local list");
        }

        Ok(response)
    }

    /// Change the status of an issue, then refresh the list
    pub async fn update_status(&self, id: i64, status: IssueStatus) -> Result<()> {
        self.edit_status(
            id,
            DataEditIssueStatus {
                status,
                resolution_image_url: None,
            },
        )
        .await
    }

    /// Change the status of an issue, optionally attaching a resolution photo
    pub async fn edit_status(&self, id: i64, data: DataEditIssueStatus) -> Result<()> {
        let response = self
            .inner
            .backend
            .update_issue_status(id, &data)
            .await
            .inspect_err(|error| warn!("Failed to update status of issue {id}: {error}"))?;

        let base_url = self.inner.backend.base_url();
        self.patch(id, |issue| {
            issue.status = response.status;
            if let Some(url) = &data.resolution_image_url {
                issue.resolution_image = Some(absolute_url(base_url, url));
            }
        });

        if let Err(error) = self.refresh().await {
            info!("Kept local status of issue {id}, refresh failed: {error}");
        }

        Ok(())
    }
}
