use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use campusfix_files::UploadFile;
use campusfix_models::v0::{IssueOut, SafetyReport, User};
use campusfix_result::Result;
use futures::lock::Mutex;
use tokio::sync::watch;

/// Base URL used to resolve media stored by the reference backend
pub const REFERENCE_BASE_URL: &str = "http://campusfix.reference";

backend_derived!(
    /// Reference implementation
    pub struct ReferenceBackend {
        pub issues: Arc<Mutex<BTreeMap<i64, IssueOut>>>,
        pub safety_reports: Arc<Mutex<BTreeMap<i64, SafetyReport>>>,
        pub session: Arc<Mutex<Option<User>>>,
        pub admins: Arc<Mutex<HashSet<String>>>,
        pub uploads: Arc<Mutex<HashMap<String, UploadFile>>>,

        next_id: Arc<AtomicI64>,
        requests: Arc<AtomicUsize>,
        failures: Arc<AtomicUsize>,
        gate: Arc<watch::Sender<bool>>,
    }
);

impl Default for ReferenceBackend {
    fn default() -> Self {
        ReferenceBackend {
            issues: Default::default(),
            safety_reports: Default::default(),
            session: Default::default(),
            admins: Default::default(),
            uploads: Default::default(),
            next_id: Arc::new(AtomicI64::new(1)),
            requests: Default::default(),
            failures: Default::default(),
            gate: Arc::new(watch::channel(false).0),
        }
    }
}

impl ReferenceBackend {
    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Reject the next `count` requests with a server error
    pub fn fail_next_requests(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Hold every request until `stall_requests(false)` is called
    pub fn stall_requests(&self, stalled: bool) {
        self.gate.send_replace(stalled);
    }

    /// Sign a user in, optionally as an administrator
    pub async fn sign_in(&self, user: User, admin: bool) {
        if admin {
            self.admins.lock().await.insert(user.sub.clone());
        }

        *self.session.lock().await = Some(user);
    }

    /// Whether the signed in user is an administrator
    pub(crate) async fn is_admin(&self) -> bool {
        match self.session.lock().await.as_ref() {
            Some(user) => self.admins.lock().await.contains(&user.sub),
            None => false,
        }
    }

    /// Currently signed in user
    pub(crate) async fn require_login(&self) -> Result<User> {
        self.session
            .lock()
            .await
            .clone()
            .ok_or_else(|| create_error!(NotAuthenticated))
    }

    /// Keep an uploaded file under `/static/<folder>/` and return its path
    pub(crate) async fn store_upload(&self, folder: &str, file: UploadFile) -> String {
        let extension = Path::new(&file.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                file.content_type
                    .rsplit('/')
                    .next()
                    .unwrap_or("bin")
                    .to_string()
            });

        let path = format!("/static/{folder}/{}.{extension}", uuid::Uuid::new_v4());
        self.uploads.lock().await.insert(path.clone(), file);
        path
    }

    /// Allocate the next Id
    pub(crate) fn generate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Account for a request, applying stalls and injected failures
    pub(crate) async fn begin_request(&self, route: &str) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!("Reference backend received {route}");

        let mut gate = self.gate.subscribe();
        if gate.wait_for(|stalled| !stalled).await.is_err() {
            return Err(create_error!(NetworkError));
        }

        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();

        if injected {
            Err(create_error!(RequestFailed { status: 503 }))
        } else {
            Ok(())
        }
    }
}

/// Current time, formatted like the server does
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
