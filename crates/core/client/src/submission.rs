use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use campusfix_backend::{Backend, NewIssue};
use campusfix_files::{compress_image, CompressionOptions, UploadFile};
use campusfix_models::v0::{DataReportIssue, Issue};
use campusfix_result::Result;
use validator::{Validate, ValidationErrors};

use crate::IssueStore;

/// Issue being written by a student
#[derive(Clone, Debug, Default)]
pub struct Draft {
    /// Short title, optional
    pub summary: String,
    pub location: String,
    pub description: String,

    selected: Option<UploadFile>,
    compressed: Option<UploadFile>,
    preview: Option<String>,
}

impl Draft {
    pub fn new(
        summary: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Draft {
        Draft {
            summary: summary.into(),
            location: location.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Select a photo without compressing it yet
    pub fn select(&mut self, file: UploadFile) {
        self.selected = Some(file);
        self.compressed = None;
        self.preview = None;
    }

    /// Select a photo, compress it and prepare its preview
    pub async fn attach(&mut self, file: UploadFile, options: &CompressionOptions) {
        self.select(file.clone());
        self.set_compressed(compress_image(file, options).await);
    }

    fn set_compressed(&mut self, file: UploadFile) {
        self.preview = Some(file.to_data_url());
        self.compressed = Some(file);
    }

    /// Drop the selected photo
    pub fn detach(&mut self) {
        self.selected = None;
        self.compressed = None;
        self.preview = None;
    }

    /// Photo as selected
    pub fn selected(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    /// Photo as it will be uploaded
    pub fn compressed(&self) -> Option<&UploadFile> {
        self.compressed.as_ref()
    }

    /// `data:` URL of the photo to upload
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn data(&self) -> DataReportIssue {
        DataReportIssue {
            summary: Some(self.summary.clone()),
            description: self.description.clone(),
            location: self.location.clone(),
        }
    }

    /// Description as sent to the server
    pub fn full_description(&self) -> String {
        self.data().full_description()
    }

    /// Check that the draft can be submitted
    pub fn validate(&self) -> Result<()> {
        self.data().validate().map_err(|errors| {
            create_error!(FailedValidation {
                error: invalid_fields(&errors)
            })
        })
    }

    /// Clear every field and the photo
    pub fn reset(&mut self) {
        *self = Draft::default();
    }
}

/// Names of the invalid fields, sorted and comma separated
pub(crate) fn invalid_fields(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();

    fields.sort();
    fields.join(", ")
}

/// Sends drafts to the server, one at a time
#[derive(Clone)]
pub struct Submitter {
    backend: Backend,
    store: IssueStore,
    options: CompressionOptions,
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of a submission
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<InFlight<'a>> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Submitter {
    pub fn new(backend: Backend, store: IssueStore, options: CompressionOptions) -> Submitter {
        Submitter {
            backend,
            store,
            options,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit a draft
    ///
    /// On success the draft is cleared, the issue list refreshed and the new
    /// issue returned. On failure the draft is left untouched.
    pub async fn submit(&self, draft: &mut Draft) -> Result<Issue> {
        draft.validate()?;

        let _in_flight =
            InFlight::acquire(&self.in_flight).ok_or_else(|| create_error!(SubmissionInProgress))?;

        if draft.compressed.is_none() {
            if let Some(selected) = draft.selected.clone() {
                draft.set_compressed(compress_image(selected, &self.options).await);
            }
        }

        let issue = NewIssue::from_data(&draft.data(), draft.compressed.clone());
        let created = self
            .backend
            .insert_issue(issue)
            .await
            .inspect_err(|error| warn!("Failed to submit issue: {error}"))?;

        info!("Reported issue {} at {}", created.id, created.location);
        let created = Issue::from_wire(created, self.backend.base_url());
        draft.reset();

        if let Err(error) = self.store.refresh().await {
            warn!("Issue {} was reported but the list could not be refreshed: {error}", created.id);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use campusfix_backend::Backend;
    use campusfix_files::{CompressionOptions, UploadFile};
    use campusfix_models::v0::SortBy;
    use campusfix_result::ErrorType;

    use super::{Draft, Submitter};
    use crate::test_util::signed_in;
    use crate::{IssueStore, DEFAULT_REFRESH_TIMEOUT};

    fn submitter(backend: Backend) -> (Submitter, IssueStore) {
        let store = IssueStore::new(backend.clone(), SortBy::Priority, DEFAULT_REFRESH_TIMEOUT);
        let submitter = Submitter::new(backend, store.clone(), CompressionOptions::default());
        (submitter, store)
    }

    fn draft(summary: &str, description: &str, location: &str) -> Draft {
        Draft::new(summary, location, description)
    }

    fn photo(width: u32, height: u32) -> UploadFile {
        let pixels = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        });

        let mut data = Cursor::new(vec![]);
        image::DynamicImage::ImageRgb8(pixels)
            .write_to(&mut data, image::ImageFormat::Jpeg)
            .unwrap();

        UploadFile::new("photo.jpg", data.into_inner())
    }

    #[test]
    fn summary_prefixes_description() {
        assert_eq!(
            draft("Broken Tap", "leak", "A201").full_description(),
            "[Broken Tap] leak"
        );
        assert_eq!(draft("  ", "leak", "A201").full_description(), "leak");
    }

    #[test]
    fn validation_names_fields() {
        let error = draft("", " ", "").validate().unwrap_err();
        assert_eq!(
            error.error_type,
            ErrorType::FailedValidation {
                error: "description, location".to_string()
            }
        );
        assert!(draft("", "leak", "A201").validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_draft_makes_no_request() {
        let (reference, backend) = signed_in(false).await;
        let (submitter, _) = submitter(backend);

        let mut invalid = draft("Broken Tap", "leak", "   ");
        let error = submitter.submit(&mut invalid).await.unwrap_err();

        assert!(matches!(error.error_type, ErrorType::FailedValidation { .. }));
        assert_eq!(invalid.location, "   ");
        assert_eq!(reference.request_count(), 0);
    }

    #[tokio::test]
    async fn submitted_issue_appears_once() {
        let (reference, backend) = signed_in(false).await;
        let (submitter, store) = submitter(backend);

        let mut draft = draft("Broken Tap", "leak", "A201");
        let created = submitter.submit(&mut draft).await.unwrap();

        assert_eq!(created.text, "[Broken Tap] leak");
        assert_eq!(created.category, "Plumbing");
        assert!(draft.description.is_empty());
        assert!(draft.location.is_empty());
        assert!(draft.summary.is_empty());

        let matching = store
            .snapshot()
            .into_iter()
            .filter(|issue| issue.id == created.id)
            .count();
        assert_eq!(matching, 1);
        assert_eq!(reference.request_count(), 2);
        assert!(!submitter.is_submitting());
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_draft() {
        let (reference, backend) = signed_in(false).await;
        let (submitter, store) = submitter(backend);

        reference.fail_next_requests(1);
        let mut draft = draft("", "wifi down", "Library");
        assert!(submitter.submit(&mut draft).await.is_err());

        assert_eq!(draft.description, "wifi down");
        assert!(store.snapshot().is_empty());
        assert!(!submitter.is_submitting());

        submitter.submit(&mut draft).await.unwrap();
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_submission_is_refused() {
        let (reference, backend) = signed_in(false).await;
        let (submitter, store) = submitter(backend);

        reference.stall_requests(true);
        let first = tokio::spawn({
            let submitter = submitter.clone();
            async move {
                let mut draft = draft("", "light flickers", "Gym");
                submitter.submit(&mut draft).await
            }
        });

        while reference.request_count() == 0 {
            tokio::task::yield_now().await;
        }

        let mut second = draft("", "light flickers", "Gym");
        let error = submitter.submit(&mut second).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::SubmissionInProgress);
        assert_eq!(second.description, "light flickers");
        assert_eq!(reference.request_count(), 1);

        reference.stall_requests(false);
        first.await.unwrap().unwrap();
        assert_eq!(store.snapshot().len(), 1);
        assert!(!submitter.is_submitting());
    }

    #[tokio::test]
    async fn photo_is_compressed_before_upload() {
        let (reference, backend) = signed_in(false).await;
        let (submitter, _) = submitter(backend);

        let options = CompressionOptions {
            skip_below_bytes: 0,
            ..Default::default()
        };

        let mut draft = draft("", "broken window", "Dorm 4");
        draft.attach(photo(1200, 900), &options).await;
        assert!(draft.preview().unwrap().starts_with("data:image/jpeg;base64,"));

        let compressed = draft.compressed().cloned().unwrap();
        let created = submitter.submit(&mut draft).await.unwrap();
        assert!(draft.compressed().is_none());

        let path = created
            .image
            .unwrap()
            .trim_start_matches(campusfix_backend::REFERENCE_BASE_URL)
            .to_string();
        let uploaded = reference.uploads.lock().await[&path].clone();
        assert_eq!(uploaded.data, compressed.data);
        assert_eq!(uploaded.name, "photo.jpg");
        assert_eq!(imagesize::blob_size(&uploaded.data).unwrap().width, 1024);
    }

    #[tokio::test]
    async fn selected_photo_is_compressed_on_submit() {
        let (reference, backend) = signed_in(false).await;
        let store = IssueStore::new(backend.clone(), SortBy::Priority, DEFAULT_REFRESH_TIMEOUT);
        let submitter = Submitter::new(
            backend,
            store,
            CompressionOptions {
                skip_below_bytes: 0,
                ..Default::default()
            },
        );

        let mut draft = draft("", "broken window", "Dorm 4");
        draft.select(photo(600, 1600));
        assert!(draft.compressed().is_none());

        submitter.submit(&mut draft).await.unwrap();

        let uploads = reference.uploads.lock().await;
        let uploaded = uploads.values().next().unwrap();
        let size = imagesize::blob_size(&uploaded.data).unwrap();
        assert_eq!((size.width, size.height), (384, 1024));
    }
}
