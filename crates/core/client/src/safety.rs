use campusfix_backend::{Backend, NewSafetyReport};
use campusfix_files::{compress_image, CompressionOptions, UploadFile};
use campusfix_models::v0::{DataReportIncident, SafetyReport};
use campusfix_result::Result;
use validator::Validate;

use crate::submission::invalid_fields;

/// Anonymous safety reporting
#[derive(Clone)]
pub struct SafetyReporter {
    backend: Backend,
    options: CompressionOptions,
}

impl SafetyReporter {
    pub fn new(backend: Backend, options: CompressionOptions) -> SafetyReporter {
        SafetyReporter { backend, options }
    }

    /// File a report, photos are compressed before upload
    pub async fn report(
        &self,
        description: &str,
        location: &str,
        media: Option<UploadFile>,
    ) -> Result<SafetyReport> {
        let data = DataReportIncident {
            description: description.to_string(),
            location: location.to_string(),
        };

        data.validate().map_err(|errors| {
            create_error!(FailedValidation {
                error: invalid_fields(&errors)
            })
        })?;

        let media = match media {
            Some(media) if media.is_image() => Some(compress_image(media, &self.options).await),
            media => media,
        };

        self.backend
            .insert_safety_report(NewSafetyReport::from_data(&data, media))
            .await
    }

    /// Every report (administrators only)
    pub async fn reports(&self) -> Result<Vec<SafetyReport>> {
        self.backend.fetch_safety_reports().await
    }

    /// Latest reports shared with the community
    pub async fn community(&self) -> Result<Vec<SafetyReport>> {
        self.backend.fetch_community_reports().await
    }
}
