use campusfix_files::UploadFile;
use campusfix_models::v0::DataReportIncident;
use campusfix_result::Result;
use reqwest::multipart::Form;

use crate::file_part;

/// Number of reports shown in the community feed
pub const COMMUNITY_FEED_LIMIT: usize = 50;

/// Safety report ready to be sent
#[derive(Clone, Debug)]
pub struct NewSafetyReport {
    pub description: String,
    pub location: String,
    /// Photo or video of the incident
    pub media: Option<UploadFile>,
}

impl NewSafetyReport {
    pub fn from_data(data: &DataReportIncident, media: Option<UploadFile>) -> NewSafetyReport {
        NewSafetyReport {
            description: data.description.clone(),
            location: data.location.clone(),
            media,
        }
    }

    /// Multipart form as expected by `POST /safety/reports`
    pub fn into_form(self) -> Result<Form> {
        let form = Form::new()
            .text("description", self.description)
            .text("location", self.location);

        match self.media {
            Some(media) => Ok(form.part("media", file_part(media)?)),
            None => Ok(form),
        }
    }
}
