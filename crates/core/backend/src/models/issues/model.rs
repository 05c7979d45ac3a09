use campusfix_files::UploadFile;
use campusfix_models::v0::{DataReportIssue, IssueOut, IssueStatus};
use campusfix_result::Result;
use reqwest::multipart::{Form, Part};

use crate::util::triage;

/// Issue ready to be created
#[derive(Clone, Debug)]
pub struct NewIssue {
    /// Full description, including the bracketed summary if any
    pub description: String,
    /// Where the issue is
    pub location: String,
    /// Photo to attach
    pub image: Option<UploadFile>,
}

impl NewIssue {
    /// Build from the text fields of a report and an optional photo
    pub fn from_data(data: &DataReportIssue, image: Option<UploadFile>) -> NewIssue {
        NewIssue {
            description: data.full_description(),
            location: data.location.clone(),
            image,
        }
    }

    /// Multipart form as expected by `POST /issues`
    pub fn into_form(self) -> Result<Form> {
        let form = Form::new()
            .text("description", self.description)
            .text("location", self.location);

        match self.image {
            Some(image) => Ok(form.part("image", file_part(image)?)),
            None => Ok(form),
        }
    }
}

/// Multipart part carrying a file
pub(crate) fn file_part(file: UploadFile) -> Result<Part> {
    Part::bytes(file.data.to_vec())
        .file_name(file.name)
        .mime_str(&file.content_type)
        .map_err(|_| create_error!(InternalError))
}

/// Create a wire issue the way the server does on submission
pub(crate) fn triage_issue(
    id: i64,
    description: String,
    location: String,
    image_url: Option<String>,
    created_at: String,
) -> IssueOut {
    let severity = triage::assess(&description);

    IssueOut {
        id,
        category: triage::categorise(&description).to_string(),
        summary: Some(triage::summarise(&description)),
        priority_score: triage::priority(0, severity),
        severity,
        description,
        location,
        image_url,
        upvotes: 0,
        status: IssueStatus::New,
        resolution_image_url: None,
        timeline: vec!["Reported".to_string()],
        created_at,
    }
}
