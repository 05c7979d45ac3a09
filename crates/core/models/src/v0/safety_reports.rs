#[cfg(feature = "validator")]
use validator::Validate;

#[cfg(feature = "validator")]
use super::validate_not_blank;

auto_derived!(
    /// Anonymous safety incident report
    pub struct SafetyReport {
        /// Unique Id
        pub id: i64,
        /// What happened
        pub description: String,
        /// Where it happened
        pub location: String,
        /// URL of the attached photo or video
        #[cfg_attr(feature = "serde", serde(default))]
        pub media_url: Option<String>,
        /// Whether the attached media was flagged as explicit
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "crate::if_false")
        )]
        pub is_nsfw: bool,
        /// When this report was created
        pub created_at: String,
        /// Current status
        #[cfg_attr(feature = "serde", serde(default = "default_status"))]
        pub status: String,
        /// Whether this report needs immediate attention
        #[cfg_attr(feature = "serde", serde(default))]
        pub is_critical: bool,
    }
);

/// # Incident Data
#[cfg_attr(feature = "validator", derive(Validate))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataReportIncident {
    /// What happened
    #[cfg_attr(feature = "validator", validate(custom(function = "validate_not_blank")))]
    pub description: String,
    /// Where it happened
    #[cfg_attr(feature = "validator", validate(custom(function = "validate_not_blank")))]
    pub location: String,
}

#[cfg(feature = "serde")]
fn default_status() -> String {
    "Open".to_string()
}
