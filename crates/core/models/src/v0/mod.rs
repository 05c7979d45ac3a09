mod analytics;
mod issues;
mod safety_reports;
mod users;

pub use analytics::*;
pub use issues::*;
pub use safety_reports::*;
pub use users::*;
