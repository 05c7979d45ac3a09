mod model;
mod ops;

pub(crate) use model::*;
pub use ops::*;
