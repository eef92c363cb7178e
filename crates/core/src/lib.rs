pub mod format;
pub mod models;
pub mod validators;

pub use format::*;
pub use models::*;
pub use validators::*;
