mod label;
mod summary;

pub use label::format_label;
pub use summary::{CONFIGURED, NOT_CONFIGURED, summarize, truncate};
