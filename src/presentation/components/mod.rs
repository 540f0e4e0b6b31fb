mod body;
mod footer;
mod header;
mod layout;
mod popup;

pub use body::render_body;
pub use footer::render_footer;
pub use header::render_header;
pub use popup::{render_popup, render_prompt};
