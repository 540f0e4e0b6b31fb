mod components;
mod view;

pub(crate) use view::{DialogView, PopupRender, PromptRender, RowView, SegmentView, draw};
