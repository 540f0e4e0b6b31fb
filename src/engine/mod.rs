mod context;
mod dispatch;
mod list;
mod one_of;
mod optional;
mod record;
mod registry;
mod scalar;

pub use context::{Environment, FieldContext, RenderContext};
pub use dispatch::{CustomRender, render_field, render_self_describing};
pub use list::remove_indices;
pub use record::render_record;
pub use registry::{KindKey, WidgetHandler, WidgetRegistry};
pub use scalar::{float_range, spin_range};
