mod area;
mod control;
mod error;
pub mod icon;
mod save;

pub use area::FormArea;
pub use control::{
    Button, CheckBox, ComboBox, ComboItem, Control, DateTimeEdit, DoubleSpinBox, Echo,
    Enablement, Form, FormRow, Label, LabelStyle, LineEdit, ListView, Shared, SpinBox, Stack,
    TextEdit, shared,
};
pub use error::ConfigError;
pub(crate) use error::{json_type, location};
pub use icon::{Icon, ResolvedIcon};
pub use save::SaveAction;
