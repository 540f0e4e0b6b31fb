#![deny(rust_2018_idioms)]

mod app;
mod domain;
mod engine;
mod form;
mod format;
#[cfg(feature = "tui")]
mod presentation;

pub use app::{
    ActionContext, AutoForm, ClosePolicy, DialogDriver, DialogHost, DialogSession, EditorOptions,
    Outcome, Script, ScriptError, ScriptedHost, open_dialog,
};
#[cfg(feature = "tui")]
pub use app::TerminalHost;
pub use domain::{
    AddressPort, AnnotationKey, Annotations, Autoconfig, Configurable, CustomRef, DEFAULT_FILE_FILTER,
    EnumList, ExistingDirectory, ExistingFile, FieldKind, FieldShape, FieldType, FloatWidth, Header,
    IntWidth, MultiLineString, OPTION_SEPARATOR, OneOf, Password, RecordRef, RecordShape,
    ShapeBuilder, TypedSave, UnsupportedKind,
};
pub use engine::{
    CustomRender, Environment, FieldContext, KindKey, RenderContext, WidgetHandler, WidgetRegistry,
    float_range, remove_indices, render_field, render_record, render_self_describing, spin_range,
};
pub use form::{
    Button, CheckBox, ComboBox, ComboItem, ConfigError, Control, DateTimeEdit, DoubleSpinBox, Echo,
    Enablement, Form, FormArea, FormRow, Icon, Label, LabelStyle, LineEdit, ListView,
    ResolvedIcon, SaveAction, Shared, SpinBox, Stack, TextEdit, icon, shared,
};
pub use format::{CONFIGURED, NOT_CONFIGURED, format_label, summarize, truncate};

pub mod prelude {
    pub use super::{
        AddressPort, Annotations, AutoForm, Autoconfig, ClosePolicy, Configurable, DialogHost,
        EditorOptions, EnumList, ExistingDirectory, ExistingFile, FieldType, Header,
        MultiLineString, OneOf, Outcome, Password, RecordShape, custom_field, record_field,
        registered_field,
    };
}
