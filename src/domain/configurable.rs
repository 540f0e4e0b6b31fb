use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::engine::FieldContext;
use crate::form::{ConfigError, FormArea};

use super::shape::{FieldKind, RecordShape};

/// A Rust type that knows its own field classification.
pub trait FieldType {
    fn field_kind() -> FieldKind;
}

/// A record the editor can walk field by field.
///
/// `shape` declares the exported fields in declaration order. The record is
/// edited through its serde representation, so every declared key must match
/// the serialized field name.
pub trait Configurable: Serialize + DeserializeOwned + Default + 'static {
    fn shape() -> RecordShape;

    /// Runs once right after the editor lazily allocates this record.
    fn init_defaults(&mut self) {}

    /// One-line preview used in place of the generic "Configured" status.
    fn summary(&self) -> Option<String> {
        None
    }
}

/// Save step produced by a self-describing type, applied to a decoded copy
/// of the bound value.
pub type TypedSave<T> = Box<dyn FnMut(&mut T) -> Result<(), ConfigError>>;

/// A type that renders and saves its own editor, overriding the built-in
/// widget for its kind.
pub trait Autoconfig: Serialize + DeserializeOwned + Default + 'static {
    fn autoconfig(
        &mut self,
        form: &mut dyn FormArea,
        field: &FieldContext<'_>,
    ) -> Result<TypedSave<Self>, ConfigError>;

    fn summary(&self) -> Option<String> {
        None
    }
}

/// Implements [`FieldType`] for one or more [`Configurable`] records.
#[macro_export]
macro_rules! record_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $ty {
                fn field_kind() -> $crate::FieldKind {
                    $crate::FieldKind::record::<$ty>()
                }
            }
        )+
    };
}

/// Implements [`FieldType`] for one or more [`Autoconfig`] types.
#[macro_export]
macro_rules! custom_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $ty {
                fn field_kind() -> $crate::FieldKind {
                    $crate::FieldKind::custom::<$ty>()
                }
            }
        )+
    };
}

/// Implements [`FieldType`] for host types rendered by a handler added to a
/// `WidgetRegistry` with `register_type`.
#[macro_export]
macro_rules! registered_field {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldType for $ty {
                fn field_kind() -> $crate::FieldKind {
                    $crate::FieldKind::registered::<$ty>()
                }
            }
        )+
    };
}
