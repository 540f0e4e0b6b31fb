use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::engine::{CustomRender, render_self_describing};

use super::annotations::Annotations;
use super::configurable::{Autoconfig, Configurable, FieldType};

/// Closed classification of a field, computed from its declared Rust type.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Bool,
    Text,
    MultiLineText,
    Password,
    Integer(IntWidth),
    Float(FloatWidth),
    Enum,
    ExistingFile,
    ExistingDirectory,
    AddressPort,
    Timestamp,
    Header,
    OneOf,
    Record(RecordRef),
    Optional(Box<FieldKind>),
    List(Box<FieldKind>),
    Custom(CustomRef),
    Unsupported(UnsupportedKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

/// Shapes that are recognised but intentionally have no editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    Map,
    FixedArray,
    Tuple,
    Dynamic,
}

impl IntWidth {
    pub fn is_signed(self) -> bool {
        matches!(self, IntWidth::I8 | IntWidth::I16 | IntWidth::I32 | IntWidth::I64)
    }

    pub fn bits(self) -> u32 {
        match self {
            IntWidth::I8 | IntWidth::U8 => 8,
            IntWidth::I16 | IntWidth::U16 => 16,
            IntWidth::I32 | IntWidth::U32 => 32,
            IntWidth::I64 | IntWidth::U64 => 64,
        }
    }

    /// Full mathematical range of the Rust type, widened to `i128`.
    pub fn type_range(self) -> (i128, i128) {
        match self {
            IntWidth::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntWidth::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntWidth::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntWidth::I64 => (i64::MIN as i128, i64::MAX as i128),
            IntWidth::U8 => (0, u8::MAX as i128),
            IntWidth::U16 => (0, u16::MAX as i128),
            IntWidth::U32 => (0, u32::MAX as i128),
            IntWidth::U64 => (0, u64::MAX as i128),
        }
    }

    fn name(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::U8 => "u8",
            IntWidth::U16 => "u16",
            IntWidth::U32 => "u32",
            IntWidth::U64 => "u64",
        }
    }
}

impl FieldKind {
    pub fn record<T: Configurable>() -> Self {
        FieldKind::Record(RecordRef::of::<T>())
    }

    pub fn custom<T: Autoconfig>() -> Self {
        FieldKind::Custom(CustomRef::self_describing::<T>())
    }

    pub fn registered<T: Serialize + Default + 'static>() -> Self {
        FieldKind::Custom(CustomRef::registered::<T>())
    }

    pub fn of<T: FieldType>() -> Self {
        T::field_kind()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldKind::Optional(_))
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            FieldKind::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Zero value of the kind, without running any init-defaults hook.
    pub fn zero_value(&self) -> Result<Value, serde_json::Error> {
        Ok(match self {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Text
            | FieldKind::MultiLineText
            | FieldKind::Password
            | FieldKind::ExistingFile
            | FieldKind::ExistingDirectory
            | FieldKind::OneOf => Value::String(String::new()),
            FieldKind::Integer(_) | FieldKind::Enum => Value::from(0),
            FieldKind::Float(_) => Value::from(0.0),
            FieldKind::AddressPort => serde_json::to_value(super::types::AddressPort::default())?,
            FieldKind::Timestamp => serde_json::to_value(DateTime::<Utc>::default())?,
            FieldKind::Record(record) => record.zero_value()?,
            FieldKind::List(_) => Value::Array(Vec::new()),
            FieldKind::Custom(custom) => custom.zero_value()?,
            FieldKind::Header | FieldKind::Optional(_) | FieldKind::Unsupported(_) => Value::Null,
        })
    }

    /// Value for a lazily allocated slot: records get their init-defaults
    /// hook run exactly once, everything else is the zero value.
    pub fn allocate(&self) -> Result<Value, serde_json::Error> {
        match self {
            FieldKind::Record(record) => record.allocate(),
            other => other.zero_value(),
        }
    }

    /// Human readable kind name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Text => "text".to_string(),
            FieldKind::MultiLineText => "multi-line text".to_string(),
            FieldKind::Password => "password".to_string(),
            FieldKind::Integer(width) => width.name().to_string(),
            FieldKind::Float(FloatWidth::F32) => "f32".to_string(),
            FieldKind::Float(FloatWidth::F64) => "f64".to_string(),
            FieldKind::Enum => "enumerated choice".to_string(),
            FieldKind::ExistingFile => "file path".to_string(),
            FieldKind::ExistingDirectory => "directory path".to_string(),
            FieldKind::AddressPort => "address and port".to_string(),
            FieldKind::Timestamp => "timestamp".to_string(),
            FieldKind::Header => "header".to_string(),
            FieldKind::OneOf => "OneOf discriminator".to_string(),
            FieldKind::Record(record) => format!("record {}", record.type_name()),
            FieldKind::Optional(inner) => format!("optional {}", inner.describe()),
            FieldKind::List(inner) => format!("list of {}", inner.describe()),
            FieldKind::Custom(custom) => format!("custom {}", custom.type_name()),
            FieldKind::Unsupported(kind) => format!("unsupported {kind:?}"),
        }
    }
}

/// Handle to a host record type: its shape plus typed hooks erased to
/// function pointers.
#[derive(Clone, Copy)]
pub struct RecordRef {
    type_name: &'static str,
    shape: fn() -> RecordShape,
    allocate: fn(bool) -> Result<Value, serde_json::Error>,
    summary: fn(&Value) -> Option<String>,
}

impl RecordRef {
    pub fn of<T: Configurable>() -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            shape: T::shape,
            allocate: allocate_record::<T>,
            summary: summarize_record::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn shape(&self) -> RecordShape {
        (self.shape)()
    }

    pub fn zero_value(&self) -> Result<Value, serde_json::Error> {
        (self.allocate)(false)
    }

    pub fn allocate(&self) -> Result<Value, serde_json::Error> {
        (self.allocate)(true)
    }

    /// The record's own summary, if it declares one.
    pub fn summary(&self, value: &Value) -> Option<String> {
        (self.summary)(value)
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn allocate_record<T: Configurable>(run_init: bool) -> Result<Value, serde_json::Error> {
    let mut value = T::default();
    if run_init {
        value.init_defaults();
    }
    serde_json::to_value(value)
}

fn summarize_record<T: Configurable>(value: &Value) -> Option<String> {
    serde_json::from_value::<T>(value.clone())
        .ok()
        .and_then(|record| record.summary())
}

/// Type identity of a custom kind, optionally with its own renderer.
#[derive(Clone, Copy)]
pub struct CustomRef {
    type_name: &'static str,
    type_id: TypeId,
    render: Option<CustomRender>,
    zero: fn() -> Result<Value, serde_json::Error>,
    summary: fn(&Value) -> Option<String>,
}

impl CustomRef {
    pub fn self_describing<T: Autoconfig>() -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            type_id: TypeId::of::<T>(),
            render: Some(render_self_describing::<T> as CustomRender),
            zero: zero_of::<T>,
            summary: summarize_custom::<T>,
        }
    }

    pub fn registered<T: Serialize + Default + 'static>() -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            type_id: TypeId::of::<T>(),
            render: None,
            zero: zero_of::<T>,
            summary: no_summary,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn render(&self) -> Option<CustomRender> {
        self.render
    }

    pub fn zero_value(&self) -> Result<Value, serde_json::Error> {
        (self.zero)()
    }

    pub fn summary(&self, value: &Value) -> Option<String> {
        (self.summary)(value)
    }
}

impl fmt::Debug for CustomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRef")
            .field("type_name", &self.type_name)
            .field("self_describing", &self.render.is_some())
            .finish_non_exhaustive()
    }
}

fn zero_of<T: Serialize + Default>() -> Result<Value, serde_json::Error> {
    serde_json::to_value(T::default())
}

fn summarize_custom<T: Autoconfig>(value: &Value) -> Option<String> {
    serde_json::from_value::<T>(value.clone())
        .ok()
        .and_then(|custom| custom.summary())
}

fn no_summary(_value: &Value) -> Option<String> {
    None
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Debug, Clone)]
pub struct FieldShape {
    key: String,
    kind: FieldKind,
    annotations: Annotations,
    exported: bool,
}

impl FieldShape {
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            annotations: Annotations::default(),
            exported: true,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Serialized key of the field inside its record.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// Declared field list of one record type, in declaration order.
#[derive(Debug, Clone)]
pub struct RecordShape {
    type_name: &'static str,
    fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn new(type_name: &'static str, fields: Vec<FieldShape>) -> Self {
        Self { type_name, fields }
    }

    pub fn builder<T: 'static>() -> ShapeBuilder<T> {
        ShapeBuilder {
            type_name: short_type_name(std::any::type_name::<T>()),
            fields: Vec::new(),
            _record: PhantomData,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// A record whose first field is a `OneOf` discriminator.
    pub fn is_one_of(&self) -> bool {
        self.fields
            .first()
            .is_some_and(|field| matches!(field.kind, FieldKind::OneOf))
    }
}

/// Builder that infers each field's kind from a projection closure, so the
/// declared classification cannot drift from the struct definition.
pub struct ShapeBuilder<T> {
    type_name: &'static str,
    fields: Vec<FieldShape>,
    _record: PhantomData<fn() -> T>,
}

impl<T: 'static> ShapeBuilder<T> {
    pub fn field<F: FieldType>(self, key: &str, project: fn(&T) -> &F) -> Self {
        self.field_with(key, project, |annotations| annotations)
    }

    pub fn field_with<F: FieldType>(
        mut self,
        key: &str,
        _project: fn(&T) -> &F,
        annotate: impl FnOnce(Annotations) -> Annotations,
    ) -> Self {
        let annotations = annotate(Annotations::new());
        self.fields
            .push(FieldShape::new(key, F::field_kind()).with_annotations(annotations));
        self
    }

    /// Declares a field that is serialized but never shown.
    pub fn hidden<F: FieldType>(mut self, key: &str, _project: fn(&T) -> &F) -> Self {
        self.fields
            .push(FieldShape::new(key, F::field_kind()).hidden());
        self
    }

    pub fn build(self) -> RecordShape {
        RecordShape {
            type_name: self.type_name,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name("app::config::Service"), "Service");
        assert_eq!(short_type_name("alloc::vec::Vec<app::Item>"), "Vec");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn integer_widths_report_type_ranges() {
        assert_eq!(IntWidth::I8.type_range(), (-128, 127));
        assert_eq!(IntWidth::U16.type_range(), (0, 65535));
        assert!(IntWidth::I32.is_signed());
        assert!(!IntWidth::U64.is_signed());
        assert_eq!(IntWidth::U64.bits(), 64);
    }

    #[test]
    fn zero_values_follow_the_kind() {
        assert_eq!(FieldKind::Bool.zero_value().unwrap(), Value::Bool(false));
        assert_eq!(
            FieldKind::List(Box::new(FieldKind::Text)).zero_value().unwrap(),
            Value::Array(Vec::new())
        );
        assert_eq!(
            FieldKind::Optional(Box::new(FieldKind::Text))
                .zero_value()
                .unwrap(),
            Value::Null
        );
        assert_eq!(
            FieldKind::Timestamp.zero_value().unwrap(),
            Value::String("1970-01-01T00:00:00Z".to_string())
        );
    }
}
