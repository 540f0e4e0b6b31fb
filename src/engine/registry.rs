use std::any::TypeId;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{FieldKind, UnsupportedKind};
use crate::form::{ConfigError, FormArea, SaveAction};

use super::context::{FieldContext, RenderContext};
use super::{list, optional, record, scalar};

pub type WidgetHandler = Rc<
    dyn Fn(&RenderContext, &mut dyn FormArea, &FieldContext<'_>, &mut Value) -> Result<SaveAction, ConfigError>,
>;

/// Stable registry key for a field classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindKey {
    Bool,
    Text,
    MultiLineText,
    Password,
    Integer,
    Float,
    Enum,
    ExistingFile,
    ExistingDirectory,
    AddressPort,
    Timestamp,
    Header,
    OneOf,
    Record,
    Optional,
    List,
    Custom(TypeId),
    Unsupported(UnsupportedKind),
}

impl KindKey {
    pub fn of(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Bool => KindKey::Bool,
            FieldKind::Text => KindKey::Text,
            FieldKind::MultiLineText => KindKey::MultiLineText,
            FieldKind::Password => KindKey::Password,
            FieldKind::Integer(_) => KindKey::Integer,
            FieldKind::Float(_) => KindKey::Float,
            FieldKind::Enum => KindKey::Enum,
            FieldKind::ExistingFile => KindKey::ExistingFile,
            FieldKind::ExistingDirectory => KindKey::ExistingDirectory,
            FieldKind::AddressPort => KindKey::AddressPort,
            FieldKind::Timestamp => KindKey::Timestamp,
            FieldKind::Header => KindKey::Header,
            FieldKind::OneOf => KindKey::OneOf,
            FieldKind::Record(_) => KindKey::Record,
            FieldKind::Optional(_) => KindKey::Optional,
            FieldKind::List(_) => KindKey::List,
            FieldKind::Custom(custom) => KindKey::Custom(custom.type_id()),
            FieldKind::Unsupported(unsupported) => KindKey::Unsupported(*unsupported),
        }
    }
}

/// Maps field classifications to the handlers that render them.
///
/// Built once per editor and shared by every dialog it opens. A fresh
/// registry can be built per test; nothing is global.
#[derive(Clone)]
pub struct WidgetRegistry {
    handlers: IndexMap<KindKey, WidgetHandler>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl WidgetRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(KindKey::Bool, scalar::render_bool);
        registry.register(KindKey::Text, scalar::render_text);
        registry.register(KindKey::OneOf, scalar::render_text);
        registry.register(KindKey::Password, scalar::render_text);
        registry.register(KindKey::MultiLineText, scalar::render_multi_line);
        registry.register(KindKey::Integer, scalar::render_integer);
        registry.register(KindKey::Float, scalar::render_float);
        registry.register(KindKey::Enum, scalar::render_enum);
        registry.register(KindKey::ExistingFile, scalar::render_path);
        registry.register(KindKey::ExistingDirectory, scalar::render_path);
        registry.register(KindKey::AddressPort, scalar::render_address_port);
        registry.register(KindKey::Timestamp, scalar::render_timestamp);
        registry.register(KindKey::Header, scalar::render_header);
        registry.register(KindKey::Record, record::render_nested_record);
        registry.register(KindKey::Optional, optional::render_optional);
        registry.register(KindKey::List, list::render_list);
        for unsupported in [
            UnsupportedKind::Map,
            UnsupportedKind::FixedArray,
            UnsupportedKind::Tuple,
            UnsupportedKind::Dynamic,
        ] {
            registry.register(KindKey::Unsupported(unsupported), scalar::render_read_only);
        }
        registry
    }

    /// Installs `handler` for `key`, returning the handler it replaces.
    pub fn register(
        &mut self,
        key: KindKey,
        handler: impl Fn(&RenderContext, &mut dyn FormArea, &FieldContext<'_>, &mut Value) -> Result<SaveAction, ConfigError>
        + 'static,
    ) -> Option<WidgetHandler> {
        self.handlers.insert(key, Rc::new(handler))
    }

    /// Installs a handler for fields declared with `FieldKind::registered::<T>()`.
    pub fn register_type<T: 'static>(
        &mut self,
        handler: impl Fn(&RenderContext, &mut dyn FormArea, &FieldContext<'_>, &mut Value) -> Result<SaveAction, ConfigError>
        + 'static,
    ) -> Option<WidgetHandler> {
        self.register(KindKey::Custom(TypeId::of::<T>()), handler)
    }

    pub fn with(
        mut self,
        key: KindKey,
        handler: impl Fn(&RenderContext, &mut dyn FormArea, &FieldContext<'_>, &mut Value) -> Result<SaveAction, ConfigError>
        + 'static,
    ) -> Self {
        self.register(key, handler);
        self
    }

    pub fn remove(&mut self, key: &KindKey) -> Option<WidgetHandler> {
        self.handlers.shift_remove(key)
    }

    pub fn handler(&self, key: &KindKey) -> Option<&WidgetHandler> {
        self.handlers.get(key)
    }

    pub fn contains(&self, key: &KindKey) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
