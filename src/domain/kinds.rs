use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use super::configurable::FieldType;
use super::shape::{FieldKind, FloatWidth, IntWidth, UnsupportedKind};
use super::types::{
    AddressPort, EnumList, ExistingDirectory, ExistingFile, Header, MultiLineString, OneOf,
    Password,
};

macro_rules! leaf_kind {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn field_kind() -> FieldKind {
                    $kind
                }
            }
        )+
    };
}

leaf_kind! {
    bool => FieldKind::Bool,
    String => FieldKind::Text,
    i8 => FieldKind::Integer(IntWidth::I8),
    i16 => FieldKind::Integer(IntWidth::I16),
    i32 => FieldKind::Integer(IntWidth::I32),
    i64 => FieldKind::Integer(IntWidth::I64),
    isize => FieldKind::Integer(IntWidth::I64),
    u8 => FieldKind::Integer(IntWidth::U8),
    u16 => FieldKind::Integer(IntWidth::U16),
    u32 => FieldKind::Integer(IntWidth::U32),
    u64 => FieldKind::Integer(IntWidth::U64),
    usize => FieldKind::Integer(IntWidth::U64),
    f32 => FieldKind::Float(FloatWidth::F32),
    f64 => FieldKind::Float(FloatWidth::F64),
    DateTime<Utc> => FieldKind::Timestamp,
    Password => FieldKind::Password,
    MultiLineString => FieldKind::MultiLineText,
    EnumList => FieldKind::Enum,
    ExistingFile => FieldKind::ExistingFile,
    ExistingDirectory => FieldKind::ExistingDirectory,
    AddressPort => FieldKind::AddressPort,
    Header => FieldKind::Header,
    OneOf => FieldKind::OneOf,
    Value => FieldKind::Unsupported(UnsupportedKind::Dynamic),
}

impl<T: FieldType> FieldType for Vec<T> {
    fn field_kind() -> FieldKind {
        FieldKind::List(Box::new(T::field_kind()))
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Optional(Box::new(T::field_kind()))
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }
}

impl<K, V, S> FieldType for HashMap<K, V, S> {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Map)
    }
}

impl<K, V> FieldType for BTreeMap<K, V> {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Map)
    }
}

impl<K, V, S> FieldType for IndexMap<K, V, S> {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Map)
    }
}

impl<T, const N: usize> FieldType for [T; N] {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::FixedArray)
    }
}

impl<A, B> FieldType for (A, B) {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Tuple)
    }
}

impl<A, B, C> FieldType for (A, B, C) {
    fn field_kind() -> FieldKind {
        FieldKind::Unsupported(UnsupportedKind::Tuple)
    }
}
