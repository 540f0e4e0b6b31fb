mod annotations;
mod configurable;
mod kinds;
mod shape;
mod types;

pub use annotations::{AnnotationKey, Annotations, DEFAULT_FILE_FILTER, OPTION_SEPARATOR};
pub use configurable::{Autoconfig, Configurable, FieldType, TypedSave};
pub use shape::{
    CustomRef, FieldKind, FieldShape, FloatWidth, IntWidth, RecordRef, RecordShape, ShapeBuilder,
    UnsupportedKind,
};
pub use types::{
    AddressPort, EnumList, ExistingDirectory, ExistingFile, Header, MultiLineString, OneOf,
    Password,
};
