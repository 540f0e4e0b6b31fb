use serde_json::Value;

use crate::domain::{AddressPort, Annotations, FieldKind, UnsupportedKind};

pub const NOT_CONFIGURED: &str = "Not configured";
pub const CONFIGURED: &str = "Configured";

/// One-line preview of `value`, interpreted as a field of `kind`.
///
/// Used for list rows, optional status labels and read-only rows. Text
/// previews are cut to `width` characters.
pub fn summarize(kind: &FieldKind, annotations: &Annotations, value: &Value, width: usize) -> String {
    match kind {
        FieldKind::Optional(inner) => {
            if value.is_null() {
                return NOT_CONFIGURED.to_string();
            }
            if let Some(own) = own_summary(inner, value) {
                return own;
            }
            format!("({})", summarize(inner, annotations, value, width))
        }
        FieldKind::Bool => match value.as_bool() {
            Some(flag) => flag.to_string(),
            None => compact(value, width),
        },
        FieldKind::Text | FieldKind::ExistingFile | FieldKind::ExistingDirectory => {
            match value.as_str() {
                Some(text) if matches!(kind, FieldKind::Text) => quoted(text, width),
                Some(path) => truncate(path, width),
                None => compact(value, width),
            }
        }
        FieldKind::MultiLineText => match value.as_str() {
            Some(text) => {
                let first = text.lines().next().unwrap_or_default();
                let shown = if text.lines().nth(1).is_some() {
                    format!("{first}…")
                } else {
                    first.to_string()
                };
                quoted(&shown, width)
            }
            None => compact(value, width),
        },
        FieldKind::Password => match value.as_str() {
            Some("") => "\"\"".to_string(),
            Some(_) => "(hidden)".to_string(),
            None => compact(value, width),
        },
        FieldKind::Integer(_) | FieldKind::Float(_) => match value {
            Value::Number(number) => number.to_string(),
            other => compact(other, width),
        },
        FieldKind::Enum => {
            let options = annotations.enum_options();
            match value.as_u64() {
                Some(index) => options
                    .get(index as usize)
                    .cloned()
                    .unwrap_or_else(|| format!("#{index}")),
                None => compact(value, width),
            }
        }
        FieldKind::AddressPort => match serde_json::from_value::<AddressPort>(value.clone()) {
            Ok(pair) => pair.to_string(),
            Err(_) => compact(value, width),
        },
        FieldKind::Timestamp => match value.as_str() {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                Err(_) => truncate(raw, width),
            },
            None => compact(value, width),
        },
        FieldKind::Header => String::new(),
        FieldKind::OneOf => value.as_str().unwrap_or_default().to_string(),
        FieldKind::Record(record) => {
            if let Some(own) = record.summary(value) {
                return own;
            }
            if record.shape().is_one_of() {
                let discriminator = record
                    .shape()
                    .fields()
                    .first()
                    .and_then(|field| value.get(field.key()))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if !discriminator.is_empty() {
                    return discriminator;
                }
            }
            CONFIGURED.to_string()
        }
        FieldKind::List(_) => match value.as_array() {
            Some(items) => count(items.len(), "item", "items"),
            None => compact(value, width),
        },
        FieldKind::Custom(custom) => custom
            .summary(value)
            .unwrap_or_else(|| CONFIGURED.to_string()),
        FieldKind::Unsupported(UnsupportedKind::Map) => match value.as_object() {
            Some(entries) => count(entries.len(), "entry", "entries"),
            None => compact(value, width),
        },
        FieldKind::Unsupported(_) => compact(value, width),
    }
}

fn own_summary(kind: &FieldKind, value: &Value) -> Option<String> {
    match kind {
        FieldKind::Record(record) => record.summary(value),
        FieldKind::Custom(custom) => custom.summary(value),
        FieldKind::AddressPort => serde_json::from_value::<AddressPort>(value.clone())
            .ok()
            .map(|pair| pair.to_string()),
        _ => None,
    }
}

fn count(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

fn quoted(text: &str, width: usize) -> String {
    format!("\"{}\"", truncate(text, width))
}

fn compact(value: &Value, width: usize) -> String {
    let rendered = serde_json::to_string(value).unwrap_or_default();
    truncate(&rendered, width.max(1) * 2)
}

/// Cuts `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
