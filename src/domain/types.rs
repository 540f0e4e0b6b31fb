use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Single-line text whose input is masked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(pub String);

/// Free-form text edited in a multi-line area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiLineString(pub String);

/// Index into the `;;`-separated option list of the field's `Enum` annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumList(pub usize);

/// Path to a file that is expected to exist. The `Filter` annotation scopes
/// the browse picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExistingFile(pub PathBuf);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExistingDirectory(pub PathBuf);

/// Free-text address paired with a port, always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressPort {
    pub address: String,
    pub port: u16,
}

impl AddressPort {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.address.is_empty() && self.port == 0
    }
}

impl fmt::Display for AddressPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            f.write_str("<Not set>")
        } else if self.address.contains(':') {
            write!(f, "[{}]:{}", self.address, self.port)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}

/// Full-width heading row; carries no data. The text comes from the field's
/// label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header;

/// Discriminator of a OneOf record. Holds the key of the active alternative,
/// or is empty when nothing was chosen yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OneOf(pub String);

impl OneOf {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OneOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn address_port_display() {
        assert_eq!(AddressPort::default().to_string(), "<Not set>");
        assert_eq!(AddressPort::new("localhost", 80).to_string(), "localhost:80");
        assert_eq!(AddressPort::new("::1", 8080).to_string(), "[::1]:8080");
        assert_eq!(AddressPort::new("", 53).to_string(), ":53");
    }

    #[test]
    fn wrappers_serialize_transparently() {
        assert_eq!(serde_json::to_value(Password("x".into())).unwrap(), json!("x"));
        assert_eq!(serde_json::to_value(EnumList(2)).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(OneOf::new("Tcp")).unwrap(), json!("Tcp"));
        assert_eq!(
            serde_json::to_value(AddressPort::new("h", 1)).unwrap(),
            json!({"address": "h", "port": 1})
        );
        assert_eq!(serde_json::to_value(Header).unwrap(), json!(null));
        let header: Header = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(header, Header);
    }
}
