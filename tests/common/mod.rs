#![allow(dead_code)]

use std::collections::BTreeMap;

use autoform::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub name: String,
    pub enabled: bool,
    pub retries: i8,
}

impl Configurable for Settings {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("name", |s| &s.name)
            .field("enabled", |s| &s.enabled)
            .field("retries", |s| &s.retries)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

impl Configurable for Endpoint {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("host", |s| &s.host)
            .field("port", |s| &s.port)
            .build()
    }

    fn init_defaults(&mut self) {
        self.port = 443;
    }

    fn summary(&self) -> Option<String> {
        Some(format!("{}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub tls: Option<Endpoint>,
    pub nickname: Option<String>,
    pub mirrors: Vec<Endpoint>,
    pub tags: Vec<String>,
}

impl Configurable for Server {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("name", |s| &s.name)
            .field("tls", |s| &s.tls)
            .field("nickname", |s| &s.nickname)
            .field("mirrors", |s| &s.mirrors)
            .field("tags", |s| &s.tags)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tcp {
    pub host: String,
    pub port: u16,
}

impl Configurable for Tcp {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("host", |s| &s.host)
            .field("port", |s| &s.port)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnixSocket {
    pub path: String,
}

impl Configurable for UnixSocket {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("path", |s| &s.path)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub kind: OneOf,
    pub tcp: Option<Tcp>,
    pub unix: Option<UnixSocket>,
}

impl Configurable for Transport {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("kind", |s| &s.kind)
            .field("tcp", |s| &s.tcp)
            .field_with("unix", |s| &s.unix, |a| a.label("Unix socket"))
            .build()
    }
}

/// A OneOf whose second member is not optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokenChoice {
    pub kind: OneOf,
    pub plain: String,
}

impl Configurable for BrokenChoice {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("kind", |s| &s.kind)
            .field("plain", |s| &s.plain)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub level: i8,
    pub total: u64,
    pub ratio: f64,
    pub gain: f32,
}

impl Configurable for Limits {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("level", |s| &s.level)
            .field("total", |s| &s.total)
            .field("ratio", |s| &s.ratio)
            .field("gain", |s| &s.gain)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub intro: Header,
    pub at: DateTime<Utc>,
    pub level: EnumList,
    pub notes: MultiLineString,
    pub secret: Password,
    pub listen: AddressPort,
    pub env: BTreeMap<String, String>,
    pub extra: Value,
}

impl Configurable for Schedule {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("intro", |s| &s.intro)
            .field("at", |s| &s.at)
            .field_with("level", |s| &s.level, |a| a.options("low;;medium;;high"))
            .field("notes", |s| &s.notes)
            .field("secret", |s| &s.secret)
            .field_with("listen", |s| &s.listen, |a| a.port(8080))
            .field("env", |s| &s.env)
            .field("extra", |s| &s.extra)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    pub config: ExistingFile,
    pub log: ExistingFile,
    pub data: ExistingDirectory,
}

impl Configurable for Paths {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field_with("config", |s| &s.config, |a| a.filter("Configs (*.toml)"))
            .field("log", |s| &s.log)
            .field("data", |s| &s.data)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inner {
    pub value: i32,
}

impl Configurable for Inner {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("value", |s| &s.value)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outer {
    pub inner: Inner,
}

impl Configurable for Outer {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("inner", |s| &s.inner)
            .build()
    }
}

record_field!(
    Settings,
    Endpoint,
    Server,
    Tcp,
    UnixSocket,
    Transport,
    BrokenChoice,
    Limits,
    Schedule,
    Paths,
    Inner,
    Outer,
);
