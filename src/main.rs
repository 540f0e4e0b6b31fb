use autoform::prelude::*;
use autoform::{Outcome, TerminalHost};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Service {
    general: Header,
    name: String,
    enabled: bool,
    workers: u8,
    log_level: EnumList,
    notes: MultiLineString,
    admin_password: Password,
    config_file: ExistingFile,
    data_dir: ExistingDirectory,
    listen: AddressPort,
    maintenance_window: DateTime<Utc>,
    tls: Option<Tls>,
    upstreams: Vec<Upstream>,
    transport: Transport,
}

impl Configurable for Service {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("general", |s| &s.general)
            .field("name", |s| &s.name)
            .field("enabled", |s| &s.enabled)
            .field("workers", |s| &s.workers)
            .field_with("log_level", |s| &s.log_level, |a| {
                a.options("error;;warn;;info;;debug;;trace")
            })
            .field("notes", |s| &s.notes)
            .field("admin_password", |s| &s.admin_password)
            .field_with("config_file", |s| &s.config_file, |a| {
                a.filter("Config files (*.toml *.json);;All files (*)")
            })
            .field("data_dir", |s| &s.data_dir)
            .field_with("listen", |s| &s.listen, |a| a.port(8080))
            .field("maintenance_window", |s| &s.maintenance_window)
            .field_with("tls", |s| &s.tls, |a| a.label("TLS"))
            .field("upstreams", |s| &s.upstreams)
            .field("transport", |s| &s.transport)
            .build()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tls {
    certificate: ExistingFile,
    private_key: ExistingFile,
    verify_peer: bool,
}

impl Configurable for Tls {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field_with("certificate", |s| &s.certificate, |a| a.filter("Certificates (*.pem *.crt)"))
            .field_with("private_key", |s| &s.private_key, |a| a.filter("Keys (*.pem *.key)"))
            .field("verify_peer", |s| &s.verify_peer)
            .build()
    }

    fn init_defaults(&mut self) {
        self.verify_peer = true;
    }

    fn summary(&self) -> Option<String> {
        Some(self.certificate.0.display().to_string())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Upstream {
    address: AddressPort,
    weight: u16,
}

impl Configurable for Upstream {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("address", |s| &s.address)
            .field("weight", |s| &s.weight)
            .build()
    }

    fn init_defaults(&mut self) {
        self.weight = 1;
    }

    fn summary(&self) -> Option<String> {
        Some(format!("{} x{}", self.address, self.weight))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Transport {
    kind: OneOf,
    tcp: Option<Tcp>,
    unix: Option<UnixSocket>,
}

impl Configurable for Transport {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("kind", |s| &s.kind)
            .field_with("tcp", |s| &s.tcp, |a| a.label("TCP").icon("network-wired"))
            .field_with("unix", |s| &s.unix, |a| a.label("Unix socket"))
            .build()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tcp {
    nodelay: bool,
    keepalive_secs: u32,
}

impl Configurable for Tcp {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("nodelay", |s| &s.nodelay)
            .field("keepalive_secs", |s| &s.keepalive_secs)
            .build()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UnixSocket {
    path: String,
}

impl Configurable for UnixSocket {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field_with("path", |s| &s.path, |a| a.init("/run/service.sock"))
            .build()
    }
}

record_field!(Service, Tls, Upstream, Transport, Tcp, UnixSocket);

fn main() -> anyhow::Result<()> {
    let options = EditorOptions::default();
    let mut host = TerminalHost::new(&options);
    let mut service = Service {
        name: "gateway".to_string(),
        enabled: true,
        workers: 4,
        ..Service::default()
    };

    let outcome = AutoForm::new("Service")
        .with_options(options)
        .edit(&mut service, &mut host)?;

    match outcome {
        Outcome::Accepted => println!("{}", serde_json::to_string_pretty(&service)?),
        Outcome::Rejected => eprintln!("cancelled; configuration unchanged"),
    }
    Ok(())
}
