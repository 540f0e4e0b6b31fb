mod common;

use std::collections::BTreeMap;
use std::path::PathBuf;

use autoform::prelude::*;
use autoform::{DEFAULT_FILE_FILTER, ScriptedHost};
use chrono::{Duration, TimeZone, Utc};
use common::{Limits, Paths, Schedule, init_logging};

#[test]
fn integer_spinners_use_the_type_range() {
    init_logging();
    let mut value = Limits::default();
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.spin_bounds("level")?, (-128, 127));
        assert_eq!(d.spin_bounds("total")?, (0, i64::MAX));
        assert_eq!(d.set_int("level", 500)?, 127);
        assert_eq!(d.set_int("total", -3)?, 0);
        assert_eq!(d.set_float("ratio", 0.25)?, 0.25);
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Limits").edit(&mut value, &mut host).unwrap();

    assert_eq!(
        value,
        Limits {
            level: 127,
            total: 0,
            ratio: 0.25,
            gain: 0.0,
        }
    );
}

#[test]
fn single_precision_floats_stay_finite() {
    let mut value = Limits::default();
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.set_float("gain", 1e300)?, f32::MAX as f64);
        assert_eq!(d.set_float("ratio", 1e300)?, 1e300);
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Limits").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.gain, f32::MAX);
    assert!(value.gain.is_finite());
    assert_eq!(value.ratio, 1e300);
}

#[test]
fn values_past_the_spinner_range_are_read_only() {
    let mut value = Limits {
        total: u64::MAX,
        ..Limits::default()
    };
    let mut host = ScriptedHost::new().then(|d| {
        assert!(d.is_read_only("total")?);
        assert_eq!(d.text("total")?, u64::MAX.to_string());
        assert!(!d.is_read_only("level")?);
        d.set_int("level", -4)?;
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Limits").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.total, u64::MAX);
    assert_eq!(value.level, -4);
}

fn schedule() -> Schedule {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::milliseconds(750);
    Schedule {
        at,
        level: EnumList(2),
        notes: MultiLineString("first\nsecond".to_string()),
        secret: Password("hunter2".to_string()),
        env: BTreeMap::from([
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "2".to_string()),
        ]),
        ..Schedule::default()
    }
}

#[test]
fn accepting_untouched_rows_round_trips() {
    init_logging();
    let mut value = schedule();
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(
            d.row_labels(),
            vec!["at", "level", "notes", "secret", "listen", "env"]
        );
        assert_eq!(d.selected("level")?, Some(2));
        assert_eq!(d.text("notes")?, "first\nsecond");
        assert_eq!(d.text("secret")?, "hunter2");
        assert_eq!(d.int("listen")?, 8080);
        assert!(d.is_read_only("env")?);
        assert_eq!(d.text("env")?, "2 entries");
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Schedule").edit(&mut value, &mut host).unwrap();

    let original = schedule();
    assert_eq!(value.level, original.level);
    assert_eq!(value.notes, original.notes);
    assert_eq!(value.secret, original.secret);
    assert_eq!(value.env, original.env);
    assert_eq!(value.extra, serde_json::Value::Null);
    assert_eq!(value.listen, AddressPort::new("", 8080));
    // Timestamps keep whole seconds only.
    assert_eq!(value.at, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
}

#[test]
fn edited_scalars_are_written_back() {
    let mut value = schedule();
    let noon = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
    let mut host = ScriptedHost::new().then(move |d| {
        d.set_datetime("at", noon)?;
        assert_eq!(d.datetime("at")?, noon);
        d.select("level", 0)?;
        d.set_text("notes", "one line")?;
        d.set_text("listen", "10.0.0.1")?;
        d.set_int("listen", 9000)?;
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Schedule").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.at, noon);
    assert_eq!(value.level, EnumList(0));
    assert_eq!(value.notes.0, "one line");
    assert_eq!(value.listen, AddressPort::new("10.0.0.1", 9000));
}

#[test]
fn cancelled_pickers_leave_the_text_alone() {
    let mut value = Paths {
        config: ExistingFile(PathBuf::from("/etc/app/app.toml")),
        ..Paths::default()
    };
    let mut host = ScriptedHost::new()
        .with_file_pick(None)
        .with_file_pick(Some(PathBuf::from("/var/log/app.log")))
        .with_directory_pick(Some(PathBuf::from("/var/lib/app")))
        .then(|d| {
            d.click("config", "Browse...")?;
            assert_eq!(d.text("config")?, "/etc/app/app.toml");
            d.click("log", "Browse...")?;
            assert_eq!(d.text("log")?, "/var/log/app.log");
            d.click("data", "Browse...")?;
            d.accept()?;
            Ok(())
        });

    AutoForm::new("Paths").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.config.0, PathBuf::from("/etc/app/app.toml"));
    assert_eq!(value.log.0, PathBuf::from("/var/log/app.log"));
    assert_eq!(value.data.0, PathBuf::from("/var/lib/app"));
    assert_eq!(
        host.picker_requests(),
        [
            (PathBuf::from("/etc/app"), "Configs (*.toml)".to_string()),
            (PathBuf::from("."), DEFAULT_FILE_FILTER.to_string()),
            (PathBuf::from(""), String::new()),
        ]
    );
}
