mod common;

use autoform::prelude::*;
use autoform::{ConfigError, Control, Form, ScriptError, ScriptedHost};
use common::{Inner, Outer, Settings, init_logging};
use serde::{Deserialize, Serialize};

fn settings() -> Settings {
    Settings {
        name: "old".to_string(),
        enabled: false,
        retries: 1,
    }
}

#[test]
fn accepted_edits_reach_the_value() {
    init_logging();
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.title(), "Settings");
        assert_eq!(d.text("name")?, "old");
        d.set_text("name", "svc")?;
        d.set_checked("enabled", true)?;
        d.set_int("retries", 5)?;
        assert_eq!(d.accept()?, Outcome::Accepted);
        Ok(())
    });

    let outcome = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    assert_eq!(
        value,
        Settings {
            name: "svc".to_string(),
            enabled: true,
            retries: 5,
        }
    );
    assert_eq!(host.opened_titles(), ["Settings"]);
    assert_eq!(host.remaining_scripts(), 0);
}

#[test]
fn cancel_leaves_the_value_alone() {
    init_logging();
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        d.set_text("name", "svc")?;
        d.set_int("retries", 9)?;
        assert_eq!(d.reject()?, Outcome::Rejected);
        Ok(())
    });

    let outcome = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(value, settings());
}

fn svc() -> Settings {
    Settings {
        name: "svc".to_string(),
        enabled: false,
        retries: 3,
    }
}

fn toggle_and_retry(d: &mut autoform::DialogDriver<'_, '_>) -> Result<(), ScriptError> {
    assert_eq!(d.text("name")?, "svc");
    assert_eq!(d.int("retries")?, 3);
    assert_eq!(d.spin_bounds("retries")?, (-128, 127));
    d.set_checked("enabled", true)?;
    d.set_int("retries", 5)?;
    Ok(())
}

#[test]
fn toggling_and_retrying_then_confirming() {
    let mut value = svc();
    let mut host = ScriptedHost::new().then(|d| {
        toggle_and_retry(d)?;
        d.accept()?;
        Ok(())
    });

    let outcome = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    assert_eq!(
        value,
        Settings {
            name: "svc".to_string(),
            enabled: true,
            retries: 5,
        }
    );
}

#[test]
fn toggling_and_retrying_then_cancelling() {
    let mut value = svc();
    let mut host = ScriptedHost::new().then(|d| {
        toggle_and_retry(d)?;
        d.reject()?;
        Ok(())
    });

    let outcome = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(value, svc());
}

#[test]
fn unclosed_dialog_counts_as_cancelled() {
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        d.set_text("name", "never saved")?;
        Ok(())
    });

    let outcome = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(value.name, "old");
}

#[test]
fn closing_twice_keeps_the_first_outcome() {
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        d.set_int("retries", 3)?;
        assert_eq!(d.accept()?, Outcome::Accepted);
        assert_eq!(d.reject()?, Outcome::Accepted);
        Ok(())
    });

    AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.retries, 3);
}

#[test]
fn always_save_commits_on_close() {
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        d.set_text("name", "kept")?;
        assert_eq!(d.reject()?, Outcome::Accepted);
        Ok(())
    });
    let options = EditorOptions::default().with_close_policy(ClosePolicy::AlwaysSave);

    let outcome = AutoForm::new("Settings")
        .with_options(options)
        .edit(&mut value, &mut host)
        .unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    assert_eq!(value.name, "kept");
}

#[test]
fn missing_script_is_an_error_and_changes_nothing() {
    let mut value = settings();
    let mut host = ScriptedHost::new();

    let err = AutoForm::new("Settings").edit(&mut value, &mut host).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScriptError>(),
        Some(ScriptError::NoScript { title }) if title == "Settings"
    ));
    assert_eq!(value, settings());
}

#[test]
fn unknown_rows_are_reported() {
    let mut value = settings();
    let mut host = ScriptedHost::new().then(|d| {
        assert!(matches!(
            d.set_text("missing", "x"),
            Err(ScriptError::MissingRow { .. })
        ));
        assert!(matches!(
            d.set_checked("name", true),
            Err(ScriptError::WrongControl { expected: "checkbox", .. })
        ));
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();
}

#[test]
fn open_reports_the_edited_copy() {
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.set_text("name", "first")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            d.reject()?;
            Ok(())
        });
    let form = AutoForm::new("Settings");

    let mut accepted = None;
    form.open(settings(), &mut host, |result| accepted = result).unwrap();
    assert_eq!(accepted.map(|s| s.name), Some("first".to_string()));

    let mut cancelled = Some(settings());
    form.open(settings(), &mut host, |result| cancelled = result).unwrap();
    assert!(cancelled.is_none());
}

#[test]
fn populate_fills_a_caller_owned_form() {
    let mut value = serde_json::to_value(settings()).unwrap();
    let mut form = Form::new();
    let mut save = AutoForm::new("unused")
        .populate::<Settings>(&mut form, &mut value)
        .unwrap();

    let labels: Vec<Option<&str>> = form.rows().iter().map(|row| row.label.as_deref()).collect();
    assert_eq!(labels, vec![Some("name"), Some(""), Some("retries")]);

    let Control::LineEdit(name) = &form.rows()[0].control else {
        panic!("name should be a line edit");
    };
    name.borrow_mut().text = "from populate".to_string();
    save.run(&mut value).unwrap();
    assert_eq!(value["name"], "from populate");
    assert_eq!(value["retries"], 1);
}

#[test]
fn nesting_beyond_the_limit_fails_before_showing_anything() {
    let mut value = Outer {
        inner: Inner { value: 7 },
    };
    let mut host = ScriptedHost::new();
    let options = EditorOptions::default().with_max_depth(1);

    let err = AutoForm::new("Outer")
        .with_options(options)
        .edit(&mut value, &mut host)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::DepthExceeded { limit: 1, pointer }) if pointer == "/inner/value"
    ));
    assert!(host.opened_titles().is_empty());
    assert_eq!(value.inner.value, 7);
}

#[test]
fn optional_record_at_the_top_is_allocated() {
    let mut value: Option<Settings> = None;
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.text("name")?, "");
        d.set_text("name", "fresh")?;
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Settings").edit(&mut value, &mut host).unwrap();

    assert_eq!(value.map(|s| s.name), Some("fresh".to_string()));
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Labelled {
    intro: Header,
    #[serde(rename = "HTTPServer")]
    http_server: String,
    display_name: String,
    enabled: bool,
    secret: String,
}

impl Configurable for Labelled {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("intro", |s| &s.intro)
            .field("HTTPServer", |s| &s.http_server)
            .field("display_name", |s| &s.display_name)
            .field_with("enabled", |s| &s.enabled, |a| a.label("Turn on"))
            .hidden("secret", |s| &s.secret)
            .build()
    }
}

record_field!(Labelled);

#[test]
fn row_labels_come_from_keys_and_annotations() {
    let mut value = Labelled {
        secret: "keep me".to_string(),
        ..Labelled::default()
    };
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.row_labels(), vec!["HTTP Server", "display name", "Turn on"]);
        d.set_checked("Turn on", true)?;
        d.accept()?;
        Ok(())
    });

    AutoForm::new("Labelled").edit(&mut value, &mut host).unwrap();

    assert!(value.enabled);
    assert_eq!(value.secret, "keep me");
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Misdeclared {
    name: String,
    retries: i32,
}

impl Configurable for Misdeclared {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("Name", |s| &s.name)
            .field("retries", |s| &s.retries)
            .build()
    }
}

record_field!(Misdeclared);

#[test]
fn keys_serde_does_not_write_are_rejected() {
    let mut value = Misdeclared {
        name: "svc".to_string(),
        retries: 3,
    };
    let mut host = ScriptedHost::new().then(|d| {
        d.set_text("Name", "edited")?;
        d.accept()?;
        Ok(())
    });

    let err = AutoForm::new("Misdeclared").edit(&mut value, &mut host).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingValue { pointer }) if pointer == "/Name"
    ));
    assert!(host.opened_titles().is_empty());
    assert_eq!(value.name, "svc");
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Sparse {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nickname: Option<String>,
}

impl Configurable for Sparse {
    fn shape() -> RecordShape {
        RecordShape::builder::<Self>()
            .field("name", |s| &s.name)
            .field("nickname", |s| &s.nickname)
            .build()
    }
}

record_field!(Sparse);

#[test]
fn skipped_options_render_as_unset() {
    let mut value = Sparse {
        name: "svc".to_string(),
        nickname: None,
    };
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.status("nickname")?, "Not configured");
        d.set_text("name", "renamed")?;
        d.accept()?;
        Ok(())
    });

    let outcome = AutoForm::new("Sparse").edit(&mut value, &mut host).unwrap();

    assert_eq!(outcome, Outcome::Accepted);
    assert_eq!(value.name, "renamed");
    assert_eq!(value.nickname, None);
}
