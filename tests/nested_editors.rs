mod common;

use autoform::prelude::*;
use autoform::{NOT_CONFIGURED, ScriptError, ScriptedHost};
use common::{Endpoint, Server, init_logging};

fn server() -> Server {
    Server {
        name: "edge".to_string(),
        ..Server::default()
    }
}

fn edit(value: &mut Server, host: &mut ScriptedHost) -> Outcome {
    AutoForm::new("Server").edit(value, host).unwrap()
}

#[test]
fn clear_sets_the_optional_to_none() {
    init_logging();
    let mut value = Server {
        tls: Some(Endpoint::new("a", 1)),
        ..server()
    };
    let mut host = ScriptedHost::new().then(|d| {
        assert_eq!(d.status("tls")?, "a:1");
        d.click("tls", "Clear")?;
        assert_eq!(d.status("tls")?, NOT_CONFIGURED);
        d.accept()?;
        Ok(())
    });

    edit(&mut value, &mut host);

    assert_eq!(value.tls, None);
}

#[test]
fn edit_allocates_and_runs_init_once() {
    init_logging();
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            assert_eq!(d.status("tls")?, NOT_CONFIGURED);
            d.click("tls", "Edit...")?;
            assert_eq!(d.status("tls")?, "example.org:8443");
            d.click("tls", "Edit...")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.title(), "tls");
            assert_eq!(d.int("port")?, 443);
            d.set_text("host", "example.org")?;
            d.set_int("port", 8443)?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.int("port")?, 8443);
            d.reject()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.tls, Some(Endpoint::new("example.org", 8443)));
    assert_eq!(host.opened_titles(), ["Server", "tls", "tls"]);
}

#[test]
fn nested_cancel_keeps_the_allocation() {
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.click("tls", "Edit...")?;
            assert_eq!(d.status("tls")?, ":443");
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            d.set_text("host", "discarded")?;
            d.reject()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.tls, Some(Endpoint::new("", 443)));
}

#[test]
fn outer_cancel_undoes_nested_edits() {
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.click("tls", "Edit...")?;
            d.click("mirrors", "Add...")?;
            assert_eq!(d.list_items("mirrors")?, vec!["m1:443"]);
            d.reject()?;
            Ok(())
        })
        .then(|d| {
            d.set_text("host", "inner")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            d.set_text("host", "m1")?;
            d.accept()?;
            Ok(())
        });

    let outcome = edit(&mut value, &mut host);

    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(value, server());
}

#[test]
fn optional_scalars_edit_in_their_own_dialog() {
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.click("nickname", "Edit...")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.row_labels(), vec!["nickname"]);
            d.set_text("nickname", "bob")?;
            d.accept()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.nickname.as_deref(), Some("bob"));
}

#[test]
fn added_elements_are_kept_only_when_accepted() {
    init_logging();
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.click("mirrors", "Add...")?;
            d.click("mirrors", "Add...")?;
            assert_eq!(d.list_items("mirrors")?, vec!["m1:443"]);
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.title(), "mirrors");
            assert_eq!(d.int("port")?, 443);
            d.set_text("host", "m1")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            d.set_text("host", "m2")?;
            d.reject()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.mirrors, vec![Endpoint::new("m1", 443)]);
}

#[test]
fn activating_a_row_edits_that_element() {
    let mut value = Server {
        mirrors: vec![Endpoint::new("a", 1), Endpoint::new("b", 2)],
        ..server()
    };
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.list_activate("mirrors", 1)?;
            assert_eq!(d.list_items("mirrors")?, vec!["a:1", "c:2"]);
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.text("host")?, "b");
            d.set_text("host", "c")?;
            d.accept()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.mirrors[1], Endpoint::new("c", 2));
}

#[test]
fn edit_button_uses_the_selected_element() {
    let mut value = Server {
        mirrors: vec![Endpoint::new("a", 1), Endpoint::new("b", 2)],
        ..server()
    };
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.list_select("mirrors", &[0])?;
            d.click("mirrors", "Edit...")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            assert_eq!(d.text("host")?, "a");
            d.set_int("port", 10)?;
            d.accept()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.mirrors[0], Endpoint::new("a", 10));
}

#[test]
fn removing_an_unordered_selection() {
    let mut value = Server {
        tags: ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
        ..server()
    };
    let mut host = ScriptedHost::new().then(|d| {
        d.list_select("tags", &[2, 0, 3])?;
        d.click("tags", "Remove")?;
        assert_eq!(d.list_items("tags")?.len(), 2);
        d.accept()?;
        Ok(())
    });

    edit(&mut value, &mut host);

    assert_eq!(value.tags, vec!["b", "e"]);
}

#[test]
fn list_buttons_follow_the_selection() {
    let mut value = Server {
        mirrors: vec![Endpoint::new("a", 1), Endpoint::new("b", 2)],
        ..server()
    };
    let mut host = ScriptedHost::new().then(|d| {
        assert!(d.button_enabled("mirrors", "Add...")?);
        assert!(!d.button_enabled("mirrors", "Edit...")?);
        assert!(!d.button_enabled("mirrors", "Remove")?);
        assert!(matches!(
            d.click("mirrors", "Edit..."),
            Err(ScriptError::Disabled { .. })
        ));

        d.list_select("mirrors", &[1])?;
        assert!(d.button_enabled("mirrors", "Edit...")?);
        assert!(d.button_enabled("mirrors", "Remove")?);

        d.list_select("mirrors", &[0, 1])?;
        assert!(!d.button_enabled("mirrors", "Edit...")?);
        assert!(d.button_enabled("mirrors", "Remove")?);

        d.accept()?;
        Ok(())
    });

    edit(&mut value, &mut host);

    assert_eq!(value.mirrors.len(), 2);
}

#[test]
fn text_elements_are_added_through_a_single_row_dialog() {
    let mut value = server();
    let mut host = ScriptedHost::new()
        .then(|d| {
            d.click("tags", "Add...")?;
            d.accept()?;
            Ok(())
        })
        .then(|d| {
            d.set_text("tags", "blue")?;
            d.accept()?;
            Ok(())
        });

    edit(&mut value, &mut host);

    assert_eq!(value.tags, vec!["blue"]);
}
