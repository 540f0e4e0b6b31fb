use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;

use crate::engine::{Environment, RenderContext};
use crate::form::{Button, ConfigError, Form, SaveAction};

use super::options::ClosePolicy;

/// How a dialog session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The save ran; the bound value holds the edits.
    Accepted,
    /// The save did not run; the bound value is back to its opening state.
    Rejected,
}

/// Presents dialog sessions modally and supplies the native pickers.
pub trait DialogHost {
    /// Shows `session` and returns once it is closed, or once the host gives
    /// up on it. A session left open is closed as cancelled by the caller.
    ///
    /// Button clicks go through [`DialogSession::click`], which may open
    /// nested sessions on this same host before returning.
    fn exec(&mut self, session: &mut DialogSession<'_>) -> anyhow::Result<()>;

    /// Returns `None` when the user cancels the picker.
    fn pick_existing_file(&mut self, start_dir: &Path, filter: &str) -> Option<PathBuf>;

    fn pick_existing_directory(&mut self, start_dir: &Path) -> Option<PathBuf>;

    /// Whether the active icon theme has `name`.
    fn has_theme_icon(&self, _name: &str) -> bool {
        false
    }
}

/// What a button handler may touch: the value bound to the dialog that owns
/// the button, and the host to open nested dialogs on.
pub struct ActionContext<'a> {
    root: &'a mut Value,
    host: &'a mut dyn DialogHost,
}

impl<'a> ActionContext<'a> {
    pub fn new(root: &'a mut Value, host: &'a mut dyn DialogHost) -> Self {
        Self { root, host }
    }

    pub fn root(&self) -> &Value {
        &*self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut *self.root
    }

    pub fn host(&mut self) -> &mut dyn DialogHost {
        &mut *self.host
    }

    /// Both halves at once, for handlers that bind a nested dialog to a
    /// member of the root.
    pub fn split(&mut self) -> (&mut Value, &mut dyn DialogHost) {
        (&mut *self.root, &mut *self.host)
    }
}

type CloseCallback = Box<dyn FnOnce(bool)>;

/// State of one open modal dialog.
///
/// A cancelable session snapshots its bound value when it opens and puts the
/// snapshot back on cancel, so edits that nested dialogs made in place are
/// undone with it.
pub struct DialogSession<'v> {
    title: String,
    form: Form,
    save: SaveAction,
    value: &'v mut Value,
    policy: ClosePolicy,
    snapshot: Option<Value>,
    outcome: Option<Outcome>,
    on_close: Vec<CloseCallback>,
}

impl<'v> DialogSession<'v> {
    pub fn new(
        title: impl Into<String>,
        form: Form,
        save: SaveAction,
        value: &'v mut Value,
        policy: ClosePolicy,
        snapshot: Value,
    ) -> Self {
        Self {
            title: title.into(),
            form,
            save,
            value,
            policy,
            snapshot: (policy == ClosePolicy::Cancelable).then_some(snapshot),
            outcome: None,
            on_close: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn value(&self) -> &Value {
        &*self.value
    }

    pub fn policy(&self) -> ClosePolicy {
        self.policy
    }

    /// Whether a Cancel action exists.
    pub fn is_cancelable(&self) -> bool {
        self.policy == ClosePolicy::Cancelable
    }

    pub fn is_open(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Registers a callback receiving whether the session ended accepted,
    /// that is whether its save ran and succeeded.
    pub fn on_close(&mut self, callback: impl FnOnce(bool) + 'static) {
        self.on_close.push(Box::new(callback));
    }

    /// Runs a button's handler against this session's value. Disabled
    /// buttons and closed sessions ignore the click.
    pub fn click(&mut self, button: &Button, host: &mut dyn DialogHost) -> anyhow::Result<()> {
        if !self.is_open() || !button.is_enabled() {
            log::debug!("ignored click on '{}'", button.icon().caption());
            return Ok(());
        }
        let mut action = ActionContext::new(&mut *self.value, host);
        button.invoke(&mut action)
    }

    /// Ends the session. Only the first call has an effect.
    ///
    /// Confirming, or any close under [`ClosePolicy::AlwaysSave`], runs the
    /// save. Cancelling restores the opening snapshot. A failing save also
    /// restores the snapshot and is reported to the caller.
    pub fn close(&mut self, confirmed: bool) -> Result<Outcome, ConfigError> {
        if let Some(outcome) = self.outcome {
            log::debug!("dialog '{}' already closed", self.title);
            return Ok(outcome);
        }

        let commit = confirmed || self.policy == ClosePolicy::AlwaysSave;
        let result = if commit {
            self.save.run(&mut *self.value)
        } else {
            Ok(())
        };

        let outcome = match result {
            Ok(()) if commit => Outcome::Accepted,
            _ => {
                if let Some(snapshot) = self.snapshot.take() {
                    *self.value = snapshot;
                }
                Outcome::Rejected
            }
        };
        self.outcome = Some(outcome);
        log::debug!("dialog '{}' closed: {outcome:?}", self.title);

        let accepted = outcome == Outcome::Accepted;
        for callback in self.on_close.drain(..) {
            callback(accepted);
        }
        result.map(|()| outcome)
    }

    // Host failure: nothing is saved and the opening state comes back.
    fn abandon(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(snapshot) = self.snapshot.take() {
            *self.value = snapshot;
        }
        self.outcome = Some(Outcome::Rejected);
        for callback in self.on_close.drain(..) {
            callback(false);
        }
    }
}

impl fmt::Debug for DialogSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogSession")
            .field("title", &self.title)
            .field("policy", &self.policy)
            .field("outcome", &self.outcome)
            .field("rows", &self.form.rows().len())
            .finish_non_exhaustive()
    }
}

/// Renders a dialog bound to `value`, runs it modally on `host` and returns
/// how it ended.
///
/// A render error leaves `value` as it was and is returned before anything
/// is shown.
pub fn open_dialog(
    env: &Rc<Environment>,
    host: &mut dyn DialogHost,
    value: &mut Value,
    title: &str,
    body: impl FnOnce(&RenderContext, &mut Form, &mut Value) -> Result<SaveAction, ConfigError>,
) -> anyhow::Result<Outcome> {
    let snapshot = value.clone();
    let cx = RenderContext::root(Rc::clone(env));
    let mut form = Form::new();
    let save = match body(&cx, &mut form, value) {
        Ok(save) => save,
        Err(err) => {
            *value = snapshot;
            return Err(err.into());
        }
    };

    let policy = env.options().close_policy;
    let mut session = DialogSession::new(title, form, save, value, policy, snapshot);
    if let Err(err) = host.exec(&mut session) {
        session.abandon();
        return Err(err);
    }
    if session.is_open() {
        session.close(false)?;
    }
    Ok(session.outcome().unwrap_or(Outcome::Rejected))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    fn session_closed_with(
        policy: ClosePolicy,
        save: SaveAction,
        confirmed: bool,
    ) -> (Result<Outcome, ConfigError>, Vec<bool>, Value) {
        let mut value = json!({ "name": "svc" });
        let snapshot = value.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let result = {
            let mut session = DialogSession::new("Svc", Form::new(), save, &mut value, policy, snapshot);
            let sink = Rc::clone(&seen);
            session.on_close(move |accepted| sink.borrow_mut().push(accepted));
            session.close(confirmed)
        };
        let seen = seen.borrow().clone();
        (result, seen, value)
    }

    fn rename() -> SaveAction {
        SaveAction::new(|value| {
            value["name"] = json!("edited");
            Ok(())
        })
    }

    #[test]
    fn callbacks_see_confirm_and_cancel() {
        let (result, seen, value) = session_closed_with(ClosePolicy::Cancelable, rename(), true);
        assert_eq!(result.unwrap(), Outcome::Accepted);
        assert_eq!(seen, [true]);
        assert_eq!(value["name"], "edited");

        let (result, seen, value) = session_closed_with(ClosePolicy::Cancelable, rename(), false);
        assert_eq!(result.unwrap(), Outcome::Rejected);
        assert_eq!(seen, [false]);
        assert_eq!(value["name"], "svc");
    }

    #[test]
    fn always_save_reports_every_close_as_accepted() {
        let (result, seen, value) = session_closed_with(ClosePolicy::AlwaysSave, rename(), false);
        assert_eq!(result.unwrap(), Outcome::Accepted);
        assert_eq!(seen, [true]);
        assert_eq!(value["name"], "edited");
    }

    #[test]
    fn failing_save_is_reported_as_rejected() {
        let failing = SaveAction::new(|value| {
            value["name"] = json!("half written");
            Err(ConfigError::missing("/name"))
        });
        let (result, seen, value) = session_closed_with(ClosePolicy::Cancelable, failing, true);
        assert!(matches!(result, Err(ConfigError::MissingValue { .. })));
        assert_eq!(seen, [false]);
        assert_eq!(value["name"], "svc");
    }
}
