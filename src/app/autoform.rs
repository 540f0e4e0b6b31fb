use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{FieldKind, FieldType, RecordRef};
use crate::engine::{Environment, RenderContext, WidgetRegistry, render_record};
use crate::form::{ConfigError, FormArea, SaveAction};

use super::dialog::{DialogHost, Outcome, open_dialog};
use super::options::EditorOptions;

/// Entry point: binds a host value to a dialog.
///
/// ```no_run
/// use autoform::{AutoForm, Configurable, RecordShape, record_field};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Service {
///     name: String,
///     enabled: bool,
/// }
///
/// impl Configurable for Service {
///     fn shape() -> RecordShape {
///         RecordShape::builder::<Self>()
///             .field("name", |s| &s.name)
///             .field("enabled", |s| &s.enabled)
///             .build()
///     }
/// }
/// record_field!(Service);
///
/// # fn run(host: &mut dyn autoform::DialogHost) -> anyhow::Result<()> {
/// let mut service = Service::default();
/// AutoForm::new("Service").edit(&mut service, host)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AutoForm {
    title: String,
    options: EditorOptions,
    registry: WidgetRegistry,
}

impl AutoForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            options: EditorOptions::default(),
            registry: WidgetRegistry::with_builtins(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn registry_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.registry
    }

    /// Opens a modal dialog on `value` and blocks until it closes.
    ///
    /// `T` must be a record or an optional record; an absent optional record
    /// is allocated (running its init hook) before the dialog opens. On
    /// [`Outcome::Accepted`] `value` holds the edits; otherwise it is left
    /// untouched.
    pub fn edit<T>(&self, value: &mut T, host: &mut dyn DialogHost) -> anyhow::Result<Outcome>
    where
        T: FieldType + Serialize + DeserializeOwned,
    {
        let kind = T::field_kind();
        let record = editable_record(&kind)?;

        let mut working = serde_json::to_value(&*value).map_err(|err| ConfigError::serde("", err))?;
        if working.is_null() {
            working = record.allocate().map_err(|err| ConfigError::serde("", err))?;
        }

        let env = self.environment();
        log::debug!("editing {} in '{}'", record.type_name(), self.title);
        let outcome = open_dialog(&env, host, &mut working, &self.title, |cx, form, bound| {
            render_record(cx, form, &record, bound)
        })?;

        if outcome == Outcome::Accepted {
            *value = serde_json::from_value(working).map_err(|err| ConfigError::serde("", err))?;
        }
        Ok(outcome)
    }

    /// Like [`AutoForm::edit`], but hands the result to `on_finished`:
    /// `Some` with the edited value on accept, `None` on cancel.
    pub fn open<T>(
        &self,
        value: T,
        host: &mut dyn DialogHost,
        on_finished: impl FnOnce(Option<T>),
    ) -> anyhow::Result<()>
    where
        T: FieldType + Serialize + DeserializeOwned,
    {
        let mut value = value;
        let outcome = self.edit(&mut value, host)?;
        on_finished(match outcome {
            Outcome::Accepted => Some(value),
            Outcome::Rejected => None,
        });
        Ok(())
    }

    /// Fills a caller-owned form area with the rows for `value` without
    /// opening a dialog, returning the composite save.
    ///
    /// The save is meant to run against the same `value`; buttons that open
    /// nested dialogs act on the value passed to the session that shows them.
    pub fn populate<T>(&self, form: &mut dyn FormArea, value: &mut Value) -> Result<SaveAction, ConfigError>
    where
        T: FieldType,
    {
        let record = editable_record(&T::field_kind())?;
        if value.is_null() {
            *value = record.allocate().map_err(|err| ConfigError::serde("", err))?;
        }
        let cx = RenderContext::root(self.environment());
        render_record(&cx, form, &record, value)
    }

    fn environment(&self) -> Rc<Environment> {
        Rc::new(Environment::new(self.registry.clone(), self.options.clone()))
    }
}

fn editable_record(kind: &FieldKind) -> Result<RecordRef, ConfigError> {
    match kind {
        FieldKind::Record(record) => Ok(*record),
        FieldKind::Optional(inner) => match inner.as_ref() {
            FieldKind::Record(record) => Ok(*record),
            other => Err(ConfigError::NotARecord {
                kind: format!("optional {}", other.describe()),
            }),
        },
        other => Err(ConfigError::NotARecord {
            kind: other.describe(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IntWidth;

    #[test]
    fn only_records_are_editable() {
        let err = editable_record(&FieldKind::Integer(IntWidth::I8)).unwrap_err();
        assert!(matches!(err, ConfigError::NotARecord { .. }));
        let err = editable_record(&Option::<String>::field_kind()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value to edit must be a record or an optional record, found optional text"
        );
    }
}
