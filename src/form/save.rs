use std::fmt;

use serde_json::Value;

use super::error::ConfigError;

type SaveStep = Box<dyn FnMut(&mut Value) -> Result<(), ConfigError>>;

/// Deferred write of control state into the bound value.
///
/// Each step rereads its controls when run, so running a save twice leaves
/// the same end state as running it once.
#[derive(Default)]
pub struct SaveAction {
    steps: Vec<SaveStep>,
}

impl SaveAction {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn new(step: impl FnMut(&mut Value) -> Result<(), ConfigError> + 'static) -> Self {
        Self {
            steps: vec![Box::new(step)],
        }
    }

    /// Runs `inner` against the member `key` of the bound record, inserting
    /// a null member first if the record lacks it.
    pub fn scoped(key: impl Into<String>, pointer: impl Into<String>, mut inner: SaveAction) -> Self {
        if inner.is_noop() {
            return Self::noop();
        }
        let key = key.into();
        let pointer = pointer.into();
        Self::new(move |record| {
            let found = super::error::json_type(record);
            let map = record.as_object_mut().ok_or_else(|| ConfigError::ShapeMismatch {
                pointer: pointer.clone(),
                expected: "object".to_string(),
                found: found.to_string(),
            })?;
            let slot = map.entry(key.clone()).or_insert(Value::Null);
            inner.run(slot)
        })
    }

    /// Appends `next`, preserving declaration order.
    pub fn then(mut self, mut next: SaveAction) -> Self {
        self.steps.append(&mut next.steps);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&mut self, value: &mut Value) -> Result<(), ConfigError> {
        for step in &mut self.steps {
            step(value)?;
        }
        Ok(())
    }
}

impl FromIterator<SaveAction> for SaveAction {
    fn from_iter<I: IntoIterator<Item = SaveAction>>(iter: I) -> Self {
        iter.into_iter().fold(SaveAction::noop(), SaveAction::then)
    }
}

impl fmt::Debug for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveAction")
            .field("steps", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    #[test]
    fn steps_run_in_order() {
        let mut save: SaveAction = [
            SaveAction::new(|value| {
                *value = json!([1]);
                Ok(())
            }),
            SaveAction::new(|value| {
                if let Some(items) = value.as_array_mut() {
                    items.push(json!(2));
                }
                Ok(())
            }),
        ]
        .into_iter()
        .collect();
        let mut value = Value::Null;
        save.run(&mut value).unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn scoped_targets_one_member() {
        let mut save = SaveAction::scoped(
            "name",
            "/name",
            SaveAction::new(|slot| {
                *slot = json!("svc");
                Ok(())
            }),
        );
        let mut record = json!({"name": "", "other": 1});
        save.run(&mut record).unwrap();
        save.run(&mut record).unwrap();
        assert_eq!(record, json!({"name": "svc", "other": 1}));

        let err = save.run(&mut json!(3)).unwrap_err();
        assert_eq!(err.pointer(), "/name");
    }

    #[test]
    fn scoped_noop_stays_noop() {
        let runs = Rc::new(Cell::new(0));
        assert!(SaveAction::scoped("k", "/k", SaveAction::noop()).is_noop());
        let counter = runs.clone();
        let mut save = SaveAction::scoped(
            "k",
            "/k",
            SaveAction::new(move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
        );
        save.run(&mut json!({})).unwrap();
        assert_eq!(runs.get(), 1);
    }
}
