use std::rc::Rc;

use serde_json::Value;

use crate::app::EditorOptions;
use crate::domain::{Annotations, FieldKind};
use crate::form::ConfigError;
use crate::format::summarize;

use super::registry::WidgetRegistry;

/// Registry and options shared by every dialog of one editing session.
#[derive(Clone)]
pub struct Environment {
    registry: WidgetRegistry,
    options: EditorOptions,
}

impl Environment {
    pub fn new(registry: WidgetRegistry, options: EditorOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }
}

/// Where in the bound value the visitor currently is.
///
/// Pointers are JSON pointers relative to the value bound to the dialog being
/// rendered.
#[derive(Clone)]
pub struct RenderContext {
    env: Rc<Environment>,
    pointer: String,
    depth: usize,
}

impl RenderContext {
    pub fn root(env: Rc<Environment>) -> Self {
        Self {
            env,
            pointer: String::new(),
            depth: 0,
        }
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn env(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn registry(&self) -> &WidgetRegistry {
        self.env.registry()
    }

    pub fn options(&self) -> &EditorOptions {
        self.env.options()
    }

    /// Context for a member one level down.
    pub fn child(&self, segment: &str) -> Result<Self, ConfigError> {
        let pointer = format!("{}/{}", self.pointer, escape_segment(segment));
        let depth = self.depth + 1;
        let limit = self.options().max_depth;
        if depth > limit {
            return Err(ConfigError::DepthExceeded { pointer, limit });
        }
        Ok(Self {
            env: Rc::clone(&self.env),
            pointer,
            depth,
        })
    }

    pub fn summarize(&self, kind: &FieldKind, annotations: &Annotations, value: &Value) -> String {
        summarize(kind, annotations, value, self.options().summary_width)
    }
}

/// Per-field inputs handed to widget handlers.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub kind: &'a FieldKind,
    pub annotations: &'a Annotations,
    pub label: &'a str,
    pub pointer: &'a str,
}

fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_with_depth(max_depth: usize) -> RenderContext {
        let options = EditorOptions::default().with_max_depth(max_depth);
        RenderContext::root(Rc::new(Environment::new(WidgetRegistry::empty(), options)))
    }

    #[test]
    fn child_pointers_escape_segments() {
        let root = root_with_depth(8);
        let child = root.child("a/b").unwrap().child("c~d").unwrap();
        assert_eq!(child.pointer(), "/a~1b/c~0d");
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let root = root_with_depth(1);
        let first = root.child("a").unwrap();
        let err = first.child("b").err().unwrap();
        assert!(matches!(err, ConfigError::DepthExceeded { limit: 1, .. }));
        assert_eq!(err.pointer(), "/a/b");
    }
}
