use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::app::ActionContext;

use super::icon::Icon;

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckBox {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Echo {
    #[default]
    Normal,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEdit {
    pub text: String,
    pub echo: Echo,
}

impl LineEdit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            echo: Echo::Normal,
        }
    }

    pub fn password(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            echo: Echo::Password,
        }
    }

    /// Text as it should be painted; masked input shows one bullet per char.
    pub fn displayed(&self) -> String {
        match self.echo {
            Echo::Normal => self.text.clone(),
            Echo::Password => "\u{2022}".repeat(self.text.chars().count()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
}

/// Integer spinner. The value always lies inside `min..=max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinBox {
    value: i64,
    min: i64,
    max: i64,
}

impl SpinBox {
    pub fn new(min: i64, max: i64) -> Self {
        let value = 0_i64.clamp(min, max);
        Self { value, min, max }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// Stores `value` clamped to the range and returns what was stored.
    pub fn set_value(&mut self, value: i64) -> i64 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    pub fn step(&mut self, delta: i64) -> i64 {
        self.set_value(self.value.saturating_add(delta))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleSpinBox {
    value: f64,
    min: f64,
    max: f64,
}

impl DoubleSpinBox {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            value: 0.0_f64.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn set_value(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            return self.value;
        }
        self.value = value.clamp(self.min, self.max);
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboItem {
    pub text: String,
    pub icon: Option<String>,
}

impl ComboItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }
}

/// Drop-down list. `current` is `None` when nothing is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboBox {
    items: Vec<ComboItem>,
    current: Option<usize>,
}

impl ComboBox {
    /// Selects the first item, if any.
    pub fn new(items: Vec<ComboItem>) -> Self {
        let current = (!items.is_empty()).then_some(0);
        Self { items, current }
    }

    pub fn items(&self) -> &[ComboItem] {
        &self.items
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current
            .and_then(|index| self.items.get(index))
            .map(|item| item.text.as_str())
    }

    /// Selecting an index past the end clears the selection.
    pub fn set_current(&mut self, index: Option<usize>) {
        self.current = index.filter(|index| *index < self.items.len());
    }
}

/// Date and time at one-second resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeEdit {
    value: DateTime<Utc>,
}

impl DateTimeEdit {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self {
            value: value.trunc_subsecs(0),
        }
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.value
    }

    pub fn set_value(&mut self, value: DateTime<Utc>) {
        self.value = value.trunc_subsecs(0);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelStyle {
    #[default]
    Plain,
    Heading,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: LabelStyle::Plain,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: LabelStyle::Heading,
        }
    }
}

/// Ordered rows with a multi-selection; refreshed explicitly by its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    items: Vec<String>,
    selection: BTreeSet<usize>,
    cursor: Option<usize>,
}

impl ListView {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Replaces the rows and drops the selection.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selection.clear();
        self.cursor = self
            .cursor
            .filter(|_| !self.items.is_empty())
            .map(|cursor| cursor.min(self.items.len() - 1));
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn single_selection(&self) -> Option<usize> {
        if self.selection.len() == 1 {
            self.selection.iter().next().copied()
        } else {
            None
        }
    }

    pub fn select_only(&mut self, index: usize) {
        self.selection.clear();
        if index < self.items.len() {
            self.selection.insert(index);
            self.cursor = Some(index);
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        if !self.selection.remove(&index) {
            self.selection.insert(index);
        }
        self.cursor = Some(index);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor.filter(|index| *index < self.items.len());
    }
}

/// When a button accepts clicks.
#[derive(Clone)]
pub enum Enablement {
    Always,
    ExactlyOneSelected(Shared<ListView>),
    AnySelected(Shared<ListView>),
}

impl Enablement {
    pub fn is_enabled(&self) -> bool {
        match self {
            Enablement::Always => true,
            Enablement::ExactlyOneSelected(list) => list.borrow().selected_count() == 1,
            Enablement::AnySelected(list) => list.borrow().selected_count() > 0,
        }
    }
}

type Handler = dyn FnMut(&mut ActionContext<'_>) -> anyhow::Result<()>;

/// Clickable control. Clones share the same handler.
#[derive(Clone)]
pub struct Button {
    icon: Icon,
    enablement: Enablement,
    handler: Rc<RefCell<Handler>>,
}

impl Button {
    pub fn new(
        icon: Icon,
        handler: impl FnMut(&mut ActionContext<'_>) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            icon,
            enablement: Enablement::Always,
            handler: Rc::new(RefCell::new(handler)),
        }
    }

    pub fn with_enablement(mut self, enablement: Enablement) -> Self {
        self.enablement = enablement;
        self
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn is_enabled(&self) -> bool {
        self.enablement.is_enabled()
    }

    pub fn same_as(&self, other: &Button) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }

    pub(crate) fn invoke(&self, cx: &mut ActionContext<'_>) -> anyhow::Result<()> {
        let mut handler = self
            .handler
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("button '{}' is already running", self.icon.caption()))?;
        (*handler)(cx)
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("icon", &self.icon)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

/// One page per alternative; the selector's current index picks the page.
#[derive(Clone)]
pub struct Stack {
    pages: Rc<Vec<Form>>,
    selector: Shared<ComboBox>,
}

impl Stack {
    pub fn new(pages: Vec<Form>, selector: Shared<ComboBox>) -> Self {
        Self {
            pages: Rc::new(pages),
            selector,
        }
    }

    pub fn pages(&self) -> &[Form] {
        &self.pages
    }

    pub fn selector(&self) -> &Shared<ComboBox> {
        &self.selector
    }

    pub fn active_index(&self) -> Option<usize> {
        self.selector.borrow().current()
    }

    pub fn active_page(&self) -> Option<&Form> {
        self.active_index().and_then(|index| self.pages.get(index))
    }
}

/// Toolkit-neutral control tree handed to dialog hosts.
#[derive(Clone)]
pub enum Control {
    CheckBox(Shared<CheckBox>),
    LineEdit(Shared<LineEdit>),
    TextEdit(Shared<TextEdit>),
    SpinBox(Shared<SpinBox>),
    DoubleSpinBox(Shared<DoubleSpinBox>),
    ComboBox(Shared<ComboBox>),
    DateTimeEdit(Shared<DateTimeEdit>),
    Label(Shared<Label>),
    Button(Button),
    ListView {
        view: Shared<ListView>,
        on_activate: Option<Button>,
    },
    Stack(Stack),
    Row(Vec<Control>),
}

impl Control {
    /// Visits this control and its children depth-first. Only the active page
    /// of a stack is visited.
    pub fn walk(&self, visit: &mut dyn FnMut(&Control)) {
        visit(self);
        match self {
            Control::Row(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            Control::Stack(stack) => {
                if let Some(page) = stack.active_page() {
                    page.walk(visit);
                }
            }
            _ => {}
        }
    }

    /// Whether the user can focus and change this control.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Control::Label(_) | Control::Stack(_) | Control::Row(_))
    }

    /// Identity of the underlying widget; clones report the same id.
    pub fn id(&self) -> usize {
        match self {
            Control::CheckBox(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::LineEdit(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::TextEdit(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::SpinBox(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::DoubleSpinBox(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::ComboBox(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::DateTimeEdit(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::Label(inner) => Rc::as_ptr(inner) as *const () as usize,
            Control::Button(button) => Rc::as_ptr(&button.handler) as *const () as usize,
            Control::ListView { view, .. } => Rc::as_ptr(view) as *const () as usize,
            Control::Stack(stack) => Rc::as_ptr(&stack.pages) as *const () as usize,
            Control::Row(children) => children.as_ptr() as *const () as usize,
        }
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::CheckBox(inner) => f.debug_tuple("CheckBox").field(&*inner.borrow()).finish(),
            Control::LineEdit(inner) => f.debug_tuple("LineEdit").field(&*inner.borrow()).finish(),
            Control::TextEdit(inner) => f.debug_tuple("TextEdit").field(&*inner.borrow()).finish(),
            Control::SpinBox(inner) => f.debug_tuple("SpinBox").field(&*inner.borrow()).finish(),
            Control::DoubleSpinBox(inner) => f
                .debug_tuple("DoubleSpinBox")
                .field(&*inner.borrow())
                .finish(),
            Control::ComboBox(inner) => f.debug_tuple("ComboBox").field(&*inner.borrow()).finish(),
            Control::DateTimeEdit(inner) => f
                .debug_tuple("DateTimeEdit")
                .field(&*inner.borrow())
                .finish(),
            Control::Label(inner) => f.debug_tuple("Label").field(&*inner.borrow()).finish(),
            Control::Button(button) => f.debug_tuple("Button").field(button).finish(),
            Control::ListView { view, .. } => {
                f.debug_tuple("ListView").field(&*view.borrow()).finish()
            }
            Control::Stack(stack) => f
                .debug_struct("Stack")
                .field("pages", &stack.pages().len())
                .field("active", &stack.active_index())
                .finish(),
            Control::Row(children) => f.debug_tuple("Row").field(children).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormRow {
    pub label: Option<String>,
    pub control: Control,
}

/// Insertion-ordered rows of one dialog page.
#[derive(Debug, Clone, Default)]
pub struct Form {
    rows: Vec<FormRow>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn walk(&self, visit: &mut dyn FnMut(&Control)) {
        for row in &self.rows {
            row.control.walk(visit);
        }
    }
}

impl super::FormArea for Form {
    fn append_row(&mut self, label: &str, control: Control) {
        self.rows.push(FormRow {
            label: Some(label.to_string()),
            control,
        });
    }

    fn append_full_width_row(&mut self, control: Control) {
        self.rows.push(FormRow {
            label: None,
            control,
        });
    }
}
