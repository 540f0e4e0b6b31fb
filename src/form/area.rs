use super::control::Control;

/// Sink for the rows of one dialog page. Rows render top to bottom in
/// insertion order.
pub trait FormArea {
    /// Appends a labelled row. An empty label leaves the label column blank.
    fn append_row(&mut self, label: &str, control: Control);

    /// Appends a row spanning both the label and the control column.
    fn append_full_width_row(&mut self, control: Control);
}
