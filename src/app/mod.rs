mod autoform;
mod dialog;
mod options;
mod scripted;

#[cfg(feature = "tui")]
pub(crate) mod input;
#[cfg(feature = "tui")]
pub(crate) mod keymap;
#[cfg(feature = "tui")]
mod runtime;
#[cfg(feature = "tui")]
mod status;
#[cfg(feature = "tui")]
mod terminal;

pub use autoform::AutoForm;
pub use dialog::{ActionContext, DialogHost, DialogSession, Outcome, open_dialog};
pub use options::{ClosePolicy, EditorOptions};
pub use scripted::{DialogDriver, Script, ScriptError, ScriptedHost};

#[cfg(feature = "tui")]
pub use runtime::TerminalHost;
