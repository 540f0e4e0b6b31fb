use std::{
    io::{self, Stdout},
    sync::Once,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::presentation::{self, DialogView};

static PANIC_HOOK: Once = Once::new();

/// Raw-mode alternate screen, held while the outermost dialog is open.
/// Dropping it gives the terminal back in its original state.
pub(crate) struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        install_panic_hook();
        log::debug!("terminal entered dialog mode");
        Ok(Self { terminal })
    }

    pub fn render(&mut self, view: &DialogView<'_>) -> Result<()> {
        self.terminal
            .draw(|frame| presentation::draw(frame, view))
            .context("failed to draw dialog")?;
        Ok(())
    }

    /// Waits up to `tick` for a key press. Resizes are applied here and
    /// reported as `None` so the caller redraws.
    pub fn next_key(&mut self, tick: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(tick)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            Event::Resize(_, _) => {
                self.terminal.autoresize()?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        restore_terminal();
        log::debug!("terminal restored");
    }
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore_terminal();
            previous(panic_info);
        }));
    });
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, Show);
}
