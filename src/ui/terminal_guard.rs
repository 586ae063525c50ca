//! Terminal session that restores the terminal on drop.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};

pub type WizardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the ratatui terminal for the lifetime of the wizard.
///
/// Raw mode, the alternate screen and mouse capture are undone when the
/// session is dropped, on early `?` returns as well as normal exit.
pub struct TerminalSession {
    terminal: WizardTerminal,
}

impl TerminalSession {
    pub fn start() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            Self::restore();
            return Err(err.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(terminal) => terminal,
            Err(err) => {
                Self::restore();
                return Err(err.into());
            }
        };
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut WizardTerminal {
        &mut self.terminal
    }

    /// Best-effort restore; also used by the panic hook
    pub fn restore() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = execute!(io::stdout(), Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        Self::restore();
    }
}

/// Install panic hook that restores terminal before printing panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal first so panic message is readable
        TerminalSession::restore();
        original_hook(panic_info);
    }));
}
