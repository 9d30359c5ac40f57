//! Terminal mode switching for the interactive screen.
//!
//! `enter` puts the terminal in raw mode on the alternate screen with
//! bracketed paste; `leave` undoes all three and is idempotent. The runtime
//! calls `leave` from `Drop`, and `restore_on_panic` covers panics.

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Terminal type driven by the runtime.
pub type ScreenTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches the terminal into screen mode.
///
/// # Errors
/// Returns an error if raw mode, the alternate screen, or paste mode cannot
/// be enabled.
pub fn enter() -> Result<ScreenTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to enter alternate screen")?;

    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

/// Returns the terminal to cooked mode on the main screen.
///
/// # Errors
/// Returns an error if the alternate screen or raw mode cannot be left.
pub fn leave() -> Result<()> {
    // Paste mode first, while raw mode is still on.
    let _ = execute!(io::stdout(), DisableBracketedPaste);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")
}

/// Chains a panic hook that leaves screen mode before the panic message is
/// printed. Install it before calling [`enter`].
pub fn restore_on_panic() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave();
        previous(info);
    }));
}
