//! UI context for environment detection and configuration.

use std::io::IsTerminal;

use super::mode::{OutputFormat, OutputMode};

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether stdout is a TTY
    pub is_tty: bool,
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Terminal width (columns)
    pub width: usize,
    /// Resolved output mode
    pub mode: OutputMode,
}

impl UiContext {
    /// Create context from environment and CLI flags.
    pub fn from_env(
        json_flag: bool,
        format: Option<OutputFormat>,
        no_color_flag: bool,
        ascii_flag: bool,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self {
            is_tty,
            color: is_tty && !no_color_flag && !no_color_env && !term_is_dumb,
            unicode: !ascii_flag,
            width: terminal_width().unwrap_or(80),
            mode: OutputMode::resolve(json_flag, format, is_tty, term_is_dumb),
        }
    }

    /// Whether prompts may be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && std::io::stdin().is_terminal()
    }
}

/// Get terminal width from `COLUMNS` or the tty.
fn terminal_width() -> Option<usize> {
    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 {
                return Some(width);
            }
        }
    }

    #[cfg(unix)]
    {
        use std::mem::MaybeUninit;

        let mut winsize = MaybeUninit::<libc::winsize>::uninit();
        // SAFETY: TIOCGWINSZ only writes into the provided winsize.
        let result =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, winsize.as_mut_ptr()) };
        if result == 0 {
            // SAFETY: ioctl succeeded, so winsize was filled in.
            let ws = unsafe { winsize.assume_init() };
            if ws.ws_col > 0 {
                return Some(ws.ws_col as usize);
            }
        }
    }

    None
}
