//! How this invocation should render: the global output switches combined
//! with what the process is attached to.

use std::io::IsTerminal;

use super::mode::OutputMode;

const FALLBACK_WIDTH: usize = 80;

/// The global `--json`, `--plain`, `--no-color` and `--ascii` switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFlags {
    pub json: bool,
    pub plain: bool,
    pub no_color: bool,
    pub ascii: bool,
}

/// Snapshot of the streams and variables that shape output.
#[derive(Debug, Clone, Default)]
pub struct Terminal {
    pub stdout_tty: bool,
    pub stdin_tty: bool,
    /// `TERM=dumb`
    pub dumb: bool,
    /// `NO_COLOR` is set, whatever its value
    pub no_color: bool,
    pub columns: Option<usize>,
}

impl Terminal {
    pub fn current() -> Self {
        let columns = std::env::var("COLUMNS")
            .ok()
            .and_then(|cols| cols.parse::<usize>().ok())
            .filter(|cols| *cols > 0)
            .or_else(window_columns);
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stdin_tty: std::io::stdin().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns,
        }
    }
}

/// Rendering settings every printer reads.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub is_tty: bool,
    pub stdin_tty: bool,
    pub color: bool,
    pub unicode: bool,
    pub width: usize,
    pub mode: OutputMode,
}

impl UiContext {
    pub fn detect(flags: OutputFlags) -> Self {
        Self::resolve(flags, &Terminal::current())
    }

    /// Color needs a terminal and no opt-out from the flag, `NO_COLOR` or
    /// a dumb terminal.
    pub fn resolve(flags: OutputFlags, term: &Terminal) -> Self {
        Self {
            is_tty: term.stdout_tty,
            stdin_tty: term.stdin_tty,
            color: term.stdout_tty && !(flags.no_color || term.no_color || term.dumb),
            unicode: !flags.ascii,
            width: term.columns.unwrap_or(FALLBACK_WIDTH),
            mode: OutputMode::resolve(flags.json, flags.plain, term.stdout_tty, term.dumb),
        }
    }

    /// Prompts need a terminal on both ends and a human-readable mode.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && self.stdin_tty && !self.mode.is_json()
    }
}

#[cfg(unix)]
fn window_columns() -> Option<usize> {
    use std::mem::MaybeUninit;

    let mut size = MaybeUninit::<libc::winsize>::uninit();
    // SAFETY: TIOCGWINSZ only writes into the winsize we pass
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, size.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: ioctl succeeded, so the struct is filled in
    let cols = unsafe { size.assume_init() }.ws_col;
    (cols > 0).then_some(cols as usize)
}

#[cfg(not(unix))]
fn window_columns() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tty() -> Terminal {
        Terminal {
            stdout_tty: true,
            stdin_tty: true,
            ..Terminal::default()
        }
    }

    #[test]
    fn test_terminal_gets_pretty_color_output() {
        let ctx = UiContext::resolve(OutputFlags::default(), &tty());
        assert_eq!(ctx.mode, OutputMode::Pretty);
        assert!(ctx.color);
        assert!(ctx.is_interactive());
        assert_eq!(ctx.width, FALLBACK_WIDTH);
    }

    #[test]
    fn test_json_is_never_interactive() {
        let flags = OutputFlags {
            json: true,
            ..OutputFlags::default()
        };
        let ctx = UiContext::resolve(flags, &tty());
        assert_eq!(ctx.mode, OutputMode::Json);
        assert!(!ctx.is_interactive());
    }

    #[test]
    fn test_color_opt_outs() {
        let flags = OutputFlags {
            no_color: true,
            ..OutputFlags::default()
        };
        assert!(!UiContext::resolve(flags, &tty()).color);

        let env = Terminal {
            no_color: true,
            ..tty()
        };
        assert!(!UiContext::resolve(OutputFlags::default(), &env).color);

        let dumb = Terminal { dumb: true, ..tty() };
        let ctx = UiContext::resolve(OutputFlags::default(), &dumb);
        assert!(!ctx.color);
        assert_eq!(ctx.mode, OutputMode::Plain);
    }

    #[test]
    fn test_pipe_is_plain_and_not_interactive() {
        let piped = Terminal {
            columns: Some(132),
            ..Terminal::default()
        };
        let ctx = UiContext::resolve(OutputFlags::default(), &piped);
        assert_eq!(ctx.mode, OutputMode::Plain);
        assert!(!ctx.color);
        assert!(!ctx.is_interactive());
        assert_eq!(ctx.width, 132);
    }

    #[test]
    fn test_ascii_disables_unicode() {
        let flags = OutputFlags {
            ascii: true,
            ..OutputFlags::default()
        };
        assert!(!UiContext::resolve(flags, &tty()).unicode);
    }
}
