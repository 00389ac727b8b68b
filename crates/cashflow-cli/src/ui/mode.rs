//! Output mode routing logic.

/// Output mode determines how results are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON output only
    Json,
    /// Plain `key=value` text, stable for scripts
    #[default]
    Plain,
    /// Tables and colors for a terminal
    Pretty,
}

impl OutputMode {
    /// Resolve output mode from flags and environment.
    ///
    /// `--json` wins over everything, then `--plain` and `TERM=dumb` force
    /// plain output. Otherwise a terminal gets pretty output and a pipe
    /// gets plain.
    pub fn resolve(json_flag: bool, plain_flag: bool, is_tty: bool, term_is_dumb: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        if plain_flag || term_is_dumb {
            return Self::Plain;
        }
        if is_tty {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_exclusive() {
        let mode = OutputMode::resolve(true, true, true, false);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn test_plain_flag_on_tty() {
        let mode = OutputMode::resolve(false, true, true, false);
        assert_eq!(mode, OutputMode::Plain);
    }

    #[test]
    fn test_term_dumb_forces_plain() {
        let mode = OutputMode::resolve(false, false, true, true);
        assert_eq!(mode, OutputMode::Plain);
    }

    #[test]
    fn test_tty_gets_pretty() {
        assert_eq!(
            OutputMode::resolve(false, false, true, false),
            OutputMode::Pretty
        );
        assert_eq!(
            OutputMode::resolve(false, false, false, false),
            OutputMode::Plain
        );
    }
}
