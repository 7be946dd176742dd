//! ANSI colors, disabled by `NO_COLOR` or when not attached to a terminal.

use std::env;
use std::io::{self, IsTerminal};

#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support from the environment
    pub fn detect() -> Self {
        let enabled = env::var_os("NO_COLOR").is_none()
            && io::stderr().is_terminal()
            && io::stdout().is_terminal();
        Self { enabled }
    }

    /// Never emit escape codes
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, code: u8, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(32, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(33, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(31, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(2, text)
    }
}
