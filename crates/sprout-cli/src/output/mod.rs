//! Terminal output for command results.
//!
//! Logging goes through `tracing` on stderr; this handler is for what the
//! user asked to see.

pub mod colors;
pub mod errors;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Plain result line on stdout, e.g. a version change or command line
    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    /// Secondary information, dimmed
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a step message with emoji
    pub fn step(&self, emoji: &str, message: &str) {
        println!("{} {}", emoji, message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
