//! Terminal console utilities for the status dashboard

use std::env;
use std::io::{self, IsTerminal};

/// ANSI sequence that clears the screen and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Console output handler with color support and terminal width detection
#[derive(Debug, Clone)]
pub struct Console {
    color_enabled: bool,
    max_width: usize,
}

impl Console {
    /// Create a new console with automatic color and terminal detection
    pub fn new() -> Self {
        Self {
            color_enabled: io::stdout().is_terminal() && env::var("NO_COLOR").is_err(),
            max_width: Self::detect_terminal_width(),
        }
    }

    /// Detect terminal width, defaulting to 80 if unavailable
    fn detect_terminal_width() -> usize {
        term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
    }

    /// Colorize text with the specified color
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            Color::Yellow => format!("\x1b[33m{text}\x1b[0m"),
            Color::Green => format!("\x1b[32m{text}\x1b[0m"),
            Color::Cyan => format!("\x1b[36m{text}\x1b[0m"),
            Color::Dim => format!("\x1b[2m{text}\x1b[0m"),
            Color::Bold => format!("\x1b[1m{text}\x1b[0m"),
        }
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// Horizontal rule spanning the terminal, capped at 60 columns
    pub fn rule(&self) -> String {
        "─".repeat(self.max_width.clamp(10, 60))
    }

    /// Create a console with colors disabled
    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
            max_width: Self::detect_terminal_width(),
        }
    }

    /// Create a console with a specific max width
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Yellow,
    Green,
    Cyan,
    Dim,
    Bold,
}
