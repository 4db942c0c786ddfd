//! Terminal display system
//!
//! User-facing output for command handlers. Logging goes through tracing;
//! everything the user is meant to read goes through a [`Display`].

use crate::primitives::ColorMode;
use std::io::Write;
use std::sync::{Arc, Mutex};

pub mod status;
pub mod styling;

pub use status::StatusDisplay;
pub use styling::StyleManager;

/// Where display lines end up
#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Display manager handed to command handlers
#[derive(Debug, Clone)]
pub struct Display {
    styling: StyleManager,
    sink: Sink,
}

impl Display {
    /// Display writing to stdout
    pub fn stdout(color: ColorMode) -> Self {
        Self {
            styling: StyleManager::new(color),
            sink: Sink::Stdout,
        }
    }

    /// Uncoloured display writing into a shared buffer
    pub fn buffered() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let display = Self {
            styling: StyleManager::plain(),
            sink: Sink::Buffer(Arc::clone(&buffer)),
        };
        (display, buffer)
    }

    pub fn status(&self) -> StatusDisplay<'_> {
        StatusDisplay::new(self)
    }

    pub fn styling(&self) -> &StyleManager {
        &self.styling
    }

    /// Write raw text plus newline; output errors (closed pipe) are ignored
    pub fn write_line(&self, line: &str) {
        match &self.sink {
            Sink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{}", line);
                let _ = stdout.flush();
            }
            Sink::Buffer(buffer) => {
                if let Ok(mut buffer) = buffer.lock() {
                    let _ = writeln!(buffer, "{}", line);
                }
            }
        }
    }
}
