//! Diagnostics sink handed to the client at construction.
//!
//! The client reports each request and response through [`Diagnostics`]
//! rather than a global logger. [`LogDiagnostics`] forwards to the `log`
//! facade, which drops records until the application installs a logger.

pub use log::Level;

pub trait Diagnostics: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards to the `log` crate under the `webhdfs` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "webhdfs", level, "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn log(&self, _level: Level, _message: &str) {}
}
