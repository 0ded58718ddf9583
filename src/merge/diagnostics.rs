//! Message sinks for merge progress and data quality warnings.

/// Log target used by [`LogDiagnostics`]
pub const LOG_TARGET: &str = "segmerge::merge";

/// Receives informational and warning messages from a merge run
pub trait Diagnostics {
    /// Progress and summary messages
    fn info(&mut self, message: &str);
    /// Data quality warnings
    fn warn(&mut self, message: &str);
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn info(&mut self, message: &str) {
        (**self).info(message);
    }

    fn warn(&mut self, message: &str) {
        (**self).warn(message);
    }
}

/// Forwards messages to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&mut self, message: &str) {
        log::info!(target: LOG_TARGET, "{}", message);
    }

    fn warn(&mut self, message: &str) {
        log::warn!(target: LOG_TARGET, "{}", message);
    }
}

/// Keeps every message in memory, optionally forwarding to the `log` facade
/// as well
#[derive(Debug, Default, Clone)]
pub struct CollectingDiagnostics {
    /// Informational messages, in emission order
    pub infos: Vec<String>,
    /// Warnings, in emission order
    pub warnings: Vec<String>,
    forward: bool,
}

impl CollectingDiagnostics {
    /// Collect without forwarding
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect and forward to [`LogDiagnostics`]
    pub fn forwarding() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Number of warnings received
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether any warning contains `needle`
    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn info(&mut self, message: &str) {
        if self.forward {
            LogDiagnostics.info(message);
        }
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        if self.forward {
            LogDiagnostics.warn(message);
        }
        self.warnings.push(message.to_string());
    }
}
