//! Decode results that carry partial data plus an ordered anomaly log

use std::fmt;

/// How badly an anomaly affected the decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Noteworthy but expected (absent optional section)
    Info,
    /// Recovered with a default (padding, clamping, truncation)
    Warning,
    /// Section aborted; data decoded before the failure is kept
    Error,
    /// Whole decode failed; no usable value
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Part of a container a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Mesh,
    Skeleton,
    Animation,
    Container,
    Image,
    Pixels,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Header => "header",
            Section::Mesh => "mesh",
            Section::Skeleton => "skeleton",
            Section::Animation => "animation",
            Section::Container => "container",
            Section::Image => "image",
            Section::Pixels => "pixels",
        };
        f.write_str(s)
    }
}

/// A single anomaly found while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub section: Section,
    /// Buffer offset the anomaly was detected at, when known
    pub offset: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(
                f,
                "[{}] {} @0x{:x}: {}",
                self.severity, self.section, offset, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.section, self.message),
        }
    }
}

/// Overall outcome of a decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// No warnings or errors
    Complete,
    /// Something was padded, clamped, skipped, or aborted
    Partial,
    /// Nothing usable was produced
    Failed,
}

/// A decoded value together with everything that went wrong producing it
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Decoded<T> {
    pub fn status(&self) -> DecodeStatus {
        let worst = self.diagnostics.iter().map(|d| d.severity).max();
        match worst {
            Some(Severity::Fatal) => DecodeStatus::Failed,
            Some(Severity::Warning | Severity::Error) => DecodeStatus::Partial,
            Some(Severity::Info) | None => DecodeStatus::Complete,
        }
    }

    /// Diagnostics at or above `severity`
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity >= severity)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

/// Collects diagnostics during one decode call and mirrors them to `tracing`
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        severity: Severity,
        section: Section,
        offset: Option<usize>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        match severity {
            Severity::Info => tracing::debug!(%section, ?offset, "{}", message),
            Severity::Warning => tracing::warn!(%section, ?offset, "{}", message),
            Severity::Error | Severity::Fatal => {
                tracing::error!(%section, ?offset, %severity, "{}", message)
            }
        }
        self.entries.push(Diagnostic {
            severity,
            section,
            offset,
            message,
        });
    }

    pub(crate) fn info(&mut self, section: Section, offset: Option<usize>, msg: impl Into<String>) {
        self.push(Severity::Info, section, offset, msg);
    }

    pub(crate) fn warn(&mut self, section: Section, offset: Option<usize>, msg: impl Into<String>) {
        self.push(Severity::Warning, section, offset, msg);
    }

    pub(crate) fn error(&mut self, section: Section, offset: Option<usize>, msg: impl Into<String>) {
        self.push(Severity::Error, section, offset, msg);
    }

    pub(crate) fn fatal(&mut self, section: Section, offset: Option<usize>, msg: impl Into<String>) {
        self.push(Severity::Fatal, section, offset, msg);
    }

    pub(crate) fn finish<T>(self, value: T) -> Decoded<T> {
        Decoded {
            value,
            diagnostics: self.entries,
        }
    }
}
