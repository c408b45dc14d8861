use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Severity {
    Success,
    Warn,
    Error,
}

/// A user-visible notification raised by a controller action.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Notice {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn success(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary, detail)
    }

    pub fn warn(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary, detail)
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary, detail)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}
