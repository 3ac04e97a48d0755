use serde::{Deserialize, Serialize};

/// Outcome of a single check.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Warning,
    Info,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Warning => write!(f, "WARNING"),
            Status::Info => write!(f, "INFO"),
        }
    }
}

/// One line of the validation log.
/// `evidence` holds the `key = "value"` lines the check looked at, newline separated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub evidence: String,
}

impl CheckResult {
    pub fn new(status: Status, message: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            evidence: evidence.into(),
        }
    }

    pub fn pass(message: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self::new(Status::Pass, message, evidence)
    }

    pub fn fail(message: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self::new(Status::Fail, message, evidence)
    }

    pub fn warning(message: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self::new(Status::Warning, message, evidence)
    }

    pub fn info(message: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self::new(Status::Info, message, evidence)
    }
}

/// Results for a single .vmx file.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checked_at: String,
    pub file: String,
    pub sha256: String,
    pub profile: Option<String>,
    pub total_results: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub results: Vec<CheckResult>,
}

/// A .vmx file found during a directory audit that could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub error: String,
}

/// Results for every .vmx file found under a directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditReport {
    pub checked_at: String,
    pub path: String,
    pub total_files: usize,
    pub files_with_failures: usize,
    pub fail_count: usize,
    pub warning_count: usize,
    pub files: Vec<ValidationReport>,
    /// Unreadable files count as failures; they were never checked.
    pub skipped: Vec<SkippedFile>,
}

impl AuditReport {
    pub fn has_failures(&self) -> bool {
        self.fail_count > 0 || !self.skipped.is_empty()
    }
}
