use serde::Serialize;
use std::fmt;

/// The four drift checks, each surfaced with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardCheck {
    Fingerprint,
    Schema,
    Snapshot,
    Semantic,
}

impl GuardCheck {
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Fingerprint => 2,
            Self::Schema => 3,
            Self::Snapshot => 4,
            Self::Semantic => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fingerprint => "fingerprint",
            Self::Schema => "schema",
            Self::Snapshot => "snapshot",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for GuardCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardFailure {
    pub path: String,
    pub detail: String,
}

/// Outcome of one check: how many items were examined and which failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardReport {
    pub check: GuardCheck,
    pub checked: usize,
    pub failures: Vec<GuardFailure>,
}

impl GuardReport {
    #[must_use]
    pub const fn new(check: GuardCheck) -> Self {
        Self {
            check,
            checked: 0,
            failures: Vec::new(),
        }
    }

    pub fn fail(&mut self, path: impl Into<String>, detail: impl Into<String>) {
        self.failures.push(GuardFailure {
            path: path.into(),
            detail: detail.into(),
        });
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// 0 when the check passed, otherwise the check's own code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            self.check.exit_code()
        }
    }
}

impl fmt::Display for GuardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "{} check passed ({} checked)", self.check, self.checked);
        }
        write!(
            f,
            "{} drift: {} of {} failed",
            self.check,
            self.failures.len(),
            self.checked
        )?;
        for failure in &self.failures {
            write!(f, "\n  - {}: {}", failure.path, failure.detail)?;
        }
        Ok(())
    }
}
