use thiserror::Error;

/// Structural errors that abort conversion outright.
///
/// Rule violations are never raised as errors — they are reported as
/// [`ValidationFinding`] values so a caller can decide whether to block
/// on errors or proceed past warnings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// A field the generator cannot work without is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Slash-delimited date — month/day order is ambiguous, so we refuse
    /// to guess.
    #[error("ambiguous date '{0}': slash-delimited dates are not accepted")]
    AmbiguousDate(String),

    /// Date string that matches none of the accepted formats.
    #[error("unparseable date '{0}': expected YYYY-MM-DD or DD.MM.YYYY")]
    InvalidDate(String),

    /// XML serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The generated document failed the trust-boundary inspection.
    #[error("security violation [{rule}]: {0}", rule = .0.rule_id())]
    Security(#[from] crate::guard::GuardViolation),
}

/// Severity of a validation finding.
///
/// Errors block emission; warnings are surfaced but emission proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A single validation finding with a stable rule identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFinding {
    /// Stable rule id (e.g. "BR-02", "BR-DE-5", "PEPPOL-EN16931-R020",
    /// "EF-03"). Assertable across releases.
    pub rule: String,
    pub severity: Severity,
    /// Dot-separated path to the offending field (e.g. "seller.address.country_code").
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Expected value, where a comparison failed.
    pub expected: Option<String>,
    /// Actual value, where a comparison failed.
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sev = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {} {}: {}", self.rule, sev, self.field, self.message)?;
        if let (Some(exp), Some(act)) = (&self.expected, &self.actual) {
            write!(f, " (expected {exp}, got {act})")?;
        }
        Ok(())
    }
}

impl ValidationFinding {
    /// Create an error finding.
    pub fn error(
        rule: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Create a warning finding.
    pub fn warning(
        rule: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, field, message)
        }
    }

    /// Attach the expected/actual pair of a failed comparison.
    pub fn with_values(
        mut self,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        self.expected = Some(expected.to_string());
        self.actual = Some(actual.to_string());
        self
    }
}
