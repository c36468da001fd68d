//! Weak-passcode rules evaluated while digits are typed

use std::fmt;

/// A predicate rejecting weak passcodes
pub trait ValidationRule: Send + Sync {
    /// Short identifier used in logs and violation reports
    fn name(&self) -> &str;

    /// Returns true when `candidate` breaks this rule
    fn is_violated_by(&self, candidate: &str) -> bool;

    /// Title shown to the user on violation
    fn error_title(&self) -> Option<&str> {
        None
    }

    /// Message shown to the user on violation
    fn error_message(&self) -> Option<&str> {
        None
    }
}

/// Owned report of a broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: String,
    pub title: Option<String>,
    pub message: Option<String>,
}

impl RuleViolation {
    fn from_rule(rule: &dyn ValidationRule) -> Self {
        Self {
            rule: rule.name().to_string(),
            title: rule.error_title().map(str::to_string),
            message: rule.error_message().map(str::to_string),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.title, &self.message) {
            (Some(title), Some(message)) => write!(f, "{}: {}", title, message),
            (Some(text), None) | (None, Some(text)) => write!(f, "{}", text),
            (None, None) => write!(f, "passcode rejected by {}", self.rule),
        }
    }
}

/// Rejects any run of at least `min_equal_digits` identical characters
#[derive(Debug, Clone)]
pub struct EqualDigitsRule {
    min_equal_digits: usize,
    error_title: Option<String>,
    error_message: Option<String>,
}

impl EqualDigitsRule {
    /// Create a rule banning runs of `min_equal_digits` or more
    ///
    /// # Panics
    /// Panics if `min_equal_digits` is below 2, which would reject every code.
    pub fn new(min_equal_digits: usize) -> Self {
        assert!(
            min_equal_digits >= 2,
            "EqualDigitsRule needs a run length of at least 2"
        );
        Self {
            min_equal_digits,
            error_title: None,
            error_message: None,
        }
    }

    /// Attach user-facing text
    pub fn with_text(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_title = Some(title.into());
        self.error_message = Some(message.into());
        self
    }

    pub fn min_equal_digits(&self) -> usize {
        self.min_equal_digits
    }
}

impl ValidationRule for EqualDigitsRule {
    fn name(&self) -> &str {
        "equal-digits"
    }

    fn is_violated_by(&self, candidate: &str) -> bool {
        let mut run = 0usize;
        let mut previous = None;

        for c in candidate.chars() {
            if Some(c) == previous {
                run += 1;
            } else {
                run = 1;
                previous = Some(c);
            }
            if run >= self.min_equal_digits {
                return true;
            }
        }

        false
    }

    fn error_title(&self) -> Option<&str> {
        self.error_title.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Evaluates every configured rule against a candidate
#[derive(Default)]
pub struct PasscodeValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl PasscodeValidator {
    pub fn new(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Add a rule
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// All violated rules, in configuration order
    pub fn validate(&self, candidate: &str) -> Vec<RuleViolation> {
        self.rules
            .iter()
            .filter(|rule| rule.is_violated_by(candidate))
            .map(|rule| RuleViolation::from_rule(rule.as_ref()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for PasscodeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}
