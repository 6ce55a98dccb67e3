use crate::utils::error::UsersError;
use std::fmt;

/// Inclusive range of upstream status codes that authorize a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRange {
    pub min: u16,
    pub max: u16,
}

impl StatusRange {
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, status: u16) -> bool {
        (self.min..=self.max).contains(&status)
    }
}

impl Default for StatusRange {
    fn default() -> Self {
        Self { min: 400, max: 500 }
    }
}

impl fmt::Display for StatusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Decides which primary failures are substituted by the fallback call.
///
/// Cancellation never qualifies, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Primary failures always propagate.
    Disabled,
    /// Only upstream responses with a status code inside the range qualify.
    StatusRange(StatusRange),
    /// Every failure qualifies, including connection errors and timeouts.
    /// This hides outages of the primary host behind the fallback.
    AnyFailure,
}

impl FallbackPolicy {
    pub fn should_fallback(&self, error: &UsersError) -> bool {
        if error.is_cancelled() {
            return false;
        }

        match self {
            FallbackPolicy::Disabled => false,
            FallbackPolicy::StatusRange(range) => {
                error.status_code().is_some_and(|status| range.contains(status))
            }
            FallbackPolicy::AnyFailure => true,
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::StatusRange(StatusRange::default())
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::Disabled => write!(f, "disabled"),
            FallbackPolicy::StatusRange(range) => write!(f, "status {}", range),
            FallbackPolicy::AnyFailure => write!(f, "any failure"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Primary,
    Fallback,
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempt::Primary => write!(f, "primary"),
            Attempt::Fallback => write!(f, "fallback"),
        }
    }
}
