//! Retry policy for stage units.
//!
//! Generation keeps asking until the model produces something parseable,
//! so the default policy never gives up.  Tests and batch callers can
//! cap attempts with [`RetryPolicy::limited`].

/// How many times a stage unit may be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever.  Cancellation is the only way out.
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `max_attempts` tries of a single unit.
    pub fn limited(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// Whether the given 1-based attempt may run.
    pub fn allows(&self, attempt: u32) -> bool {
        match self.max_attempts {
            None => true,
            Some(max) => attempt <= max,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}
