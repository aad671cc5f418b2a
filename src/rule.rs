//! Predicates deciding whether a candidate value may be adopted.

use std::fmt;
use std::sync::Arc;

/// Pure predicate over `T`, injected as a policy.
pub struct Rule<T> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Rule<T> {
    /// Create a new [`Rule`] from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Rule accepting every candidate.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Whether `candidate` passes the rule.
    pub fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.predicate)(candidate)
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}
