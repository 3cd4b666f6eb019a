//! Declarative HTTP method fallback
//!
//! A policy is an ordered list of steps. Each step names a method and a
//! predicate on the response status; when the predicate matches, the same
//! logical request is replayed with the next step's method. When the last
//! step's predicate matches, the operation fails with `ProtocolMismatch`.

use reqwest::{Method, StatusCode};

/// One attempt in a fallback chain
#[derive(Debug, Clone)]
pub struct FallbackStep {
    pub method: Method,
    pub fall_through_on: fn(StatusCode) -> bool,
}

#[derive(Debug, Clone)]
pub struct MethodFallback {
    steps: Vec<FallbackStep>,
}

pub fn method_not_allowed(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED
}

impl MethodFallback {
    /// Start a chain with `method`, moving on when `fall_through_on` matches
    pub fn first(method: Method, fall_through_on: fn(StatusCode) -> bool) -> Self {
        Self {
            steps: vec![FallbackStep {
                method,
                fall_through_on,
            }],
        }
    }

    pub fn then(mut self, method: Method, fall_through_on: fn(StatusCode) -> bool) -> Self {
        self.steps.push(FallbackStep {
            method,
            fall_through_on,
        });
        self
    }

    /// Detect: POST, then GET once if POST is not allowed
    pub fn detect() -> Self {
        Self::first(Method::POST, method_not_allowed).then(Method::GET, method_not_allowed)
    }

    pub fn steps(&self) -> &[FallbackStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_policy_order() {
        let policy = MethodFallback::detect();
        let methods: Vec<_> = policy.steps().iter().map(|s| s.method.clone()).collect();
        assert_eq!(methods, vec![Method::POST, Method::GET]);
        assert!((policy.steps()[0].fall_through_on)(StatusCode::METHOD_NOT_ALLOWED));
        assert!(!(policy.steps()[0].fall_through_on)(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_custom_chain() {
        let policy = MethodFallback::first(Method::PUT, method_not_allowed)
            .then(Method::POST, method_not_allowed)
            .then(Method::GET, |status| status == StatusCode::NOT_IMPLEMENTED);
        assert_eq!(policy.steps().len(), 3);
        assert!((policy.steps()[2].fall_through_on)(StatusCode::NOT_IMPLEMENTED));
    }
}
