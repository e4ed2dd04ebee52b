//! Outcome model: what a task completes with.
//!
//! A task ends in exactly one of three shapes: a value, an absent value
//! (`Ok(None)`, e.g. a task whose payload is "nothing"), or a failure.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::TaskError;

/// The result a completed task hands to its listeners.
pub type TaskResult<T> = Result<Option<T>, TaskError>;

/// Classification of a [`TaskResult`], used in log records and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Value,
    Empty,
    Failure,
}

impl OutcomeKind {
    pub fn of<T>(result: &TaskResult<T>) -> Self {
        match result {
            Ok(Some(_)) => OutcomeKind::Value,
            Ok(None) => OutcomeKind::Empty,
            Err(_) => OutcomeKind::Failure,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeKind::Value => "VALUE",
            OutcomeKind::Empty => "EMPTY",
            OutcomeKind::Failure => "FAILURE",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::value(Ok(Some(1)), OutcomeKind::Value)]
    #[case::empty(Ok(None), OutcomeKind::Empty)]
    #[case::failure(Err(TaskError::msg("x")), OutcomeKind::Failure)]
    fn classifies_results(#[case] result: TaskResult<i32>, #[case] expected: OutcomeKind) {
        assert_eq!(OutcomeKind::of(&result), expected);
    }

    #[test]
    fn outcome_kind_serializes_as_required_names() {
        let s = serde_json::to_string(&OutcomeKind::Empty).unwrap();
        assert_eq!(s, "\"EMPTY\"");
        assert_eq!(OutcomeKind::Failure.to_string(), "FAILURE");
    }
}
