//! Adapter configuration.

use serde::{Deserialize, Serialize};

/// What a `Maybe` does when its task succeeds without a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Complete without emitting a value.
    #[default]
    Empty,
    /// Fail with `RxError::MissingValue`.
    Error,
}

/// AdapterConfig は RxTask の設定
///
/// # 使用例
/// ```ignore
/// let config = AdapterConfig::from_json(r#"{ "maybe_missing_value": "error" }"#)?;
/// let rx = RxTask::new(config);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub maybe_missing_value: MissingValuePolicy,
}

impl AdapterConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn with_maybe_missing_value(mut self, policy: MissingValuePolicy) -> Self {
        self.maybe_missing_value = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_object("{}", MissingValuePolicy::Empty)]
    #[case::explicit_empty(r#"{"maybe_missing_value":"empty"}"#, MissingValuePolicy::Empty)]
    #[case::explicit_error(r#"{"maybe_missing_value":"error"}"#, MissingValuePolicy::Error)]
    fn parses_missing_value_policy(#[case] json: &str, #[case] expected: MissingValuePolicy) {
        let config = AdapterConfig::from_json(json).unwrap();
        assert_eq!(config.maybe_missing_value, expected);
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(AdapterConfig::from_json(r#"{"maybe_missing_value":"drop"}"#).is_err());
    }

    #[test]
    fn builder_overrides_default() {
        let config = AdapterConfig::default().with_maybe_missing_value(MissingValuePolicy::Error);
        assert_eq!(config.maybe_missing_value, MissingValuePolicy::Error);
    }
}
