//! Size Estimation Module
//!
//! Best-effort byte size of cached payloads, used for the byte budget.

use serde::Serialize;

/// Estimate used when a payload cannot be serialized.
pub const DEFAULT_ENTRY_SIZE: usize = 1024;

// == Size Estimator ==
/// Anything that can estimate the byte size of a `T`.
///
/// Estimates only need to be consistent: the same payload must always
/// produce the same value. They never need to be exact.
pub trait SizeEstimator<T: ?Sized> {
    fn estimate_size(&self, data: &T) -> usize;
}

impl<T: ?Sized, F> SizeEstimator<T> for F
where
    F: Fn(&T) -> usize,
{
    fn estimate_size(&self, data: &T) -> usize {
        self(data)
    }
}

// == JSON Size Estimator ==
/// Measures the length of the payload's JSON encoding.
///
/// Falls back to [`DEFAULT_ENTRY_SIZE`] when serialization fails, so
/// estimation never makes `set` fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSizeEstimator;

impl<T: Serialize + ?Sized> SizeEstimator<T> for JsonSizeEstimator {
    fn estimate_size(&self, data: &T) -> usize {
        serde_json::to_vec(data)
            .map(|bytes| bytes.len())
            .unwrap_or(DEFAULT_ENTRY_SIZE)
    }
}

// == Fixed Size Estimator ==
/// Constant estimate for payloads of known size, skipping serialization.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeEstimator(pub usize);

impl<T: ?Sized> SizeEstimator<T> for FixedSizeEstimator {
    fn estimate_size(&self, _data: &T) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_json_estimate_matches_encoding() {
        let value = serde_json::json!({"a": 1, "b": "xy"});
        let expected = serde_json::to_string(&value).unwrap().len();
        assert_eq!(JsonSizeEstimator.estimate_size(&value), expected);
        assert_eq!(JsonSizeEstimator.estimate_size("abc"), 5);
    }

    #[test]
    fn test_json_estimate_is_stable() {
        let rows = vec![vec![1, 2, 3], vec![4, 5]];
        let first = JsonSizeEstimator.estimate_size(&rows);
        let second = JsonSizeEstimator.estimate_size(&rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_estimate_falls_back_on_failure() {
        // JSON object keys must be strings; tuple keys fail to serialize
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        assert_eq!(JsonSizeEstimator.estimate_size(&map), DEFAULT_ENTRY_SIZE);
    }

    #[test]
    fn test_fixed_and_closure_estimators() {
        assert_eq!(FixedSizeEstimator(64).estimate_size(&"anything"), 64);

        let by_len = |s: &String| s.len();
        assert_eq!(by_len.estimate_size(&"hello".to_string()), 5);
    }
}
