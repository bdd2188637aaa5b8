//! Node-label argument parsing
//!
//! `--node-label` accepts `key=value` pairs, comma-separated within one
//! argument or repeated across arguments. Values may themselves contain `=`;
//! only the first one splits.

use crate::error::{GkeccError, Result};
use std::collections::BTreeMap;

pub fn parse_node_labels(args: &[String]) -> Result<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();

    for arg in args {
        for pair in arg.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').ok_or_else(|| GkeccError::InvalidInput {
                field: "node-label".to_string(),
                reason: format!("Invalid label format '{}', expected key=value", pair),
            })?;
            labels.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(args: &[&str]) -> Result<BTreeMap<String, String>> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_node_labels(&args)
    }

    #[test]
    fn test_parse_empty() {
        assert!(labels(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_single_label() {
        let result = labels(&["key=value"]).unwrap();
        assert_eq!(result["key"], "value");
    }

    #[test]
    fn test_parse_repeated_and_comma_separated() {
        let expected: Vec<(&str, &str)> = vec![("a", "1"), ("b", "2")];

        for args in [vec!["a=1,b=2"], vec!["a=1", "b=2"]] {
            let result = labels(&args).unwrap();
            let pairs: Vec<_> = result
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            assert_eq!(pairs, expected);
        }
    }

    #[test]
    fn test_parse_mixed_format() {
        let result = labels(&["env=prod,team=platform", "owner=devops"]).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result["owner"], "devops");
    }

    #[test]
    fn test_parse_with_spaces_and_empty_segments() {
        let result = labels(&["key1=value1 , key2=value2", "key3=value3,,"]).unwrap();
        assert_eq!(result["key1"], "value1");
        assert_eq!(result["key2"], "value2");
        assert_eq!(result["key3"], "value3");
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let result = labels(&["a=1=2"]).unwrap();
        assert_eq!(result["a"], "1=2");
    }

    #[test]
    fn test_parse_missing_equals_is_an_error() {
        let err = labels(&["invalid"]).unwrap_err();
        assert!(err.to_string().contains("Invalid label format"));
    }
}
