//! Logging utilities.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as JSON
///
/// Use in tracing statements: `debug!("config: {}", Pretty(&config));`
/// Falls back to `Debug` formatting if serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(&self.0) {
            Ok(json) => write!(f, "\n{}", json),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(&self.0) {
            Ok(json) => write!(f, "\n{}", json),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}
