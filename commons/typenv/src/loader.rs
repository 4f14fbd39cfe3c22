//! Sources of raw environment values.
//!
//! A loader maps a variable name to its raw string. An empty string means the
//! variable is absent; the engine cannot tell "unset" and "set to empty" apart.

use std::collections::{BTreeMap, HashMap};

pub trait EnvLoader: Send + Sync {
    fn load(&self, key: &str) -> String;
}

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLoader for ProcessEnv {
    fn load(&self, key: &str) -> String {
        std::env::var_os(key)
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl<F> EnvLoader for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn load(&self, key: &str) -> String {
        self(key)
    }
}

impl EnvLoader for HashMap<String, String> {
    fn load(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_default()
    }
}

impl EnvLoader for BTreeMap<String, String> {
    fn load(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_default()
    }
}
