//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use typenv::{ParseOption, with_loader};

/// Loader option backed by a fixed map.
pub fn map_loader<'a, I>(kvs: I) -> ParseOption
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let env: HashMap<String, String> = kvs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    with_loader(env)
}

/// RAII guard that restores (or unsets) the original value when dropped.
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            if let Some(ref v) = self.prev {
                std::env::set_var(&self.key, v);
            } else {
                std::env::remove_var(&self.key);
            }
        }
    }
}

/// Set a process env var, returning a guard that restores the previous value.
/// Each test uses its own key so parallel tests don't race on the same var.
pub fn set_env_guarded(key: &str, val: &str) -> EnvGuard {
    let prev = std::env::var(key).ok();
    unsafe {
        std::env::set_var(key, val);
    }
    EnvGuard {
        key: key.to_string(),
        prev,
    }
}
