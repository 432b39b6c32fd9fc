//! Layered setting resolution shared by both binaries.
//!
//! Precedence: environment variable, then command-line flag, then config
//! file, then the built-in default. An environment value that fails to parse
//! is logged and skipped rather than treated as fatal.

use std::str::FromStr;

/// Source of environment variables. Tests pass a closure over a fixed map.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Resolve one setting across all layers.
pub fn resolve<T, E>(env: &E, key: &str, flag: Option<T>, file: Option<T>, default: T) -> T
where
    T: FromStr,
    E: EnvSource + ?Sized,
{
    if let Some(raw) = env.var(key) {
        match raw.parse::<T>() {
            Ok(v) => return v,
            Err(_) => tracing::warn!(var = %key, value = %raw, "invalid environment value, ignoring"),
        }
    }
    flag.or(file).unwrap_or(default)
}
