//! Connection parameter resolution
//!
//! Explicit flags are merged with `HELM_REPO_*` environment variables. The
//! environment is read through [`EnvSource`] so callers decide where it comes
//! from.

use std::collections::HashMap;

pub const ENV_USERNAME: &str = "HELM_REPO_USERNAME";
pub const ENV_PASSWORD: &str = "HELM_REPO_PASSWORD";
pub const ENV_ACCESS_TOKEN: &str = "HELM_REPO_ACCESS_TOKEN";
pub const ENV_CONTEXT_PATH: &str = "HELM_REPO_CONTEXT_PATH";
pub const ENV_USE_HTTP: &str = "HELM_REPO_USE_HTTP";

/// Read-only view of environment variables
pub trait EnvSource {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Parameters of a single invocation, as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationParameters {
    pub chart_name: Option<String>,
    pub chart_version: Option<String>,
    pub repo_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub context_path: Option<String>,
    pub use_http: bool,
}

/// Connection settings after merging flags and environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConnection {
    pub username: String,
    pub password: String,
    pub access_token: String,
    pub context_path: String,
    pub use_http: bool,
}

impl InvocationParameters {
    /// Merge with the environment
    ///
    /// String fields fall back to the environment only when the flag is
    /// empty. `HELM_REPO_USE_HTTP` is different: when set it always replaces
    /// the flag, and an unparseable value counts as `false`. Existing plugin
    /// setups depend on that behaviour.
    pub fn resolve(&self, env: &impl EnvSource) -> ResolvedConnection {
        let pick = |flag: &Option<String>, key: &str| -> String {
            match flag.as_deref() {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => env.var(key).unwrap_or_default(),
            }
        };

        let use_http = match env.var(ENV_USE_HTTP) {
            Some(v) => parse_bool(&v).unwrap_or(false),
            None => self.use_http,
        };

        ResolvedConnection {
            username: pick(&self.username, ENV_USERNAME),
            password: pick(&self.password, ENV_PASSWORD),
            access_token: pick(&self.access_token, ENV_ACCESS_TOKEN),
            context_path: pick(&self.context_path, ENV_CONTEXT_PATH),
            use_http,
        }
    }
}

/// Parse the boolean spellings accepted by the Helm ecosystem
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
