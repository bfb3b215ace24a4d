// ABOUTME: Read-only environment snapshots used for argument substitution.
// ABOUTME: Process environment, optionally layered with config-defined values.

use std::collections::HashMap;

/// Source of name/value pairs available at run time.
pub trait EnvironmentProvider {
    fn snapshot(&self) -> HashMap<String, String>;
}

impl EnvironmentProvider for HashMap<String, String> {
    fn snapshot(&self) -> HashMap<String, String> {
        self.clone()
    }
}

/// The current process environment with optional overrides on top.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
    overrides: HashMap<String, String>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values that take precedence over the process environment.
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl EnvironmentProvider for ProcessEnvironment {
    /// Variables whose name or value is not valid Unicode are left out.
    fn snapshot(&self) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        vars.extend(self.overrides.clone());
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_process_env() {
        temp_env::with_var("OCIDEPLOY_TEST_LAYER", Some("process"), || {
            let mut overrides = HashMap::new();
            overrides.insert("OCIDEPLOY_TEST_LAYER".to_string(), "config".to_string());
            let snapshot = ProcessEnvironment::with_overrides(overrides).snapshot();
            assert_eq!(snapshot["OCIDEPLOY_TEST_LAYER"], "config");
        });
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_unicode_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let garbled = OsStr::from_bytes(b"\xff\xfe");
        temp_env::with_vars(
            [
                ("OCIDEPLOY_TEST_GARBLED", Some(garbled)),
                ("OCIDEPLOY_TEST_PLAIN", Some(OsStr::new("ok"))),
            ],
            || {
                let snapshot = ProcessEnvironment::new().snapshot();
                assert!(!snapshot.contains_key("OCIDEPLOY_TEST_GARBLED"));
                assert_eq!(snapshot["OCIDEPLOY_TEST_PLAIN"], "ok");
            },
        );
    }

    #[test]
    fn reads_process_env() {
        temp_env::with_var("OCIDEPLOY_TEST_READ", Some("yes"), || {
            let snapshot = ProcessEnvironment::new().snapshot();
            assert_eq!(snapshot["OCIDEPLOY_TEST_READ"], "yes");
        });
    }
}
