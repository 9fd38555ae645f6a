//! # Settings Validator
//!
//! Schema checks over the raw YAML value, before deserialization.
//!
//! The schema is deliberately small and fixed: five mandatory options, a
//! handful of optional ones, everything else ignored. Checks run against
//! the raw value so the error can quote whatever the user actually wrote
//! (`"90.2"`, `"localhost"`) rather than a post-parse rendering of it.

use crate::types::SpongeError;
use regex::Regex;
use serde_yaml::Value;

/// Options that must be present at the top level of `settings.yml`.
pub const MANDATORY_OPTIONS: [&str; 5] = ["run-as", "host", "port", "autoreload", "application"];

/// Accepted values for the `run-as` option.
pub const RUN_MODES: [&str; 2] = ["standalone", "wsgi"];

const HOST_PATTERN: &str = r"^\d{1,3}[.]\d{1,3}[.]\d{1,3}[.]\d{1,3}$";
const DIGITS_PATTERN: &str = r"^\d+$";
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

// =============================================================================
// VALIDATOR
// =============================================================================

/// Validates a raw settings document against the fixed option schema.
pub struct SettingsValidator {
    host: Regex,
    digits: Regex,
    identifier: Regex,
}

impl SettingsValidator {
    /// Build a validator with the schema patterns compiled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: Regex::new(HOST_PATTERN).expect("hard-coded pattern compiles"),
            digits: Regex::new(DIGITS_PATTERN).expect("hard-coded pattern compiles"),
            identifier: Regex::new(IDENTIFIER_PATTERN).expect("hard-coded pattern compiles"),
        }
    }

    /// Check a raw settings value against the schema.
    ///
    /// Missing mandatory options are reported before per-option checks, in
    /// schema order. Unknown top-level options pass untouched.
    pub fn validate(&self, raw: &Value) -> Result<(), SpongeError> {
        if !raw.is_mapping() {
            return Err(SpongeError::Settings(
                "the settings document must be a YAML mapping".to_string(),
            ));
        }

        for option in MANDATORY_OPTIONS {
            if raw.get(option).is_none() {
                return Err(SpongeError::RequiredOption(option.to_string()));
            }
        }

        if let Some(value) = raw.get("run-as") {
            self.check_run_as(value)?;
        }
        if let Some(value) = raw.get("host") {
            self.check_host(value)?;
        }
        if let Some(value) = raw.get("port") {
            self.check_port(value)?;
        }
        if let Some(value) = raw.get("autoreload") {
            self.check_autoreload(value)?;
        }
        if let Some(value) = raw.get("application") {
            self.check_application(value)?;
        }
        if let Some(value) = raw.get("static") {
            self.check_static(value)?;
        }
        if let Some(value) = raw.get("databases") {
            self.check_databases(value)?;
        }
        if let Some(value) = raw.get("extra") {
            self.check_extra(value)?;
        }

        Ok(())
    }

    fn check_run_as(&self, value: &Value) -> Result<(), SpongeError> {
        let text = display_value(value);
        if RUN_MODES.contains(&text.as_str()) {
            Ok(())
        } else {
            Err(invalid("run-as", value))
        }
    }

    fn check_host(&self, value: &Value) -> Result<(), SpongeError> {
        if self.host.is_match(&display_value(value)) {
            Ok(())
        } else {
            Err(invalid("host", value))
        }
    }

    fn check_port(&self, value: &Value) -> Result<(), SpongeError> {
        let text = display_value(value);
        if !self.digits.is_match(&text) {
            return Err(invalid("port", value));
        }
        // The pattern admits any digit run; the bind address does not.
        match text.parse::<u64>() {
            Ok(port) if port <= u64::from(u16::MAX) => Ok(()),
            _ => Err(invalid("port", value)),
        }
    }

    fn check_autoreload(&self, value: &Value) -> Result<(), SpongeError> {
        // Strictly a YAML bool; "true"-the-string is a settings mistake.
        if value.is_bool() {
            Ok(())
        } else {
            Err(invalid("autoreload", value))
        }
    }

    fn check_application(&self, value: &Value) -> Result<(), SpongeError> {
        if !value.is_mapping() {
            return Err(invalid("application", value));
        }

        if let Some(classes) = value.get("classes") {
            let Some(map) = classes.as_mapping() else {
                return Err(invalid("application.classes", classes));
            };
            for (name, mount) in map {
                let Some(class_name) = name.as_str() else {
                    return Err(invalid("application.classes", name));
                };
                if !self.identifier.is_match(class_name) {
                    return Err(invalid_text("application.classes", class_name));
                }
                let Some(mount_point) = mount.as_str() else {
                    return Err(invalid("application.classes", mount));
                };
                if !mount_point.starts_with('/') {
                    return Err(invalid_text("application.classes", mount_point));
                }
            }
        }

        for option in ["template-dir", "image-dir"] {
            if let Some(dir) = value.get(option) {
                match dir.as_str() {
                    Some(text) if !text.is_empty() => {}
                    _ => return Err(invalid(&format!("application.{option}"), dir)),
                }
            }
        }

        if let Some(boot) = value.get("boot") {
            let Some(callable) = boot.get("callable") else {
                return Err(invalid("application.boot", boot));
            };
            match callable.as_str() {
                Some(name) if self.identifier.is_match(name) => {}
                _ => return Err(invalid("application.boot", callable)),
            }
        }

        Ok(())
    }

    fn check_static(&self, value: &Value) -> Result<(), SpongeError> {
        let Some(map) = value.as_mapping() else {
            return Err(invalid("static", value));
        };
        for (url, dir) in map {
            let Some(url_text) = url.as_str() else {
                return Err(invalid("static", url));
            };
            // The root belongs to controllers, not to a static mount.
            if !url_text.starts_with('/') || url_text == "/" {
                return Err(invalid_text("static", url_text));
            }
            match dir.as_str() {
                Some(text) if !text.is_empty() => {}
                _ => return Err(invalid("static", dir)),
            }
        }
        Ok(())
    }

    fn check_databases(&self, value: &Value) -> Result<(), SpongeError> {
        let Some(map) = value.as_mapping() else {
            return Err(invalid("databases", value));
        };
        for (_, connection) in map {
            if connection.as_str().is_none() {
                return Err(invalid("databases", connection));
            }
        }
        Ok(())
    }

    fn check_extra(&self, value: &Value) -> Result<(), SpongeError> {
        if value.is_mapping() {
            Ok(())
        } else {
            Err(invalid("extra", value))
        }
    }
}

impl Default for SettingsValidator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn invalid(option: &str, value: &Value) -> SpongeError {
    SpongeError::InvalidValue {
        option: option.to_string(),
        value: display_value(value),
    }
}

fn invalid_text(option: &str, value: &str) -> SpongeError {
    SpongeError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    }
}

/// Render a YAML value the way the user wrote it, for error messages.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().replace('\n', ", "))
            .unwrap_or_else(|_| "?".to_string()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
