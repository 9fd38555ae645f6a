//! # Settings
//!
//! The typed form of `settings.yml` and the machinery to get there.
//!
//! Loading is a two-stage affair: the raw YAML value is checked by the
//! [`SettingsValidator`] first, so error messages can quote the offending
//! text exactly as the user wrote it, and only then deserialized into
//! [`Settings`]. Unknown top-level options are ignored in both stages.
//!
//! The same struct serializes back to YAML; `bob create` writes the
//! generated `settings.yml` that way.

mod validator;

pub use validator::{MANDATORY_OPTIONS, RUN_MODES, SettingsValidator};

use crate::types::SpongeError;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// RUN MODE
// =============================================================================

/// How the application is meant to be run.
///
/// `Standalone` owns its listener; `Wsgi` is the embedded mode, where the
/// router is handed to an outer server. Both modes serve identically under
/// `bob go`; the distinction is advisory and logged at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Sponge binds and serves by itself.
    Standalone,
    /// The router is embedded into an outer server.
    Wsgi,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Wsgi => write!(f, "wsgi"),
        }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// The validated contents of `settings.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Execution mode, `standalone` or `wsgi`.
    #[serde(rename = "run-as")]
    pub run_as: RunMode,

    /// Dotted-quad address to bind.
    pub host: String,

    /// TCP port. Accepts a YAML integer or a digits-only string.
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Template auto-reload; drives the view engine's dev mode.
    pub autoreload: bool,

    /// The application block: controllers, directories, boot hook.
    pub application: ApplicationSettings,

    /// Static mounts, URL path prefix to directory.
    #[serde(
        rename = "static",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub static_dirs: BTreeMap<String, PathBuf>,

    /// Named connection strings, passed through to the application.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub databases: BTreeMap<String, String>,

    /// Free-form options, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The `application` section of the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Controller class name to mount point.
    #[serde(default)]
    pub classes: BTreeMap<String, String>,

    /// Template directory, joined onto the application root when relative.
    #[serde(
        rename = "template-dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub template_dir: Option<PathBuf>,

    /// Image directory for the image handler, same join rule.
    #[serde(
        rename = "image-dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_dir: Option<PathBuf>,

    /// Boot hook to run before controllers are mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<BootSettings>,
}

/// The `application.boot` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootSettings {
    /// Name of a boot hook registered on the controller registry.
    pub callable: String,
}

impl Settings {
    /// Parse and validate a settings document.
    pub fn from_yaml(text: &str) -> Result<Self, SpongeError> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| SpongeError::Settings(e.to_string()))?;
        Self::from_value(raw)
    }

    /// Validate an already-parsed YAML value and deserialize it.
    pub fn from_value(raw: serde_yaml::Value) -> Result<Self, SpongeError> {
        SettingsValidator::new().validate(&raw)?;
        serde_yaml::from_value(raw).map_err(|e| SpongeError::Settings(e.to_string()))
    }

    /// Serialize back to YAML, the form `bob create` writes out.
    pub fn to_yaml(&self) -> Result<String, SpongeError> {
        serde_yaml::to_string(self).map_err(|e| SpongeError::Settings(e.to_string()))
    }

    /// The `host:port` pair to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// PORT DESERIALIZATION
// =============================================================================

// Settings files in the wild write `port: 4000` and `port: "4000"`
// interchangeably; both must land in a u16.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    struct PortVisitor;

    impl de::Visitor<'_> for PortVisitor {
        type Value = u16;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a port number between 0 and 65535")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u16, E> {
            u16::try_from(value)
                .map_err(|_| E::custom(format!("port {value} is out of range")))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u16, E> {
            u16::try_from(value)
                .map_err(|_| E::custom(format!("port {value} is out of range")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u16, E> {
            value
                .parse::<u16>()
                .map_err(|_| E::custom(format!("invalid port \"{value}\"")))
        }
    }

    deserializer.deserialize_any(PortVisitor)
}

// =============================================================================
// TESTS
// =============================================================================
