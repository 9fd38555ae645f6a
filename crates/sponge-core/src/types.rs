//! # Core Type Definitions
//!
//! This module contains the error type shared across the Sponge workspace.
//!
//! Every variant carries a message meant for the person running `bob`, not
//! for a debugger: settings mistakes name the offending option, scaffolding
//! mistakes name the path, and class-loading mistakes point back at
//! `settings.yml`.

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur anywhere in Sponge.
///
/// - No silent failures
/// - Use `Result<T, SpongeError>` for fallible operations
/// - The framework never panics; all errors must be recoverable
#[derive(Debug, Error)]
pub enum SpongeError {
    /// A mandatory settings option is missing.
    #[error("you must set the \"{0}\" option within settings.yml")]
    RequiredOption(String),

    /// A settings option is present but its value fails the schema.
    #[error(
        "invalid value in \"{option}\" option: \"{value}\". \
         Read the Sponge documentation for more information."
    )]
    InvalidValue {
        /// The option that failed validation.
        option: String,
        /// The offending value, quoted as written.
        value: String,
    },

    /// The settings document is malformed beyond a single option.
    #[error("settings error: {0}")]
    Settings(String),

    /// A controller class named in settings.yml is not registered.
    #[error(
        "Sponge could not find the class \"{0}\", verify that your \
         settings.yml matches the registered controllers"
    )]
    ClassNotFound(String),

    /// A boot callable named in settings.yml is not registered.
    #[error(
        "Sponge could not find the boot callable \"{0}\", register it \
         before starting the application"
    )]
    UnknownBootHook(String),

    /// `bob create` was pointed at a path that already exists.
    #[error("the path \"{0}\" already exists, choose another name for your project")]
    ProjectExists(String),

    /// The project name produces an empty package name.
    #[error("invalid project name \"{0}\", try something like \"bob create foobar\"")]
    InvalidProjectName(String),

    /// The application root handed to bootstrap was not absolute.
    #[error("the application root must be an absolute path, got \"{0}\"")]
    RelativeRoot(String),

    /// The image cache directory does not exist.
    #[error("the cache path \"{0}\" does not exist, create it before pointing the image handler at it")]
    InvalidCachePath(String),

    /// A render was attempted with no template directory configured.
    #[error("no template directory is set, add \"template-dir\" to the application section of settings.yml")]
    TemplateDirUnset,

    /// A controller put a reserved key into a template context.
    #[error("the context key \"{0}\" is reserved by Sponge, rename it in your controller")]
    ReservedContextKey(String),

    /// The template engine failed (missing template, render error).
    #[error("template error: {0}")]
    Template(String),

    /// An image could not be loaded, processed or encoded.
    #[error("image error: {0}")]
    Image(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A framework invariant broke at request time.
    #[error("internal error: {0}")]
    Internal(String),
}

// =============================================================================
// TESTS
// =============================================================================
