//! # sponge-core
//!
//! The pure half of the Sponge web framework - THE LOGIC.
//!
//! Sponge is a small, settings-driven framework: a YAML file names
//! controller classes and the URL prefixes to mount them on, a CLI
//! (`bob`) scaffolds and runs projects, and a handful of helpers cover
//! the usual early-web chores (pagination, slugs, image fitting).
//!
//! This crate holds everything that needs no socket and no event loop:
//!
//! - `settings` — the `settings.yml` schema, validator and typed form
//! - `routing` — route descriptors and mount-path arithmetic
//! - `pagination` — the ported paginator
//! - `slug` — URL/package slugs
//! - `imagefit` — integer crop/fit geometry for the image handler
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no HTTP types: the dispatcher lives in the
//!   `sponge` app crate and consumes these types
//! - Integer arithmetic only
//! - Deterministic iteration; `BTreeMap` wherever order can leak out

// =============================================================================
// MODULES
// =============================================================================

pub mod imagefit;
pub mod pagination;
pub mod routing;
pub mod settings;
pub mod slug;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::SpongeError;

// =============================================================================
// RE-EXPORTS: Settings
// =============================================================================

pub use settings::{
    ApplicationSettings, BootSettings, MANDATORY_OPTIONS, RUN_MODES, RunMode, Settings,
    SettingsValidator,
};

// =============================================================================
// RE-EXPORTS: Routing & Helpers
// =============================================================================

pub use imagefit::{CropBox, center_offsets, fit_box};
pub use pagination::{InvalidPage, Page, Paginator};
pub use routing::{MountedRoute, RouteSpec, join_mount};
pub use slug::slugify;
