//! # Sponge
//!
//! A small, settings-driven web framework over axum, plus the `bob`
//! scaffolding CLI.
//!
//! A Sponge application is a `settings.yml` naming controller classes and
//! the URL prefixes to mount them on. Controllers implement the
//! [`Controller`](controller::Controller) trait, declare routes as data,
//! and register constructors on a
//! [`ControllerRegistry`](bootstrap::ControllerRegistry) before boot; the
//! bootstrap does the rest.
//!
//! ```no_run
//! use sponge::bootstrap::{ControllerRegistry, SpongeApp, serve};
//! use sponge_core::Settings;
//!
//! # async fn demo() -> Result<(), sponge_core::SpongeError> {
//! let text = std::fs::read_to_string("settings.yml")
//!     .map_err(|e| sponge_core::SpongeError::Io(e.to_string()))?;
//! let settings = Settings::from_yaml(&text)?;
//! let registry = ControllerRegistry::with_builtins();
//! let root = std::env::current_dir()
//!     .map_err(|e| sponge_core::SpongeError::Io(e.to_string()))?;
//! let app = SpongeApp::build(settings, &registry, root)?;
//! serve(app).await
//! # }
//! ```
//!
//! The pure half of the framework (settings schema, routing arithmetic,
//! pagination, slugs, image geometry) lives in `sponge-core`.

pub mod bob;
pub mod bootstrap;
pub mod contrib;
pub mod controller;
pub mod view;

pub use bootstrap::{AppContext, ControllerRegistry, SpongeApp, serve};
pub use controller::{Controller, SpongeRequest, SpongeResponse};
pub use view::ViewEngine;
