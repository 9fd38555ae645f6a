//! # Controller Registry
//!
//! The class-loader counterpart. The original design loaded controller
//! classes by name from the filesystem at boot; Rust links everything at
//! compile time, so instead the application registers a constructor per
//! controller name before starting, and `settings.yml` selects from those.
//!
//! Boot hooks follow the same pattern: named closures run once, before any
//! controller is mounted, selected by `application.boot.callable`.

use crate::bootstrap::AppContext;
use crate::contrib::{AjaxController, HelloWorldController, ImageHandler};
use crate::controller::Controller;
use sponge_core::SpongeError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds one controller from the application context.
pub type ControllerFactory =
    Box<dyn Fn(&AppContext) -> Result<Arc<dyn Controller>, SpongeError> + Send + Sync>;

/// Runs once at boot, before controllers are mounted.
pub type BootHook = Box<dyn Fn(&AppContext) -> Result<(), SpongeError> + Send + Sync>;

// =============================================================================
// REGISTRY
// =============================================================================

/// Maps controller class names to constructors, and boot names to hooks.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: BTreeMap<String, ControllerFactory>,
    boot_hooks: BTreeMap<String, BootHook>,
}

impl ControllerRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the stock controllers pre-registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("HelloWorldController", |_ctx| {
            Ok(Arc::new(HelloWorldController))
        });
        registry.register("AjaxController", |_ctx| Ok(Arc::new(AjaxController)));
        registry.register("ImageHandler", |ctx| {
            let image_dir = ctx.image_dir.clone().unwrap_or_else(|| ctx.root.clone());
            Ok(Arc::new(ImageHandler::new(image_dir, None)?))
        });
        registry
    }

    /// Register a controller constructor under a class name.
    ///
    /// Re-registering a name replaces the previous constructor; user
    /// projects override the stock controllers that way.
    pub fn register<F, C>(&mut self, name: &str, factory: F)
    where
        F: Fn(&AppContext) -> Result<Arc<C>, SpongeError> + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.factories.insert(
            name.to_string(),
            Box::new(move |ctx| Ok(factory(ctx)? as Arc<dyn Controller>)),
        );
    }

    /// Register a boot hook under a callable name.
    pub fn register_boot<F>(&mut self, name: &str, hook: F)
    where
        F: Fn(&AppContext) -> Result<(), SpongeError> + Send + Sync + 'static,
    {
        self.boot_hooks.insert(name.to_string(), Box::new(hook));
    }

    /// Whether a controller of this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// The registered controller names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Build the controller registered under `name`.
    pub fn build(&self, name: &str, ctx: &AppContext) -> Result<Arc<dyn Controller>, SpongeError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| SpongeError::ClassNotFound(name.to_string()))?;
        factory(ctx)
    }

    /// Run the boot hook registered under `name`.
    pub fn run_boot(&self, name: &str, ctx: &AppContext) -> Result<(), SpongeError> {
        let hook = self
            .boot_hooks
            .get(name)
            .ok_or_else(|| SpongeError::UnknownBootHook(name.to_string()))?;
        hook(ctx)
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.factories.keys().collect::<Vec<_>>())
            .field("boot_hooks", &self.boot_hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
