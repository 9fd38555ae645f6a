//! # View Engine
//!
//! Handlebars-backed rendering for controllers.
//!
//! Templates are registered from the application's template directory with
//! the `.hbs` suffix stripped, so `templates/index.html.hbs` renders as
//! `index.html`. The `autoreload` setting maps to handlebars dev mode,
//! which re-reads templates on every render.
//!
//! Every render gets the request's base URL injected under the reserved
//! `base_url` context key; the `make_url` helper reads it so templates can
//! build absolute paths: `{{make_url "/media/css/style.css"}}`.

use handlebars::{
    Context, DirectorySourceOptions, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde_json::Value;
use sponge_core::SpongeError;
use std::path::Path;

/// The context key the engine injects; controllers must not set it.
pub const BASE_URL_KEY: &str = "base_url";

// =============================================================================
// URL JOINING
// =============================================================================

/// Join a site-relative URL onto a base URL.
///
/// The base's trailing slash and the URL's leading slash collapse into one
/// separator, mirroring the mount arithmetic in `sponge-core`.
#[must_use]
pub fn make_url(base: &str, url: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

// =============================================================================
// VIEW ENGINE
// =============================================================================

/// The application's template registry.
pub struct ViewEngine {
    registry: Handlebars<'static>,
}

impl ViewEngine {
    /// Register every `.hbs` template under `template_dir`.
    ///
    /// `dev_mode` is the `autoreload` setting: templates are re-read from
    /// disk on each render instead of being cached at startup.
    pub fn new(template_dir: &Path, dev_mode: bool) -> Result<Self, SpongeError> {
        let mut registry = Handlebars::new();
        registry.set_dev_mode(dev_mode);
        registry.register_helper("make_url", Box::new(make_url_helper));
        registry
            .register_templates_directory(template_dir, DirectorySourceOptions::default())
            .map_err(|e| SpongeError::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Render `filename` with `context`, injecting `base_url`.
    ///
    /// The context must be a JSON object; the `base_url` key is reserved
    /// and a controller that sets it gets an error rather than a silent
    /// overwrite.
    pub fn render_html(
        &self,
        filename: &str,
        context: Value,
        base_url: &str,
    ) -> Result<String, SpongeError> {
        if filename.is_empty() {
            return Err(SpongeError::Template(
                "cannot render an empty template name".to_string(),
            ));
        }

        let Value::Object(mut map) = context else {
            return Err(SpongeError::Template(format!(
                "the context for \"{filename}\" must be a JSON object"
            )));
        };
        if map.contains_key(BASE_URL_KEY) {
            return Err(SpongeError::ReservedContextKey(BASE_URL_KEY.to_string()));
        }
        map.insert(BASE_URL_KEY.to_string(), Value::String(base_url.to_string()));

        self.registry
            .render(filename, &Value::Object(map))
            .map_err(|e| SpongeError::Template(e.to_string()))
    }

    /// Whether a template of this name is registered.
    #[must_use]
    pub fn has_template(&self, filename: &str) -> bool {
        self.registry.has_template(filename)
    }

    /// Whether templates are re-read from disk on each render.
    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.registry.dev_mode()
    }
}

impl std::fmt::Debug for ViewEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEngine")
            .field("dev_mode", &self.dev_mode())
            .finish()
    }
}

// =============================================================================
// HANDLEBARS HELPERS
// =============================================================================

/// `{{make_url "/some/path"}}` — join a path onto the injected base URL.
fn make_url_helper(
    helper: &Helper,
    _registry: &Handlebars,
    context: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let url = helper
        .param(0)
        .and_then(|p| p.value().as_str())
        .unwrap_or("");
    let base = context
        .data()
        .get(BASE_URL_KEY)
        .and_then(|v| v.as_str())
        .unwrap_or("");
    out.write(&make_url(base, url))?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
