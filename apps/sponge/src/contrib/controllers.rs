//! # Stock Controllers
//!
//! The two demo controllers the scaffold ships with. `bob create` writes a
//! project whose `settings.yml` mounts both; they double as working
//! examples of the two controller styles (template rendering and JSON).

use crate::controller::{Controller, SpongeRequest, SpongeResponse};
use serde_json::json;
use sponge_core::{Paginator, RouteSpec, SpongeError};

// =============================================================================
// HELLO WORLD
// =============================================================================

/// Renders the scaffold's index template, mounted at `/` by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloWorldController;

/// What the index page says when no template directory is configured.
const BUILTIN_PAGE: &str = "<html><body><h1>It works!</h1>\
<p>Sponge is running. Add a template-dir to settings.yml to take over \
this page.</p></body></html>";

impl HelloWorldController {
    fn index(&self, request: &SpongeRequest) -> Result<SpongeResponse, SpongeError> {
        if request.app.views.is_none() {
            return Ok(SpongeResponse::html(BUILTIN_PAGE));
        }
        request.render("index.html", json!({ "name": "world" }))
    }
}

impl Controller for HelloWorldController {
    fn routes(&self) -> Option<Vec<RouteSpec>> {
        Some(vec![RouteSpec::new("/", "index")])
    }

    fn dispatch(
        &self,
        action: &str,
        request: &SpongeRequest,
    ) -> Result<SpongeResponse, SpongeError> {
        match action {
            "index" => self.index(request),
            other => Ok(SpongeResponse::not_found(format!(
                "no such action \"{other}\""
            ))),
        }
    }
}

// =============================================================================
// AJAX
// =============================================================================

/// JSON endpoints, mounted at `/ajax` by default.
///
/// `items` pages a demo list through the paginator, driven by the `page`
/// query parameter, so a fresh scaffold exercises pagination end to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct AjaxController;

/// Objects served by the `items` endpoint.
const DEMO_ITEMS: usize = 53;

/// Objects per page on the `items` endpoint.
const ITEMS_PER_PAGE: usize = 10;

impl AjaxController {
    fn index(&self) -> Result<SpongeResponse, SpongeError> {
        SpongeResponse::json(&json!({ "success": true }))
    }

    fn greet(&self, request: &SpongeRequest) -> Result<SpongeResponse, SpongeError> {
        let name = request.param("name").unwrap_or("stranger");
        SpongeResponse::json(&json!({ "greeting": format!("Hello, {name}!") }))
    }

    fn items(&self, request: &SpongeRequest) -> Result<SpongeResponse, SpongeError> {
        let objects: Vec<usize> = (1..=DEMO_ITEMS).collect();
        let paginator = Paginator::new(&objects, ITEMS_PER_PAGE);

        let requested = request.query_param("page").unwrap_or("1");
        let page = match paginator.validate_number(requested) {
            Ok(number) => paginator.page(number).map_err(|e| {
                SpongeError::Internal(format!("page {number} vanished: {e}"))
            })?,
            Err(invalid) => return Ok(SpongeResponse::not_found(invalid.to_string())),
        };

        SpongeResponse::json(&json!({
            "items": page.objects(),
            "page": page.number(),
            "num_pages": paginator.num_pages(),
            "has_next": page.has_next(),
            "has_previous": page.has_previous(),
            "start_index": page.start_index(),
            "end_index": page.end_index(),
        }))
    }
}

impl Controller for AjaxController {
    fn routes(&self) -> Option<Vec<RouteSpec>> {
        Some(vec![
            RouteSpec::new("/", "index"),
            RouteSpec::new("/greet/{name}", "greet"),
            RouteSpec::new("/items", "items"),
        ])
    }

    fn dispatch(
        &self,
        action: &str,
        request: &SpongeRequest,
    ) -> Result<SpongeResponse, SpongeError> {
        match action {
            "index" => self.index(),
            "greet" => self.greet(request),
            "items" => self.items(request),
            other => Ok(SpongeResponse::not_found(format!(
                "no such action \"{other}\""
            ))),
        }
    }
}
