//! # Bootstrap
//!
//! Turns a validated [`Settings`] into a running application: builds the
//! context, runs the boot hook, constructs every controller named in
//! `application.classes` and mounts it onto its URL prefix, wires the
//! static directories, and finally serves.
//!
//! Controllers that declare routes get one dispatcher entry per route.
//! Controllers that declare none are mounted plain: the first path segment
//! under the mount picks the action (`index` by default) and the remainder
//! is handed through as the `args` parameter.

mod registry;

pub use registry::{BootHook, ControllerFactory, ControllerRegistry};

use crate::controller::{Controller, SpongeRequest, error_to_response};
use crate::view::ViewEngine;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path as PathParams, Query, Request};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::any;
use sponge_core::{MountedRoute, Settings, SpongeError, join_mount};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

// =============================================================================
// APPLICATION CONTEXT
// =============================================================================

/// Everything a controller can reach at request time.
#[derive(Debug)]
pub struct AppContext {
    /// Application root; all relative settings paths resolve against it.
    pub root: PathBuf,
    /// The validated settings the application booted with.
    pub settings: Settings,
    /// The view engine, when a template directory is configured.
    pub views: Option<ViewEngine>,
    /// Resolved template directory.
    pub template_dir: Option<PathBuf>,
    /// Resolved image directory.
    pub image_dir: Option<PathBuf>,
}

impl AppContext {
    fn new(settings: Settings, root: PathBuf) -> Result<Self, SpongeError> {
        if !root.is_absolute() {
            return Err(SpongeError::RelativeRoot(root.display().to_string()));
        }

        let template_dir = settings
            .application
            .template_dir
            .as_ref()
            .map(|dir| resolve(&root, dir));
        let image_dir = settings
            .application
            .image_dir
            .as_ref()
            .map(|dir| resolve(&root, dir));

        let views = match &template_dir {
            Some(dir) => Some(ViewEngine::new(dir, settings.autoreload)?),
            None => None,
        };

        Ok(Self {
            root,
            settings,
            views,
            template_dir,
            image_dir,
        })
    }

    /// A minimal context for unit tests: no views, no directories.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use sponge_core::{ApplicationSettings, RunMode};

        Self {
            root: PathBuf::from("/"),
            settings: Settings {
                run_as: RunMode::Standalone,
                host: "127.0.0.1".to_string(),
                port: 4000,
                autoreload: false,
                application: ApplicationSettings {
                    classes: BTreeMap::new(),
                    template_dir: None,
                    image_dir: None,
                    boot: None,
                },
                static_dirs: BTreeMap::new(),
                databases: BTreeMap::new(),
                extra: BTreeMap::new(),
            },
            views: None,
            template_dir: None,
            image_dir: None,
        }
    }
}

/// Join a settings path onto the root unless it is already absolute.
fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

/// Normalize a route path so parameter names do not matter: the router
/// refuses `/greet/{name}` next to `/greet/{id}` just as it refuses an
/// exact duplicate.
fn route_key(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Record a path as taken, refusing overlaps before they reach the router.
///
/// Overlapping mounts pass schema validation (the validator sees options
/// one at a time), so the collision is caught here and reported as a
/// settings mistake instead of surfacing as a router panic.
fn claim(
    claimed: &mut BTreeMap<String, (String, String)>,
    path: &str,
    owner: &str,
) -> Result<(), SpongeError> {
    let key = route_key(path);
    if let Some((taken, holder)) = claimed.get(&key) {
        return Err(SpongeError::Settings(format!(
            "the path \"{path}\" overlaps \"{taken}\" ({owner} and {holder} \
             cannot share a mount point)"
        )));
    }
    claimed.insert(key, (path.to_string(), owner.to_string()));
    Ok(())
}

// =============================================================================
// THE APPLICATION
// =============================================================================

/// A fully mounted Sponge application, ready to serve or embed.
pub struct SpongeApp {
    router: Router,
    context: Arc<AppContext>,
    mounted: Vec<MountedRoute>,
}

impl SpongeApp {
    /// Build the application: context, boot hook, controllers, statics.
    pub fn build(
        settings: Settings,
        registry: &ControllerRegistry,
        root: PathBuf,
    ) -> Result<Self, SpongeError> {
        let context = Arc::new(AppContext::new(settings, root)?);

        if let Some(boot) = &context.settings.application.boot {
            tracing::info!(callable = %boot.callable, "running boot hook");
            registry.run_boot(&boot.callable, &context)?;
        }

        let mut router = Router::new();
        let mut mounted = Vec::new();
        let mut claimed = BTreeMap::new();

        for (class_name, mount) in &context.settings.application.classes {
            let controller = registry.build(class_name, &context)?;
            match controller.routes() {
                Some(routes) => {
                    for route in routes {
                        let path = join_mount(mount, &route.pattern);
                        let name = route.qualified_name(class_name);
                        claim(&mut claimed, &path, class_name)?;
                        tracing::info!(route = %name, path = %path, "mounting route");
                        router = router.route(
                            &path,
                            any(routed_handler(
                                Arc::clone(&controller),
                                Arc::clone(&context),
                                route.action.clone(),
                            )),
                        );
                        mounted.push(MountedRoute {
                            name,
                            path,
                            controller: class_name.clone(),
                            action: route.action,
                        });
                    }
                }
                None => {
                    // The original framework accepted route-less controllers
                    // and fell back to path-segment dispatch.
                    tracing::warn!(
                        controller = %class_name,
                        mount = %mount,
                        "controller declares no routes, mounting plain"
                    );
                    let base = if mount == "/" { "/" } else { mount.trim_end_matches('/') };
                    claim(&mut claimed, base, class_name)?;
                    router = router.route(
                        base,
                        any(plain_handler(
                            Arc::clone(&controller),
                            Arc::clone(&context),
                        )),
                    );
                    let tree = join_mount(mount, "/{*args}");
                    claim(&mut claimed, &tree, class_name)?;
                    router = router.route(
                        &tree,
                        any(plain_handler(
                            Arc::clone(&controller),
                            Arc::clone(&context),
                        )),
                    );
                    mounted.push(MountedRoute {
                        name: format!("{class_name}.*"),
                        path: tree,
                        controller: class_name.clone(),
                        action: "*".to_string(),
                    });
                }
            }
        }

        for (url, dir) in &context.settings.static_dirs {
            let target = resolve(&context.root, dir);
            claim(&mut claimed, url, "static")?;
            tracing::info!(url = %url, dir = %target.display(), "mounting static directory");
            router = router.nest_service(url, ServeDir::new(target));
        }

        router = router.layer(TraceLayer::new_for_http());

        Ok(Self {
            router,
            context,
            mounted,
        })
    }

    /// The axum router, for embedding into an outer server (`run-as: wsgi`).
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The shared application context.
    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Every route the bootstrap mounted, in mount order.
    #[must_use]
    pub fn mounted_routes(&self) -> &[MountedRoute] {
        &self.mounted
    }
}

impl std::fmt::Debug for SpongeApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpongeApp")
            .field("mounted", &self.mounted)
            .finish()
    }
}

// =============================================================================
// DISPATCH GLUE
// =============================================================================

/// An axum handler that dispatches a declared route to its action.
fn routed_handler(
    controller: Arc<dyn Controller>,
    context: Arc<AppContext>,
    action: String,
) -> impl Fn(
    Option<PathParams<BTreeMap<String, String>>>,
    Query<BTreeMap<String, String>>,
    Method,
    Uri,
    HeaderMap,
    Bytes,
) -> std::pin::Pin<Box<dyn Future<Output = axum::response::Response> + Send>>
+ Clone
+ Send
+ Sync
+ 'static {
    move |params, Query(query), method, uri, headers, body| {
        let controller = Arc::clone(&controller);
        let context = Arc::clone(&context);
        let action = action.clone();
        Box::pin(async move {
            let params = params.map(|PathParams(map)| map).unwrap_or_default();
            let request = assemble_request(context, method, &uri, &headers, params, query, body);
            run_dispatch(&*controller, &action, &request)
        })
    }
}

/// An axum handler for plain-mounted controllers: the first segment of the
/// wildcard picks the action, the rest rides along as `args`.
fn plain_handler(
    controller: Arc<dyn Controller>,
    context: Arc<AppContext>,
) -> impl Fn(
    Option<PathParams<BTreeMap<String, String>>>,
    Query<BTreeMap<String, String>>,
    Method,
    Uri,
    HeaderMap,
    Bytes,
) -> std::pin::Pin<Box<dyn Future<Output = axum::response::Response> + Send>>
+ Clone
+ Send
+ Sync
+ 'static {
    move |params, Query(query), method, uri, headers, body| {
        let controller = Arc::clone(&controller);
        let context = Arc::clone(&context);
        Box::pin(async move {
            let tail = params
                .map(|PathParams(map)| map.get("args").cloned().unwrap_or_default())
                .unwrap_or_default();
            let (action, rest) = match tail.split_once('/') {
                Some((head, rest)) => (head.to_string(), rest.to_string()),
                None if tail.is_empty() => ("index".to_string(), String::new()),
                None => (tail, String::new()),
            };
            let mut params = BTreeMap::new();
            params.insert("args".to_string(), rest);
            let request = assemble_request(context, method, &uri, &headers, params, query, body);
            run_dispatch(&*controller, &action, &request)
        })
    }
}

fn assemble_request(
    context: Arc<AppContext>,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    params: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    body: Bytes,
) -> SpongeRequest {
    let authority = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| context.settings.bind_address());
    SpongeRequest {
        app: context,
        method,
        path: uri.path().to_string(),
        base_url: format!("http://{authority}"),
        params,
        query,
        body,
    }
}

fn run_dispatch(
    controller: &dyn Controller,
    action: &str,
    request: &SpongeRequest,
) -> axum::response::Response {
    match controller.dispatch(action, request) {
        Ok(response) => response.into_response(),
        Err(error) => {
            let response = error_to_response(&error);
            if response.status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(action = %action, path = %request.path, error = %error, "dispatch failed");
            }
            response.into_response()
        }
    }
}

// =============================================================================
// SERVING
// =============================================================================

/// Bind and serve until Ctrl+C.
///
/// Trailing slashes are trimmed at the edge, outside the router, so
/// `/ajax/` and `/ajax` dispatch identically.
pub async fn serve(app: SpongeApp) -> Result<(), SpongeError> {
    let addr = app.context.settings.bind_address();
    let run_as = app.context.settings.run_as;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SpongeError::Io(format!("could not bind {addr}: {e}")))?;

    tracing::info!(mode = %run_as, "Sponge listening on http://{addr}");

    let service = NormalizePathLayer::trim_trailing_slash().layer(app.router);
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(service),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| SpongeError::Io(format!("server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "could not install the Ctrl+C handler");
    }
}

// =============================================================================
// TESTS
// =============================================================================
