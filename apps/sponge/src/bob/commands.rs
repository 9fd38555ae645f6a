//! # CLI Command Implementations
//!
//! The actual work behind `bob create`, `bob go` and `bob start`.

use crate::bootstrap::{ControllerRegistry, SpongeApp, serve};
use sponge_core::{
    ApplicationSettings, RunMode, Settings, SpongeError, slugify,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// SKELETON
// =============================================================================

// The project template bundle, embedded so `bob` is a single binary.
const SKELETON_MAIN: &str = include_str!("skeleton/main.rs.in");
const SKELETON_CONTROLLERS: &str = include_str!("skeleton/controllers.rs.in");
const SKELETON_INDEX: &str = include_str!("skeleton/index.html.hbs");
const SKELETON_CSS: &str = include_str!("skeleton/style.css");

/// The settings a fresh project starts with.
#[must_use]
pub fn default_settings() -> Settings {
    let mut classes = BTreeMap::new();
    classes.insert("HelloWorldController".to_string(), "/".to_string());
    classes.insert("AjaxController".to_string(), "/ajax".to_string());

    let mut static_dirs = BTreeMap::new();
    static_dirs.insert("/media".to_string(), PathBuf::from("media"));

    Settings {
        run_as: RunMode::Wsgi,
        host: "0.0.0.0".to_string(),
        port: 4000,
        autoreload: true,
        application: ApplicationSettings {
            classes,
            template_dir: Some(PathBuf::from("templates")),
            image_dir: Some(PathBuf::from("media/img")),
            boot: None,
        },
        static_dirs,
        databases: BTreeMap::new(),
        extra: BTreeMap::new(),
    }
}

fn generated_manifest(package: &str) -> String {
    format!(
        "[package]\n\
         name = \"{package}\"\n\
         version = \"0.1.0\"\n\
         edition = \"2024\"\n\
         \n\
         [dependencies]\n\
         sponge = \"{version}\"\n\
         sponge-core = \"{version}\"\n\
         serde_json = \"1\"\n\
         tokio = {{ version = \"1\", features = [\"rt-multi-thread\", \"macros\"] }}\n\
         tracing = \"0.1\"\n\
         tracing-subscriber = \"0.3\"\n",
        version = env!("CARGO_PKG_VERSION"),
    )
}

// =============================================================================
// CREATE COMMAND
// =============================================================================

/// Scaffold `<parent>/<name>` as a complete runnable project.
///
/// Returns the project directory. An existing path of that name is an
/// error; `bob` never overwrites.
pub fn cmd_create(parent: &Path, name: &str) -> Result<PathBuf, SpongeError> {
    let package = slugify(name);
    if package.is_empty() {
        return Err(SpongeError::InvalidProjectName(name.to_string()));
    }

    let project = parent.join(name);
    if project.exists() {
        return Err(SpongeError::ProjectExists(project.display().to_string()));
    }

    let io = |e: std::io::Error| SpongeError::Io(e.to_string());

    std::fs::create_dir_all(project.join("src")).map_err(io)?;
    std::fs::create_dir_all(project.join("templates")).map_err(io)?;
    std::fs::create_dir_all(project.join("media/css")).map_err(io)?;
    std::fs::create_dir_all(project.join("media/img")).map_err(io)?;

    std::fs::write(project.join("settings.yml"), default_settings().to_yaml()?).map_err(io)?;
    std::fs::write(project.join("Cargo.toml"), generated_manifest(&package)).map_err(io)?;
    std::fs::write(project.join("src/main.rs"), SKELETON_MAIN).map_err(io)?;
    std::fs::write(project.join("src/controllers.rs"), SKELETON_CONTROLLERS).map_err(io)?;
    std::fs::write(project.join("templates/index.html.hbs"), SKELETON_INDEX).map_err(io)?;
    std::fs::write(project.join("media/css/style.css"), SKELETON_CSS).map_err(io)?;

    tracing::info!(project = %project.display(), package = %package, "project created");
    Ok(project)
}

// =============================================================================
// GO COMMAND
// =============================================================================

/// Run the project in `root`: load settings.yml, mount, print, serve.
pub async fn cmd_go(root: &Path) -> Result<(), SpongeError> {
    let text = std::fs::read_to_string(root.join("settings.yml"))
        .map_err(|e| SpongeError::Io(format!("cannot read settings.yml: {e}")))?;
    let settings = Settings::from_yaml(&text)?;

    let registry = ControllerRegistry::with_builtins();
    let root = root
        .canonicalize()
        .map_err(|e| SpongeError::Io(e.to_string()))?;
    let app = SpongeApp::build(settings, &registry, root)?;

    print_startup(&app);
    serve(app).await
}

fn print_startup(app: &SpongeApp) {
    let settings = &app.context().settings;

    println!("Sponge Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", settings.host);
    println!("  Port:       {}", settings.port);
    println!("  Run as:     {}", settings.run_as);
    println!("  Autoreload: {}", settings.autoreload);
    println!("  Root:       {}", app.context().root.display());
    println!();
    println!("Routes:");
    for route in app.mounted_routes() {
        println!("  {:<30} {}", route.name, route.path);
    }
    for url in settings.static_dirs.keys() {
        println!("  {:<30} {}  [static]", "-", url);
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();
}

// =============================================================================
// START COMMAND
// =============================================================================

/// `create` followed by `go`, inside the new project directory.
pub async fn cmd_start(parent: &Path, name: &str) -> Result<(), SpongeError> {
    let project = cmd_create(parent, name)?;
    println!("created {}", project.display());
    cmd_go(&project).await
}

// =============================================================================
// TESTS
// =============================================================================
