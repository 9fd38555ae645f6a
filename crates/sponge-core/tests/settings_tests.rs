//! Schema tests for the settings validator.
//!
//! The contract: every mandatory option missing or malformed must come
//! back as the exact user-facing message, quoting the value as written.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use sponge_core::{MANDATORY_OPTIONS, Settings, SettingsValidator, SpongeError};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const VALID: &str = "\
run-as: standalone
host: 127.0.0.1
port: 8080
autoreload: false
application:
    classes:
        HelloWorldController: /
        AjaxController: /ajax
    template-dir: templates
    image-dir: media/img
static:
    /media: media
databases:
    main: sqlite://db/main.sqlite
extra:
    motto: absorbent and yellow
";

fn validate(yaml: &str) -> Result<(), SpongeError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    SettingsValidator::new().validate(&raw)
}

fn without_line(yaml: &str, prefix: &str) -> String {
    yaml.lines()
        .filter(|line| !line.starts_with(prefix))
        .map(|line| format!("{line}\n"))
        .collect()
}

// =============================================================================
// MANDATORY OPTIONS
// =============================================================================

#[test]
fn the_valid_document_passes() {
    validate(VALID).unwrap();
    Settings::from_yaml(VALID).unwrap();
}

#[test]
fn each_missing_mandatory_option_is_reported_by_name() {
    for option in MANDATORY_OPTIONS {
        let yaml = without_line(VALID, option);
        // Dropping "application:" orphans its block; drop the children too.
        let yaml = if option == "application" {
            yaml.lines()
                .filter(|line| !line.starts_with("    ") || line.starts_with("    /media"))
                .map(|line| format!("{line}\n"))
                .collect()
        } else {
            yaml
        };
        let err = validate(&yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("you must set the \"{option}\" option within settings.yml"),
        );
    }
}

#[test]
fn a_non_mapping_document_is_refused() {
    let err = validate("- just\n- a\n- list\n").unwrap_err();
    assert!(matches!(err, SpongeError::Settings(_)));
}

// =============================================================================
// PER-OPTION RULES
// =============================================================================

#[test]
fn run_as_must_be_a_known_mode() {
    let yaml = VALID.replace("run-as: standalone", "run-as: daemon");
    let err = validate(&yaml).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value in \"run-as\" option: \"daemon\". \
         Read the Sponge documentation for more information."
    );
}

#[test]
fn host_must_be_a_dotted_quad() {
    for bad in ["localhost", "10.0.0", "::1", "10.0.0.0.1"] {
        let yaml = VALID.replace("host: 127.0.0.1", &format!("host: \"{bad}\""));
        let err = validate(&yaml).unwrap_err();
        assert!(
            matches!(&err, SpongeError::InvalidValue { option, value }
                if option == "host" && value == bad),
            "expected host rejection for {bad}, got {err}"
        );
    }
}

#[test]
fn port_must_be_digits() {
    for bad in ["90.2", "-1", "http", "80 80"] {
        let yaml = VALID.replace("port: 8080", &format!("port: \"{bad}\""));
        let err = validate(&yaml).unwrap_err();
        assert!(
            matches!(&err, SpongeError::InvalidValue { option, .. } if option == "port"),
            "expected port rejection for {bad}, got {err}"
        );
    }
}

#[test]
fn port_must_fit_the_bind_address() {
    let yaml = VALID.replace("port: 8080", "port: 70000");
    let err = validate(&yaml).unwrap_err();
    assert!(matches!(err, SpongeError::InvalidValue { option, .. } if option == "port"));
}

#[test]
fn error_messages_quote_the_value_as_written() {
    let yaml = VALID.replace("port: 8080", "port: \"90.2\"");
    let err = validate(&yaml).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value in \"port\" option: \"90.2\". \
         Read the Sponge documentation for more information."
    );
}

#[test]
fn autoreload_must_be_a_real_bool() {
    // A quoted "true" is a string, and strings do not count.
    let yaml = VALID.replace("autoreload: false", "autoreload: \"true\"");
    let err = validate(&yaml).unwrap_err();
    assert!(matches!(err, SpongeError::InvalidValue { option, .. } if option == "autoreload"));
}

#[test]
fn class_names_must_look_like_identifiers() {
    let yaml = VALID.replace("AjaxController:", "Ajax-Controller:");
    let err = validate(&yaml).unwrap_err();
    assert!(
        matches!(err, SpongeError::InvalidValue { option, .. } if option == "application.classes")
    );
}

#[test]
fn mount_points_must_begin_with_a_slash() {
    let yaml = VALID.replace("AjaxController: /ajax", "AjaxController: ajax");
    let err = validate(&yaml).unwrap_err();
    assert!(
        matches!(err, SpongeError::InvalidValue { option, .. } if option == "application.classes")
    );
}

#[test]
fn static_mounts_must_begin_with_a_slash() {
    let yaml = VALID.replace("    /media: media", "    media: media");
    let err = validate(&yaml).unwrap_err();
    assert!(matches!(err, SpongeError::InvalidValue { option, .. } if option == "static"));
}

#[test]
fn static_mounts_may_not_take_the_root() {
    let yaml = VALID.replace("    /media: media", "    /: media");
    let err = validate(&yaml).unwrap_err();
    assert!(matches!(err, SpongeError::InvalidValue { option, .. } if option == "static"));
}

#[test]
fn boot_callable_must_be_an_identifier() {
    let yaml = format!("{VALID}\napplication-extra: ignored\n").replace(
        "    image-dir: media/img",
        "    image-dir: media/img\n    boot:\n        callable: not a name",
    );
    let err = validate(&yaml).unwrap_err();
    assert!(matches!(err, SpongeError::InvalidValue { option, .. } if option == "application.boot"));
}

// =============================================================================
// PASS-THROUGH SECTIONS
// =============================================================================

#[test]
fn databases_and_extra_survive_the_round_trip() {
    let settings = Settings::from_yaml(VALID).unwrap();
    assert_eq!(
        settings.databases.get("main"),
        Some(&"sqlite://db/main.sqlite".to_string())
    );
    assert_eq!(
        settings.extra.get("motto").and_then(|v| v.as_str()),
        Some("absorbent and yellow")
    );
}

#[test]
fn unknown_top_level_options_pass_untouched() {
    let yaml = format!("{VALID}session-timeout: 60\nencoding: utf-8\n");
    validate(&yaml).unwrap();
    Settings::from_yaml(&yaml).unwrap();
}
