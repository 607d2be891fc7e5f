//! Layering guardrails for the workspace crates.
//!
//! `flix_core` holds static vocabulary and must not grow dependencies beyond its character tables, and `flix_syntax`
//! is a library: command-line, serialization and subscriber crates belong to the root `flix` package only.
//! These tests scan the member manifests' `[dependencies]` tables.

/// Dependency names listed in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_depends_only_on_character_tables() {
    let deps = dependencies(include_str!("../crates/flix_core/Cargo.toml"));
    assert_eq!(deps, vec!["unicode-xid".to_string()]);
}

#[test]
fn syntax_crate_has_no_tool_dependencies() {
    let deps = dependencies(include_str!("../crates/flix_syntax/Cargo.toml"));
    for forbidden in ["clap", "serde_json", "tracing-subscriber", "flix"] {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "`{forbidden}` must not appear in flix_syntax [dependencies]; it belongs to the root package"
        );
    }
    assert!(deps.iter().any(|d| d == "flix_core"));
}
