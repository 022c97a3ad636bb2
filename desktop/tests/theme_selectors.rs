#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Ensures the classes the analyzer components render (chart marks, tooltip, session
table) stay present in the shared theme `ui/assets/theme/main.css`, so a CSS refactor
cannot silently unstyle the embedded desktop build.

If you rename a selector, update the component markup and REQUIRED_SELECTORS together.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Selectors / tokens the desktop UI relies on.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".app-shell",
    // Form
    ".analyzer-form",
    ".analyzer__error",
    // Cards & summary
    ".results-card",
    ".results-card__header",
    ".results-card__placeholder",
    ".results-highlight__value",
    // Chart
    ".chart__surface",
    ".chart__line",
    ".chart__point",
    ".chart__point--active",
    ".chart__tooltip",
    ".chart__legend-label",
    // Session details
    ".session-details__table",
    ".session-details__load-all",
    ".session-details__close",
    ".session-details__error",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 3_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars); \
         did the file get truncated or path change?"
    );
}

#[test]
fn point_states_are_paired() {
    let has_point = THEME_CSS.contains(".chart__point {");
    let has_active = THEME_CSS.contains(".chart__point--active {");
    assert!(
        has_point && has_active,
        "Chart point selectors missing (base: {has_point}, active: {has_active})"
    );
}
