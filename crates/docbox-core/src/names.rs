use std::collections::HashMap;

use once_cell::sync::Lazy;

static DISPLAY_NAMES: &[(&str, &str)] = &[
    ("client-js", "JavaScript Client"),
    ("client-java", "Java/Android Client"),
    ("client-swift", "Swift/iOS Client"),
    ("common", "Shared"),
    ("server", "Server configuration"),
];

static INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DISPLAY_NAMES.iter().copied().collect());

/// Human readable name for a package identifier, or the identifier itself
/// when no mapping exists.
pub fn display_name(key: &str) -> &str {
    INDEX.get(key).copied().unwrap_or(key)
}

/// Identifier/display-name pairs in declaration order.
pub fn known_names() -> impl Iterator<Item = (&'static str, &'static str)> {
    DISPLAY_NAMES.iter().copied()
}
