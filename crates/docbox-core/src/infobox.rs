use std::{fmt, str::FromStr};

use crate::error::HelperError;

/// Marks the start of a list item inside an infobox body.
const ITEM_SEPARATOR: &str = "\n- ";

/// Style tag of an infobox callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoboxKind {
    Important,
    Hint,
    Warning,
    Info,
}

impl InfoboxKind {
    pub const ALL: [InfoboxKind; 4] = [
        InfoboxKind::Important,
        InfoboxKind::Hint,
        InfoboxKind::Warning,
        InfoboxKind::Info,
    ];

    /// Identifier used in template invocations.
    pub fn key(self) -> &'static str {
        match self {
            InfoboxKind::Important => "important",
            InfoboxKind::Hint => "hint",
            InfoboxKind::Warning => "warning",
            InfoboxKind::Info => "info",
        }
    }

    /// Header shown when the template does not supply one.
    pub fn label(self) -> &'static str {
        match self {
            InfoboxKind::Important => "Important",
            InfoboxKind::Hint => "Hint",
            InfoboxKind::Warning => "Warning",
            InfoboxKind::Info => "Info",
        }
    }

    pub fn supported_keys() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.key())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for InfoboxKind {
    type Err = HelperError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == value)
            .ok_or_else(|| HelperError::UnknownCategory(value.to_string()))
    }
}

impl fmt::Display for InfoboxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Render an infobox callout.
///
/// The body is a plain text list where every item starts a line with `- `.
/// Text before the first marker is dropped, and a body without any marker
/// yields an empty list. Header and items are inserted verbatim; the caller
/// is expected to treat the result as already escaped HTML.
pub fn render_infobox(
    category: &str,
    header: Option<&str>,
    body: &str,
) -> Result<String, HelperError> {
    let kind: InfoboxKind = category.parse()?;
    let header = header.unwrap_or_else(|| kind.label());
    let items = list_items(body);

    Ok(format!(
        "<div class=\"docbox infobox\"><h3>{header}</h3><ul>{items}</ul></div>\n\n"
    ))
}

fn list_items(body: &str) -> String {
    // the leading newline lets the first item match the separator as well
    let raw = format!("\n{}", body.trim());
    raw.split(ITEM_SEPARATOR)
        .skip(1)
        .map(|item| format!("<li>{item}</li>"))
        .collect::<Vec<_>>()
        .join("\n")
}
