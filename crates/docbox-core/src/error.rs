use std::path::PathBuf;

use thiserror::Error;

use crate::infobox::InfoboxKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    #[error(
        "unknown infobox `{0}`, currently only supporting {}",
        InfoboxKind::supported_keys()
    )]
    UnknownCategory(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("failed to walk template directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_lists_supported_keys() {
        let error = HelperError::UnknownCategory("error".to_string());
        assert_eq!(
            error.to_string(),
            "unknown infobox `error`, currently only supporting important,hint,warning,info"
        );
    }
}
