//! Template helpers for the documentation generator.
//!
//! Two helpers are exposed to templates: `infobox`, which turns a `- ` list
//! into a styled callout box, and `replace` / `display_name`, which map
//! internal package identifiers to human readable names.

pub mod engine;
pub mod error;
pub mod infobox;
pub mod names;
pub mod site;

pub use engine::{register_helpers, TemplateRenderer};
pub use error::{HelperError, RenderError};
pub use infobox::{render_infobox, InfoboxKind};
pub use names::{display_name, known_names};
pub use site::{build_site, BuildReport, SiteOptions};
