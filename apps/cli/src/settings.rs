use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use docbox_core::SiteOptions;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "docbox";
const ENV_PREFIX: &str = "DOCBOX";

/// Layered CLI settings: `docbox.toml`, then `DOCBOX_*` variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Render context, inline JSON or `@path`.
    pub context: Option<String>,
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let site = SiteOptions::default();
        Self {
            templates_dir: site.templates_dir,
            output_dir: site.output_dir,
            context: None,
            extensions: site.extensions,
        }
    }
}

impl Settings {
    /// An explicit `path` must exist; the default `docbox.*` file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extensions"),
            )
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn site_options(&self) -> SiteOptions {
        SiteOptions {
            templates_dir: self.templates_dir.clone(),
            output_dir: self.output_dir.clone(),
            extensions: self.extensions.clone(),
        }
    }
}
