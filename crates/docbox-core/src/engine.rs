//! `minijinja` integration.
//!
//! Helpers are available to every template rendered through
//! [`TemplateRenderer`]:
//!
//! ```jinja
//! {% filter infobox("warning") %}
//! - first
//! - second
//! {% endfilter %}
//!
//! {{ replace("client-js") }} / {{ "client-js"|display_name }}
//! ```
//!
//! Plain string output in `.html` templates is escaped the way Handlebars
//! escapes it: `/` is left alone, so `Java/Android Client` stays readable in
//! the generated markup.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use minijinja::{
    escape_formatter, path_loader, AutoEscape, Environment, Error, ErrorKind, Output, State,
    Value,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{HelperError, RenderError},
    infobox::render_infobox,
    names::display_name,
};

/// Wraps a `minijinja` environment with the documentation helpers installed.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
    root: Option<PathBuf>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(auto_escape_for);
        env.set_formatter(html_formatter);
        register_helpers(&mut env);
        Self { env, root: None }
    }

    /// Renderer resolving template names relative to `dir`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut renderer = Self::new();
        renderer.env.set_loader(path_loader(dir.clone()));
        debug!(
            target: "docbox_core",
            templates_dir = %dir.display(),
            "template loader configured"
        );
        renderer.root = Some(dir);
        renderer
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Render a template known to the loader, e.g. `guide/intro.html`.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, RenderError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    /// Render an ad-hoc template. `name` drives auto-escaping and error
    /// messages only.
    pub fn render_str<S: Serialize>(
        &self,
        name: &str,
        source: &str,
        ctx: S,
    ) -> Result<String, RenderError> {
        Ok(self.env.render_named_str(name, source, ctx)?)
    }
}

/// Install `infobox`, `display_name` and `replace` into an environment.
pub fn register_helpers(env: &mut Environment<'_>) {
    env.add_filter("infobox", infobox);
    env.add_filter("display_name", replace);
    env.add_function("replace", replace);
}

fn auto_escape_for(name: &str) -> AutoEscape {
    let is_html = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
    if is_html {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), Error> {
    let html = matches!(state.auto_escape(), AutoEscape::Html);
    match value.as_str() {
        Some(text) if html && !value.is_safe() => {
            out.write_str(&escape_html(text)).map_err(|err| {
                Error::new(ErrorKind::WriteFailure, "failed to write output").with_source(err)
            })
        }
        _ => escape_formatter(out, state, value),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '`' => escaped.push_str("&#x60;"),
            '=' => escaped.push_str("&#x3D;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// A non-string header behaves as if the header had been left out.
#[allow(clippy::needless_pass_by_value)] // MiniJinja filter signature uses owned values.
fn infobox(body: String, category: Value, header: Option<Value>) -> Result<Value, Error> {
    let header = header.as_ref().and_then(Value::as_str);
    let rendered = match category.as_str() {
        Some(key) => render_infobox(key, header, &body),
        None => Err(HelperError::UnknownCategory(category.to_string())),
    };
    let html = rendered.map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
    })?;
    Ok(Value::from_safe_string(html))
}

#[allow(clippy::needless_pass_by_value)]
fn replace(name: Value) -> Value {
    match name.as_str() {
        Some(key) => Value::from(display_name(key)),
        None => name,
    }
}
