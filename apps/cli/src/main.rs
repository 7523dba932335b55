use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use docbox_core::{
    build_site, display_name, known_names, render_infobox, InfoboxKind, TemplateRenderer,
};
use output::{Entry, OutputFormat, Renderer};
use serde_json::Value;
use settings::Settings;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod output;
mod settings;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "docbox",
    version,
    about = "Render documentation templates with the infobox and display-name helpers."
)]
struct Cli {
    /// Configuration file (defaults to an optional `docbox.toml` in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Renderer used for listings and build reports.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Disable ANSI colors in log output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Render a single template file.
    Render {
        template: PathBuf,
        /// Render context as JSON (`{"key": "value"}`) or @path to a JSON file.
        #[arg(short, long)]
        context: Option<String>,
        /// Write the result to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render every page of a template directory.
    Build {
        #[arg(long)]
        templates: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        context: Option<String>,
        /// Page extensions to render (may be repeated).
        #[arg(long = "extension")]
        extensions: Vec<String>,
    },
    /// Render one infobox; the body is read from stdin unless --body is given.
    Infobox {
        category: String,
        #[arg(long)]
        header: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Print the display name of a package identifier.
    Name { identifier: String },
    /// List infobox categories and their default headers.
    Categories,
    /// List the package identifiers with a display name.
    Names,
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let renderer = Renderer::new(cli.format);
    let mut stdout = io::stdout().lock();
    match cli.command.clone() {
        Command::Render {
            template,
            context,
            output,
        } => {
            let settings = load_settings(&cli)?;
            handle_render(
                &template,
                context.or(settings.context),
                output.as_deref(),
                &mut stdout,
            )
        }
        Command::Build {
            templates,
            output,
            context,
            extensions,
        } => {
            let settings = load_settings(&cli)?;
            let mut options = settings.site_options();
            if let Some(templates) = templates {
                options.templates_dir = templates;
            }
            if let Some(output) = output {
                options.output_dir = output;
            }
            if !extensions.is_empty() {
                options.extensions = extensions;
            }
            let ctx = parse_context(context.or(settings.context))?;
            let report = build_site(&options, &ctx).with_context(|| {
                format!("failed to build {}", options.templates_dir.display())
            })?;
            if !cli.quiet {
                renderer.build_report(&mut stdout, &report)?;
            }
            Ok(())
        }
        Command::Infobox {
            category,
            header,
            body,
        } => handle_infobox(
            &category,
            header.as_deref(),
            body,
            io::stdin().lock(),
            &mut stdout,
        ),
        Command::Name { identifier } => handle_name(&identifier, &mut stdout),
        Command::Categories => {
            let entries: Vec<Entry<'_>> = InfoboxKind::ALL
                .iter()
                .map(|kind| Entry {
                    key: kind.key(),
                    label: kind.label(),
                })
                .collect();
            renderer.entries(&mut stdout, &entries)
        }
        Command::Names => {
            let entries: Vec<Entry<'_>> = known_names()
                .map(|(key, label)| Entry { key, label })
                .collect();
            renderer.entries(&mut stdout, &entries)
        }
        Command::Completions { shell } => {
            write_completions(shell, &mut stdout);
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(target: "docbox_cli", ?settings, "configuration loaded");
    Ok(settings)
}

fn handle_infobox(
    category: &str,
    header: Option<&str>,
    body: Option<String>,
    mut input: impl Read,
    out: &mut impl Write,
) -> Result<()> {
    let body = match body {
        Some(body) => body,
        None => {
            let mut body = String::new();
            input
                .read_to_string(&mut body)
                .context("failed to read infobox body from stdin")?;
            body
        }
    };
    let html = render_infobox(category, header, &body)?;
    out.write_all(html.as_bytes())?;
    Ok(())
}

fn handle_name(identifier: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", display_name(identifier))?;
    Ok(())
}

fn write_completions(shell: Shell, out: &mut impl Write) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "docbox", out);
}

fn handle_render(
    template: &Path,
    context: Option<String>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let name = template
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid template path: {}", template.display()))?;
    let root = match template.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let ctx = parse_context(context)?;
    let rendered = TemplateRenderer::from_dir(root)
        .render(name, &ctx)
        .with_context(|| format!("failed to render {}", template.display()))?;

    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                target: "docbox_cli",
                template = %template.display(),
                output = %path.display(),
                "template rendered"
            );
        }
        None => out.write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let default = if cli.quiet {
        "warn"
    } else {
        "info,docbox_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn parse_context(context: Option<String>) -> Result<Value> {
    match context {
        Some(raw) if raw.starts_with('@') => {
            let path = raw.trim_start_matches('@');
            let contents =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&contents).with_context(|| format!("invalid JSON context in {path}"))
        }
        Some(raw) => serde_json::from_str(&raw).context("invalid JSON context"),
        None => Ok(Value::Object(serde_json::Map::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn context_defaults_to_empty_object() {
        let value = parse_context(None).expect("empty context");
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn context_accepts_inline_json_and_files() {
        let inline = parse_context(Some("{\"title\": \"Guide\"}".to_string())).expect("inline json");
        assert_eq!(inline["title"], "Guide");

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("ctx.json");
        fs::write(&path, "{\"packages\": [\"server\"]}").expect("write context");
        let from_file =
            parse_context(Some(format!("@{}", path.display()))).expect("context file");
        assert_eq!(from_file["packages"][0], "server");
    }

    #[test]
    fn invalid_context_is_rejected() {
        assert!(parse_context(Some("not json".to_string())).is_err());
    }

    #[test]
    fn render_writes_output_file() {
        let dir = tempdir().expect("tempdir");
        let template = dir.path().join("page.html");
        fs::write(
            &template,
            "<h1>{{ replace(package) }}</h1>\n{% filter infobox(\"info\") %}- ready{% endfilter %}",
        )
        .expect("write template");
        let output = dir.path().join("out.html");
        let expected =
            "<h1>Shared</h1>\n<div class=\"docbox infobox\"><h3>Info</h3><ul><li>ready</li></ul></div>\n\n";

        let mut stdout = Vec::new();
        handle_render(
            &template,
            Some("{\"package\": \"common\"}".to_string()),
            Some(&output),
            &mut stdout,
        )
        .expect("render succeeds");
        assert!(stdout.is_empty());
        let html = fs::read_to_string(&output).expect("output written");
        assert_eq!(html, expected);

        handle_render(
            &template,
            Some("{\"package\": \"common\"}".to_string()),
            None,
            &mut stdout,
        )
        .expect("render succeeds");
        assert_eq!(String::from_utf8(stdout).expect("utf-8 output"), expected);
    }

    #[test]
    fn infobox_renders_body_argument() {
        let mut out = Vec::new();
        handle_infobox(
            "warning",
            None,
            Some("- a\n- b".to_string()),
            io::empty(),
            &mut out,
        )
        .expect("infobox renders");
        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "<div class=\"docbox infobox\"><h3>Warning</h3><ul><li>a</li>\n<li>b</li></ul></div>\n\n"
        );
    }

    #[test]
    fn infobox_reads_body_from_input() {
        let mut out = Vec::new();
        let input = "\n- install\n- configure\n".as_bytes();
        handle_infobox("hint", Some("Setup"), None, input, &mut out).expect("infobox renders");
        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "<div class=\"docbox infobox\"><h3>Setup</h3><ul><li>install</li>\n<li>configure</li></ul></div>\n\n"
        );
    }

    #[test]
    fn infobox_rejects_unknown_category() {
        let mut out = Vec::new();
        let error = handle_infobox("error", None, Some("- a".to_string()), io::empty(), &mut out)
            .expect_err("unknown category fails");
        assert!(error.to_string().contains("unknown infobox"), "{error}");
        assert!(out.is_empty());
    }

    #[test]
    fn name_maps_and_echoes() {
        let mut out = Vec::new();
        handle_name("client-swift", &mut out).expect("name printed");
        handle_name("unknown-key", &mut out).expect("name printed");
        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "Swift/iOS Client\nunknown-key\n"
        );
    }

    #[test]
    fn categories_are_listed_as_text_and_json() {
        let entries: Vec<Entry<'_>> = InfoboxKind::ALL
            .iter()
            .map(|kind| Entry {
                key: kind.key(),
                label: kind.label(),
            })
            .collect();

        let mut text = Vec::new();
        Renderer::new(OutputFormat::Text)
            .entries(&mut text, &entries)
            .expect("text listing");
        let text = String::from_utf8(text).expect("utf-8 output");
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("important  Important\n"));
        assert!(text.contains("hint       Hint\n"));

        let mut json = Vec::new();
        Renderer::new(OutputFormat::Json)
            .entries(&mut json, &entries)
            .expect("json listing");
        let parsed: Value = serde_json::from_slice(&json).expect("valid json");
        assert_eq!(parsed[2]["key"], "warning");
        assert_eq!(parsed[2]["label"], "Warning");
    }

    #[test]
    fn names_listing_covers_table() {
        let entries: Vec<Entry<'_>> = known_names()
            .map(|(key, label)| Entry { key, label })
            .collect();
        let mut text = Vec::new();
        Renderer::new(OutputFormat::Text)
            .entries(&mut text, &entries)
            .expect("text listing");
        let text = String::from_utf8(text).expect("utf-8 output");
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("client-js     JavaScript Client\n"));
    }

    #[test]
    fn completions_mention_subcommands() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out);
        let script = String::from_utf8(out).expect("utf-8 output");
        assert!(script.contains("docbox"));
        assert!(script.contains("infobox"));
    }

    #[test]
    fn malformed_config_does_not_affect_name_lookup() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("docbox.toml");
        fs::write(&path, "templates_dir = [unterminated").expect("write config");
        let config = path.to_str().expect("utf-8 path");
        let cli = Cli::parse_from(["docbox", "--config", config, "name", "common"]);
        assert!(load_settings(&cli).is_err());

        let mut out = Vec::new();
        handle_name("common", &mut out).expect("name printed");
        assert_eq!(out, b"Shared\n");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
