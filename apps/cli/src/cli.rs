//! Command-line interface

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mosaic_binder::RuleRegistry;
use mosaic_plugins::{Module, PluginRegistry};

use crate::config::Config;
use crate::report;

#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Check generator annotations in a source model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./mosaic.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokenize annotation lines and print them as JSON
    Parse {
        /// Lines such as `@http-method GET`
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Run a plugin over a source model and report its diagnostics
    Check {
        /// Plugin name, see `mosaic plugins`
        #[arg(short, long)]
        plugin: String,

        /// Source model exported as JSON
        model: PathBuf,

        /// Print which annotation set each field
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// List the registered plugins
    Plugins,
}

pub fn run(command: Commands, config: &Config) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Parse { lines } => parse(&mut out, &lines),
        Commands::Check {
            plugin,
            model,
            trace,
        } => check(&mut out, &plugin, &model, trace || config.output.trace),
        Commands::Plugins => {
            for plugin in PluginRegistry::with_builtin().iter() {
                writeln!(out, "{}\t{}", plugin.name(), plugin.prefix())?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse(out: &mut impl Write, lines: &[String]) -> anyhow::Result<ExitCode> {
    let mut annotations = Vec::with_capacity(lines.len());
    let mut failed = false;

    for line in lines {
        match mosaic_annotation::parse(line) {
            Ok(annotation) => annotations.push(annotation),
            Err(e) => {
                eprintln!("{line}: {e}");
                failed = true;
            }
        }
    }

    serde_json::to_writer_pretty(&mut *out, &annotations)?;
    writeln!(out)?;

    Ok(ExitCode::from(u8::from(failed)))
}

fn check(
    out: &mut impl Write,
    plugin: &str,
    model: &Path,
    with_trace: bool,
) -> anyhow::Result<ExitCode> {
    let registry = PluginRegistry::with_builtin();
    let plugin = registry.get(plugin)?;

    let module = Module::from_path(model)
        .with_context(|| format!("Failed to read source model {}", model.display()))?;

    tracing::info!(
        plugin = plugin.name(),
        interfaces = module.interfaces.len(),
        "Running plugin"
    );

    let loaded = plugin.load(&module, &RuleRegistry::default())?;

    report::write_config(out, &loaded, with_trace)?;
    report::write_summary(&mut io::stderr().lock(), &loaded.diagnostics)?;

    Ok(ExitCode::from(report::exit_status(&loaded.diagnostics)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        let cli = Cli::try_parse_from(["mosaic", "parse", "@http-method GET", "@http-path /"])
            .unwrap();

        match cli.command {
            Commands::Parse { lines } => {
                assert_eq!(lines, vec!["@http-method GET", "@http-path /"]);
            }
            _ => panic!("Expected Parse command"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_requires_lines() {
        assert!(Cli::try_parse_from(["mosaic", "parse"]).is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from([
            "mosaic",
            "check",
            "--plugin",
            "http",
            "model.json",
            "--trace",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        match cli.command {
            Commands::Check {
                plugin,
                model,
                trace,
            } => {
                assert_eq!(plugin, "http");
                assert_eq!(model.to_string_lossy(), "model.json");
                assert!(trace);
            }
            _ => panic!("Expected Check command"),
        }
        assert_eq!(cli.config.unwrap().to_string_lossy(), "custom.toml");
    }

    #[test]
    fn test_check_requires_plugin() {
        assert!(Cli::try_parse_from(["mosaic", "check", "model.json"]).is_err());
    }

    #[test]
    fn test_parse_output() {
        let mut out = Vec::new();
        let lines = vec!["@http-name id omitempty format=snake".to_string()];
        parse(&mut out, &lines).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["key"], "http-name");
        assert_eq!(json[0]["options"][1], "omitempty");
        assert_eq!(json[0]["params"]["format"], "snake");
    }

    #[test]
    fn test_parse_reports_bad_lines() {
        let mut out = Vec::new();
        let lines = vec!["@ok".to_string(), "not an annotation".to_string()];
        parse(&mut out, &lines).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_check_unknown_plugin() {
        let mut out = Vec::new();
        let err = check(&mut out, "grpc", Path::new("model.json"), false).unwrap_err();
        assert!(err.to_string().contains("grpc"));
    }
}
