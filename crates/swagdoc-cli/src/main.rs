use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use indexmap::IndexMap;
use log::debug;

use swagdoc_core::config::{self, CONFIG_FILE_NAME, SwagdocConfig};
use swagdoc_core::model::ApiSpecification;
use swagdoc_core::{ApiSuite, BuildOptions, PlainText, build, load_document};

#[derive(Parser)]
#[command(name = "swagdoc", about = "Swagger 2.0 API documentation model builder", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation model and print a summary of it
    Inspect {
        /// Specification files or URLs; defaults to the configured ones
        #[arg(short, long)]
        input: Vec<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Merge every specification into one
        #[arg(long)]
        collapse: bool,
    },

    /// Validate a Swagger 2.0 spec
    Validate {
        /// Path or URL of the spec file
        #[arg(short, long)]
        input: String,
    },

    /// Initialize a new swagdoc configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            input,
            format,
            collapse,
        } => cmd_inspect(input, format, collapse),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagdoc", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwagdocConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

fn cmd_validate(input: &str) -> Result<()> {
    let doc = load_document(input).with_context(|| format!("failed to load {input}"))?;
    eprintln!("Valid Swagger {} spec: {}", doc.swagger, doc.info.title);
    eprintln!("  Version: {}", doc.info.version);
    eprintln!("  Paths: {}", doc.paths.len());
    eprintln!("  Definitions: {}", doc.definitions.len());

    // Also validate that the documentation model builds
    let spec = build(&doc, &BuildOptions::default())
        .with_context(|| format!("failed to build documentation for {input}"))?;
    eprintln!("  Groups: {}", spec.apis.len());
    eprintln!("  Methods: {}", spec.method_count());
    eprintln!(
        "  Resources: {}",
        spec.resource_list.values().map(IndexMap::len).sum::<usize>()
    );

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: Vec<String>, format: InspectFormat, collapse: bool) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if !input.is_empty() {
        cfg.spec_dir = PathBuf::new();
        cfg.spec_filenames = input;
        cfg.host = None;
    }
    cfg.collapse |= collapse;
    debug!("inspecting {:?}", cfg.spec_filenames);

    let suite = ApiSuite::load(&cfg, &PlainText).context("failed to load specifications")?;
    let summary: Vec<serde_json::Value> = suite
        .iter()
        .map(|(id, spec)| build_inspect_summary(id, spec))
        .collect();

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(id: &str, spec: &ApiSpecification) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = spec
        .apis
        .iter()
        .map(|group| {
            let methods: Vec<serde_json::Value> = group
                .methods
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id,
                        "method": m.verb.as_str(),
                        "path": m.path,
                        "version": m.version,
                        "responses": m.responses.keys().collect::<Vec<_>>(),
                        "security": m.security.keys().collect::<Vec<_>>(),
                    })
                })
                .collect();
            serde_json::json!({
                "name": group.name,
                "id": group.id,
                "url": group.url.as_str(),
                "current_version": group.current_version,
                "methods": methods,
            })
        })
        .collect();

    let resources: IndexMap<&str, Vec<&str>> = spec
        .resource_list
        .iter()
        .map(|(version, by_id)| (version.as_str(), by_id.keys().map(String::as_str).collect()))
        .collect();

    serde_json::json!({
        "id": id,
        "info": {
            "title": spec.info.title,
        },
        "groups": groups,
        "versions": spec.versions().collect::<Vec<_>>(),
        "resources": resources,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
