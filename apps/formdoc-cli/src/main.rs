//! formdoc command-line interface
//!
//! JSON results go to stdout, logs to stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use form_engine::config::{DEFAULT_CONVERTER, DEFAULT_OUTPUT_ROOT};
use form_engine::{
    extract_from_path, fill_with_options, generate, EngineConfig, GenerateRequest,
    SofficeRenderer,
};
use form_types::{FormData, TemplateSchema, RESERVED_PREFIX};
use serde_json::Value;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "formdoc")]
#[command(version, about = "Extract, fill and render .docx form templates")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the schema derived from a template
    Extract {
        template: PathBuf,

        /// Write the schema here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fill a template and write the resulting .docx
    Fill {
        template: PathBuf,

        /// Form data as a JSON object
        #[arg(short, long)]
        data: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        common: FillArgs,
    },

    /// Fill a template, store it under the output root and render a PDF
    Generate {
        template: PathBuf,

        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        form_id: String,

        #[arg(long)]
        version_id: Option<String>,

        #[command(flatten)]
        common: FillArgs,

        /// Office converter used for PDF output
        #[arg(long, env = "FORMDOC_SOFFICE", default_value = DEFAULT_CONVERTER)]
        converter: PathBuf,

        #[arg(long, env = "FORMDOC_OUTPUT_ROOT", default_value = DEFAULT_OUTPUT_ROOT)]
        output_root: PathBuf,

        /// Renderer timeout in seconds
        #[arg(long, env = "FORMDOC_RENDER_TIMEOUT_SECS", default_value = "60")]
        timeout_secs: u64,
    },
}

#[derive(clap::Args, Debug)]
struct FillArgs {
    /// Stored schema; extracted from the template when omitted
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Data keys with this prefix are never filled
    #[arg(long, default_value = RESERVED_PREFIX)]
    reserved_prefix: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Extract { template, output } => {
            let schema = extract_from_path(&template)
                .with_context(|| format!("extracting {}", template.display()))?;
            let json = serde_json::to_string_pretty(&schema)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    info!("Schema written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Fill {
            template,
            data,
            output,
            common,
        } => {
            let schema = load_schema(&template, common.schema.as_deref())?;
            let data = load_data(&data)?;
            let config = EngineConfig {
                reserved_prefix: common.reserved_prefix,
                ..Default::default()
            };
            let bytes = fs::read(&template)
                .with_context(|| format!("reading {}", template.display()))?;
            let filled = fill_with_options(&bytes, &schema, &data, &config.fill_options())?;
            fs::write(&output, &filled.bytes)?;
            info!("Filled document written to {}", output.display());
            println!("{}", serde_json::to_string_pretty(&filled.report)?);
        }
        Command::Generate {
            template,
            data,
            form_id,
            version_id,
            common,
            converter,
            output_root,
            timeout_secs,
        } => {
            let schema = load_schema(&template, common.schema.as_deref())?;
            let data = load_data(&data)?;
            let config = EngineConfig {
                converter_path: converter,
                render_timeout: Duration::from_secs(timeout_secs),
                output_root,
                reserved_prefix: common.reserved_prefix,
            };
            let renderer = SofficeRenderer::new(config.render_config());
            let request = GenerateRequest {
                template_path: &template,
                schema: &schema,
                data: &data,
                form_id: &form_id,
                version_id: version_id.as_deref(),
            };
            let generated = generate(&request, &config, &renderer)?;
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
    }

    Ok(())
}

fn load_schema(template: &Path, schema: Option<&Path>) -> Result<TemplateSchema> {
    match schema {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading schema {}", path.display()))?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(extract_from_path(template)
            .with_context(|| format!("extracting {}", template.display()))?),
    }
}

fn load_data(path: &Path) -> Result<FormData> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading data {}", path.display()))?;
    parse_data(&text)
}

fn parse_data(text: &str) -> Result<FormData> {
    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        other => bail!("form data must be a JSON object, got {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_data_requires_object() {
        let data = parse_data(r#"{"sec_I": {"name": "Ada"}}"#).unwrap();
        assert_eq!(data.len(), 1);

        let err = parse_data("[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "form data must be a JSON object, got an array");
    }

    #[test]
    fn test_generate_arguments() {
        let args = Args::try_parse_from([
            "formdoc",
            "generate",
            "template.docx",
            "--data",
            "data.json",
            "--form-id",
            "12",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        match args.command {
            Command::Generate {
                form_id,
                timeout_secs,
                version_id,
                ..
            } => {
                assert_eq!(form_id, "12");
                assert_eq!(timeout_secs, 5);
                assert_eq!(version_id, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
