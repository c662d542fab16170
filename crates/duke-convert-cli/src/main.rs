//! Duke Convert CLI - convert single values and check converters

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use duke_convert::prelude::*;
use duke_convert_core::{LabelMappings, LabelName};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duke-convert")]
#[command(author, version, about = "Spreadsheet value conversion tool")]
struct Cli {
    /// Log conversions as they happen (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one value to another type
    Convert {
        /// The value, as JSON unless the source type is text
        value: String,

        /// Type of the value, e.g. Integer, Date or Cell
        #[arg(short, long, default_value = "String")]
        from: ValueType,

        /// Type to convert to
        #[arg(short, long)]
        to: ValueType,

        /// Where the conversion happens
        #[arg(short, long, default_value = "formula")]
        usage: ConverterUsage,

        /// Converter settings file (JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Define a label, e.g. Totals=D5:D9
        #[arg(short, long = "label", value_name = "NAME=SELECTION")]
        labels: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the conversions missing from the ready made converters
    Verify {
        /// Usage to check (default: all)
        #[arg(short, long)]
        usage: Option<ConverterUsage>,

        /// Converter settings file (JSON)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Print the default settings as JSON
    Settings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            value,
            from,
            to,
            usage,
            settings,
            labels,
            json,
        } => convert(&value, from, to, usage, settings.as_deref(), &labels, json),
        Commands::Verify { usage, settings } => verify(usage, settings.as_deref()),
        Commands::Settings => {
            let json = serde_json::to_string_pretty(&ConverterSettings::default())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "duke_convert=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<ConverterSettings> {
    let Some(path) = path else {
        return Ok(ConverterSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let settings = serde_json::from_str(&text)
        .with_context(|| format!("Invalid settings in '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

fn converters(settings: &ConverterSettings) -> Result<SpreadsheetConverters> {
    let general = GeneralConverter::from_settings(settings).context("Invalid patterns in settings")?;
    Ok(SpreadsheetConverters::new(general.into()))
}

fn label_mappings(definitions: &[String]) -> Result<LabelMappings> {
    let mut labels = LabelMappings::new();
    for definition in definitions {
        let Some((name, target)) = definition.split_once('=') else {
            bail!("Expected NAME=SELECTION, got '{definition}'");
        };
        let name = LabelName::parse(name.trim()).with_context(|| format!("Invalid label '{name}'"))?;
        let target = Selection::parse(target.trim())
            .with_context(|| format!("Invalid selection '{target}'"))?;
        labels.define(name, target)?;
    }
    Ok(labels)
}

/// Text is taken as is; anything else is JSON, with bare words read as JSON strings
fn read_value(text: &str, value_type: ValueType) -> Result<Value> {
    if value_type == ValueType::Text {
        return Ok(Value::text(text));
    }
    let json = serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::from(text));
    Value::from_json(&json, value_type).with_context(|| format!("'{text}' is not a {value_type}"))
}

fn convert(
    text: &str,
    from: ValueType,
    to: ValueType,
    usage: ConverterUsage,
    settings: Option<&Path>,
    labels: &[String],
    json: bool,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let converter = converters(&settings)?.for_usage(usage);
    let labels = label_mappings(labels)?;
    let ctx = ConverterContext::new(&settings).with_label_resolver(&labels);

    let value = read_value(text, from)?;
    if !converter.can_convert(&value, to, &ctx) {
        bail!("{usage} can not convert {from} {text:?} to {to}");
    }
    let converted = converter
        .convert(&value, to, &ctx)
        .with_context(|| format!("Failed to convert {from} {text:?} to {to}"))?;

    if json {
        println!("{}", converted.to_json());
    } else {
        println!("{converted}");
    }
    Ok(())
}

fn verify(usage: Option<ConverterUsage>, settings: Option<&Path>) -> Result<()> {
    let settings = load_settings(settings)?;
    let converters = converters(&settings)?;
    let ctx = ConverterContext::new(&settings);

    let usages = match usage {
        Some(usage) => vec![usage],
        None => ConverterUsage::ALL.to_vec(),
    };
    let report = MissingConverterSet::merge(usages.into_iter().map(|usage| {
        MissingConverterVerifier::verify(&converters.for_usage(usage), usage, &ctx)
    }));

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_empty() {
        eprintln!("{} conversions missing", report.value_count());
    }
    Ok(())
}
