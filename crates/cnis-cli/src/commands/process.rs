//! Process command - extract client and employment data from one statement.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use cnis_core::models::record::ExtractionResult;
use cnis_core::{HybridCnisParser, TextAcquirer};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or .txt with already extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per employment record
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Missing input is reported before any other work
    if !args.input.exists() {
        anyhow::bail!("Arquivo não encontrado - {}", args.input.display());
    }

    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extraindo texto...");

    let acquirer = TextAcquirer::from_config(&config.pdf)?;
    let input = args.input.clone();
    let text = match tokio::task::spawn_blocking(move || acquirer.read_path(&input)).await? {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read {}: {}", args.input.display(), e);
            String::new()
        }
    };

    pb.set_message("Extraindo dados...");
    let result = HybridCnisParser::from_config(&config).extract(&text);
    pb.finish_and_clear();

    let output = format_result(&result, args.format, args.compact)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Resultado salvo em: {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(error) = &result.error {
        warn!("Extraction failed: {}", error);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    compact: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if compact => Ok(serde_json::to_string(result)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "client_name",
        "client_cpf",
        "empregador",
        "cnpj",
        "data_inicio",
        "data_fim",
    ])?;

    if let Some(data) = &result.data {
        for record in &data.vinculos_empregaticios {
            wtr.write_record([
                &data.client_name,
                &data.client_cpf,
                &record.employer,
                &record.registration_number,
                &record.start_date,
                &record.end_date,
            ])?;
        }
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &ExtractionResult) -> String {
    let Some(data) = &result.data else {
        return format!(
            "Falha: {}\n",
            result.error.as_deref().unwrap_or("falha na extração")
        );
    };

    let mut output = String::new();

    output.push_str(&format!("Cliente: {}\n", data.client_name));
    output.push_str(&format!("CPF: {}\n", data.client_cpf));
    output.push('\n');

    output.push_str(&format!(
        "Vínculos empregatícios ({}):\n",
        data.vinculos_empregaticios.len()
    ));
    for (i, record) in data.vinculos_empregaticios.iter().enumerate() {
        output.push_str(&format!("  {}. {}", i + 1, record.employer));
        if !record.registration_number.is_empty() {
            output.push_str(&format!(" ({})", record.registration_number));
        }
        output.push('\n');

        let end = if record.is_ongoing() {
            "em aberto"
        } else {
            record.end_date.as_str()
        };
        output.push_str(&format!("     {} - {}\n", record.start_date, end));
    }

    output
}
