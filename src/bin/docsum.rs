use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use docsum::{
    config::Config,
    constants::{DEFAULT_CSV_DELIMITER, SUMMARY_DOCUMENT_TITLE},
    error::ExtractError,
    file::{self, ExtractorRegistry},
    llm::{OllamaClient, Summarizer},
    logging,
    models::{ExtractOptions, ExtractionInput, ExtractionResult, SummaryOptions, SummaryStyle},
    pipeline::{Pipeline, PipelineOutcome, Stage},
    report, utils,
};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docsum")]
#[command(about = "Extract text from documents and summarize it with a local Ollama model")]
#[command(version)]
struct Cli {
    /// Path to a settings.toml (defaults to the usual locations)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and summarize one or more documents
    Summarize {
        /// Documents to summarize
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,

        /// Summary style: concise, detailed or bullets (overrides config)
        #[arg(long)]
        style: Option<SummaryStyle>,

        /// Advisory word limit (overrides config)
        #[arg(long)]
        max_words: Option<usize>,

        /// Ollama model (overrides config and env)
        #[arg(long)]
        model: Option<String>,

        /// Write the summary to a .docx file (single input only; defaults to <stem>_summary.docx)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite the output file without asking
        #[arg(short, long)]
        yes: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract text only, without calling the model
    Extract {
        /// Document to extract
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,

        /// Print the full extraction result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the Ollama server is reachable and list its models
    Health,
}

#[derive(Args)]
struct ExtractArgs {
    /// Zero-based PDF pages to keep, e.g. --pages 0,2
    #[arg(long, value_delimiter = ',', value_name = "N,N")]
    pages: Vec<usize>,

    /// CSV field delimiter
    #[arg(long, default_value_t = DEFAULT_CSV_DELIMITER)]
    delimiter: char,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        let options = ExtractOptions::default().with_delimiter(self.delimiter);
        if self.pages.is_empty() {
            options
        } else {
            options.with_pages(self.pages.iter().copied())
        }
    }
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    success: bool,
    failed_stage: Option<Stage>,
    summary: Option<&'a str>,
    error: Option<String>,
    extraction: &'a ExtractionResult,
}

impl<'a> FileReport<'a> {
    fn new(path: &Path, outcome: &'a PipelineOutcome) -> Self {
        Self {
            file: path.display().to_string(),
            success: outcome.is_success(),
            failed_stage: outcome.failed_stage(),
            summary: outcome.summary_text(),
            error: outcome.message(),
            extraction: outcome.extraction(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };

    match cli.command {
        Commands::Summarize {
            files,
            extract,
            style,
            max_words,
            model,
            output,
            yes,
            json,
        } => {
            let mut config = config;
            if let Some(model) = model {
                config.ollama.model = model;
            }
            let mut options = config.summary_options();
            if let Some(style) = style {
                options.style = style;
            }
            if let Some(max_words) = max_words {
                options.max_words = max_words.max(1);
            }
            summarize(&config, files, extract.options(), options, output, yes, json).await
        }
        Commands::Extract {
            file,
            extract,
            json,
        } => extract_only(&config, &file, &extract.options(), json).await,
        Commands::Health => health(&config).await,
    }
}

fn check_allowed(config: &Config, path: &Path) -> Result<()> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if !config.is_allowed(name) {
        let err = ExtractError::UnsupportedFormat {
            extension: utils::get_extension(path),
        };
        return Err(anyhow::Error::new(err).context(format!("Rejected {}", path.display())));
    }
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

async fn summarize(
    config: &Config,
    files: Vec<PathBuf>,
    extract_options: ExtractOptions,
    options: SummaryOptions,
    output: Option<PathBuf>,
    yes: bool,
    json: bool,
) -> Result<()> {
    if output.is_some() && files.len() > 1 {
        anyhow::bail!("--output accepts a single input file, got {}", files.len());
    }
    for path in &files {
        check_allowed(config, path)?;
    }

    let output = match (output, files.as_slice()) {
        (Some(output), _) => Some(output),
        (None, [single]) => Some(report::default_output_path(single)),
        _ => None,
    };

    if let Some(output) = &output {
        if output.exists() && !yes {
            let proceed = Confirm::new()
                .with_prompt(format!("{} exists. Overwrite?", output.display()))
                .default(false)
                .interact()
                .context("Failed to read user input")?;

            if !proceed {
                println!("Aborted.");
                return Ok(());
            }
        }
    }

    let client = OllamaClient::from_config(&config.ollama)?;
    let summarizer: Arc<dyn Summarizer> = Arc::new(client);
    let pipeline = Pipeline::new(Arc::new(ExtractorRegistry::with_defaults()), summarizer);

    let max_concurrent = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(4);

    let pb = spinner(format!(
        "Summarizing {} file(s) with {} ({})",
        files.len(),
        config.ollama.model,
        options.style
    ));

    let mut outcomes: Vec<(usize, PathBuf, PipelineOutcome)> =
        stream::iter(files.into_iter().enumerate())
            .map(|(index, path)| {
                let pipeline = pipeline.clone();
                let extract_options = extract_options.clone();
                let pb = pb.clone();
                async move {
                    let input = ExtractionInput::from_path(&path).with_options(extract_options);
                    let outcome = pipeline.run(&input, &options).await;
                    pb.println(format!(
                        "{} {}",
                        if outcome.is_success() { "✓" } else { "✗" },
                        path.display()
                    ));
                    (index, path, outcome)
                }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
    outcomes.sort_by_key(|(index, _, _)| *index);

    pb.finish_and_clear();

    if json {
        let reports: Vec<FileReport> = outcomes
            .iter()
            .map(|(_, path, outcome)| FileReport::new(path, outcome))
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (_, path, outcome) in &outcomes {
            println!("== {} ==", path.display());
            match (outcome.summary_text(), outcome.message()) {
                (Some(summary), _) => println!("{}\n", summary),
                (None, Some(message)) => println!("Error: {}\n", message),
                (None, None) => println!(),
            }
        }
    }

    if let Some(output) = &output {
        if let Some((_, _, outcome)) = outcomes.first() {
            if let Some(summary) = outcome.summary_text() {
                report::write_summary_docx(output, SUMMARY_DOCUMENT_TITLE, summary)?;
                if !json {
                    println!("Summary written to {}", output.display());
                }
            }
        }
    }

    let failed = outcomes.iter().filter(|(_, _, o)| !o.is_success()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, outcomes.len());
    }
    Ok(())
}

async fn extract_only(
    config: &Config,
    path: &Path,
    options: &ExtractOptions,
    json: bool,
) -> Result<()> {
    check_allowed(config, path)?;

    let registry = Arc::new(ExtractorRegistry::with_defaults());
    let result = file::extract_file(&registry, path, options).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.content);
    }

    if !result.success {
        anyhow::bail!(
            "{}",
            result
                .error_message
                .unwrap_or_else(|| "extraction failed".to_string())
        );
    }
    Ok(())
}

async fn health(config: &Config) -> Result<()> {
    let client = OllamaClient::from_config(&config.ollama)?;
    let models = client
        .list_models()
        .await
        .context("Ollama is unreachable")?;

    println!("Ollama at {} is healthy", client.base_url());
    println!("Configured model: {}", client.model());
    if models.is_empty() {
        println!("No models installed");
    }
    for model in &models {
        let marker = if model.name == client.model() { "*" } else { " " };
        println!("{} {:<40} {:>8.2} GB", marker, model.name, model.size_gb);
    }
    if !models.iter().any(|m| m.name == client.model()) {
        println!("Warning: configured model '{}' is not installed", client.model());
    }
    Ok(())
}
