mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use postgrade_core::{Pipeline, PipelineConfig, RawDocument, Report, fetch_file, fetch_stdin, validate_url};
use tracing_subscriber::EnvFilter;
use url::Url;

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

const STEPS: usize = 4;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Grade a blog post for search and AI answer engines
#[derive(Parser, Debug)]
#[command(name = "postgrade")]
#[command(version)]
#[command(about = "Grade the structure of a blog post", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Include the per-check checklist in text output
    #[arg(short, long)]
    checklist: bool,

    /// Page URL used to resolve links when reading a file or stdin
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Characters a known content container must exceed
    #[arg(long, default_value = "100", value_name = "NUM")]
    min_container_chars: usize,

    /// Reading speed used for the reading time estimate
    #[arg(long, default_value = "200", value_name = "NUM")]
    words_per_minute: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut builder = PipelineConfig::builder()
            .timeout(self.timeout)
            .min_container_chars(self.min_container_chars)
            .words_per_minute(self.words_per_minute);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    /// Base URL for local input. Must be http(s) when given.
    fn page_url(&self) -> anyhow::Result<String> {
        match &self.url {
            Some(url) if validate_url(url) => Ok(url.clone()),
            Some(url) => {
                Url::parse(url).with_context(|| format!("Invalid --url: {}", url))?;
                anyhow::bail!("Invalid --url: {} (only http and https are supported)", url)
            }
            None => Ok(String::new()),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn read_input(args: &Args, pipeline: &Pipeline) -> anyhow::Result<RawDocument> {
    if args.input == "-" {
        if args.verbose {
            echo::print_step(1, STEPS, "Reading from stdin");
        }
        let html = fetch_stdin().context("Failed to read from stdin")?;
        return Ok(RawDocument::from_html(html, args.page_url()?));
    }

    if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if args.verbose {
            echo::print_step(1, STEPS, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        let raw = pipeline.fetch(&args.input).await.context("Failed to fetch URL")?;
        if args.verbose {
            echo::print_detail("Status", &raw.status_code.to_string());
            if raw.final_url != args.input {
                echo::print_detail("Redirected to", &raw.final_url);
            }
        }
        return Ok(raw);
    }

    if args.verbose {
        echo::print_step(1, STEPS, &format!("Reading from file {}", args.input.bright_white()));
    }
    let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
    Ok(RawDocument::from_html(html, args.page_url()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let mut timings: Vec<(&str, Duration)> = Vec::new();
    let pipeline = Pipeline::with_config(args.pipeline_config());

    let stage = Instant::now();
    let raw = read_input(&args, &pipeline).await?;
    timings.push(("Read", stage.elapsed()));

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(raw.html.len()));
        eprintln!();
        echo::print_step(2, STEPS, "Extracting content");
    }

    let stage = Instant::now();
    let document = pipeline.assemble(&raw);
    timings.push(("Extract", stage.elapsed()));

    if args.verbose {
        echo::print_document_details(&document);
        eprintln!();
        echo::print_step(3, STEPS, "Analyzing structure");
    }

    let stage = Instant::now();
    let report = Report::new(document);
    timings.push(("Analyze", stage.elapsed()));

    if args.verbose {
        echo::print_score(&report.analysis);
        if report.document.content.word_count == 0 {
            echo::print_warning("No readable text was found on this page");
        }
        eprintln!();
        echo::print_step(4, STEPS, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let output = match args.format {
        OutputFormat::Text => report.render_text(args.checklist),
        OutputFormat::Json => report.to_json(true).context("Failed to serialize report")?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Report written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
            if args.format == OutputFormat::Json {
                println!();
            }
        }
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
