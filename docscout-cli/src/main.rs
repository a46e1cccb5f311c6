mod interactive;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use docscout::config::{default_thread_count, DEFAULT_PATTERNS};
use docscout::export::{ExportFormat, ResultExporter};
use docscout::quality::{self, ToolSpec};
use docscout::results::SearchResults;
use docscout::search::search;
use docscout::text::highlight_matches;
use docscout::SearchConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// The word or pattern to search for; omit to be prompted interactively
    term: Option<String>,

    /// Root directory to search in
    #[arg(short = 'd', long, default_value = ".")]
    dir: PathBuf,

    /// Enable case-sensitive matching
    #[arg(short = 'c', long)]
    case_sensitive: bool,

    /// Match whole words only
    #[arg(short = 'w', long)]
    whole_word: bool,

    /// Interpret the term as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// Number of worker threads (1-32)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Exclude a directory name from the search (repeatable)
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// Include PDF files in the search (DOCX files are always included)
    #[arg(long)]
    pdf: bool,

    /// Export results in the given format (html, markdown, txt)
    #[arg(short = 'x', long)]
    export: Option<String>,

    /// Directory to write export files to
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Launch the guided prompt flow instead of reading flags
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Parser)]
struct QualityArgs {
    /// Verify only; do not let tools modify files
    #[arg(long)]
    check: bool,

    /// Show full tool output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Emit a JSON report for CI systems
    #[arg(long)]
    ci_output: bool,

    /// Override the tool set; each value is a command line, e.g. "cargo fmt"
    #[arg(short = 't', long = "tool")]
    tools: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search Word and PDF documents for a pattern
    Search(Box<CliSearchConfig>),

    /// Run external code-quality tools and aggregate their results
    Quality(QualityArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(*args),
        Commands::Quality(args) => run_quality(args),
    }
}

fn init_logging(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    // Ignore failure when a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run_search(args: CliSearchConfig) -> Result<()> {
    let config = if args.interactive || args.term.is_none() {
        init_logging(&args.log_level);
        interactive::prompt_config()?
    } else {
        let cli_config = build_cli_config(&args)?;
        init_logging(&cli_config.log_level);
        SearchConfig::load_from(args.config.as_deref())
            .context("failed to load configuration")?
            .merge_with_cli(cli_config)
    };

    if config.term.is_empty() {
        bail!("search term cannot be empty");
    }

    println!("Searching in: {}", config.root_path.display());
    let results = search(&config)?;
    print_search_results(&results);

    if let Some(format) = config.export_format {
        if results.total_matches() > 0 {
            let exporter =
                ResultExporter::new(&config.term, &config.root_path, &config.output_dir);
            if let Some(path) = exporter.export(&results.matches, format)? {
                println!("\nResults exported to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn build_cli_config(args: &CliSearchConfig) -> Result<SearchConfig> {
    let file_patterns = if args.pdf {
        DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
    } else {
        vec!["*.docx".to_string()]
    };

    let mut config = SearchConfig {
        term: args.term.clone().unwrap_or_default(),
        case_sensitive: args.case_sensitive,
        whole_word: args.whole_word,
        use_regex: args.regex,
        root_path: args.dir.clone(),
        file_patterns,
        thread_count: args.threads.unwrap_or_else(default_thread_count),
        log_level: args.log_level.clone(),
        ..Default::default()
    };

    // User exclusions extend the defaults rather than replacing them
    config.exclude_dirs.extend(args.exclude.iter().cloned());

    if let Some(format) = &args.export {
        config.export_format = Some(ExportFormat::from_str(format)?);
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    Ok(config)
}

fn print_search_results(results: &SearchResults) {
    let mut current_file: Option<&Path> = None;
    for m in &results.matches {
        if current_file != Some(m.file_path.as_path()) {
            println!("\n{}", m.file_path.display().to_string().blue());
            current_file = Some(m.file_path.as_path());
        }
        if let Some(location) = &m.location {
            println!("  {}", location.green());
        }
        println!("  {}", highlight_matches(&m.context, &m.match_positions));
    }

    if results.total_matches() > 0 {
        println!(
            "\nFound {} matches in {} documents.",
            results.total_matches(),
            results.unique_documents()
        );
    } else {
        println!("\nNo matches found.");
    }
}

fn run_quality(args: QualityArgs) -> Result<()> {
    init_logging("warn");

    let tools = if args.tools.is_empty() {
        quality::default_tools()
    } else {
        args.tools
            .iter()
            .map(|line| parse_tool(line))
            .collect::<Result<Vec<_>>>()?
    };

    let report = quality::run_checks(&tools, args.check);

    if args.ci_output {
        println!("{}", report.to_json()?);
    } else {
        for outcome in &report.outcomes {
            let status = match outcome.status {
                quality::ToolStatus::Passed => "PASS".green(),
                quality::ToolStatus::Failed => "FAIL".red(),
                quality::ToolStatus::Missing => "MISSING".yellow(),
            };
            println!("{:>8}  {}", status, outcome.name);
            if args.verbose && !outcome.output.is_empty() {
                for line in outcome.output.lines() {
                    println!("          {line}");
                }
            }
        }
        if report.success {
            println!("\nAll checks passed.");
        } else {
            println!("\nSome checks did not pass.");
        }
    }

    std::process::exit(report.exit_code());
}

fn parse_tool(line: &str) -> Result<ToolSpec> {
    let mut parts = line.split_whitespace();
    let program = parts
        .next()
        .with_context(|| format!("empty tool specification: {line:?}"))?;
    let args: Vec<&str> = parts.collect();
    Ok(ToolSpec::new(program, program, &args))
}
