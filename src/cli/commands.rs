use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{AnalysisConfig, ChatlabConfig};
use crate::filters::parse_filter;
use crate::loader::{InputFormat, OutputFormat, SaveOptions, load, save};
use crate::logging::init_tracing;
use crate::models::{Message, Session};
use crate::utils::truncate_text;

#[derive(Parser)]
#[command(name = "chatlab")]
#[command(version)]
#[command(about = "Normalize, analyze and convert chat exports", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./chatlab.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show aggregate statistics for a chat export
    Stats {
        input: PathBuf,
        /// Input format: auto, json, jsonl or csv
        #[arg(short, long, default_value = "auto")]
        format: String,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert between JSON, JSON Lines and CSV
    Convert {
        input: PathBuf,
        output: PathBuf,
        /// Input format: auto, json, jsonl or csv
        #[arg(long, default_value = "auto")]
        from: String,
        /// Output format: json, jsonl or csv (default: from the output extension)
        #[arg(long)]
        to: Option<String>,
        /// Write JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Escape non-ASCII characters in JSON output
        #[arg(long)]
        ascii: bool,
    },
    /// Find messages whose content contains a keyword
    Search {
        input: PathBuf,
        keyword: String,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
    /// Select messages with a filter expression, e.g. `sender:u1 type:image`
    Filter {
        input: PathBuf,
        expression: String,
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
    /// Show message counts per day
    Timeline {
        input: PathBuf,
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
    /// Split the conversation into threads by idle time
    Threads {
        input: PathBuf,
        /// Idle minutes that start a new thread (default from config, else 30)
        #[arg(long, value_parser = parse_gap)]
        gap: Option<f64>,
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
    /// Check that a file parses
    Validate {
        input: PathBuf,
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = ChatlabConfig::discover(cli.config.as_deref(), &working_dir)
        .context("Failed to load configuration")?;

    match &cli.command {
        Some(Commands::Stats { input, format, json }) => {
            let session = load_session(input, format, &config)?;
            show_stats(&session, *json)?;
        }
        Some(Commands::Convert { input, output, from, to, compact, ascii }) => {
            let session = load_session(input, from, &config)?;
            let to = match to {
                Some(to) => to.parse::<OutputFormat>()?,
                None => output_format_for(output),
            };
            let mut options =
                SaveOptions { json: config.json_options(), csv: config.csv_export_options() };
            if *compact {
                options.json.indent = None;
            }
            options.json.ensure_ascii |= *ascii;

            save(&session, output, to, &options)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Wrote {} messages to {} ({})",
                session.message_count(),
                output.display(),
                to
            );
        }
        Some(Commands::Search { input, keyword, case_sensitive, format }) => {
            let session = load_session(input, format, &config)?;
            print_messages(&session.search(keyword, *case_sensitive));
        }
        Some(Commands::Filter { input, expression, format }) => {
            let filter = parse_filter(expression).context("Invalid filter expression")?;
            let session = load_session(input, format, &config)?;
            print_messages(&session.filter(&filter));
        }
        Some(Commands::Timeline { input, format }) => {
            let session = load_session(input, format, &config)?;
            for (date, count) in session.timeline() {
                println!("{}  {}", date, count);
            }
        }
        Some(Commands::Threads { input, gap, format }) => {
            let session = load_session(input, format, &config)?;
            let gap = gap.unwrap_or(config.analysis.thread_gap_minutes);
            show_threads(&session, gap);
        }
        Some(Commands::Validate { input, format }) => {
            let session = load_session(input, format, &config)?;
            println!("OK: {}", session);
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_session(input: &Path, format: &str, config: &ChatlabConfig) -> Result<Session> {
    let format = format.parse::<InputFormat>()?;
    load(input, format, &config.csv_options())
        .with_context(|| format!("Failed to load {}", input.display()))
}

fn parse_gap(raw: &str) -> std::result::Result<f64, String> {
    let minutes: f64 = raw.trim().parse().map_err(|_| format!("'{}' is not a number", raw))?;
    if AnalysisConfig::is_valid_gap(minutes) {
        Ok(minutes)
    } else {
        Err("gap must be a non-negative number of minutes".to_string())
    }
}

fn output_format_for(path: &Path) -> OutputFormat {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jsonl") => OutputFormat::Jsonl,
        Some("csv") => OutputFormat::Csv,
        _ => OutputFormat::Json,
    }
}

fn show_stats(session: &Session, as_json: bool) -> Result<()> {
    let stats = session.statistics();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let meta = session.meta();
    println!("Chat: {} ({}, {})", meta.name, meta.platform, meta.chat_type);
    println!("================================");
    println!("Total messages: {}", stats.total_messages);
    println!("Unique senders: {}", stats.unique_senders);
    println!("Members: {}", session.members().len());

    let Some(range) = stats.date_range else {
        return Ok(());
    };
    println!("Date range: {} to {}", range.start_str(), range.end_str());
    println!("Active days: {}", stats.timeline.len());

    println!();
    println!("Message types:");
    for (label, count) in &stats.message_types {
        println!("  {}: {}", label, count);
    }

    let mut senders = stats.sender_stats;
    senders.sort_by(|a, b| b.count.cmp(&a.count));
    println!();
    println!("Top senders:");
    for sender in senders.iter().take(10) {
        println!("  {} ({}): {}", sender.account_name, sender.sender_id, sender.count);
    }

    Ok(())
}

fn show_threads(session: &Session, gap_minutes: f64) {
    let threads = session.conversation_threads(gap_minutes);
    println!("{} threads (gap > {} min)", threads.len(), gap_minutes);
    for (i, thread) in threads.iter().enumerate() {
        let (Some(first), Some(last)) = (thread.first(), thread.last()) else {
            continue;
        };
        println!(
            "#{:<4} {} to {}  {} messages",
            i + 1,
            first.datetime_str(),
            last.datetime_str(),
            thread.len()
        );
    }
}

fn print_messages(messages: &[&Message]) {
    for message in messages {
        println!(
            "[{}] {} ({}): {}",
            message.datetime_str(),
            message.account_name,
            message.sender,
            truncate_text(&message.content.replace('\n', " "), 200, "...")
        );
    }
    println!("{} matching messages", messages.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "chatlab", "--verbose", "convert", "in.json", "out.csv", "--compact", "--ascii",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Convert { from, to, compact, ascii, .. }) => {
                assert_eq!(from, "auto");
                assert!(to.is_none());
                assert!(compact && ascii);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(output_format_for(Path::new("out.JSONL")), OutputFormat::Jsonl);
        assert_eq!(output_format_for(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(output_format_for(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(output_format_for(Path::new("out")), OutputFormat::Json);
    }

    #[test]
    fn test_threads_gap_is_optional() {
        let cli = Cli::try_parse_from(["chatlab", "threads", "chat.json", "--gap", "7.5"]).unwrap();
        match cli.command {
            Some(Commands::Threads { gap, .. }) => assert_eq!(gap, Some(7.5)),
            _ => panic!("expected threads"),
        }
    }

    #[test]
    fn test_threads_gap_rejects_negative_and_nan() {
        for bad in ["--gap=-5", "--gap=NaN", "--gap=inf", "--gap=soon"] {
            let result = Cli::try_parse_from(["chatlab", "threads", "chat.json", bad]);
            assert!(result.is_err(), "{} should be rejected", bad);
        }
        let cli = Cli::try_parse_from(["chatlab", "threads", "chat.json", "--gap=0"]).unwrap();
        match cli.command {
            Some(Commands::Threads { gap, .. }) => assert_eq!(gap, Some(0.0)),
            _ => panic!("expected threads"),
        }
    }
}
