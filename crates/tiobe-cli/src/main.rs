use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use tiobe::scraper::WebScraper;

#[derive(Parser)]
#[command(name = "tiobe")]
#[command(about = "Look up programming language rankings on the TIOBE index", long_about = None)]
struct Cli {
    #[arg(default_value = "Go", help = "Language to look up (case-insensitive)")]
    language: String,

    #[arg(long, help = "Print the whole top 20 table instead of one language")]
    all: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let start = Instant::now();
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    if cli.all {
        let table = scraper.fetch_table().await.unwrap_or_else(|e| {
            log::error!("Error fetching TIOBE index: {}", e);
            process::exit(1);
        });
        let table = table.sorted_by_rank();

        match cli.format {
            OutputFormat::Json => serialize_json(&table),
            OutputFormat::Text => {
                if table.is_empty() {
                    println!("No entries to display.");
                } else {
                    print!("{}", table);
                }
            }
        }
    } else {
        let stats = scraper
            .find_language(&cli.language)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching stats for {}: {}", cli.language, e);
                process::exit(1);
            });

        match cli.format {
            OutputFormat::Json => serialize_json(&stats),
            OutputFormat::Text => println!("TIOBE language: {}", stats),
        }
    }

    let elapsed = start.elapsed().as_millis();
    match cli.format {
        OutputFormat::Json => log::info!("Time it took: {}ms", elapsed),
        OutputFormat::Text => println!("Time it took: {}ms", elapsed),
    }
}
