//! Command-line scraper for saved Grok chat pages.
//!
//! Reads a page from a file (or stdin), runs the same `scrape` command the
//! browser bridge sends, saves the Markdown and prints the JSON response.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use grok_convo_scraper::{encoding, DownloadSink, FileSink, Options, Page, ScrapeResponse, Scraper, DEFAULT_FILENAME};

#[derive(Parser)]
#[command(name = "grok-scrape")]
#[command(version)]
#[command(about = "Export a saved Grok conversation page as Markdown", long_about = None)]
struct Cli {
    /// Saved HTML page (reads stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Address the page was saved from, used to resolve relative links
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Directory the Markdown file is written to
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Name of the Markdown file
    #[arg(long, short = 'f', default_value = DEFAULT_FILENAME)]
    filename: String,

    /// Print the Markdown to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

/// Writes documents to standard output.
struct StdoutSink;

impl DownloadSink for StdoutSink {
    fn save(&mut self, content: &str, _filename: &str, _mime_type: &str) -> grok_convo_scraper::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(content.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn read_input(input: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read(path),
        _ => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

fn run<D: DownloadSink>(options: Options, sink: D, page: &Page) -> ScrapeResponse {
    let mut scraper = Scraper::new(options, sink);
    scraper.initialize();
    scraper.handle_message(page, r#"{"action":"scrape"}"#)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let bytes = match read_input(cli.input.as_ref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("failed to read input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut page = Page::new(encoding::transcode_to_utf8(&bytes));
    if let Some(url) = &cli.url {
        page = page.with_url(url);
    }
    if let Some(path) = &cli.input {
        page = page.with_title(path.display().to_string());
    }

    let options = Options {
        filename: cli.filename,
        ..Options::default()
    };

    let response = if cli.stdout {
        run(options, StdoutSink, &page)
    } else {
        run(options, FileSink::new(cli.output_dir), &page)
    };

    match serde_json::to_string(&response) {
        // Markdown already occupies stdout
        Ok(json) if cli.stdout => eprintln!("{json}"),
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("failed to serialize response: {e}"),
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
