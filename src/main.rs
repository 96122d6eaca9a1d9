// media-catalog CLI - read or extract a format list and print the catalog

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use media_catalog::catalog::extractors::{parse_info_json, ExtractorConfig, YtDlpExtractor};
use media_catalog::catalog::{CatalogService, HttpUrlResolver, Platform, SelectionConfig};
use media_catalog::logging::init_logging;
use media_catalog::{ExtractionResult, Result};

/// Timeout for following one wrapper URL
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Parser, Debug)]
#[command(
    name = "media-catalog",
    about = "Turn a yt-dlp format list into a deduplicated catalog of playable sources",
    version
)]
struct Args {
    /// yt-dlp --dump-json document to read ("-" or omitted for stdin)
    #[arg(short, long, value_name = "FILE", conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Run yt-dlp on this URL instead of reading a document
    #[arg(short, long)]
    url: Option<String>,

    /// Platform the asset comes from (youtube, bilibili, soundcloud, ...)
    #[arg(short, long, default_value = "generic")]
    platform: String,

    /// JSON selection config replacing the platform defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Proxy for yt-dlp and wrapper URL resolution
    #[arg(long)]
    proxy: Option<String>,

    /// Extraction timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Debug logging for selection decisions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args).await {
        Ok(result) => {
            print_json(&result, args.pretty);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = %e.code(), "{}", e);
            print_json(&e.to_response(), args.pretty);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<ExtractionResult> {
    let platform = Platform::from(args.platform.as_str());
    let selection_config = args.config.as_deref().map(load_config).transpose()?;
    let resolver = HttpUrlResolver::new(RESOLVE_TIMEOUT, args.proxy.as_deref())?;

    let mut service = CatalogService::new()
        .with_selection_config(selection_config)
        .with_resolver(Arc::new(resolver));

    match &args.url {
        Some(url) => {
            let config = ExtractorConfig::default()
                .with_proxy(args.proxy.clone())
                .with_timeout(args.timeout);
            service.add_extractor(Box::new(YtDlpExtractor::new(config)));
            service.fetch(url, &platform).await
        }
        None => {
            let document = read_input(args.input.as_deref())?;
            let info = parse_info_json(&document)?;
            service.catalog(info, &platform).await
        }
    }
}

fn load_config(path: &Path) -> Result<SelectionConfig> {
    let json = std::fs::read_to_string(path)?;
    SelectionConfig::from_json(&json)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => Ok(std::fs::read(p)?),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("failed to serialize output: {}", e),
    }
}
