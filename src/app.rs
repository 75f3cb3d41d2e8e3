use std::fmt::Write as _;

use tracing::info;

use crate::cli::{Cli, Command, CommonArgs, DetailArgs, SearchArgs};
use crate::config::{Config, config_path};
use crate::error::Result;
use crate::madara::{DetailRecord, ListItemRecord, MadaraClient, SearchMode};

/// Execute one CLI command and return what should be printed.
pub async fn run(cli: Cli, config: Config) -> Result<String> {
    match cli.command {
        Command::Search(args) => search(args, config).await,
        Command::Detail(args) => detail(args, config).await,
        Command::Config => show_config(&config),
    }
}

fn apply_overrides(mut config: Config, common: &CommonArgs, endpoint: Option<String>) -> Config {
    if let Some(endpoint) = endpoint {
        config.catalog.endpoint = endpoint;
    }
    if common.insecure {
        config.http.accept_invalid_certs = true;
    }
    config
}

async fn search(args: SearchArgs, config: Config) -> Result<String> {
    let mode = SearchMode::from_name(&args.mode);
    let config = apply_overrides(config, &args.common, args.endpoint);
    let client = MadaraClient::new(&config)?;

    let mut items = Vec::new();
    let last_page = args.page.saturating_add(args.pages.max(1));

    for page in args.page..last_page {
        match client.search(page, &args.query, mode).await {
            Ok(found) => {
                info!(page, count = found.len(), mode = %mode, "Fetched catalog page");
                items.extend(found);
            }
            // Pages after the first running dry just means we reached the end.
            Err(e) if e.is_empty_result() && !items.is_empty() => {
                info!(page, "No more results");
                break;
            }
            Err(e) => return Err(e),
        }
    }

    if args.common.json {
        return Ok(serde_json::to_string_pretty(&items)?);
    }
    Ok(render_list(&items))
}

async fn detail(args: DetailArgs, config: Config) -> Result<String> {
    let config = apply_overrides(config, &args.common, None);
    let client = MadaraClient::new(&config)?;
    let record = client.details(&args.url).await?;
    info!(title = %record.title, "Fetched item page");

    if args.common.json {
        return Ok(serde_json::to_string_pretty(&record)?);
    }
    Ok(render_detail(&record))
}

fn show_config(config: &Config) -> Result<String> {
    let path = config_path()?;
    Ok(format!(
        "# {}\n{}",
        path.display(),
        toml::to_string_pretty(config)?
    ))
}

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "    {label:<15}{value}");
    }
}

pub fn render_list(items: &[ListItemRecord]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, item.title);
        field(&mut out, "url", &item.url);
        field(&mut out, "cover", &item.cover_image);
        field(&mut out, "alternative", &item.description);
        field(&mut out, "genres", &item.genres_label());
        field(&mut out, "status", &item.status);
        field(&mut out, "updated", &item.last_updated);
        field(&mut out, "latest", &item.latest_chapter);
    }
    out
}

pub fn render_detail(record: &DetailRecord) -> String {
    let mut out = format!("{}\n", record.title);
    field(&mut out, "cover", &record.cover_image);
    field(&mut out, "genres", &record.genres_label());
    field(&mut out, "status", &record.status);
    if !record.description.is_empty() {
        let _ = write!(out, "\n{}\n", record.description);
    }
    out
}
