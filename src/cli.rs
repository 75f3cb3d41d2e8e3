use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Scrape Madara-powered manga catalogs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog and list matching items.
    Search(SearchArgs),
    /// Scrape a single item page.
    Detail(DetailArgs),
    /// Show the config file location and resolved values.
    Config,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text search term.
    #[arg(default_value = "")]
    pub query: String,

    /// Sort/filter preset: new, latest, trending, most_viewed, rating, a_z, relevance.
    #[arg(long, default_value = "latest")]
    pub mode: String,

    /// Zero-based page to start from.
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Number of consecutive pages to fetch.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Override the configured admin-ajax endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct DetailArgs {
    /// Item page URL.
    pub url: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Skip TLS certificate verification for this run.
    #[arg(long)]
    pub insecure: bool,

    /// Print JSON instead of a text listing.
    #[arg(long)]
    pub json: bool,
}
