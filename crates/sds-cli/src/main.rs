use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sds_core::{AppConfig, DistanceUnit};
use sds_query::{QueryClient, QueryResponse};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sds-cli")]
#[command(about = "Query a spatial data source and print typed results as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a find-by-property query described by a YAML request file
    Query {
        /// Path to the request file
        #[arg(long)]
        request: PathBuf,
        /// Override the request's distance units (km, mi, m, ft, yd)
        #[arg(long)]
        units: Option<DistanceUnit>,
        /// Override the request's `$top`
        #[arg(long)]
        top: Option<u32>,
        /// Override the request's `$skip`
        #[arg(long)]
        skip: Option<u32>,
        /// Override the request's `$filter`
        #[arg(long)]
        filter: Option<String>,
    },
    /// Map a saved Atom feed without touching the network
    Parse {
        /// Path to the feed document
        #[arg(long)]
        feed: PathBuf,
        /// Units to report `__Distance` in (defaults to `SDS_DISTANCE_UNITS`)
        #[arg(long)]
        units: Option<DistanceUnit>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = sds_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let response = match cli.command {
        Commands::Query {
            request,
            units,
            top,
            skip,
            filter,
        } => {
            run_query(
                &config,
                &request,
                QueryOverrides {
                    units,
                    top,
                    skip,
                    filter,
                },
            )
            .await?
        }
        Commands::Parse { feed, units } => {
            run_parse(&feed, units.unwrap_or(config.default_distance_units))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(message) = response.error_message {
        anyhow::bail!("query failed: {message}");
    }
    Ok(())
}

#[derive(Debug, Default)]
struct QueryOverrides {
    units: Option<DistanceUnit>,
    top: Option<u32>,
    skip: Option<u32>,
    filter: Option<String>,
}

async fn run_query(
    config: &AppConfig,
    request_path: &std::path::Path,
    overrides: QueryOverrides,
) -> anyhow::Result<QueryResponse> {
    let mut request = sds_core::load_request(request_path, config.default_distance_units)
        .with_context(|| format!("loading request {}", request_path.display()))?;

    if let Some(units) = overrides.units {
        request.distance_units = units;
    }
    if overrides.top.is_some() {
        request.top = overrides.top;
    }
    if overrides.skip.is_some() {
        request.skip = overrides.skip;
    }
    if overrides.filter.is_some() {
        request.filter = overrides.filter;
    }

    if config.maps_key.is_none() {
        tracing::warn!("SDS_MAPS_KEY is not set; the service will likely reject the query");
    }

    let client = QueryClient::from_config(config)?;
    Ok(client.execute(&request).await)
}

fn run_parse(feed_path: &std::path::Path, units: DistanceUnit) -> anyhow::Result<QueryResponse> {
    let body = std::fs::read(feed_path)
        .with_context(|| format!("reading feed {}", feed_path.display()))?;
    Ok(QueryResponse::from(sds_query::parse_feed(&body, units)))
}

#[cfg(test)]
mod tests;
