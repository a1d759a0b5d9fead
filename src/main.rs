use clap::Parser;
use keyword_news::aggregator::{Aggregator, Dispatch};
use keyword_news::cli::Cli;
use keyword_news::extractor::Extractor;
use keyword_news::fetcher::HttpFetcher;
use keyword_news::registry::SourceRegistry;
use keyword_news::server::{self, AppState};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    tracing::debug!(?args, "Parsed CLI arguments");

    let registry = match &args.sources {
        Some(path) => SourceRegistry::load(path).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to load sources");
        })?,
        None => SourceRegistry::builtin(),
    };

    let extractor = Extractor::new(args.selector.as_str()).inspect_err(|e| {
        error!(error = %e, "Invalid anchor selector");
    })?;

    let fetcher = HttpFetcher::with_options(
        &args.user_agent,
        args.timeout_secs.map(Duration::from_secs),
    )
    .inspect_err(|e| {
        error!(error = %e, "Failed to build HTTP client");
    })?;

    let source_count = registry.len();
    let dispatch = Dispatch::from_limit(args.concurrency);
    let aggregator = Aggregator::new(Arc::new(registry), Arc::new(fetcher))
        .with_keyword(args.keyword.as_str())
        .with_extractor(extractor)
        .with_url_join(args.url_join)
        .with_dispatch(dispatch);

    let app = server::create_app(AppState {
        aggregator: Arc::new(aggregator),
    });

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        error!(%addr, error = %e, "Failed to bind");
    })?;

    info!(
        %addr,
        sources = source_count,
        keyword = %args.keyword,
        %dispatch,
        "Server running"
    );
    axum::serve(listener, app).await.inspect_err(|e| {
        error!(error = %e, "Server exited with error");
    })?;

    Ok(())
}
