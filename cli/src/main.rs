//! CLI entrypoint for Query Broker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use broker_application::{HandleQueryUseCase, ResolverGateway};
use broker_domain::{ConversationContext, Query, ResolverRegistry, ResolverSelector, RoutingTable};
use broker_infrastructure::{ConfigLoader, FileConfig, InMemoryKnowledgeCache, JsonlExchangeLogger};
use broker_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, ReplConfig,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting Query Broker");

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let registry = Arc::new(ResolverRegistry::standard());
    config
        .validate(&registry)
        .context("Invalid configuration")?;

    let routing = RoutingTable::standard();
    routing
        .validate(&registry)
        .context("Invalid routing table")?;

    // === Dependency Injection ===
    let gateway = build_gateway(&config)?;
    let context = Arc::new(ConversationContext::new(config.context.subject_catalog()));
    let cache = Arc::new(InMemoryKnowledgeCache::new());

    let mut use_case = HandleQueryUseCase::new(gateway, Arc::clone(&registry), context, cache)
        .with_selector(ResolverSelector::new(routing))
        .with_params(config.timeouts.dispatch_params());

    if let Some(path) = &config.logging.exchange_log {
        match JsonlExchangeLogger::new(path) {
            Some(logger) => {
                info!("Exchange log: {}", path);
                use_case = use_case.with_exchange_logger(Arc::new(logger));
            }
            None => warn!("Exchange log disabled: could not open {}", path),
        }
    }

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
        };
        let repl = ChatRepl::new(use_case).with_config(repl_config);
        repl.run().await?;
        return Ok(());
    }

    // Single query mode - query is required
    let query = match cli.query.as_deref().and_then(Query::try_new) {
        Some(q) => q,
        None => bail!("Query is required. Use --chat for interactive mode."),
    };

    // JSON goes to stdout untouched, so progress is only drawn for text
    let answer = if cli.quiet || cli.output == OutputFormat::Json {
        use_case.execute(&query).await
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(&query, &progress).await
    };

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&answer),
        OutputFormat::Json => ConsoleFormatter::format_json(&answer),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let Some(file_name) = path.file_name() else {
                bail!("Log file path has no file name: {}", path.display());
            };
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[cfg(feature = "http")]
fn build_gateway(config: &FileConfig) -> Result<Arc<dyn ResolverGateway>> {
    use broker_infrastructure::HttpResolverGateway;
    use std::time::Duration;

    if config.resolvers.endpoints.is_empty() {
        warn!("No resolver endpoints configured; every resolver will report an error");
    }

    let gateway = HttpResolverGateway::new(
        config.resolvers.endpoints.clone(),
        Duration::from_secs(config.resolvers.http_timeout_secs),
    )
    .context("Failed to build HTTP client")?;
    Ok(Arc::new(gateway))
}

#[cfg(not(feature = "http"))]
fn build_gateway(_config: &FileConfig) -> Result<Arc<dyn ResolverGateway>> {
    use broker_infrastructure::OfflineResolverGateway;

    warn!("Built without the http feature; resolvers are offline");
    Ok(Arc::new(OfflineResolverGateway))
}
