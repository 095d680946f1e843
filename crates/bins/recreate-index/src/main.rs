use std::process::ExitCode;

use clap::Parser;
use snafu::{ResultExt, Snafu};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use elastic_client::errors::ElasticClientError;
use elastic_client::ElasticSearchClient;
use index_config::load_index_definitions;
use index_recreate::ports::report::Reporter;
use index_recreate::readable::readable_error;
use index_recreate::{RecreateOrchestrator, RecreateRequest};
use recreate_index::console::ConsoleReporter;
use recreate_index::populate::CommandPopulator;
use recreate_index::{Command, ConfigError, Opts, Settings};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Settings (Configuration or CLI) Error: {}", source))]
    Settings { source: ConfigError },

    #[snafu(display("Settings Display Error: {}", source))]
    SettingsDisplay { source: serde_json::Error },

    #[snafu(display("Elasticsearch Connection Error: {}", source))]
    ElasticsearchConnection { source: ElasticClientError },

    #[snafu(display("Index Definitions Error: {}", source))]
    IndexDefinitions { source: index_config::ConfigError },

    #[snafu(display("Recreation Error: {}", source))]
    Recreation { source: index_recreate::Error },
}

#[tokio::main]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "recreate_index=info,index_recreate=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match execute(opts).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            ConsoleReporter.error(&readable_error(&err));
            ExitCode::FAILURE
        }
    }
}

/// True when the command succeeded.
async fn execute(opts: Opts) -> Result<bool, Error> {
    let settings = Settings::new(&opts).context(SettingsSnafu)?;

    match opts.cmd {
        Command::Run => run(&opts, settings).await,
        Command::Config => {
            let json = serde_json::to_string_pretty(&settings).context(SettingsDisplaySnafu)?;
            println!("{}", json);
            Ok(true)
        }
    }
}

async fn run(opts: &Opts, settings: Settings) -> Result<bool, Error> {
    let logical = settings.logical_name(opts);
    let configs = match &settings.indexes_dir {
        Some(dir) => load_index_definitions(dir).context(IndexDefinitionsSnafu)?,
        None => Default::default(),
    };

    info!(
        "Trying to connect to elasticsearch at {}",
        &settings.elasticsearch.url
    );
    let client = ElasticSearchClient::conn(settings.elasticsearch.clone())
        .await
        .context(ElasticsearchConnectionSnafu)?;
    info!("Connected to elasticsearch.");

    let reporter = ConsoleReporter;
    let orchestrator = RecreateOrchestrator::new(
        client,
        CommandPopulator::new(&settings.populate),
        configs,
        reporter,
    );

    let request = RecreateRequest::new(logical).with_database(opts.database.clone());
    let outcome = orchestrator
        .recreate(&request)
        .await
        .context(RecreationSnafu)?;

    if outcome.is_success() {
        reporter.info("Index successfully recreated.");
    } else {
        reporter.error("Failed to recreate index.");
    }
    Ok(outcome.is_success())
}
