//! nl2sql
//!
//! Turns natural-language questions about a tabular dataset into SQL using
//! OpenAI or Anthropic models on AWS Bedrock.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nl2sql_service::{
    config::{Environment, Settings},
    schemas::{GenerationRequest, ProviderKind, SchemaDescription},
    server::App,
    services::{provider_status, EnvSnapshot, SqlGenerator},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Natural-language to SQL service
#[derive(Parser, Debug)]
#[command(name = "nl2sql")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides PORT env var)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
        #[arg(short, long)]
        env: Option<Environment>,
    },

    /// Generate one SQL statement and print it to stdout
    Generate {
        /// Question in natural language
        #[arg(short, long)]
        question: String,

        /// JSON file describing the tables
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Use exactly this provider: openai or anthropic
        #[arg(long, conflicts_with = "prefer")]
        provider: Option<ProviderKind>,

        /// Prefer this provider when it is configured, else fall back
        #[arg(long)]
        prefer: Option<ProviderKind>,

        /// Model identifier passed through to the provider
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show which providers have credentials configured
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    init_tracing(&settings.log_level);

    match args.command {
        Command::Serve { port, host, env } => {
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(env) = env {
                settings.environment = env;
            }
            settings.validate()?;
            serve(settings).await
        }
        Command::Generate {
            question,
            schema,
            provider,
            prefer,
            model,
        } => {
            let schema = match schema {
                Some(path) => SchemaDescription::from_json_file(path)?,
                None => SchemaDescription::default(),
            };

            let mut request = GenerationRequest::new(question, schema);
            if let Some(model) = model {
                request = request.with_model(model);
            }
            if let Some(prefer) = prefer {
                request = request.with_preference(prefer);
            }

            generate(settings, request, provider).await
        }
        Command::Providers => {
            let status = provider_status(&EnvSnapshot::from_process());
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
    }
}

async fn serve(settings: Settings) -> Result<()> {
    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        "Starting application"
    );

    App::new(settings).run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");
    Ok(())
}

async fn generate(
    settings: Settings,
    request: GenerationRequest,
    provider: Option<ProviderKind>,
) -> Result<()> {
    let generator = SqlGenerator::with_sdk_clients(Arc::new(settings));
    let env = EnvSnapshot::from_process();

    let result = match provider {
        Some(provider) => generator.generate_with_provider(&request, provider, &env).await?,
        None => generator.generate(&request, &env).await?,
    };

    tracing::info!(provider = %result.provider, "SQL generated");
    println!("{}", result.sql);
    Ok(())
}

/// JSON logs on stderr so stdout stays reserved for command output
fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let console_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
