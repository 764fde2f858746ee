use poise::serenity_prelude as serenity;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod clear;
mod commands;
mod config;
mod download;
mod events;
mod extract;
mod fetch;
mod filename;
mod reply;

use config::Config;
use download::Downloader;
use extract::UrlExtractor;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Built once at startup and shared read-only by every handler.
pub struct Data {
    extractor: UrlExtractor,
    downloader: Downloader,
}

impl Data {
    fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Data {
            extractor: UrlExtractor::new(config.allowed_host.as_deref())?,
            downloader: Downloader::from_config(config)?,
        })
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let name = &ctx.command().name;
            error!("Error in command `{}`: {:?}", name, error);
            if let Err(e) = ctx.say(commands::unexpected_error_text(name)).await {
                error!("Failed to report error for `{}`: {}", name, e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let data = match Data::from_config(&config) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to initialise: {}", e);
            process::exit(1);
        }
    };

    match &config.allowed_host {
        Some(host) => info!("Accepting downloads from {} only", host),
        None => info!("Accepting downloads from any http(s) host"),
    }

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![commands::download(), commands::clear()],
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Err(e) = poise::builtins::register_globally(ctx, &framework.options().commands).await {
                    error!("Failed to register commands: {}", e);
                }
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::DIRECT_MESSAGES | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await;

    let mut client = match client {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            process::exit(1);
        }
    };

    info!("Starting bot...");

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
        process::exit(1);
    }
}
