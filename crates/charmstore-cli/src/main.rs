use std::{env, process::ExitCode, sync::Arc};

use charmstore_config::{
    config::{self, generate_default_config, get_config, set_config_path},
    error::ConfigError,
};
use charmstore_core::{blob::FsBlobStore, error::ErrorContext};
use charmstore_events::{ChannelSink, EventSinkHandle};
use charmstore_operations::ListContext;
use charmstore_registry::load_catalog;
use charmstore_utils::path::expand_path;
use clap::Parser;
use cli::{Args, Commands};
use events::spawn_event_handler;
use list::{identity_from_args, list_catalog};
use logging::setup_logging;
use tracing::{debug, info};
use utils::set_color;

mod cli;
mod events;
mod list;
mod logging;
mod utils;

/// Exit status for requests rejected by validation.
const EXIT_BAD_REQUEST: u8 = 2;

async fn handle_cli() -> miette::Result<ExitCode> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    if let Some(ref c) = args.config {
        let path = expand_path(c).map_err(ConfigError::from)?;
        let path = if path.is_absolute() {
            path
        } else {
            env::current_dir()
                .with_context(|| "retrieving current directory".into())?
                .join(path)
        };
        set_config_path(path);
    }

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        Commands::Config => {
            config::init()?;
            let doc = get_config().to_annotated_document()?;
            info!("{doc}");
        }
        Commands::List {
            query,
            catalog,
            blobs,
            user,
            group,
            admin,
        } => {
            config::init()?;
            let config = get_config();

            let catalog_path = match catalog {
                Some(path) => expand_path(&path).map_err(ConfigError::from)?,
                None => config.get_catalog_path()?,
            };
            let blobs_path = match blobs {
                Some(path) => expand_path(&path).map_err(ConfigError::from)?,
                None => config.get_blobs_path()?,
            };
            debug!(
                catalog = %catalog_path.display(),
                blobs = %blobs_path.display(),
                "opening catalog"
            );

            let catalog = load_catalog(&catalog_path)?;
            let (sink, receiver) = ChannelSink::new();
            let events: EventSinkHandle = Arc::new(sink);
            let ctx = ListContext::new(
                config,
                Arc::new(catalog),
                Arc::new(FsBlobStore::new(blobs_path)),
                events,
            );
            let guard = spawn_event_handler(receiver);

            let identity = identity_from_args(user, group, admin);
            let result = list_catalog(&ctx, &identity, &query, args.json).await;

            // Drop the context first to close the event channel, then join
            // the handler thread so remaining events are logged.
            drop(ctx);
            guard.finish();

            match result {
                Ok(()) => {}
                Err(err) if err.is_validation() => {
                    let response = serde_json::to_string(&err.to_response())
                        .map_err(|err| miette::miette!("encoding error response: {err}"))?;
                    println!("{response}");
                    return Ok(ExitCode::from(EXIT_BAD_REQUEST));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match handle_cli().await {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}
