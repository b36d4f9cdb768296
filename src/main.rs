use std::fs::OpenOptions;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use photodeck::{
    Config,
    cli::{Cli, Commands, ConfigCommands, DisabledCommands, OutputFormat},
    core::{self, DisabledReview, PhotoKey, visible_photos},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // The TUI owns the terminal, so its logs go to a file.
    let tui = matches!(cli.command, None | Some(Commands::Tui));
    let log_file = if tui {
        Config::log_path().ok().and_then(|path| {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok()?;
            }
            OpenOptions::new().create(true).append(true).open(path).ok()
        })
    } else {
        None
    };

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None if tui => {}
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // No subcommand = launch TUI
    let Some(command) = cli.command else {
        return photodeck::tui::run(Config::load()?).await;
    };

    match command {
        Commands::Tui => {
            photodeck::tui::run(Config::load()?).await?;
        }

        Commands::Photos { search, format } => {
            let config = Config::load()?;
            let (source, store) = core::open(&config)?;
            let photos = source.fetch().await.map_err(core::Error::from)?;
            let disabled = store.load();
            let visible = visible_photos(&photos, &disabled, search.as_deref().unwrap_or(""));

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
                OutputFormat::Table => {
                    println!("{:<8} {:<8} Title", "Album", "ID");
                    println!("{}", "-".repeat(80));
                    for photo in &visible {
                        let title: String = photo.title.chars().take(62).collect();
                        println!("{:<8} {:<8} {title}", photo.album_id, photo.id);
                    }
                    println!("\n{} shown, {} disabled", visible.len(), disabled.len());
                }
            }
        }

        Commands::Disabled { command } => handle_disabled_command(command).await?,

        Commands::Serve { host, port } => {
            let config = Config::load()?;
            let host = host.unwrap_or_else(|| config.api.host.clone());
            let port = port.unwrap_or(config.api.port);
            photodeck::api::serve(&config, &host, port).await?;
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = Config::load()?;
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Path => {
                let path = Config::config_path()?;
                println!("{}", path.display());
            }
            ConfigCommands::GenerateToken => {
                let token = photodeck::config::ApiConfig::generate_token();
                println!("Generated API token:\n");
                println!("  {token}\n");
                println!("Add to your config.toml:");
                println!("  [api]");
                println!("  token = \"{token}\"\n");
                println!("Or set environment variable:");
                println!(
                    "  export {}=\"{token}\"",
                    photodeck::config::API_TOKEN_ENV
                );
            }
        },
    }

    Ok(())
}

async fn handle_disabled_command(command: DisabledCommands) -> anyhow::Result<()> {
    let config = Config::load()?;
    let (source, store) = core::open(&config)?;

    match command {
        DisabledCommands::List { format } => {
            let mut review = DisabledReview::new(store);
            review.activate(source.as_ref()).await;
            if let Some(reason) = review.state().failure() {
                eprintln!("warning: couldn't load photos ({reason}); showing keys only");
            }
            let entries = review.entries();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Table => {
                    println!("{:<12} Title", "Key");
                    println!("{}", "-".repeat(80));
                    for entry in &entries {
                        let title: String = entry
                            .photo
                            .as_ref()
                            .map_or("-", |p| p.title.as_str())
                            .chars()
                            .take(66)
                            .collect();
                        println!("{:<12} {title}", entry.key);
                    }
                    let unmatched = review.unmatched();
                    if unmatched > 0 {
                        println!("\n{unmatched} disabled key(s) match no fetched photo");
                    }
                }
            }
        }

        DisabledCommands::Add { key } => {
            let key: PhotoKey = key.parse().map_err(core::Error::from)?;
            let set = store.add(key).map_err(core::Error::from)?;
            print_keys(&set);
        }

        DisabledCommands::Remove { key } => {
            let key: PhotoKey = key.parse().map_err(core::Error::from)?;
            let set = store.remove(&key).map_err(core::Error::from)?;
            print_keys(&set);
        }
    }

    Ok(())
}

fn print_keys(set: &core::DisabledSet) {
    if set.is_empty() {
        println!("No disabled photos");
    }
    for key in set.iter() {
        println!("{key}");
    }
}
