use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use profilestore::ProfileStore;
use profilestore::cli::{Cli, Command};
use profilestore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = config.store_path(cli.store);

    info!("profilestore starting at {}", store_path.display());
    let store = ProfileStore::open(&store_path)?;

    match cli.command {
        Command::Users => {
            let users = store.users()?;
            if users.is_empty() {
                println!("No users found");
            } else {
                for user in users {
                    println!("{}", user);
                }
            }
        }
        Command::Keys { user } => {
            for key in store.keys(&user)? {
                println!("{}", key.cyan());
            }
        }
        Command::Get { user, key } => match store.get(&user, &key)? {
            Some(content) => println!("{}", content),
            None => {
                eprintln!("{} No record {}/{}", "✗".red(), user, key);
                std::process::exit(1);
            }
        },
        Command::Delete { user, key } => {
            if store.delete(&user, &key)? {
                println!("{} Deleted {}/{}", "✓".green(), user, key);
            } else {
                println!("No record {}/{}", user, key);
            }
        }
    }

    Ok(())
}
