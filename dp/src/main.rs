//! dietplanner CLI entry point

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use dietplanner::cli::{Cli, Command, OutputFormat, ProfileCommand, RecipesCommand, RequestArg, read_profile};
use dietplanner::config::Config;
use dietplanner::domain::{DietPlan, Profile, ProfileUpdate, Religion, StoreList};
use dietplanner::llm::create_client;
use dietplanner::planner::Planner;
use dietplanner::policy::compose;
use dietplanner::prompts::PromptLoader;
use dietplanner::request::{GenerationRequest, RequestBuilder};
use dietplanner::session::{Delivery, IdentityProvider, Session, StaticIdentity, UserId};
use dietplanner::validate::validate_plan;
use dietplanner::{CoreError, SavedRecipes};
use profilestore::ProfileStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = dietplanner::cli::get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Turn a core error into a report fit for the terminal
fn report(err: CoreError) -> eyre::Report {
    if let Some(raw) = err.raw_response() {
        warn!(error = %err, raw_len = raw.len(), "Model response rejected");
        debug!(%raw, "Rejected model response");
    }
    eyre!(err.user_message())
}

fn open_session(config: &Config, cli_user: Option<&str>) -> Result<Session<ProfileStore>> {
    let store = ProfileStore::open(&config.storage.store_dir)
        .context(format!("Failed to open store at {}", config.storage.store_dir.display()))?;
    let identity = match cli_user.or(config.default_user.as_deref()) {
        Some(user) => StaticIdentity::signed_in(UserId::new(user)?),
        None => StaticIdentity::signed_out(),
    };

    let mut session = Session::new(store);
    session.sync_identity(&identity)?;
    debug!(user = ?identity.current_user(), "open_session: identity synced");
    Ok(session)
}

fn require_user(session: &Session<ProfileStore>) -> Result<&UserId> {
    session
        .user()
        .ok_or_else(|| eyre!("No user given. Pass --user or set default-user in the config file."))
}

fn resolve_profile(path: Option<&Path>, session: &Session<ProfileStore>) -> Result<Profile> {
    if let Some(path) = path {
        return read_profile(path);
    }
    let user = require_user(session)?;
    session
        .profile()
        .cloned()
        .ok_or_else(|| eyre!("No profile saved for {}. Run `dp profile save --profile FILE` first.", user))
}

fn build_planner(config: &Config) -> Result<Planner> {
    config.validate()?;
    let client = create_client(&config.llm)?;
    let prompts = PromptLoader::new(config.prompts.override_dir.as_deref());
    info!(provider = %config.llm.provider, model = %config.llm.model(), "Planner ready");
    Ok(Planner::new(client, prompts).with_max_tokens(config.llm.max_tokens))
}

fn print_request(request: &GenerationRequest) -> Result<()> {
    println!("{}", "=== SYSTEM ===".bold());
    println!("{}\n", request.system_prompt);
    println!("{}", format!("=== {} PROMPT ===", request.kind.to_string().to_uppercase()).bold());
    println!("{}\n", request.prompt);
    println!("{}", "=== RESPONSE SCHEMA ===".bold());
    println!("{}", serde_json::to_string_pretty(&request.response_schema())?);
    Ok(())
}

fn print_plan(plan: &DietPlan) {
    for day in plan.days() {
        match &day.theme {
            Some(theme) => println!("{} {}", day.day.bold(), format!("[{}]", theme).yellow()),
            None => println!("{}", day.day.bold()),
        }
        for (slot, meal) in ["Breakfast", "Lunch", "Dinner"].iter().zip(day.meals.iter()) {
            println!("  {:<10} {} ({} kcal)", slot.cyan(), meal.dish_name, meal.calories);
            if !meal.ingredients.is_empty() {
                println!("             {}", meal.ingredients.join(", ").dimmed());
            }
        }
        println!("  {:<10} {} kcal\n", "Total".green(), day.total_calories);
    }
}

fn print_stores(stores: &StoreList) {
    for store in stores.stores() {
        println!("{} ({})", store.name.bold(), store.ratings);
        println!("  {}", store.address);
        println!("  {} | {}", store.timing, store.url.cyan());
        if !store.offer.trim().is_empty() && !store.offer.eq_ignore_ascii_case("none") {
            println!("  {}", store.offer.yellow());
        }
    }
}

fn print_recipes(recipes: &SavedRecipes) {
    if recipes.is_empty() {
        println!("No saved recipes");
        return;
    }
    for meal in recipes.iter() {
        println!("{} ({} kcal)", meal.dish_name.bold(), meal.calories);
        println!("  {}", meal.ingredients.join(", ").dimmed());
        println!("  {}", meal.instructions);
    }
}

fn unwrap_delivery<T>(delivery: Delivery<T>) -> Result<T> {
    match delivery {
        Delivery::Fresh(value) => Ok(value),
        Delivery::Superseded { seq, latest } => Err(eyre!("Request {} was superseded by request {}", seq, latest)),
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut session = open_session(&config, cli.user.as_deref())?;

    match cli.command {
        Command::Prompt { profile, kind } => {
            let profile = resolve_profile(profile.as_deref(), &session)?;
            let prompts = PromptLoader::new(config.prompts.override_dir.as_deref());
            let builder = RequestBuilder::new(&prompts);
            let request = match kind {
                RequestArg::Plan => {
                    let policy = compose(&profile);
                    if policy.fasting_corrected {
                        eprintln!(
                            "{} fasting mode {:?} is not available for {}; using None",
                            "!".yellow(),
                            profile.fasting_mode().as_str(),
                            profile.religion()
                        );
                    }
                    builder.diet_plan_from_policy(&policy)?
                }
                RequestArg::Stores => builder.store_lookup(profile.city())?,
            };
            print_request(&request)?;
        }
        Command::Plan {
            profile,
            output,
            format,
        } => {
            let profile = resolve_profile(profile.as_deref(), &session)?;
            let planner = build_planner(&config)?;
            let plan = unwrap_delivery(planner.generate_plan(&profile).await.map_err(report)?)?;

            if let Some(path) = output {
                fs::write(&path, serde_json::to_string_pretty(&plan)?)
                    .context(format!("Failed to write plan to {}", path.display()))?;
                info!(path = %path.display(), "Plan written");
            }
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                OutputFormat::Text => print_plan(&plan),
            }
        }
        Command::Stores { city, format } => {
            let city = match city {
                Some(city) => city,
                None => resolve_profile(None, &session)?.city().to_string(),
            };
            let planner = build_planner(&config)?;
            let stores = unwrap_delivery(planner.find_stores(&city).await.map_err(report)?)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stores)?),
                OutputFormat::Text => print_stores(&stores),
            }
        }
        Command::Profile { command } => match command {
            ProfileCommand::Show => {
                let profile = resolve_profile(None, &session)?;
                print!("{}", serde_yaml::to_string(&profile)?);
            }
            ProfileCommand::Save { profile } => {
                let profile = read_profile(&profile)?;
                require_user(&session)?;
                session.save_profile(profile)?;
                println!("{} Profile saved", "✓".green());
            }
            ProfileCommand::Set { field, value } => {
                require_user(&session)?;
                let update = ProfileUpdate::parse(&field, &value)?;
                let profile = session.update_profile(update)?;
                println!("{} Updated {}", "✓".green(), field);
                debug!(?profile, "Profile after update");
            }
            ProfileCommand::Fasting { religion } => {
                let religion: Religion = religion.parse().map_err(|e: String| eyre!(e))?;
                for option in religion.fasting_options() {
                    println!("{}", option);
                }
            }
        },
        Command::Recipes { command } => {
            require_user(&session)?;
            match command {
                RecipesCommand::List { format } => {
                    let recipes = session.recipes()?;
                    match format {
                        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recipes)?),
                        OutputFormat::Text => print_recipes(recipes),
                    }
                }
                RecipesCommand::Add { plan, dish } => {
                    let text =
                        fs::read_to_string(&plan).context(format!("Failed to read plan {}", plan.display()))?;
                    let plan = validate_plan(&text).map_err(report)?;
                    let meal = plan
                        .find_meal(&dish)
                        .cloned()
                        .ok_or_else(|| eyre!("No dish named {:?} in the plan", dish))?;
                    if session.add_recipe(meal)? {
                        println!("{} Saved {}", "✓".green(), dish);
                    } else {
                        println!("{} is already saved", dish);
                    }
                }
                RecipesCommand::Remove { dish } => {
                    if session.remove_recipe(&dish)? {
                        println!("{} Removed {}", "✓".green(), dish);
                    } else {
                        println!("{} was not saved", dish);
                    }
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    info!("dietplanner starting");

    run(cli, config).await
}
