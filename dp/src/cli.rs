//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::Profile;

/// dietplanner - profile-driven diet plans and grocery store lookup
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Generate a 7-day diet plan and find grocery stores from a user profile",
    version,
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// User to act as (defaults to config `default-user`)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the request that would be sent, without calling the model
    Prompt {
        /// Profile file (YAML or JSON); defaults to the user's saved profile
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Which request to show
        #[arg(short, long, value_enum, default_value_t = RequestArg::Plan)]
        kind: RequestArg,
    },

    /// Generate a 7-day diet plan
    Plan {
        /// Profile file (YAML or JSON); defaults to the user's saved profile
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Also write the plan as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find grocery stores near a city
    Stores {
        /// City to search; defaults to the saved profile's city
        #[arg(long)]
        city: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the saved profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Manage saved recipes
    Recipes {
        #[command(subcommand)]
        command: RecipesCommand,
    },
}

/// Profile subcommands
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the saved profile
    Show,

    /// Save a profile file as the user's profile
    Save {
        /// Profile file (YAML or JSON)
        #[arg(short, long)]
        profile: PathBuf,
    },

    /// Change one field of the saved profile
    Set {
        /// Field name, e.g. religion, fasting-mode, health-issues
        field: String,

        /// New value
        value: String,
    },

    /// List fasting observances available for a religion
    Fasting {
        /// Religion name
        religion: String,
    },
}

/// Saved-recipe subcommands
#[derive(Debug, Subcommand)]
pub enum RecipesCommand {
    /// List saved recipes
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Save a dish from a plan file written by `dp plan --output`
    Add {
        /// Plan JSON file
        #[arg(long)]
        plan: PathBuf,

        /// Dish name to save
        #[arg(long)]
        dish: String,
    },

    /// Remove a saved dish
    Remove {
        /// Dish name to remove
        dish: String,
    },
}

/// Request kinds selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestArg {
    Plan,
    Stores,
}

/// Output format for plan, store and recipe listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Read and validate a profile from a YAML or JSON file
pub fn read_profile(path: &Path) -> Result<Profile> {
    debug!(?path, "read_profile: called");
    let content = std::fs::read_to_string(path).context(format!("Failed to read profile {}", path.display()))?;
    // YAML is a superset of JSON, so one parser covers both
    let profile: Profile =
        serde_yaml::from_str(&content).context(format!("Failed to parse profile {}", path.display()))?;
    profile.validate()?;
    Ok(profile)
}

/// Location of the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dietplanner")
        .join("logs")
        .join("dietplanner.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from(["dp", "--user", "asha", "plan", "--format", "json"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("asha"));
        match cli.command {
            Command::Plan { profile, format, .. } => {
                assert!(profile.is_none());
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_read_profile_yaml_and_json() {
        let temp = TempDir::new().unwrap();
        let yaml = temp.path().join("profile.yml");
        std::fs::write(
            &yaml,
            "age: 45\nsex: Male\nweight_kg: 82\nheight_cm: 172\ncity: Chennai\nplan_start: 2026-01-10\ncuisine: South Indian\n",
        )
        .unwrap();
        let profile = read_profile(&yaml).unwrap();
        assert_eq!(profile.city(), "Chennai");

        let json = temp.path().join("profile.json");
        std::fs::write(&json, serde_json::to_string(&profile).unwrap()).unwrap();
        assert_eq!(read_profile(&json).unwrap(), profile);
    }

    #[test]
    fn test_read_profile_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("profile.yml");
        std::fs::write(
            &path,
            "age: 45\nsex: Male\nweight_kg: 0\nheight_cm: 172\ncity: Chennai\nplan_start: 2026-01-10\n",
        )
        .unwrap();
        assert!(read_profile(&path).is_err());
    }
}
