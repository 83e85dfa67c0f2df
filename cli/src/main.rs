mod coach;
mod commands;
mod config;
mod server;
mod spoonacular;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::coach::CoachClient;
use crate::commands::{
    cmd_add, cmd_coach, cmd_goals, cmd_log, cmd_photo, cmd_plan_set, cmd_plan_show,
    cmd_profile_set, cmd_profile_show, cmd_quota_reset, cmd_quota_show, cmd_streak, cmd_summary,
    cmd_weight_history, cmd_weight_log, cmd_weight_show,
};
use crate::config::Config;
use crate::spoonacular::SpoonacularClient;
use nosh_core::service::NoshService;

#[derive(Parser)]
#[command(
    name = "nosh",
    version,
    about = "A simple macro and streak tracker CLI",
    long_about = "\n\n  ███╗   ██╗ ██████╗ ███████╗██╗  ██╗
  ████╗  ██║██╔═══██╗██╔════╝██║  ██║
  ██╔██╗ ██║██║   ██║███████╗███████║
  ██║╚██╗██║██║   ██║╚════██║██╔══██║
  ██║ ╚████║╚██████╔╝███████║██║  ██║
  ╚═╝  ╚═══╝ ╚═════╝ ╚══════╝╚═╝  ╚═╝
        log it, hit your macros.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a meal by describing it
    Log {
        /// Meal description to look up
        query: String,
        /// Use only the bundled offline catalog (no network, no quota)
        #[arg(long)]
        offline: bool,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a meal from a photo URL
    Photo {
        /// URL of the meal photo
        image: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a meal with explicit macros (no lookup)
    Add {
        /// Meal name
        title: String,
        /// Calories
        #[arg(long, default_value = "0")]
        calories: f64,
        /// Protein in grams
        #[arg(long, default_value = "0")]
        protein: f64,
        /// Carbs in grams
        #[arg(long, default_value = "0")]
        carbs: f64,
        /// Fat in grams
        #[arg(long, default_value = "0")]
        fat: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's totals against targets (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the logging streak
    Streak {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show computed calorie/macro targets
    Goals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Manage the diet plan (goal, activity, pace, restrictions)
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Track body weight
    Weight {
        #[command(subcommand)]
        command: WeightCommands,
    },
    /// Ask the nutrition coach
    Coach {
        /// Your question
        message: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or reset the daily remote-lookup quota
    Quota {
        #[command(subcommand)]
        command: QuotaCommands,
    },
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
        /// Disable API key authentication (for development/testing)
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Set profile fields
    Set {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Current weight in kg (also recorded in weight history)
        #[arg(long)]
        weight: Option<f64>,
        /// Goal weight in kg
        #[arg(long)]
        goal_weight: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        /// Age in years
        #[arg(long)]
        age: Option<u32>,
        /// Biological sex: male, female, other, unknown
        #[arg(long)]
        sex: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Set diet plan fields
    Set {
        /// Goal: lose, maintain, gain
        #[arg(long)]
        goal: Option<String>,
        /// Activity level: sedentary, light, moderate, high
        #[arg(long)]
        activity: Option<String>,
        /// Pace: slowly, steadily, quickly
        #[arg(long)]
        pace: Option<String>,
        /// Dietary restriction: vegetarian, vegan, gluten-free, none (repeatable)
        #[arg(long = "restrict")]
        restrictions: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the diet plan
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeightCommands {
    /// Log a weight entry (overwrites the entry for the same date)
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: kg)
        #[arg(short, long, default_value = "kg")]
        unit: String,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show weight for a specific date (default: today)
    Show {
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full weight history
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum QuotaCommands {
    /// Show remaining lookups for today
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Zero usage and stamp today (normally done by the daily scheduler)
    Reset {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let svc = NoshService::open(&config.db_path)?;

    match cli.command {
        Commands::Log {
            query,
            offline,
            date,
            json,
        } => {
            let client = if offline {
                None
            } else {
                Config::nutrition_api_key().ok().map(SpoonacularClient::new)
            };
            cmd_log(&svc, client.as_ref(), &query, offline, date, json)
        }
        Commands::Photo { image, date, json } => {
            let client = SpoonacularClient::new(Config::nutrition_api_key()?);
            cmd_photo(&svc, &client, &image, date, json)
        }
        Commands::Add {
            title,
            calories,
            protein,
            carbs,
            fat,
            date,
            json,
        } => cmd_add(&svc, &title, calories, protein, carbs, fat, date, json),
        Commands::Summary { date, json } => cmd_summary(&svc, date, json),
        Commands::Streak { json } => cmd_streak(&svc, json),
        Commands::Goals { json } => cmd_goals(&svc, json),
        Commands::Profile { command } => match command {
            ProfileCommands::Set {
                name,
                weight,
                goal_weight,
                height,
                age,
                sex,
                json,
            } => cmd_profile_set(&svc, name, weight, goal_weight, height, age, sex, json),
            ProfileCommands::Show { json } => cmd_profile_show(&svc, json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Set {
                goal,
                activity,
                pace,
                restrictions,
                json,
            } => cmd_plan_set(&svc, goal, activity, pace, restrictions, json),
            PlanCommands::Show { json } => cmd_plan_show(&svc, json),
        },
        Commands::Weight { command } => match command {
            WeightCommands::Log {
                value,
                unit,
                date,
                json,
            } => cmd_weight_log(&svc, value, &unit, date, json),
            WeightCommands::Show { date, json } => cmd_weight_show(&svc, date, json),
            WeightCommands::History { json } => cmd_weight_history(&svc, json),
        },
        Commands::Coach { message, json } => {
            let client = CoachClient::new(Config::coach_api_key()?);
            cmd_coach(&svc, &client, &message, json).await
        }
        Commands::Quota { command } => match command {
            QuotaCommands::Show { json } => cmd_quota_show(&svc, json),
            QuotaCommands::Reset { json } => cmd_quota_reset(&svc, json),
        },
        Commands::Serve { port, bind, no_auth } => {
            let api_key = if no_auth {
                None
            } else {
                let (key, _) = config.load_or_create_api_key()?;
                Some(key)
            };
            let provider = Config::nutrition_api_key().ok().map(SpoonacularClient::new);
            server::start_server(svc, provider, port, &bind, api_key).await
        }
    }
}
