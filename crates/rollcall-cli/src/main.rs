//! Rollcall - attendance at a glance, friends included
//!
//! Thin front-end over rollcall-core:
//! - Login/refresh with offline cache fallback and staleness labelling
//! - Friends view fed by concurrent per-account fetches

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use rollcall_core::aggregate::AggregationEngine;
use rollcall_core::constants;
use rollcall_core::model::{parse_session_codes, AttendanceSnapshot};
use rollcall_core::remote::AttendanceClient;
use rollcall_core::storage::{CredentialStore, FriendRegistry};
use rollcall_core::sync::{SyncEngine, SyncOutcome};

/// Rollcall - attendance tracker
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Attendance tracker with offline cache and friends view", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Relay endpoint override
    #[arg(long)]
    endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and fetch the first snapshot
    Login {
        roll: String,
        #[arg(long)]
        password: String,
    },

    /// Show the stored snapshot, then refresh it
    Status,

    /// Re-fetch with the stored credentials
    Refresh,

    /// Forget stored credentials and cached data
    Logout,

    /// Manage and check tracked friends
    Friends {
        #[command(subcommand)]
        action: FriendCommands,
    },
}

#[derive(Subcommand)]
enum FriendCommands {
    /// List tracked accounts
    List,
    /// Track a new account
    Add {
        name: String,
        roll: String,
        #[arg(long)]
        password: String,
    },
    /// Stop tracking an account
    Remove { roll: String },
    /// Fetch every friend's attendance percentage
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = match &cli.endpoint {
        Some(endpoint) => AttendanceClient::with_endpoint(endpoint),
        None => AttendanceClient::new(),
    };

    match cli.command {
        Commands::Login { roll, password } => {
            // Input validation happens here, before any network call
            if roll.trim().is_empty() || password.is_empty() {
                anyhow::bail!("Please provide both roll number and password");
            }
            let engine = SyncEngine::new(client, CredentialStore::new());
            report(engine.sync(&roll, &password).await);
        }
        Commands::Status => {
            let engine = SyncEngine::new(client, CredentialStore::new());
            let Some((credentials, snapshot, age_hours)) = engine.cached() else {
                anyhow::bail!("Not signed in - run `rollcall login <roll> --password <password>`");
            };
            // Optimistic render of the cache; the refresh below supersedes it
            if age_hours > 0 {
                println!("Showing cached data ({} hours old) - refreshing...", age_hours);
            }
            render(&snapshot);
            println!();
            report(engine.sync(&credentials.roll, &credentials.password).await);
        }
        Commands::Refresh => {
            let engine = SyncEngine::new(client, CredentialStore::new());
            let Some((credentials, _, _)) = engine.cached() else {
                anyhow::bail!("Not signed in");
            };
            report(engine.sync(&credentials.roll, &credentials.password).await);
        }
        Commands::Logout => {
            CredentialStore::new().clear()?;
            println!("Signed out.");
        }
        Commands::Friends { action } => run_friends(action, client).await?,
    }

    Ok(())
}

async fn run_friends(action: FriendCommands, client: AttendanceClient) -> Result<()> {
    let registry = FriendRegistry::new();
    match action {
        FriendCommands::List => {
            let friends = registry.list()?;
            if friends.is_empty() {
                println!("No friends added yet.");
            }
            for friend in friends {
                println!("{}  ({})", friend.name, friend.roll);
            }
        }
        FriendCommands::Add {
            name,
            roll,
            password,
        } => {
            registry.add(&name, &roll, &password)?;
            println!("Tracking {} ({}).", name, roll);
        }
        FriendCommands::Remove { roll } => {
            if registry.remove(&roll)? {
                println!("Removed {}.", roll);
            } else {
                println!("{} was not tracked.", roll);
            }
        }
        FriendCommands::Check => {
            let friends = registry.list()?;
            if friends.is_empty() {
                println!("No friends added yet.");
                return Ok(());
            }
            let engine = AggregationEngine::new(client);
            let cancel = CancellationToken::new();
            let results = engine.aggregate(&friends, &cancel).await;
            for friend in &friends {
                let percentage = results.get(&friend.roll).copied().and_then(|p| p.known());
                match percentage {
                    Some(p) => println!("{:<20} {:>6.1}%", friend.name, p),
                    None => println!("{:<20}     ...", friend.name),
                }
            }
        }
    }
    Ok(())
}

fn render(snapshot: &AttendanceSnapshot) {
    if let Some(roll) = &snapshot.roll_number {
        println!("Roll: {}", roll);
    }
    if let Some(total) = &snapshot.total_info {
        match snapshot.overall_percentage() {
            Some(p) => println!(
                "Overall: {:.1}% ({} of {} classes)",
                p, total.total_attended, total.total_held
            ),
            None => println!(
                "Overall: {} of {} classes",
                total.total_attended, total.total_held
            ),
        }
    }
    for subject in &snapshot.subjectwise_summary {
        let percentage = subject
            .percentage
            .map(|p| format!("{:.1}%", p.0))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "  {:<24} {:>7}  {}",
            subject.subject_name, percentage, subject.attended_held
        );
    }
    let low = snapshot.subjects_below(constants::attendance::REQUIRED_PERCENTAGE);
    if !low.is_empty() {
        println!(
            "Below {:.0}%: {}",
            constants::attendance::REQUIRED_PERCENTAGE,
            low.iter()
                .map(|s| s.subject_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    for day in &snapshot.attendance_summary {
        if day.attendance_today.is_empty() {
            continue;
        }
        let sessions: Vec<String> = parse_session_codes(&day.attendance_today)
            .iter()
            .map(|s| format!("{}:{:?}", s.period, s.status))
            .collect();
        println!("  today {:<18} {}", day.subject, sessions.join(" "));
    }
}

fn report(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Success(snapshot) => {
            println!("Up to date.");
            render(&snapshot);
        }
        SyncOutcome::Fallback {
            snapshot, message, ..
        } => {
            println!("{}", message);
            render(&snapshot);
        }
        SyncOutcome::Failure(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}
