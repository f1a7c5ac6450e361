//! Command-line front end for the dashboard API.
//!
//! Keeps the signed-in session in a JSON file (see `OPSBOARD_SESSION_PATH`)
//! and gates dashboard commands on it the same way the web client gates its
//! protected pages.

use anyhow::bail;
use clap::{Parser, Subcommand};
use opsboard::client::api::DashboardClient;
use opsboard::client::guard::{self, routes, GuardOutcome};
use opsboard::client::session::SessionStore;
use opsboard::client::storage::FileStorage;
use opsboard::client::ClientError;
use opsboard::config::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "opsboard-cli", about = "Sign in and view the Opsboard dashboard", version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Page to open once signed in.
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        from: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Print dashboard statistics and recent activity.
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "opsboard=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = ClientConfig::from_env();
    let mut session = SessionStore::open(FileStorage::new(&config.session_path));
    let mut client = DashboardClient::new(&config);

    match args.command {
        Command::Login {
            email,
            password,
            from,
        } => {
            let auth = client.login(&email, &password).await?;
            session.login(&auth)?;
            client.invalidate();
            println!("Signed in as {}", auth.user.email);
            open_page(guard::post_login_target(from.as_deref()), &session, &mut client).await?;
        }
        Command::Register {
            email,
            password,
            name,
            from,
        } => {
            let auth = client.register(&email, &password, name.as_deref()).await?;
            session.login(&auth)?;
            client.invalidate();
            println!("Registered and signed in as {}", auth.user.email);
            open_page(guard::post_login_target(from.as_deref()), &session, &mut client).await?;
        }
        Command::Logout => {
            session.logout()?;
            client.invalidate();
            println!("Signed out");
        }
        Command::Whoami => match session.user() {
            Some(_) => show_profile(&session),
            None => println!("Not signed in"),
        },
        Command::Dashboard => {
            if let GuardOutcome::Redirect { from, .. } = guard::guard(&session, routes::DASHBOARD) {
                bail!("not signed in: run `opsboard-cli login --from {from}`");
            }
            let token = session.access_token().ok_or(ClientError::NotAuthenticated)?.to_string();
            show_dashboard(&mut client, &token).await?;
        }
    }

    Ok(())
}

/// Open the page a fresh sign-in was headed for.
async fn open_page(
    target: &str,
    session: &SessionStore<FileStorage>,
    client: &mut DashboardClient,
) -> Result<(), ClientError> {
    match target {
        routes::DASHBOARD => {
            let token = session.access_token().ok_or(ClientError::NotAuthenticated)?;
            show_dashboard(client, token).await
        }
        routes::PROFILE => {
            show_profile(session);
            Ok(())
        }
        other => {
            println!("Continue to {other}");
            Ok(())
        }
    }
}

fn show_profile(session: &SessionStore<FileStorage>) {
    if let Some(user) = session.user() {
        println!(
            "{} <{}> ({:?})",
            user.name.as_deref().unwrap_or("-"),
            user.email,
            user.role
        );
    }
}

async fn show_dashboard(client: &mut DashboardClient, token: &str) -> Result<(), ClientError> {
    let stats = client.stats(token).await?;
    println!("Total users:     {}", stats.total_users);
    println!("Active users:    {}", stats.active_users);
    println!(
        "Revenue:         {:.2} ({:+.1}%)",
        stats.total_revenue, stats.percent_changes.revenue
    );
    println!(
        "Conversion rate: {:.2}% ({:+.1}%)",
        stats.conversion_rate, stats.percent_changes.conversion_rate
    );

    println!("\nRecent activity:");
    for item in client.recent_activity(token).await? {
        println!(
            "  {}  {:<28} {}",
            item.timestamp.format("%Y-%m-%d %H:%M"),
            item.description,
            item.user
        );
    }
    Ok(())
}
