//! Optimistic Users Example
//!
//! A form that adds a user to a list. The list updates immediately and the
//! change is rolled back if the (simulated) server rejects it.
//!
//! Run with: cargo run -p optimistic_users -- --fail

mod api;

use api::{Api, ApiError};
use clap::Parser;
use optimist_core::{ChangeKind, Signal, Transaction, TransactionConfig};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Adds users optimistically against a simulated API.
#[derive(Parser)]
#[command(name = "optimistic_users")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Names to add, one request each
    #[arg(default_values = ["grace", "linus"])]
    names: Vec<String>,

    /// Simulated server latency in milliseconds
    #[arg(short, long, default_value = "300")]
    latency_ms: u64,

    /// Make the server reject every request
    #[arg(short, long)]
    fail: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Form state: the name being typed and the list of users.
struct App {
    user_name: Signal<String>,
    users: Signal<Vec<String>>,
    api: Api,
}

impl App {
    fn new(api: Api) -> Self {
        Self {
            user_name: Signal::default(),
            users: Signal::new(vec!["ada".to_string()]),
            api,
        }
    }

    /// Adds the typed name to the list right away, then asks the server.
    ///
    /// On success the list is replaced with the server's copy. On failure the
    /// list and the input field go back to what they were.
    async fn add_user(&self) -> Result<(), ApiError> {
        let name = self.user_name.get();
        let txn = Transaction::with_config(TransactionConfig::new().label(format!("add {name}")));

        txn.execute(|| {
            self.users.update(|users| users.push(name.clone()));
            self.user_name.set(String::new());
        });
        info!(users = ?self.users.get(), "optimistic update applied");

        let saved = txn.follow(self.api.add_user(&name)).await?;
        self.users.set(saved);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api = Api::new(Duration::from_millis(cli.latency_ms), cli.fail);
    let app = App::new(api);

    let _watch = app.users.subscribe(|users: &Vec<String>, kind| match kind {
        ChangeKind::Write => info!(?users, "users changed"),
        ChangeKind::Restore => info!(?users, "users restored"),
    });

    for name in cli.names {
        app.user_name.set(name);
        match app.add_user().await {
            Ok(()) => info!(users = ?app.users.get(), "saved"),
            Err(err) => warn!(%err, name = %app.user_name.get(), "request failed, rolled back"),
        }
    }

    println!("users: {}", app.users.get().join(", "));
    Ok(())
}
