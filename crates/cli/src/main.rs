//! KiddieBox CLI - the storefront from the command line.
//!
//! State lives in the data directory (`KIDDIEBOX_DATA_DIR`, default
//! `.kiddiebox`), one JSON file per collection. Signing in persists a
//! session there, so commands run as the last signed-in user.
//!
//! # Usage
//!
//! ```bash
//! # Create the default collections (idempotent)
//! kb-cli seed
//!
//! # Browse the catalog
//! kb-cli products list --category "STEM & Coding" --search space
//!
//! # Sign in and buy two products
//! kb-cli login -e user1 -p 321321
//! kb-cli checkout c2 d1
//!
//! # Ask for recommendations (needs GEMINI_API_KEY)
//! kb-cli recommend "my 5 year old loves drawing"
//!
//! # Follow the tutor chat
//! kb-cli chat watch
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kiddiebox_storefront::{AppError, StorefrontConfig};

mod commands;

#[derive(Parser)]
#[command(name = "kb-cli")]
#[command(author, version, about = "KiddieBox storefront CLI")]
struct Cli {
    /// Data directory (overrides `KIDDIEBOX_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default collections that do not exist yet
    Seed,
    /// Browse and manage the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// List or add categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage user accounts (admin)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create a student account and sign in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Password (defaults to 123456 when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Buy products as the signed-in user
    Checkout {
        /// Product IDs; repeat an ID to buy it twice
        #[arg(required = true)]
        product_ids: Vec<String>,
    },
    /// List purchases
    Enrollments {
        /// List every user's purchases (admin)
        #[arg(long)]
        all: bool,
    },
    /// Tutor chat
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Ask the AI assistant for product recommendations
    Recommend {
        /// Free-text description of the child and their interests
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Payment and shipping settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive match on title or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: String },
    /// Delete a product (admin)
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Add a category (admin)
    Add { name: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List,
    /// Delete a user (admin)
    Delete { id: String },
}

#[derive(Subcommand)]
enum ChatAction {
    /// Send a message as the signed-in user
    Send {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the chat log
    List,
    /// Follow the chat log until interrupted
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        refreshes: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current settings
    Show,
    /// Update payment settings (admin)
    Payment {
        #[arg(long)]
        enabled: Option<bool>,

        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        api_key: Option<String>,

        #[arg(long)]
        secret_key: Option<String>,
    },
    /// Update shipping settings (admin)
    Shipping {
        #[arg(long)]
        enabled: Option<bool>,

        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kiddiebox_storefront=info,kiddiebox_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }

    if let Err(e) = run(cli.command, &config).await {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            app_error.report();
            tracing::error!("{}", app_error.user_message());
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(command, Commands::Seed) {
        return commands::seed::run(config);
    }

    let mut app = commands::open(config)?;

    match command {
        Commands::Seed => {}
        Commands::Products { action } => match action {
            ProductAction::List { category, search } => {
                commands::catalog::list(&app, category.as_deref(), search.as_deref());
            }
            ProductAction::Show { id } => commands::catalog::show(&app, &id)?,
            ProductAction::Delete { id } => commands::catalog::delete(&mut app, &id)?,
        },
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::catalog::list_categories(&app),
            CategoryAction::Add { name } => commands::catalog::add_category(&mut app, &name)?,
        },
        Commands::Users { action } => match action {
            UserAction::List => commands::account::list_users(&app)?,
            UserAction::Delete { id } => commands::account::delete_user(&mut app, &id)?,
        },
        Commands::Login { email, password } => {
            commands::account::login(&mut app, &email, &password)?;
        }
        Commands::Signup {
            name,
            email,
            password,
        } => commands::account::signup(&mut app, &name, &email, password.as_deref())?,
        Commands::Logout => commands::account::logout(&mut app)?,
        Commands::Whoami => commands::account::whoami(&app),
        Commands::Checkout { product_ids } => {
            commands::account::checkout(&mut app, &product_ids)?;
        }
        Commands::Enrollments { all } => commands::account::enrollments(&app, all)?,
        Commands::Chat { action } => match action {
            ChatAction::Send { text } => commands::chat::send(&mut app, &text.join(" "))?,
            ChatAction::List => commands::chat::list(&mut app)?,
            ChatAction::Watch { refreshes } => commands::chat::watch(&app, refreshes).await?,
        },
        Commands::Recommend { query } => {
            commands::catalog::recommend(&app, &query.join(" ")).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::settings::show(&app),
            ConfigAction::Payment {
                enabled,
                provider,
                api_key,
                secret_key,
            } => commands::settings::update_payment(
                &mut app,
                commands::settings::PaymentUpdate {
                    enabled,
                    provider,
                    api_key,
                    secret_key,
                },
            )?,
            ConfigAction::Shipping {
                enabled,
                provider,
                email,
                password,
            } => commands::settings::update_shipping(
                &mut app,
                commands::settings::ShippingUpdate {
                    enabled,
                    provider,
                    email,
                    password,
                },
            )?,
        },
    }
    Ok(())
}
