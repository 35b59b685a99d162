//! Taxing CLI - command-line client for the Taxing Solutions portal
//!
//! Signs in against the same backend as the web portal and keeps the session
//! in a JSON file, so route guard decisions can be checked from a shell.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taxing_auth::{
    menu_for, post_login_destination, post_register_destination, FileSessionStore, GuardOutcome,
    ProtectedRoute, RegistrationForm, RoleResolver, Session, SessionGrant, SessionStore,
};
use taxing_backend::{
    messages, BackendClient, BackendConfig, LoginRequest, PortalBackend, RegisterRequest,
};
use taxing_core::{
    default_config_path, init_logging, log_operation_error, log_operation_start,
    log_operation_success, LoggingConfig, PortalConfig, PortalResult,
};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "taxing")]
#[command(about = "Command-line client for the Taxing Solutions portal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session file path
    #[arg(long)]
    session: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Optional referral code
        #[arg(long)]
        referral_code: Option<String>,
    },

    /// Create an account and store the session
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Referral code of the franchise that referred you
        #[arg(long, default_value = "")]
        referral_code: String,

        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,

        /// Subscribe to the newsletter after registering
        #[arg(long)]
        newsletter: bool,
    },

    /// Clear the stored session
    Logout,

    /// Show the stored session
    Whoami {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check whether the stored session may open a portal path
    Check {
        /// Portal path, e.g. /franchise-dashboard
        path: String,
    },

    /// Show the navigation menu for the stored session
    Menu,

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let logging = LoggingConfig::default().with_level(if cli.verbose { "debug" } else { "warn" });
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    debug!("Starting Taxing CLI v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    let session_file = session_path(cli.session.as_deref(), &config)?;

    match cli.command {
        Commands::Login {
            email,
            password,
            referral_code,
        } => handle_login(&config, &session_file, email, password, referral_code).await?,
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            company,
            phone,
            referral_code,
            accept_terms,
            newsletter,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                company,
                phone,
                referral_code,
                confirm_password: password.clone(),
                password,
                accept_terms,
                subscribe_newsletter: newsletter,
            };
            handle_register(&config, &session_file, form).await?
        }
        Commands::Logout => handle_logout(&session_file)?,
        Commands::Whoami { json } => handle_whoami(&config, &session_file, json)?,
        Commands::Check { path } => {
            if let CheckOutcome::Redirect(_) = handle_check(&config, &session_file, &path) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Menu => handle_menu(&config, &session_file)?,
        Commands::Config {
            show,
            init,
            validate,
        } => handle_config(cli.config.as_deref(), &config, show, init, validate)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(config_path: Option<&Path>) -> Result<PortalConfig> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().ok().filter(|path| path.exists()),
    };

    if let Some(path) = &path {
        info!("Loading configuration from {:?}", path);
    }
    PortalConfig::load(path.as_deref()).context("Failed to load configuration")
}

/// Session file from the flag, then the config, then `~/.taxing/session.json`
fn session_path(flag: Option<&Path>, config: &PortalConfig) -> PortalResult<PathBuf> {
    match flag.or(config.auth.session_file.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => FileSessionStore::default_path(),
    }
}

fn backend(config: &PortalConfig) -> Result<BackendClient> {
    BackendClient::new(BackendConfig::from(&config.backend)).context("Failed to create backend client")
}

async fn handle_login(
    config: &PortalConfig,
    session_file: &Path,
    email: String,
    password: String,
    referral_code: Option<String>,
) -> Result<()> {
    log_operation_start!("login", email = %email);

    let request = LoginRequest {
        email: email.clone(),
        password,
        referral_code: referral_code.filter(|code| !code.trim().is_empty()),
    };
    let response = match backend(config)?.login(&request).await {
        Ok(response) => response,
        Err(e) => {
            log_operation_error!("login", e);
            bail!(messages::login_failure(&e));
        }
    };

    let grant = SessionGrant::new(response.access_token, &email, response.role.as_deref());
    let mut store = FileSessionStore::open(session_file)?;
    store.establish(&grant);
    store.persist()?;

    log_operation_success!("login", role = %grant.role);
    println!("Logged in as {} ({})", grant.email, grant.role);
    println!("Landing page: {}", post_login_destination(&grant.role));
    Ok(())
}

async fn handle_register(config: &PortalConfig, session_file: &Path, form: RegistrationForm) -> Result<()> {
    if let Err(problem) = form.validate() {
        bail!(problem.message());
    }

    log_operation_start!("register", email = %form.email);

    let client = backend(config)?;
    let request = RegisterRequest {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        company: form.company.clone(),
        phone: form.phone.clone(),
        password: form.password.clone(),
        referral_code: form.referral(),
    };
    let response = match client.register(&request).await {
        Ok(response) => response,
        Err(e) => {
            log_operation_error!("register", e);
            bail!(messages::register_failure(&e));
        }
    };

    if form.subscribe_newsletter {
        if let Err(e) = client.subscribe_newsletter(&form.email).await {
            warn!(email = %form.email, error = %e, "Newsletter opt-in failed");
        }
    }

    let grant = SessionGrant::new(response.access_token, response.email, response.role.as_deref());
    let mut store = FileSessionStore::open(session_file)?;
    store.establish(&grant);
    store.persist()?;

    let resolver = RoleResolver::from_settings(&config.auth);
    log_operation_success!("register", email = %grant.email);
    println!("Registered {}", grant.email);
    println!("Landing page: {}", post_register_destination(&grant.email, &resolver));
    Ok(())
}

fn handle_logout(session_file: &Path) -> Result<()> {
    // A corrupt file is replaced by an empty session
    let mut store = match FileSessionStore::open(session_file) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable session file");
            std::fs::remove_file(session_file)
                .with_context(|| format!("Failed to remove {:?}", session_file))?;
            FileSessionStore::open(session_file)?
        }
    };
    store.end();
    store.persist()?;
    println!("Logged out");
    Ok(())
}

#[derive(Debug, Serialize)]
struct WhoAmI {
    logged_in: bool,
    email: Option<String>,
    role: Option<String>,
    super_admin: bool,
}

impl WhoAmI {
    fn new(session: &Session, resolver: &RoleResolver) -> Self {
        Self {
            logged_in: session.is_logged_in(),
            email: session.user_email.clone(),
            role: session.user_role.clone(),
            super_admin: resolver.is_super_admin(session),
        }
    }
}

fn handle_whoami(config: &PortalConfig, session_file: &Path, json: bool) -> Result<()> {
    let session = FileSessionStore::open(session_file)?.snapshot();
    let resolver = RoleResolver::from_settings(&config.auth);
    let who = WhoAmI::new(&session, &resolver);

    if json {
        println!("{}", serde_json::to_string_pretty(&who)?);
        return Ok(());
    }

    if !who.logged_in {
        println!("Not logged in");
        return Ok(());
    }
    println!("Email: {}", who.email.as_deref().unwrap_or("-"));
    println!("Role: {}", who.role.as_deref().unwrap_or("-"));
    if who.super_admin {
        println!("Super admin: yes");
    }
    Ok(())
}

/// Result of `taxing check`
#[derive(Debug, PartialEq, Eq)]
enum CheckOutcome {
    Public,
    Authorized(ProtectedRoute),
    Redirect(String),
}

/// Run the route guard for `path` with whatever `read_session` yields
fn check_path<F>(path: &str, home: &str, resolver: &RoleResolver, read_session: F) -> CheckOutcome
where
    F: FnOnce() -> PortalResult<Session>,
{
    let Some(route) = ProtectedRoute::for_path(path) else {
        return CheckOutcome::Public;
    };

    let mut guard = route.guard(home);
    guard.evaluate(resolver, read_session);
    match guard.outcome() {
        GuardOutcome::Render => CheckOutcome::Authorized(route),
        GuardOutcome::Redirect { to, .. } => CheckOutcome::Redirect(to),
        GuardOutcome::Pending => CheckOutcome::Redirect(home.to_string()),
    }
}

/// Exits non-zero when the guard would redirect
fn handle_check(config: &PortalConfig, session_file: &Path, path: &str) -> CheckOutcome {
    let resolver = RoleResolver::from_settings(&config.auth);
    let outcome = check_path(path, &config.auth.home_path, &resolver, || {
        FileSessionStore::open(session_file).map(|store| store.snapshot())
    });

    match &outcome {
        CheckOutcome::Public => println!("{} is public", path),
        CheckOutcome::Authorized(route) => println!("Authorized for {}", route.path()),
        CheckOutcome::Redirect(to) => println!("Not authorized; redirect to {}", to),
    }
    outcome
}

fn handle_menu(config: &PortalConfig, session_file: &Path) -> Result<()> {
    let session = FileSessionStore::open(session_file)?.snapshot();
    let resolver = RoleResolver::from_settings(&config.auth);
    for item in menu_for(&session, &resolver) {
        println!("{:<14} {:<22} {}", item.label, item.href, item.description);
    }
    Ok(())
}

fn handle_config(
    config_path: Option<&Path>,
    config: &PortalConfig,
    show: bool,
    init: bool,
    validate: bool,
) -> Result<()> {
    if init {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        PortalConfig::default().save_to_file(&path)?;
        println!("Configuration initialized at: {:?}", path);
    }

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                println!("Configuration validation failed: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
