use anyhow::{bail, Context, Result};
use rugs::{
    api::routes::build_app,
    cli::{output::Output, password_or_prompt, Cli, Commands},
    types::{is_valid_email, validate_password_strength},
    utils::logging::init_tracing,
    AppState, PasswordHasher, RugStore, RugsConfig, TokenService,
};
use tokio::signal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if !cli.config.exists() {
        output.warning(&format!(
            "{} not found, using default configuration",
            cli.config.display()
        ));
    }
    let config = RugsConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        None | Some(Commands::Serve) => serve(config, &output).await,
        Some(Commands::CreateAdmin {
            name,
            email,
            password,
        }) => create_admin(config, &output, name, email, password).await,
        Some(Commands::Config { validate }) => show_config(&config, &output, validate),
    }
}

async fn serve(config: RugsConfig, output: &Output) -> Result<()> {
    output.banner();

    init_tracing(&config.server.log_level)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let secret = config
        .jwt_secret()
        .context("JWT secret is required to start the server")?;
    let tokens = TokenService::new(secret)?;

    let store = RugStore::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.url))?;
    tracing::info!(url = %config.database.url, "Connected to database");

    let addr = config.bind_address();

    // The login service hashes once on construction; keep that off the runtime.
    let state = tokio::task::spawn_blocking(move || {
        AppState::new(config, store, tokens, PasswordHasher::default())
    })
    .await
    .context("Failed to build application state")??;

    if state.config.cors.allowed_origins.is_empty() {
        tracing::info!("CORS allows any origin");
    } else {
        tracing::info!(origins = ?state.config.cors.allowed_origins, "CORS origins configured");
    }

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("HTTP server listening on {}", addr);
    output.info(&format!("Listening on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn create_admin(
    config: RugsConfig,
    output: &Output,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name must not be empty");
    }
    if !is_valid_email(&email) {
        bail!("Invalid email address: {}", email);
    }

    let password = password_or_prompt(password).context("Failed to read password")?;
    validate_password_strength(&password)?;

    let store = RugStore::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.url))?;

    if store.get_admin_by_email(&email).await?.is_some() {
        bail!("An admin with email {} already exists", email);
    }

    output.info("Hashing password");
    let password_hash = PasswordHasher::default()
        .hash_password_async(password)
        .await?;

    let user_id = Uuid::new_v4();
    store
        .create_admin(user_id, name.trim(), &email, &password_hash)
        .await?;

    output.success(&format!("Admin {} created", email));
    output.kv("id", &user_id.to_string());
    output.kv("database", &config.database.url);
    Ok(())
}

fn show_config(config: &RugsConfig, output: &Output, validate: bool) -> Result<()> {
    output.header("Configuration");
    output.kv("bind address", &config.bind_address());
    output.kv("log level", &config.server.log_level);
    output.kv("database", &config.database.url);
    output.kv("jwt secret env", &config.auth.jwt_secret_env);

    let origins = if config.cors.allowed_origins.is_empty() {
        "any".to_string()
    } else {
        config.cors.allowed_origins.join(", ")
    };
    output.kv("cors origins", &origins);

    if validate {
        config.validate()?;
        match config.jwt_secret() {
            Ok(_) => output.success("JWT secret is set"),
            Err(e) => {
                output.error(&e.to_string());
                bail!("Configuration is not valid");
            }
        }
        output.success("Configuration is valid");
    } else {
        output.hint("Run with --validate to also check the JWT secret");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
