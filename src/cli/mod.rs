//! CLI module for the rugs server
//!
//! Provides command-line interface parsing for the rugs-server binary.
//! Uses clap for argument parsing, dialoguer for the hidden password prompt and
//! owo-colors for colored terminal output.

/// Colored terminal output.
pub mod output;

use clap::{Parser, Subcommand};
use dialoguer::Password;
use std::path::PathBuf;

/// Custom Rugs Server
///
/// Order intake and administration backend for a custom-rug business.
#[derive(Parser, Debug)]
#[command(
    name = "rugs-server",
    version,
    about = "Custom Rugs Server",
    long_about = "Order intake and administration backend for a custom-rug business.\n\n\
                  Run without arguments to start the server, or use 'create-admin' to\n\
                  provision the first admin account.",
    after_help = "EXAMPLES:\n    \
                  rugs-server                                  # Start the server (reads rugs.toml)\n    \
                  rugs-server --config my.toml                 # Use a custom config file\n    \
                  rugs-server create-admin --name Ana --email ana@example.com\n    \
                  rugs-server config --validate                # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "rugs.toml", global = true)]
    pub config: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,

    /// Create an admin account directly in the database
    ///
    /// Use this to provision the first admin; later admins can be added
    /// through `POST /admin/new-admin`.
    CreateAdmin {
        /// Display name
        #[arg(long)]
        name: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long, env = "RUGS_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file and the JWT secret
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Returns `password` when given, otherwise reads one from the terminal with
/// hidden input and a confirmation.
pub fn password_or_prompt(password: Option<String>) -> dialoguer::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact(),
    }
}
