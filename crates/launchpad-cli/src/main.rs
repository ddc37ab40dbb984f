mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "launchpad",
    about = "Provision Qovery projects on behalf of Hasura actions",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the create/start/stop/delete project actions
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,

        /// YAML file overriding the application template
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Print a signed Hasura token for a user
    Token {
        /// Value of the x-hasura-user-id claim
        #[arg(long)]
        user_id: String,

        /// Signing secret
        #[arg(long, env = "SECRET", hide_env_values = true)]
        secret: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        Commands::Token { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            template,
        } => cmd::serve::run(&host, port, template.as_deref()),
        Commands::Token { user_id, secret } => cmd::token::run(&user_id, &secret),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
