use gsctl::auth::AuthContext;
use gsctl::backend::BackendClient;
use gsctl::cli::{format_ports, parse_args, run_start, run_stop, version_line, CliCommand, USAGE};
use gsctl::config::ClientConfig;
use gsctl::state::DashboardState;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gsctl=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn auth_from(config: &ClientConfig) -> Result<AuthContext> {
    config
        .token
        .as_deref()
        .map(AuthContext::bearer)
        .ok_or_else(|| eyre!("GSCTL_TOKEN is not set"))
}

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle commands that need no runtime before any initialization
    match &command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid { reason } => {
            eprintln!("Error: {}\n\n{}", reason, USAGE);
            std::process::exit(2);
        }
        CliCommand::Start { .. } | CliCommand::Stop { .. } => {}
    }

    color_eyre::install()?;
    init_tracing()?;

    let config = ClientConfig::from_env();
    let auth = auth_from(&config)?;
    let client = BackendClient::from_config(&config).wrap_err("Failed to build HTTP client")?;

    let runtime = tokio::runtime::Runtime::new()?;

    match command {
        CliCommand::Start { name } => {
            let mut state = DashboardState::with_log_capacity(config.log_capacity);
            println!("Starting {}...", name);

            let interrupt = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            let outcome =
                runtime.block_on(run_start(&client, &auth, &name, &mut state, interrupt));

            match outcome {
                Ok(ports) => {
                    println!("✓ {} is running ({})", name, format_ports(&ports));
                }
                Err(e) => {
                    eprintln!("✗ {}", e.user_message());
                    eprintln!("  {} [{}]", e.category().recovery_hint(), e.error_code());
                    std::process::exit(1);
                }
            }
        }
        CliCommand::Stop { name } => {
            runtime
                .block_on(run_stop(&client, &auth, &name))
                .wrap_err_with(|| format!("Failed to stop {}", name))?;
            println!("✓ Stop requested for {}", name);
        }
        _ => {}
    }

    Ok(())
}
