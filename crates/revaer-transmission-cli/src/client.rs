//! Connection settings, error types, and the context shared by command handlers.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use clap::Args;
use revaer_transmission::{
    ClientConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RPC_PATH, RpcError, TransmissionClient,
};

use crate::cli::OutputFormat;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<RpcError> for CliError {
    fn from(error: RpcError) -> Self {
        match error {
            RpcError::InvalidArgument { .. } => Self::validation(error.detail()),
            RpcError::Unauthorized { .. } => Self::failure(anyhow!(
                "{} (check --username/--password or TRANSMISSION_USERNAME/TRANSMISSION_PASSWORD)",
                error.detail()
            )),
            other => Self::failure(anyhow!(other.detail())),
        }
    }
}

/// Daemon connection flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct ConnectionArgs {
    #[arg(long, global = true, env = "TRANSMISSION_HOST", default_value = DEFAULT_HOST)]
    pub(crate) host: String,
    #[arg(long, global = true, env = "TRANSMISSION_PORT", default_value_t = DEFAULT_PORT)]
    pub(crate) port: u16,
    #[arg(long, global = true, env = "TRANSMISSION_TLS", help = "Connect over HTTPS")]
    pub(crate) tls: bool,
    #[arg(
        long,
        global = true,
        env = "TRANSMISSION_RPC_PATH",
        default_value = DEFAULT_RPC_PATH
    )]
    pub(crate) rpc_path: String,
    #[arg(long, global = true, env = "TRANSMISSION_USERNAME")]
    pub(crate) username: Option<String>,
    #[arg(
        long,
        global = true,
        env = "TRANSMISSION_PASSWORD",
        hide_env_values = true
    )]
    pub(crate) password: Option<String>,
    #[arg(
        long,
        global = true,
        env = "TRANSMISSION_SESSION_ID",
        help = "Seed the session id instead of learning it from the daemon"
    )]
    pub(crate) session_id: Option<String>,
    #[arg(
        long,
        global = true,
        env = "TRANSMISSION_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
}

impl ConnectionArgs {
    /// Translate the flags into a client configuration.
    pub(crate) fn to_config(&self) -> CliResult<ClientConfig> {
        if self.timeout == 0 {
            return Err(CliError::validation("timeout must be at least one second"));
        }

        let mut config = ClientConfig::default()
            .with_host(self.host.trim())
            .with_port(self.port)
            .with_tls(self.tls)
            .with_rpc_path(self.rpc_path.trim())
            .with_timeout(Duration::from_secs(self.timeout));

        match (&self.username, &self.password) {
            (Some(username), password) => {
                config = config.with_credentials(
                    username.as_str(),
                    password.as_deref().unwrap_or_default(),
                );
            }
            (None, Some(_)) => {
                return Err(CliError::validation(
                    "--password requires --username (or TRANSMISSION_USERNAME)",
                ));
            }
            (None, None) => {}
        }

        if let Some(token) = self
            .session_id
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            config = config.with_session_token(token);
        }

        Ok(config)
    }
}

/// Application context passed to command handlers.
#[derive(Debug)]
pub(crate) struct AppContext {
    pub(crate) client: TransmissionClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Build the context from connection flags.
    pub(crate) fn connect(connection: &ConnectionArgs, output: OutputFormat) -> CliResult<Self> {
        let config = connection.to_config()?;
        let client = TransmissionClient::new(&config)?;
        tracing::debug!(endpoint = %client.endpoint(), "client configured");
        Ok(Self { client, output })
    }
}
