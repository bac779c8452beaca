//! `ballot`: operator CLI for tokenized ballots.

mod config;

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ballot_abi::ContractInterface;
use ballot_ops::params;
use ballot_ops::{AutoConfirm, Confirmer, FlowError, LineConfirmer, Operator, RunReport, WaitPolicy};
use ballot_rpc::{ClientConfig, ClientSettings};
use ballot_types::InputError;
use ballot_utils::{format_duration, init_logging, LogFormat};

use crate::config::{DEFAULT_BALLOT_ARTIFACT, DEFAULT_LOG_LEVEL, DEFAULT_TOKEN_ARTIFACT};

#[derive(Parser)]
#[command(
    name = "ballot",
    version,
    about = "Deploy, vote on, and fund token-weighted ballots"
)]
struct Cli {
    /// Network: "mainnet", "sepolia", "holesky", or "local".
    /// Defaults to sepolia when neither the config file nor BALLOT_NETWORK sets it.
    #[arg(long, global = true)]
    network: Option<String>,

    /// Explicit JSON-RPC endpoint; replaces the provider URL built from the API key.
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Path to a TOML configuration file. Environment variables and flags
    /// override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Compiled ballot artifact (Hardhat or Foundry JSON).
    #[arg(long, global = true, env = "BALLOT_BALLOT_ARTIFACT")]
    ballot_artifact: Option<PathBuf>,

    /// Compiled token artifact (Hardhat or Foundry JSON).
    #[arg(long, global = true, env = "BALLOT_TOKEN_ARTIFACT")]
    token_artifact: Option<PathBuf>,

    /// Approve the write without prompting.
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Seconds to wait for a submitted transaction before giving up.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy a ballot with one or more proposals.
    Deploy {
        #[arg(value_name = "NAME... TOKEN DURATION", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Cast votes for a proposal.
    Vote {
        #[arg(value_name = "BALLOT INDEX AMOUNT", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Mint tokens to an account.
    Mint {
        #[arg(value_name = "TOKEN TO AMOUNT", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Transfer tokens from the signer.
    Transfer {
        #[arg(value_name = "TOKEN TO AMOUNT", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delegate the signer's voting power (to itself when no delegatee is given).
    Delegate {
        #[arg(value_name = "TOKEN [DELEGATEE]", allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn args(&self) -> &[String] {
        match self {
            Self::Deploy { args }
            | Self::Vote { args }
            | Self::Mint { args }
            | Self::Transfer { args }
            | Self::Delegate { args } => args,
        }
    }

    /// Check the positional arguments before any configuration or network work.
    fn validate(&self) -> Result<(), InputError> {
        let args = self.args();
        match self {
            Self::Deploy { .. } => params::validate_deploy(args).map(drop),
            Self::Vote { .. } => params::validate_vote(args).map(drop),
            Self::Mint { .. } => params::validate_mint(args).map(drop),
            Self::Transfer { .. } => params::validate_transfer(args).map(drop),
            Self::Delegate { .. } => params::validate_delegate(args).map(drop),
        }
    }

    fn needs_ballot(&self) -> bool {
        matches!(self, Self::Deploy { .. } | Self::Vote { .. })
    }

    fn needs_token(&self) -> bool {
        !matches!(self, Self::Vote { .. })
    }
}

/// Interfaces loaded for one command.
struct Contracts {
    ballot: Option<ContractInterface>,
    token: Option<ContractInterface>,
}

impl Contracts {
    fn ballot(&self) -> anyhow::Result<&ContractInterface> {
        self.ballot.as_ref().context("ballot artifact not loaded")
    }

    fn token(&self) -> anyhow::Result<&ContractInterface> {
        self.token.as_ref().context("token artifact not loaded")
    }
}

fn load_interface(path: &Path, what: &str) -> anyhow::Result<ContractInterface> {
    let interface = ContractInterface::load(path)
        .with_context(|| format!("failed to load {what} artifact from {}", path.display()))?;
    tracing::debug!(contract = interface.name(), path = %path.display(), "artifact loaded");
    Ok(interface)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<FlowError>() {
            Some(flow) if flow.is_cancellation() => {
                eprintln!("Operation cancelled");
                ExitCode::from(flow.exit_code())
            }
            Some(flow) => {
                eprintln!("error: {flow}");
                if let FlowError::TimedOut { hash, .. } = flow {
                    eprintln!("check {hash} on a block explorer before retrying");
                }
                ExitCode::from(flow.exit_code())
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunReport> {
    cli.command.validate().map_err(FlowError::from)?;

    let (file_client, file) = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => Default::default(),
    };

    let log_format: LogFormat = cli
        .log_format
        .as_deref()
        .or(file.log_format.as_deref())
        .unwrap_or("human")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let log_level = cli
        .log_level
        .as_deref()
        .or(file.log_level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    init_logging(log_format, log_level);
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    let flags = ClientSettings {
        network: cli.network.clone(),
        rpc_url: cli.rpc_url.clone(),
        ..Default::default()
    };
    let settings = config::layer(file_client, ClientSettings::from_env(), flags);
    let client = ClientConfig::new(settings).context("incomplete client configuration")?;

    let mut policy: WaitPolicy = file.wait;
    if let Some(secs) = cli.timeout_secs {
        policy.timeout_secs = secs;
    }

    let contracts = Contracts {
        ballot: cli
            .command
            .needs_ballot()
            .then(|| {
                let path = cli
                    .ballot_artifact
                    .clone()
                    .or(file.ballot_artifact.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_BALLOT_ARTIFACT));
                load_interface(&path, "ballot")
            })
            .transpose()?,
        token: cli
            .command
            .needs_token()
            .then(|| {
                let path = cli
                    .token_artifact
                    .clone()
                    .or(file.token_artifact.clone())
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_ARTIFACT));
                load_interface(&path, "token")
            })
            .transpose()?,
    };

    let (ledger, submitter) = ballot_rpc::connect(&client)
        .await
        .map_err(|e| FlowError::LedgerUnavailable(e.to_string()))?;
    tracing::info!(
        network = client.network().as_str(),
        wait = %format_duration(policy.timeout()),
        "ready"
    );
    let operator = Operator::new(&ledger, &submitter, client.network(), policy);

    let report = if cli.yes {
        dispatch(&operator, &cli.command, &contracts, AutoConfirm).await?
    } else {
        dispatch(&operator, &cli.command, &contracts, LineConfirmer::stdio()).await?
    };
    Ok(report)
}

async fn dispatch<L, S, C>(
    operator: &Operator<'_, L, S>,
    command: &Command,
    contracts: &Contracts,
    confirmer: C,
) -> anyhow::Result<RunReport>
where
    L: ballot_rpc::LedgerClient,
    S: ballot_rpc::TransactionSubmitter,
    C: Confirmer,
{
    let args = command.args();
    let report = match command {
        Command::Deploy { .. } => {
            operator
                .deploy(args, contracts.ballot()?, contracts.token()?, confirmer)
                .await?
        }
        Command::Vote { .. } => operator.vote(args, contracts.ballot()?, confirmer).await?,
        Command::Mint { .. } => operator.mint(args, contracts.token()?, confirmer).await?,
        Command::Transfer { .. } => {
            operator
                .transfer(args, contracts.token()?, confirmer)
                .await?
        }
        Command::Delegate { .. } => {
            operator
                .delegate(args, contracts.token()?, confirmer)
                .await?
        }
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcommands_collect_positional_args() {
        let cli = Cli::try_parse_from([
            "ballot", "deploy", "Alpha", "Beta", "0x2b16a4d5c0c4c5b39a4a5cd3cb1d1ce3d1e27983", "10",
        ])
        .unwrap();
        assert_eq!(cli.command.args().len(), 4);
        assert!(cli.command.validate().is_ok());
        assert!(cli.command.needs_ballot() && cli.command.needs_token());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ballot", "mint", "--yes", "--network", "local", "0xab", "0xcd", "1",
        ])
        .unwrap();
        assert!(cli.yes);
        assert_eq!(cli.network.as_deref(), Some("local"));
        assert_eq!(cli.command.args(), ["0xab", "0xcd", "1"]);
        assert!(!cli.command.needs_ballot());
    }

    #[test]
    fn bad_arity_fails_before_any_io() {
        let cli = Cli::try_parse_from(["ballot", "vote", "0x2b16a4d5c0c4c5b39a4a5cd3cb1d1ce3d1e27983"])
            .unwrap();
        assert!(matches!(
            cli.command.validate(),
            Err(InputError::InvalidArgumentCount { got: 1, .. })
        ));
    }

    #[test]
    fn negative_amounts_reach_the_validator() {
        let cli = Cli::try_parse_from([
            "ballot",
            "transfer",
            "0x2b16a4d5c0c4c5b39a4a5cd3cb1d1ce3d1e27983",
            "0x5aa7fb0f965572a5639a84eeecf34bfd9068d58c",
            "-5",
        ])
        .unwrap();
        assert!(matches!(
            cli.command.validate(),
            Err(InputError::InvalidNumber {
                field: "transfer amount",
                ..
            })
        ));
    }
}
