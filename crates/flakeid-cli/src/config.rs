use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use flakeid::{NodeIdentity, SnowflakeId};

/// Upper bound on IDs produced by one `generate` invocation.
pub const MAX_COUNT: usize = 1_000_000;

/// Command-line configuration for the `flakeid` binary.
///
/// Every identity option can also come from the environment (or a `.env`
/// file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Generate and decode 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Worker ID (0-31) stamped into generated IDs.
    ///
    /// Must be given together with `--datacenter-id`. When neither is set the
    /// identity is read from `--identity-file`, or drawn at random.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", global = true, allow_negative_numbers = true)]
    pub worker_id: Option<i64>,

    /// Datacenter ID (0-31) stamped into generated IDs.
    ///
    /// Environment variable: `DATACENTER_ID`
    #[arg(long, env = "DATACENTER_ID", global = true, allow_negative_numbers = true)]
    pub datacenter_id: Option<i64>,

    /// JSON file that keeps a randomly assigned identity across runs.
    ///
    /// Created on first use. Holds `{"workerId": n, "datacenterId": n}`.
    ///
    /// Environment variable: `IDENTITY_FILE`
    #[arg(long, env = "IDENTITY_FILE", global = true)]
    pub identity_file: Option<PathBuf>,

    /// Number of IDs to generate.
    ///
    /// Applies to `generate`, which is also what runs without a subcommand.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", global = true, default_value_t = 1)]
    pub count: usize,

    /// Print JSON instead of plain text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new IDs (the default).
    Generate,
    /// Break IDs down into their fields.
    Decode {
        /// Decimal IDs to decode.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Where a generator gets its node identity from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    /// Given on the command line or in the environment.
    Explicit(NodeIdentity),
    /// Kept in a JSON file, filled at random when missing.
    File(PathBuf),
    /// The process-wide default generator's random identity.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate { count: usize },
    Decode { ids: Vec<SnowflakeId> },
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub identity: IdentitySource,
    pub action: Action,
    pub json: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let identity = match (args.worker_id, args.datacenter_id, args.identity_file) {
            (Some(_), Some(_), Some(_)) => {
                bail!("IDENTITY_FILE cannot be combined with WORKER_ID/DATACENTER_ID")
            }
            (Some(worker_id), Some(datacenter_id), None) => {
                IdentitySource::Explicit(NodeIdentity::new(worker_id, datacenter_id)?)
            }
            (Some(_), None, _) => bail!("WORKER_ID requires DATACENTER_ID"),
            (None, Some(_), _) => bail!("DATACENTER_ID requires WORKER_ID"),
            (None, None, Some(path)) => IdentitySource::File(path),
            (None, None, None) => IdentitySource::Random,
        };

        let action = match args.command.unwrap_or(Command::Generate) {
            Command::Generate => {
                let count = args.count;
                if count == 0 || count > MAX_COUNT {
                    bail!("COUNT must be between 1 and {MAX_COUNT} (got {count})");
                }
                Action::Generate { count }
            }
            Command::Decode { ids } => Action::Decode {
                ids: ids
                    .iter()
                    .map(|raw| {
                        raw.trim()
                            .parse::<SnowflakeId>()
                            .with_context(|| format!("cannot decode {raw:?}"))
                    })
                    .collect::<anyhow::Result<_>>()?,
            },
        };

        Ok(Self {
            identity,
            action,
            json: args.json,
        })
    }
}
