use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abiscope::config::{self, Config};
use abiscope::export::{self, OutputFormat};
use abiscope::{CallDecoder, ContractAddress, ContractEntry};

/// Placeholder key for `selectors` when no address is given
const SCRATCH_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Parser)]
#[command(
    name = "abiscope",
    version,
    about = "abiscope: decode contract call payloads against an ABI"
)]
struct Args {
    /// Output format (defaults to the config file, then "table")
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a call payload sent to a contract
    Decode {
        /// Contract address the payload was sent to
        #[arg(long)]
        address: String,

        /// Call payload, e.g. 0xa9059cbb000...
        #[arg(long)]
        payload: String,

        /// ABI JSON file (defaults to the one configured for the address)
        #[arg(long)]
        abi: Option<PathBuf>,
    },

    /// List the decodable methods of an ABI
    Selectors {
        /// ABI JSON file (defaults to the one configured for the address)
        #[arg(long)]
        abi: Option<PathBuf>,

        /// Contract address, used to find a configured ABI
        #[arg(long)]
        address: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = config::load();
    init_tracing(config.log_level.as_deref());

    let format = args.output.or(config.output).unwrap_or_default();
    let decoder = CallDecoder::new();

    match args.command {
        Command::Decode {
            address,
            payload,
            abi,
        } => {
            let address = ContractAddress::new(&address);
            let abi_text = read_abi(&config, &address, abi)?;

            let call = decoder.decode_call(address.as_str(), &abi_text, payload.trim());
            print!("{}", export::render_call(&call, format)?);

            if call.failure().is_some() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Selectors { abi, address } => {
            let address = ContractAddress::new(address.as_deref().unwrap_or(SCRATCH_ADDRESS));
            let abi_text = read_abi(&config, &address, abi)?;

            if let Some(contract) = config.contract(&address) {
                tracing::info!(contract = %contract.display_name(), "using configured contract");
            }

            match decoder.register(address.as_str(), &abi_text)? {
                ContractEntry::Parsed(_) => {
                    let methods = decoder.selectors(address.as_str());
                    print!("{}", export::render_selectors(&methods, format)?);
                }
                ContractEntry::Unsupported(param) => {
                    eprintln!("contract cannot be decoded: {}", param);
                    return Ok(ExitCode::FAILURE);
                }
                ContractEntry::Unparsed => bail!("contract {} was not registered", address),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the ABI given on the command line, or the one configured for `address`
fn read_abi(config: &Config, address: &ContractAddress, abi: Option<PathBuf>) -> Result<String> {
    let path = match abi {
        Some(path) => path,
        None => config
            .contract(address)
            .map(|contract| contract.abi.clone())
            .with_context(|| format!("no --abi given and no ABI configured for {}", address))?,
    };

    fs::read_to_string(&path).with_context(|| format!("read ABI {}", path.display()))
}

/// Logs go to stderr so rendered output stays clean on stdout
fn init_tracing(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
