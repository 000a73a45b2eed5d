// crates/tfacc-cli/src/main.rs
// ============================================================================
// Module: tfacc CLI Entry Point
// Description: Command dispatcher for handle, endpoint, config, and sweep tools.
// Purpose: Expose the acceptance-test helpers to shell scripts and CI jobs.
// Dependencies: clap, serde_json, tfacc-config, tfacc-core, tfacc-harness, thiserror.
// ============================================================================

//! ## Overview
//! The tfacc CLI wraps the resource handle codec, endpoint list normalizer,
//! broker listing validation, configuration validation, and sweep planning.
//! Results go to stdout one value per line; errors go to stderr with a
//! failing exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use tfacc_config::TfaccConfig;
use tfacc_core::BrokerListener;
use tfacc_core::decode_handle;
use tfacc_core::encode_handle;
use tfacc_core::is_sorted_csv;
use tfacc_core::sort_endpoints;
use tfacc_core::validate_broker_list;
use tfacc_harness::SweeperRegistry;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "tfacc", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resource handle utilities.
    Handle {
        /// Selected handle subcommand.
        #[command(subcommand)]
        command: HandleCommand,
    },
    /// Endpoint list utilities.
    Endpoints {
        /// Selected endpoints subcommand.
        #[command(subcommand)]
        command: EndpointsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Sweeper utilities.
    Sweep {
        /// Selected sweep subcommand.
        #[command(subcommand)]
        command: SweepCommand,
    },
}

/// Handle subcommands.
#[derive(Subcommand, Debug)]
enum HandleCommand {
    /// Encode an account id and resource name into a handle.
    Encode(HandleEncodeCommand),
    /// Decode a handle into its account id and resource name.
    Decode(HandleDecodeCommand),
}

/// Arguments for `handle encode`.
#[derive(Args, Debug)]
struct HandleEncodeCommand {
    /// Owning account id.
    #[arg(long, value_name = "ID")]
    account_id: String,
    /// Resource name.
    #[arg(long, value_name = "NAME")]
    name: String,
}

/// Arguments for `handle decode`.
#[derive(Args, Debug)]
struct HandleDecodeCommand {
    /// Handle to decode.
    handle: String,
    /// Emit a JSON object instead of tab-separated text.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

/// Endpoint list subcommands.
#[derive(Subcommand, Debug)]
enum EndpointsCommand {
    /// Print the list in canonical order.
    Sort(EndpointsListArg),
    /// Exit non-zero unless the list is in canonical order.
    Check(EndpointsListArg),
    /// Validate a broker listing against a listener port.
    Validate(EndpointsValidateCommand),
}

/// Comma-joined endpoint list argument.
#[derive(Args, Debug)]
struct EndpointsListArg {
    /// Comma-joined `host:port` list.
    list: String,
}

/// Arguments for `endpoints validate`.
#[derive(Args, Debug)]
struct EndpointsValidateCommand {
    /// Comma-joined `host:port` list.
    list: String,
    /// Listener whose port every endpoint must use.
    #[arg(long, value_enum, value_name = "LISTENER")]
    listener: ListenerArg,
}

/// Broker listener selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ListenerArg {
    /// Plaintext brokers (9092).
    Plaintext,
    /// TLS brokers (9094).
    Tls,
    /// SASL/SCRAM brokers (9096).
    SaslScram,
    /// ZooKeeper connect string (2181).
    Zookeeper,
}

impl From<ListenerArg> for BrokerListener {
    fn from(value: ListenerArg) -> Self {
        match value {
            ListenerArg::Plaintext => Self::Plaintext,
            ListenerArg::Tls => Self::Tls,
            ListenerArg::SaslScram => Self::SaslScram,
            ListenerArg::Zookeeper => Self::Zookeeper,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a tfacc configuration file.
    Validate(ConfigPathArg),
}

/// Optional config path argument.
#[derive(Args, Debug)]
struct ConfigPathArg {
    /// Config file path (defaults to tfacc.toml or `TFACC_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Sweep subcommands.
#[derive(Subcommand, Debug)]
enum SweepCommand {
    /// Print the sweeper execution plan for each configured region.
    Plan(SweepPlanCommand),
}

/// Arguments for `sweep plan`.
#[derive(Args, Debug)]
struct SweepPlanCommand {
    /// Config file path (defaults to tfacc.toml or `TFACC_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Sweeper name filter; overrides the configured filter.
    #[arg(long = "sweeper", value_name = "NAME")]
    sweepers: Vec<String>,
    /// Region override; replaces the configured regions.
    #[arg(long = "region", value_name = "REGION")]
    regions: Vec<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("tfacc {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Handle {
            command,
        } => command_handle(command),
        Commands::Endpoints {
            command,
        } => command_endpoints(command),
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::Sweep {
            command,
        } => command_sweep(command),
    }
}

/// Prints CLI help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Handle Commands
// ============================================================================

/// Dispatches handle subcommands.
fn command_handle(command: HandleCommand) -> CliResult<ExitCode> {
    let output = match command {
        HandleCommand::Encode(command) => render_handle_encode(&command)?,
        HandleCommand::Decode(command) => render_handle_decode(&command)?,
    };
    emit_output(&output)
}

/// Renders `handle encode` output.
fn render_handle_encode(command: &HandleEncodeCommand) -> CliResult<String> {
    encode_handle(&command.account_id, &command.name)
        .map_err(|err| CliError::new(format!("failed to encode handle: {err}")))
}

/// Renders `handle decode` output.
fn render_handle_decode(command: &HandleDecodeCommand) -> CliResult<String> {
    let id = decode_handle(&command.handle)
        .map_err(|err| CliError::new(format!("failed to decode handle: {err}")))?;
    if !command.json {
        return Ok(format!("{}\t{}", id.account_id(), id.resource_name()));
    }
    let value = serde_json::json!({
        "account_id": id.account_id(),
        "resource_name": id.resource_name(),
    });
    serde_json::to_string(&value)
        .map_err(|err| CliError::new(format!("failed to serialize handle: {err}")))
}

// ============================================================================
// SECTION: Endpoint Commands
// ============================================================================

/// Dispatches endpoint subcommands.
fn command_endpoints(command: EndpointsCommand) -> CliResult<ExitCode> {
    match command {
        EndpointsCommand::Sort(arg) => emit_output(&sort_endpoints(&arg.list)),
        EndpointsCommand::Check(arg) => {
            if is_sorted_csv(&arg.list) {
                emit_output("sorted")
            } else {
                Err(CliError::new(format!("endpoint list is not sorted: {}", arg.list)))
            }
        }
        EndpointsCommand::Validate(command) => {
            let listener = BrokerListener::from(command.listener);
            validate_broker_list(&command.list, listener.port()).map_err(|err| {
                CliError::new(format!("invalid {} broker list: {err}", listener.as_str()))
            })?;
            emit_output("valid")
        }
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(arg) => {
            TfaccConfig::load(arg.config.as_deref())
                .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
            emit_output("config ok")
        }
    }
}

// ============================================================================
// SECTION: Sweep Commands
// ============================================================================

/// Dispatches sweep subcommands.
fn command_sweep(command: SweepCommand) -> CliResult<ExitCode> {
    match command {
        SweepCommand::Plan(command) => {
            let config = TfaccConfig::load_or_default(command.config.as_deref())
                .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
            let registry = SweeperRegistry::with_builtin_sweepers()
                .map_err(|err| CliError::new(format!("failed to build registry: {err}")))?;
            emit_output(&render_sweep_plan(&registry, &config, &command)?)
        }
    }
}

/// Renders one `region<TAB>sweeper` line per planned sweep.
fn render_sweep_plan(
    registry: &SweeperRegistry,
    config: &TfaccConfig,
    command: &SweepPlanCommand,
) -> CliResult<String> {
    let mut effective = config.clone();
    if !command.regions.is_empty() {
        effective.sweep.regions.clone_from(&command.regions);
    }
    if !command.sweepers.is_empty() {
        effective.sweep.sweepers.clone_from(&command.sweepers);
    }
    effective
        .validate()
        .map_err(|err| CliError::new(format!("invalid sweep plan options: {err}")))?;
    let filter = effective.sweeper_filter();
    let regions = &effective.sweep.regions;
    let order = registry
        .plan(filter)
        .map_err(|err| CliError::new(format!("failed to plan sweep: {err}")))?;
    let lines: Vec<String> = regions
        .iter()
        .flat_map(|region| order.iter().map(move |name| format!("{region}\t{name}")))
        .collect();
    Ok(lines.join("\n"))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes command output and returns success.
fn emit_output(output: &str) -> CliResult<ExitCode> {
    write_stdout_line(output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
