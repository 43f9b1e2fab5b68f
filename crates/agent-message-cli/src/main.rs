//! Agent-Message CLI: parse command messages and assemble replies.
//!
//! Reads wire payloads from files or stdin and prints the translated form
//! as JSON on stdout. Diagnostics go to stderr.

// CLI-specific lint allowances (CLI binary, not library)
#![allow(missing_docs)]
#![allow(clippy::print_stdout)] // CLI must print to stdout
#![allow(clippy::print_stderr)] // CLI must print to stderr
#![allow(clippy::exit)] // CLI uses exit codes

use agent_message::agent::{load_agent_info_file, AgentInfoOverrides};
use agent_message::params::find_references;
use agent_message::parser::decode_command_message;
use agent_message::reply::{encode_reply_payload, prepare_runtime_statuses};
use agent_message::{
    parse_message_with_params, parse_timestamp, prepare_reply_payload, AgentInfo, MessageError,
    MessageLog, MessageResult, PluginResult, Timestamp,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and `NO_COLOR` env
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(
    name = "agent-message",
    version,
    about = "Translate agent command messages and replies"
)]
struct Cli {
    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    /// Log translation steps to stderr (overridden by `RUST_LOG`)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a command message and resolve its parameter references
    Parse {
        #[arg(long, help = "Message file, or - for stdin (default: stdin)")]
        message: Option<PathBuf>,
        #[arg(long, help = "Report errors as JSON on stdout")]
        json: bool,
    },
    /// Build a reply payload from plugin results
    Reply {
        #[arg(long, help = "JSON file mapping plugin name to plugin result")]
        results: PathBuf,
        #[arg(long, help = "Agent identity file (JSON or YAML)")]
        agent: Option<PathBuf>,
        #[arg(long)]
        agent_name: Option<String>,
        #[arg(long)]
        agent_version: Option<String>,
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        os: Option<String>,
        #[arg(long)]
        os_version: Option<String>,
        #[arg(long, help = "Reply time, e.g. 2016-07-19T22:30:09.123Z (default: now)")]
        at: Option<String>,
        #[arg(long, help = "Report errors as JSON on stdout")]
        json: bool,
    },
    /// List the parameter references in a message's document content
    References {
        #[arg(long, help = "Message file, or - for stdin (default: stdin)")]
        message: Option<PathBuf>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

struct ReplyArgs {
    results: PathBuf,
    agent: Option<PathBuf>,
    overrides: AgentInfoOverrides,
    at: Option<String>,
}

fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::env::var("NO_COLOR").is_err()
                && supports_color::on(supports_color::Stream::Stderr).is_some()
        }
    }
}

/// Configure miette's graphical reporting based on color mode
fn configure_colors(color: bool) {
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .color(color)
                .unicode(color)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set
}

fn configure_tracing(verbose: bool, color: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let color = use_color(cli.color);
    configure_colors(color);
    configure_tracing(cli.verbose, color);
    let log = MessageLog::current();
    match cli.command {
        Commands::Parse { message, json } => {
            emit_outcome(json, cmd_parse(&log, message.as_deref()))
        }
        Commands::Reply {
            results,
            agent,
            agent_name,
            agent_version,
            lang,
            os,
            os_version,
            at,
            json,
        } => {
            let args = ReplyArgs {
                results,
                agent,
                overrides: AgentInfoOverrides {
                    lang,
                    name: agent_name,
                    version: agent_version,
                    os,
                    os_version,
                },
                at,
            };
            emit_outcome(json, cmd_reply(&log, args))
        }
        Commands::References { message, json } => {
            emit_outcome(json, cmd_references(&log, message.as_deref(), json))
        }
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn cmd_parse(log: &MessageLog, message: Option<&Path>) -> MessageResult<String> {
    let raw = read_input(message)?;
    let payload = parse_message_with_params(log, &raw)?;
    serde_json::to_string_pretty(&payload)
        .map_err(|err| MessageError::malformed(format!("failed to encode payload: {err}")))
}

fn cmd_reply(log: &MessageLog, args: ReplyArgs) -> MessageResult<String> {
    let raw = read_input(Some(&args.results))?;
    let results: BTreeMap<String, PluginResult> = serde_json::from_slice(&raw)
        .map_err(|err| MessageError::malformed(format!("invalid plugin results: {err}")))?;
    let base = match &args.agent {
        Some(path) => load_agent_info_file(path)?,
        None => AgentInfo::detect(),
    };
    let agent = args.overrides.apply(base);
    let date_time = match &args.at {
        Some(text) => parse_timestamp(text)?,
        None => Timestamp::now(),
    };

    let statuses = prepare_runtime_statuses(log, &results);
    let agent_version = agent.version.clone();
    let reply = prepare_reply_payload(&agent_version, statuses, date_time, agent);
    let encoded = encode_reply_payload(&reply)?;
    String::from_utf8(encoded)
        .map_err(|err| MessageError::malformed(format!("reply is not utf-8: {err}")))
}

fn cmd_references(
    log: &MessageLog,
    message: Option<&Path>,
    json: bool,
) -> MessageResult<String> {
    let raw = read_input(message)?;
    let payload = decode_command_message(log, &raw)?;
    let references = find_references(&payload.document_content);
    let parameters = payload
        .parameters
        .clone()
        .with_document_defaults(&payload.document_content);
    if json {
        let entries: Vec<serde_json::Value> = references
            .iter()
            .map(|reference| {
                serde_json::json!({
                    "name": reference.name,
                    "index": reference.index,
                    "token": reference.token,
                    "resolved": parameters.select(reference).is_some(),
                })
            })
            .collect();
        return serde_json::to_string(&entries)
            .map_err(|err| MessageError::malformed(format!("failed to encode references: {err}")));
    }
    Ok(references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

// =============================================================================
// Input and Output
// =============================================================================

fn read_input(path: Option<&Path>) -> MessageResult<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => fs::read(path)
            .map_err(|err| MessageError::io(format!("failed to read {}", path.display()), err)),
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| MessageError::io("failed to read stdin", err))?;
            Ok(buf)
        }
    }
}

fn emit_outcome(json: bool, outcome: MessageResult<String>) -> Result<()> {
    match outcome {
        Ok(text) => {
            if !text.is_empty() {
                println!("{text}");
            }
            Ok(())
        }
        Err(err) => {
            let code = err.exit_code();
            if json {
                let payload = serde_json::to_string(&err.to_error_info()).into_diagnostic()?;
                println!("{payload}");
            } else {
                eprintln!("{:?}", miette::Report::new(err));
            }
            std::process::exit(code);
        }
    }
}
