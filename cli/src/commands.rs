//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use phospho_domain::Flag;
use serde_json::Value;
use std::path::PathBuf;

/// CLI arguments for phospho
#[derive(Parser, Debug)]
#[command(name = "phospho")]
#[command(author, version, about = "Log LLM tasks and feedback to phospho")]
#[command(long_about = r#"
Logs task inputs/outputs to the phospho collector and flags tasks with feedback.

Configuration is loaded from (in priority order):
1. PHOSPHO_API_KEY, PHOSPHO_PROJECT_ID, PHOSPHO_TICK_MS, PHOSPHO_BASE_URL
2. --config <path>     Explicit config file
3. ./phospho.toml      Project-level config
4. ~/.config/phospho/config.toml   Global config

Example:
  phospho log --input "What is 2+2?" --output "4"
  phospho log --input "Say hi" --output "Hello there" --stream --field user_id=42
  phospho feedback --task-id 1234 --raw-flag "👍" --notes "spot on"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files and environment
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Append events to a JSONL file instead of calling the collector
    #[arg(long, global = true, value_name = "PATH")]
    pub jsonl: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log one task
    Log(LogArgs),
    /// Flag a logged task as success or failure
    Feedback(FeedbackArgs),
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Task input (JSON objects and arrays are logged as structured values)
    #[arg(long)]
    pub input: String,

    /// Task output (JSON objects and arrays are logged as structured values)
    #[arg(long)]
    pub output: String,

    #[arg(long, value_name = "ID")]
    pub task_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub session_id: Option<String>,

    /// Replay the output word by word through the stream logger
    #[arg(long)]
    pub stream: bool,

    /// Extra field attached to the record (can be specified multiple times)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    #[arg(long, value_name = "ID")]
    pub task_id: String,

    /// Explicit flag: success or failure
    #[arg(long, conflicts_with = "raw_flag", required_unless_present = "raw_flag")]
    pub flag: Option<Flag>,

    /// Free-form flag such as "👍", classified into success or failure
    #[arg(long)]
    pub raw_flag: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub source: Option<String>,
}

/// Objects and arrays are parsed as JSON; anything else stays a string.
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Parse `key=value`. The value is JSON when it parses as JSON, else a string.
fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid field `{}`: expected KEY=VALUE", raw))?;
    if key.is_empty() {
        return Err(format!("invalid field `{}`: empty key", raw));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
