pub mod config_cmd;
pub mod extract;
pub mod info;
pub mod json;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "glb-inspect",
    version,
    about = "Inspect GLB containers and extract their JSON and binary chunks"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GlobalArgs {
    /// Byte offset of the container inside the file (overrides config).
    #[arg(long, global = true, env = "GLB_START_OFFSET")]
    pub start_offset: Option<u64>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    /// Start offset from the command line, falling back to the config file.
    pub fn start_offset(&self, cfg: &AppConfig) -> u64 {
        self.start_offset.unwrap_or(cfg.start_offset)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the container header and chunk table.
    Info(InfoArgs),

    /// Print the JSON document.
    Json(JsonArgs),

    /// Write a binary chunk's payload to a file.
    Extract(ExtractArgs),

    /// View / edit configuration.
    Config(ConfigArgs),
}

//  Subcommand argument structs

#[derive(Debug, clap::Args, Clone)]
pub struct InfoArgs {
    /// Path to a .glb or .gltf file.
    pub path: PathBuf,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct JsonArgs {
    /// Path to a .glb or .gltf file.
    pub path: PathBuf,

    /// Print the JSON text exactly as stored instead of pretty-printing it.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ExtractArgs {
    /// Path to a .glb file.
    pub path: PathBuf,

    /// Binary chunk index (0 = the chunk right after the JSON chunk).
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Output file (default: `<stem>.bin<index>` next to the input or in
    /// the configured output directory).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Display the current configuration.
    Show,
    /// Set a configuration value.
    Set { key: String, value: String },
}
