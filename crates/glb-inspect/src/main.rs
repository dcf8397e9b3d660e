mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    //  Logging (stderr, so stdout stays clean for JSON and payloads)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,glb_inspect=debug,glb_parser=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if args.global.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match args.command {
        cli::Commands::Info(info_args) => cli::info::execute(&args.global, info_args),
        cli::Commands::Json(json_args) => cli::json::execute(&args.global, json_args),
        cli::Commands::Extract(extract_args) => cli::extract::execute(&args.global, extract_args),
        cli::Commands::Config(c) => cli::config_cmd::execute(c),
    }
}
