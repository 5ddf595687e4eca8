//! CLI entry point for oiia-parking

use anyhow::Context;
use oiia_parking::config::EngineConfig;
use oiia_parking::debug::{self, DebugConfig};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_usage();
        process::exit(1);
    };

    match command.as_str() {
        "play" => {
            if let Err(err) = run_play(&args[1..]).await {
                eprintln!("Error: {err:#}");
                process::exit(1);
            }
        }
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Error: Unknown command '{command}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("oiia-parking - a very short story about parking");
    println!();
    println!("USAGE:");
    println!("    oiia-parking play [--config <file.json>] [--debug]");
    println!();
    println!("COMMANDS:");
    println!("    play         Play in the terminal");
    println!("    --help, -h   Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>   JSON configuration (typewriter, countdown, qte, presentation)");
    println!("    --debug           Show the dashboard and engine logs");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}   enable engine logs, optionally naming a level", debug::DEBUG_ENV);
    println!("    {}    fix the QTE seed", oiia_parking::config::SEED_ENV);
}

async fn run_play(args: &[String]) -> anyhow::Result<()> {
    let mut config_path = None;
    let mut show_debug = false;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--debug" => show_debug = true,
            other => anyhow::bail!("unknown option '{other}'"),
        }
    }

    let config = match &config_path {
        Some(path) => EngineConfig::load(path).await?,
        None => EngineConfig::default(),
    };
    let config = config.with_env_overrides()?;

    let mut debug_config = DebugConfig::default();
    if show_debug {
        debug_config.enabled = true;
    }
    debug::init(debug_config).context("failed to install the debug logger")?;

    oiia_parking::cli::play::run_play(&config, show_debug).await
}
