//! `aerocode config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::print_serialized;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    (
        "default_format",
        "Default output format (auto, tsv, json, yaml, csv, md, id)",
    ),
    ("login_delay_ms", "Simulated login latency in milliseconds"),
    (
        "report_delay_ms",
        "Delay before a requested report is marked generated",
    ),
    ("download_prefix", "Prefix of generated report links"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, config: &Config, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, config, global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(args: ShowArgs, config: &Config, global: &GlobalOpts) -> Result<()> {
    let effective = config.effective();

    // If a specific key is requested, show just that value
    if let Some(key) = &args.key {
        let value = match key.as_str() {
            "default_format" => effective.default_format,
            "login_delay_ms" => effective.login_delay_ms.to_string(),
            "report_delay_ms" => effective.report_delay_ms.to_string(),
            "download_prefix" => effective.download_prefix,
            _ => {
                let keys: Vec<&str> = VALID_KEYS.iter().map(|(k, _)| *k).collect();
                return Err(miette::miette!(
                    help = format!("valid keys: {}", keys.join(", ")),
                    "unknown configuration key '{}'",
                    key
                ));
            }
        };
        println!("{}", value);
        return Ok(());
    }

    if print_serialized(&effective, global.format)? {
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    print_config_value("default_format", &effective.default_format, config.default_format.is_some());
    print_config_value("login_delay_ms", &effective.login_delay_ms.to_string(), config.login_delay_ms.is_some());
    print_config_value("report_delay_ms", &effective.report_delay_ms.to_string(), config.report_delay_ms.is_some());
    print_config_value("download_prefix", &effective.download_prefix, config.download_prefix.is_some());

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (AEROCODE_FORMAT, AEROCODE_LOGIN_DELAY_MS, ...)");
    println!("  2. File named by AEROCODE_CONFIG");
    println!("  3. Global config (~/.config/aerocode/config.yaml)");

    Ok(())
}

fn print_config_value(key: &str, value: &str, explicit: bool) {
    let origin = if explicit { "" } else { " (default)" };
    println!(
        "  {} = {}{}",
        style(key).cyan(),
        style(value).yellow(),
        style(origin).dim()
    );
}

fn run_path() -> Result<()> {
    match Config::global_config_path() {
        Some(path) => {
            let marker = if path.exists() {
                style("exists").green()
            } else {
                style("not created").dim()
            };
            println!("{}: {} ({})", style("Global").bold(), path.display(), marker);
        }
        None => println!("{}: {}", style("Global").bold(), style("unavailable").dim()),
    }

    match std::env::var("AEROCODE_CONFIG") {
        Ok(path) => println!("{}: {}", style("AEROCODE_CONFIG").bold(), path),
        Err(_) => println!("{}: {}", style("AEROCODE_CONFIG").bold(), style("not set").dim()),
    }
    Ok(())
}
