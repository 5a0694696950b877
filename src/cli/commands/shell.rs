//! `aerocode shell` - interactive session over one workspace
//!
//! Every line is parsed with the same command definitions as the one-shot
//! CLI. Changes, the login and queued reports live until the shell exits.

use clap::Parser;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::debug;

use crate::cli::helpers::{is_interactive, split_args};
use crate::cli::{Commands, GlobalOpts, OutputFormat};
use crate::core::Workspace;

/// One shell line: a command plus the per-line output options
#[derive(Parser)]
#[command(name = "aerocode", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,

    /// Output format for this command only
    #[arg(long, short = 'f', global = true)]
    format: Option<OutputFormat>,

    /// Suppress non-essential output for this command only
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

/// What the loop should do with a line of input
#[derive(Debug, PartialEq)]
enum Line {
    Skip,
    Exit,
    Help,
    Words(Vec<String>),
}

fn classify(input: &str) -> std::result::Result<Line, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Line::Skip);
    }
    match trimmed {
        "exit" | "quit" | "sair" => Ok(Line::Exit),
        "help" | "?" => Ok(Line::Help),
        _ => split_args(trimmed).map(Line::Words),
    }
}

pub fn run(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let interactive = is_interactive();
    if interactive && !global.quiet {
        println!(
            "{} Type a command (e.g. {}), {} or {}.",
            style("AeroCode shell.").bold(),
            style("part list").cyan(),
            style("help").cyan(),
            style("exit").cyan()
        );
    }

    // Only lock stdin when it is not a terminal; prompts read it themselves
    let mut piped = (!interactive).then(|| io::stdin().lock().lines());

    loop {
        announce_finished_reports(ws, global);

        let input = if let Some(lines) = piped.as_mut() {
            match lines.next() {
                Some(line) => line.into_diagnostic()?,
                None => break,
            }
        } else {
            match Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt(ws))
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(_) => break,
            }
        };

        let words = match classify(&input) {
            Ok(Line::Skip) => continue,
            Ok(Line::Exit) => break,
            Ok(Line::Help) => {
                print_help();
                continue;
            }
            Ok(Line::Words(words)) => words,
            Err(e) => {
                eprintln!("{} {}", style("error:").red().bold(), e);
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        let line_opts = GlobalOpts {
            format: parsed.format.unwrap_or(global.format),
            quiet: global.quiet || parsed.quiet,
            ..global.clone()
        };

        // Due reports complete before the command sees the workspace
        announce_finished_reports(ws, global);
        debug!(command = %words.join(" "), "shell command");
        if let Err(report) = super::dispatch(parsed.command, ws, &line_opts) {
            eprintln!("{:?}", report);
        }
        io::stdout().flush().into_diagnostic()?;
    }

    if ws.pending_jobs() > 0 && !global.quiet {
        println!(
            "{} {} report(s) still pending were discarded",
            style("!").yellow(),
            ws.pending_jobs()
        );
    }
    Ok(())
}

fn prompt(ws: &Workspace) -> String {
    match ws.session().current_user() {
        Some(user) => format!("aerocode ({})", user.name),
        None => "aerocode".to_string(),
    }
}

fn announce_finished_reports(ws: &mut Workspace, global: &GlobalOpts) {
    for id in ws.tick(Instant::now()) {
        if !global.quiet {
            println!("{} Report {} generated", style("✓").green(), style(id).cyan());
        }
    }
}

fn print_help() {
    println!("{}", style("Commands").bold());
    for (cmd, what) in [
        ("login <user>", "start a session (password is prompted)"),
        ("logout / whoami", "end or inspect the session"),
        ("acft list|show|new|edit", "aircraft"),
        ("stage list|show|add|start|finish|assign|unassign", "production stages"),
        ("part list|show|new|edit|delete", "parts"),
        ("test list|show|schedule|record", "quality tests"),
        ("user list|show|new|edit", "employees"),
        ("report list|show|generate|set-status|delete|wait", "reports"),
        ("status", "dashboard"),
        ("exit", "leave the shell"),
    ] {
        println!("  {:<50} {}", style(cmd).cyan(), what);
    }
    println!("Append {} to any command for details.", style("--help").cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("   "), Ok(Line::Skip));
        assert_eq!(classify("# comment"), Ok(Line::Skip));
        assert_eq!(classify("quit"), Ok(Line::Exit));
        assert_eq!(classify("?"), Ok(Line::Help));
        assert_eq!(
            classify("part show 101"),
            Ok(Line::Words(vec!["part".into(), "show".into(), "101".into()]))
        );
        assert!(classify("report generate --name \"open").is_err());
    }

    #[test]
    fn test_shell_line_parses_commands() {
        let line = ShellLine::try_parse_from(["part", "list", "-f", "json"]).unwrap();
        assert!(matches!(line.command, Commands::Part(_)));
        assert_eq!(line.format, Some(OutputFormat::Json));

        let line = ShellLine::try_parse_from(["login", "admin"]).unwrap();
        assert!(matches!(line.command, Commands::Login(_)));
    }

    #[test]
    fn test_shell_line_rejects_unknown() {
        assert!(ShellLine::try_parse_from(["fly", "E175"]).is_err());
    }
}
