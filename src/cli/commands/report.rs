//! `aerocode report` command - Report generation and tracking
//!
//! Generating a report creates a pending record and queues a job that marks
//! it generated once the configured delay has passed. In one-shot mode use
//! `--wait` to see the finished record; inside `aerocode shell` jobs finish
//! on their own between commands.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    confirm, format_date, into_params, parse_key_value, print_serialized, styled_label,
    value_or_prompt,
};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{AeroError, Workspace};
use crate::entities::report::{Report, ReportFilter, ReportKind, ReportStatus};

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List reports with filtering
    List(ListArgs),

    /// Show a report's details
    Show(ShowArgs),

    /// Request a new report
    Generate(GenerateArgs),

    /// Set a report's status by hand
    SetStatus(SetStatusArgs),

    /// Remove a report
    Delete(DeleteArgs),

    /// Block until every queued report has been generated
    Wait,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<ReportStatus>,

    /// Filter by report type
    #[arg(long, short = 't')]
    pub kind: Option<ReportKind>,

    /// Search in name and author
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Report id
    pub id: u32,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Report name
    #[arg(long)]
    pub name: Option<String>,

    /// Report type
    #[arg(long, short = 't')]
    pub kind: ReportKind,

    /// Report parameter as key=value (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Wait for the report to be generated before returning
    #[arg(long, short = 'w')]
    pub wait: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetStatusArgs {
    /// Report id
    pub id: u32,

    /// New status
    pub status: ReportStatus,

    /// Download link (keeps the current one when omitted)
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Report id
    pub id: u32,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 4),
    ColumnDef::new("name", "NAME", 34),
    ColumnDef::new("kind", "TYPE", 16),
    ColumnDef::new("date", "DATE", 10),
    ColumnDef::new("author", "BY", 18),
    ColumnDef::new("status", "STATUS", 8),
];

/// Run a report subcommand
pub fn run(cmd: ReportCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::List(args) => run_list(args, ws, global),
        ReportCommands::Show(args) => run_show(args, ws, global),
        ReportCommands::Generate(args) => run_generate(args, ws, global),
        ReportCommands::SetStatus(args) => {
            let report = ws.set_report_status(args.id, args.status, args.link)?;
            print_changed(report, "Updated", global)
        }
        ReportCommands::Delete(args) => run_delete(args, ws, global),
        ReportCommands::Wait => run_wait(ws, global),
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = ReportFilter {
        status: args.status,
        kind: args.kind,
        search: args.search,
    };
    let mut reports = ws.reports()?.filter(&filter);

    if let Some(limit) = args.limit {
        reports.truncate(limit);
    }

    if args.count {
        println!("{}", reports.len());
        return Ok(());
    }

    if print_serialized(&reports, global.format)? {
        return Ok(());
    }

    if reports.is_empty() {
        println!("No reports found.");
        return Ok(());
    }

    let rows = reports.iter().map(|r| {
        TableRow::new(r.id)
            .cell("id", CellValue::Key(r.id.to_string()))
            .cell("name", CellValue::text(&r.name))
            .cell("kind", CellValue::badge(r.kind))
            .cell("date", CellValue::Date(r.generated_on))
            .cell("author", CellValue::text(&r.generated_by))
            .cell("status", CellValue::badge(r.status))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "report")
        .with_config(config)
        .output(rows, global.format)
}

fn run_show(args: ShowArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let report = ws
        .reports()?
        .get(&args.id)
        .ok_or_else(|| AeroError::not_found("report", args.id))?;

    if print_serialized(report, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", report.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Report").bold(), style(report.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&report.name).yellow());
    println!("{}: {}", style("Type").bold(), report.kind);
    println!(
        "{}: {}",
        style("Status").bold(),
        styled_label(report.status.label(), report.status.tone())
    );
    println!(
        "{}: {}",
        style("Download").bold(),
        report.download_link.as_deref().unwrap_or("-")
    );

    if !report.parameters.is_empty() {
        println!();
        println!("{}:", style("Parameters").bold());
        for (key, value) in &report.parameters {
            println!("  {} = {}", style(key).cyan(), value);
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("By").dim(),
        report.generated_by,
        style("On").dim(),
        format_date(Some(report.generated_on))
    );
    Ok(())
}

fn run_generate(args: GenerateArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let name = value_or_prompt(args.name, "Report name")?;
    let id = ws
        .generate_report(&name, args.kind, into_params(args.params))?
        .id;

    if args.wait {
        if !global.quiet && global.format == OutputFormat::Auto {
            println!("Generating report {}...", style(id).cyan());
        }
        ws.wait_for_reports();
    }

    let report = ws
        .reports()?
        .get(&id)
        .ok_or_else(|| AeroError::not_found("report", id))?;
    print_changed(report, "Requested", global)?;

    if report.is_pending() && !global.quiet && global.format == OutputFormat::Auto {
        println!(
            "   {}",
            style(format!(
                "ready in {} ms; pass --wait or use `aerocode shell` to see it complete",
                ws.config().report_delay().as_millis()
            ))
            .dim()
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let name = ws
        .reports()?
        .get(&args.id)
        .map(|r| r.name.clone())
        .ok_or_else(|| AeroError::not_found("report", args.id))?;

    if !confirm(&format!("Delete report {} ({})?", args.id, name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let report = ws.delete_report(args.id)?;
    if !global.quiet {
        println!(
            "{} Deleted report {} {}",
            style("✓").green(),
            style(report.id).cyan(),
            style(&report.name).yellow()
        );
    }
    Ok(())
}

fn run_wait(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let queued = ws.pending_jobs();
    let done = ws.wait_for_reports();
    if !global.quiet {
        println!(
            "{} {} of {} queued report(s) generated",
            style("✓").green(),
            done.len(),
            queued
        );
    }
    Ok(())
}

fn print_changed(report: &Report, verb: &str, global: &GlobalOpts) -> Result<()> {
    if print_serialized(report, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", report.id);
        return Ok(());
    }
    println!(
        "{} {} report {} {} ({})",
        style("✓").green(),
        verb,
        style(report.id).cyan(),
        style(&report.name).yellow(),
        styled_label(report.status.label(), report.status.tone())
    );
    if let Some(link) = report.download_link.as_deref() {
        println!("   {}", style(link).dim());
    }
    Ok(())
}
