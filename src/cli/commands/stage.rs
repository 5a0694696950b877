//! `aerocode stage` command - Production stage management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{format_date, print_serialized, styled_label, value_or_prompt};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::entity::Labeled;
use crate::core::Workspace;
use crate::entities::stage::{Stage, StageDraft, StageFilter, StageStatus};

#[derive(Subcommand, Debug)]
pub enum StageCommands {
    /// List stages across all aircraft
    List(ListArgs),

    /// Show a stage and its crew
    Show(StageRefArgs),

    /// Add a stage to an aircraft's production line
    Add(AddArgs),

    /// Start a pending stage (the previous one must be concluded)
    Start(StageRefArgs),

    /// Conclude a stage in progress
    Finish(StageRefArgs),

    /// Allocate an employee to a stage
    Assign(CrewArgs),

    /// Remove an employee from a stage
    Unassign(CrewArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by stage status
    #[arg(long, short = 's')]
    pub status: Option<StageStatus>,

    /// Only stages of this aircraft
    #[arg(long, short = 'a')]
    pub aircraft: Option<String>,

    /// Search in stage name and aircraft code
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
pub struct StageRefArgs {
    /// Aircraft code
    pub aircraft: String,

    /// Stage id within the aircraft
    pub stage: u32,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Aircraft code
    pub aircraft: String,

    /// Stage name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Deadline (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub deadline: Option<NaiveDate>,

    /// Initial status
    #[arg(long, short = 's', default_value = "pending")]
    pub status: StageStatus,
}

#[derive(clap::Args, Debug)]
pub struct CrewArgs {
    /// Aircraft code
    pub aircraft: String,

    /// Stage id within the aircraft
    pub stage: u32,

    /// Employee id
    pub employee: u32,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("aircraft", "AIRCRAFT", 10),
    ColumnDef::new("id", "ID", 4),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("deadline", "DEADLINE", 10),
    ColumnDef::new("status", "STATUS", 14),
    ColumnDef::new("crew", "CREW", 5),
];

/// Run a stage subcommand
pub fn run(cmd: StageCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StageCommands::List(args) => run_list(args, ws, global),
        StageCommands::Show(args) => run_show(args, ws, global),
        StageCommands::Add(args) => run_add(args, ws, global),
        StageCommands::Start(args) => {
            let stage = ws.start_stage(&args.aircraft, args.stage)?;
            report_change(stage, &args.aircraft, "Started", global)
        }
        StageCommands::Finish(args) => {
            let stage = ws.finish_stage(&args.aircraft, args.stage)?;
            report_change(stage, &args.aircraft, "Concluded", global)
        }
        StageCommands::Assign(args) => {
            let stage = ws.assign_employee(&args.aircraft, args.stage, args.employee)?;
            report_change(stage, &args.aircraft, "Updated crew of", global)
        }
        StageCommands::Unassign(args) => {
            let stage = ws.unassign_employee(&args.aircraft, args.stage, args.employee)?;
            report_change(stage, &args.aircraft, "Updated crew of", global)
        }
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = StageFilter {
        status: args.status,
        aircraft: args.aircraft,
        search: args.search,
    };
    let mut stages = ws.stages(&filter)?;

    if let Some(limit) = args.limit {
        stages.truncate(limit);
    }

    if args.count {
        println!("{}", stages.len());
        return Ok(());
    }

    if print_serialized(&stages, global.format)? {
        return Ok(());
    }

    if stages.is_empty() {
        println!("No stages found.");
        return Ok(());
    }

    let rows = stages.iter().map(|r| {
        TableRow::new(format!("{}/{}", r.aircraft, r.stage.id))
            .cell("aircraft", CellValue::Key(r.aircraft.to_string()))
            .cell("id", CellValue::Number(r.stage.id.into()))
            .cell("name", CellValue::text(&r.stage.name))
            .cell("deadline", CellValue::Date(r.stage.deadline))
            .cell("status", CellValue::badge(r.stage.status))
            .cell("crew", CellValue::Number(r.stage.employees.len() as i64))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "stage")
        .with_config(config)
        .output(rows, global.format)
}

fn run_show(args: StageRefArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let found = ws.stage(&args.aircraft, args.stage)?;

    if print_serialized(&found, global.format)? {
        return Ok(());
    }

    let stage = found.stage;
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}/{}",
        style("Stage").bold(),
        style(found.aircraft).cyan(),
        stage.id
    );
    println!("{}: {}", style("Name").bold(), style(&stage.name).yellow());
    println!(
        "{}: {}",
        style("Deadline").bold(),
        format_date(Some(stage.deadline))
    );
    println!(
        "{}: {}",
        style("Status").bold(),
        styled_label(stage.status.label(), stage.status.tone())
    );
    println!("{}", style("─".repeat(60)).dim());

    println!();
    if stage.employees.is_empty() {
        println!("{}", style("No employees allocated.").dim());
    } else {
        println!("{} ({}):", style("Crew").bold(), stage.employees.len());
        for id in &stage.employees {
            let name = ws.employee_name(*id).unwrap_or("(unknown)");
            println!("  • #{} {}", id, name);
        }
    }
    Ok(())
}

fn run_add(args: AddArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let draft = StageDraft {
        name: value_or_prompt(args.name, "Stage name")?,
        deadline: args.deadline,
        status: args.status,
    };
    let stage = ws.add_stage(&args.aircraft, draft)?;
    report_change(stage, &args.aircraft, "Added", global)
}

fn report_change(stage: &Stage, aircraft: &str, verb: &str, global: &GlobalOpts) -> Result<()> {
    if print_serialized(stage, global.format)? {
        return Ok(());
    }
    println!(
        "{} {} stage {}/{} {} ({})",
        style("✓").green(),
        verb,
        style(crate::entities::aircraft::normalize_code(aircraft)).cyan(),
        stage.id,
        style(&stage.name).yellow(),
        styled_label(stage.status.label(), stage.status.tone())
    );
    Ok(())
}
