//! `aerocode test` command - Quality test management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{format_date, print_serialized, styled_label, value_or_prompt};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{AeroError, Workspace};
use crate::entities::test::{Test, TestDraft, TestFilter, TestKind, TestResult};

#[derive(Subcommand, Debug)]
pub enum TestCommands {
    /// List tests with filtering
    List(ListArgs),

    /// Show a test's details
    Show(ShowArgs),

    /// Schedule a test for an aircraft
    Schedule(ScheduleArgs),

    /// Record the outcome of a pending test
    Record(RecordArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by result
    #[arg(long, short = 'r')]
    pub result: Option<TestResult>,

    /// Filter by test type
    #[arg(long, short = 't')]
    pub kind: Option<TestKind>,

    /// Only tests of this aircraft
    #[arg(long, short = 'a')]
    pub aircraft: Option<String>,

    /// Search in aircraft code, type and responsible
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
    /// Test id
    pub id: u32,
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// Aircraft code
    #[arg(long, short = 'a')]
    pub aircraft: String,

    /// Test type
    #[arg(long, short = 't')]
    pub kind: TestKind,

    /// Scheduled date (YYYY-MM-DD, default today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Person responsible for the test
    #[arg(long)]
    pub responsible: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RecordArgs {
    /// Test id
    pub id: u32,

    /// Outcome (approved or rejected)
    #[arg(long, short = 'r')]
    pub result: TestResult,

    /// Date the test was performed (default today)
    #[arg(long)]
    pub performed: Option<NaiveDate>,

    /// Observations
    #[arg(long)]
    pub notes: Option<String>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 4),
    ColumnDef::new("aircraft", "AIRCRAFT", 8),
    ColumnDef::new("kind", "TYPE", 11),
    ColumnDef::new("scheduled", "SCHEDULED", 10),
    ColumnDef::new("performed", "PERFORMED", 10),
    ColumnDef::new("result", "RESULT", 10),
    ColumnDef::new("responsible", "RESPONSIBLE", 18),
];

/// Run a test subcommand
pub fn run(cmd: TestCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TestCommands::List(args) => run_list(args, ws, global),
        TestCommands::Show(args) => run_show(args, ws, global),
        TestCommands::Schedule(args) => run_schedule(args, ws, global),
        TestCommands::Record(args) => run_record(args, ws, global),
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = TestFilter {
        result: args.result,
        kind: args.kind,
        aircraft: args.aircraft,
        search: args.search,
    };
    let mut tests = ws.tests()?.filter(&filter);

    if let Some(limit) = args.limit {
        tests.truncate(limit);
    }

    if args.count {
        println!("{}", tests.len());
        return Ok(());
    }

    if print_serialized(&tests, global.format)? {
        return Ok(());
    }

    if tests.is_empty() {
        println!("No tests found.");
        return Ok(());
    }

    let rows = tests.iter().map(|t| {
        TableRow::new(t.id)
            .cell("id", CellValue::Key(t.id.to_string()))
            .cell("aircraft", CellValue::text(&t.aircraft_code))
            .cell("kind", CellValue::badge(t.kind))
            .cell("scheduled", CellValue::Date(t.scheduled))
            .cell("performed", CellValue::opt_date(t.performed))
            .cell("result", CellValue::badge(t.result))
            .cell("responsible", CellValue::text(&t.responsible))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "test")
        .with_config(config)
        .output(rows, global.format)
}

fn run_show(args: ShowArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let test = ws
        .tests()?
        .get(&args.id)
        .ok_or_else(|| AeroError::not_found("test", args.id))?;

    if print_serialized(test, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", test.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Test").bold(), style(test.id).cyan());
    println!(
        "{}: {}",
        style("Aircraft").bold(),
        style(&test.aircraft_code).yellow()
    );
    println!("{}: {}", style("Type").bold(), test.kind);
    println!(
        "{}: {}",
        style("Result").bold(),
        styled_label(test.result.label(), test.result.tone())
    );
    println!("{}: {}", style("Responsible").bold(), test.responsible);
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Scheduled").dim(),
        format_date(Some(test.scheduled)),
        style("Performed").dim(),
        format_date(test.performed)
    );

    if let Some(notes) = test.notes.as_deref() {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", notes);
    }
    Ok(())
}

fn run_schedule(args: ScheduleArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let draft = TestDraft {
        aircraft_code: args.aircraft,
        kind: args.kind,
        scheduled: args.date.unwrap_or_else(|| ws.today()),
        responsible: value_or_prompt(args.responsible, "Responsible")?,
    };
    let test = ws.schedule_test(draft)?;
    print_changed(test, "Scheduled", global)
}

fn run_record(args: RecordArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let test = ws.record_test(args.id, args.result, args.performed, args.notes)?;
    print_changed(test, "Recorded", global)
}

fn print_changed(test: &Test, verb: &str, global: &GlobalOpts) -> Result<()> {
    if print_serialized(test, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", test.id);
        return Ok(());
    }
    println!(
        "{} {} test {} ({} on {})",
        style("✓").green(),
        verb,
        style(test.id).cyan(),
        test.kind,
        style(&test.aircraft_code).yellow()
    );
    println!(
        "   {} | {}",
        format_date(test.performed.or(Some(test.scheduled))),
        styled_label(test.result.label(), test.result.tone())
    );
    Ok(())
}
