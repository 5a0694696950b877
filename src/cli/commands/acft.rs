//! `aerocode acft` command - Aircraft management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{format_date, print_serialized, styled_label, value_or_prompt};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{AeroError, Workspace};
use crate::entities::aircraft::{
    Aircraft, AircraftDraft, AircraftFilter, AircraftKind, AircraftPatch, ProductionStatus,
};
use crate::entities::part::PartFilter;
use crate::entities::test::TestFilter;

#[derive(Subcommand, Debug)]
pub enum AcftCommands {
    /// List aircraft with filtering
    List(ListArgs),

    /// Register a new aircraft
    New(NewArgs),

    /// Show an aircraft with its production stages
    Show(ShowArgs),

    /// Change an aircraft's fields
    Edit(EditArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by production status
    #[arg(long, short = 's')]
    pub status: Option<ProductionStatus>,

    /// Filter by aircraft type
    #[arg(long, short = 't')]
    pub kind: Option<AircraftKind>,

    /// Search in code and model
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
pub struct NewArgs {
    /// Aircraft code (stored upper-case, must be unique)
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Model name
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Aircraft type
    #[arg(long, short = 't', default_value = "commercial")]
    pub kind: AircraftKind,

    /// Passenger or payload capacity (default 1)
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Range in kilometres (default 0)
    #[arg(long)]
    pub range: Option<u32>,

    /// Initial production status (default in-production)
    #[arg(long, short = 's')]
    pub status: Option<ProductionStatus>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Aircraft code
    pub code: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Aircraft code
    pub code: String,

    #[arg(long, short = 'm')]
    pub model: Option<String>,

    #[arg(long, short = 't')]
    pub kind: Option<AircraftKind>,

    #[arg(long)]
    pub capacity: Option<u32>,

    #[arg(long)]
    pub range: Option<u32>,

    #[arg(long, short = 's')]
    pub status: Option<ProductionStatus>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("code", "CODE", 10),
    ColumnDef::new("model", "MODEL", 26),
    ColumnDef::new("kind", "TYPE", 10),
    ColumnDef::new("capacity", "CAP", 6),
    ColumnDef::new("status", "STATUS", 14),
    ColumnDef::new("progress", "DONE", 5),
];

/// Run an aircraft subcommand
pub fn run(cmd: AcftCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AcftCommands::List(args) => run_list(args, ws, global),
        AcftCommands::New(args) => run_new(args, ws, global),
        AcftCommands::Show(args) => run_show(args, ws, global),
        AcftCommands::Edit(args) => run_edit(args, ws, global),
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = AircraftFilter {
        status: args.status,
        kind: args.kind,
        search: args.search,
    };
    let mut aircraft = ws.aircraft()?.filter(&filter);

    if let Some(limit) = args.limit {
        aircraft.truncate(limit);
    }

    if args.count {
        println!("{}", aircraft.len());
        return Ok(());
    }

    if print_serialized(&aircraft, global.format)? {
        return Ok(());
    }

    if aircraft.is_empty() {
        println!("No aircraft found.");
        return Ok(());
    }

    let rows = aircraft.iter().map(|a| {
        TableRow::new(&a.code)
            .cell("code", CellValue::Key(a.code.clone()))
            .cell("model", CellValue::text(&a.model))
            .cell("kind", CellValue::badge(a.kind))
            .cell("capacity", CellValue::Number(a.capacity.into()))
            .cell("status", CellValue::badge(a.status))
            .cell("progress", progress_cell(a))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "aircraft")
        .with_config(config)
        .output(rows, global.format)
}

fn progress_cell(a: &Aircraft) -> CellValue {
    if a.stages.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Percent(a.completion_pct())
    }
}

fn run_new(args: NewArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let draft = AircraftDraft {
        code: value_or_prompt(args.code, "Code")?,
        model: value_or_prompt(args.model, "Model")?,
        kind: args.kind,
        capacity: args.capacity,
        range_km: args.range,
        status: args.status,
    };
    let aircraft = ws.create_aircraft(draft)?;

    if print_serialized(aircraft, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", aircraft.code);
        return Ok(());
    }

    println!(
        "{} Registered aircraft {}",
        style("✓").green(),
        style(&aircraft.code).cyan()
    );
    println!(
        "   {} | {} | {}",
        style(&aircraft.model).yellow(),
        aircraft.kind,
        aircraft.status
    );
    Ok(())
}

fn run_show(args: ShowArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let code = crate::entities::aircraft::normalize_code(&args.code);
    let aircraft = ws
        .aircraft()?
        .get(&code)
        .ok_or_else(|| AeroError::not_found("aircraft", &code))?;

    if print_serialized(aircraft, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", aircraft.code);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Code").bold(),
        style(&aircraft.code).cyan()
    );
    println!(
        "{}: {}",
        style("Model").bold(),
        style(&aircraft.model).yellow()
    );
    println!("{}: {}", style("Type").bold(), aircraft.kind);
    println!(
        "{}: {}",
        style("Status").bold(),
        styled_label(aircraft.status.label(), aircraft.status.tone())
    );
    println!("{}: {}", style("Capacity").bold(), aircraft.capacity);
    println!("{}: {} km", style("Range").bold(), aircraft.range_km);
    println!("{}", style("─".repeat(60)).dim());

    if aircraft.stages.is_empty() {
        println!();
        println!("{}", style("No production stages.").dim());
    } else {
        println!();
        println!(
            "{} ({}, {}% complete):",
            style("Stages").bold(),
            aircraft.stages.len(),
            aircraft.completion_pct()
        );
        for stage in &aircraft.stages {
            println!(
                "  {:>2}. {:<24} {}  {}",
                stage.id,
                stage.name,
                format_date(Some(stage.deadline)),
                styled_label(stage.status.label(), stage.status.tone())
            );
        }
    }

    // Related records, shown only when the user may see them
    if let Ok(parts) = ws.parts() {
        let installed = parts.filter(&PartFilter {
            aircraft: Some(aircraft.code.clone()),
            ..Default::default()
        });
        if !installed.is_empty() {
            println!();
            println!("{} ({}):", style("Parts").bold(), installed.len());
            for part in installed {
                println!("  • {} {} ({})", part.internal_code, part.name, part.kind);
            }
        }
    }
    if let Ok(tests) = ws.tests() {
        let tests = tests.filter(&TestFilter {
            aircraft: Some(aircraft.code.clone()),
            ..Default::default()
        });
        if !tests.is_empty() {
            println!();
            println!("{} ({}):", style("Tests").bold(), tests.len());
            for test in tests {
                println!(
                    "  • #{} {} {} {}",
                    test.id,
                    test.kind,
                    format_date(Some(test.scheduled)),
                    styled_label(test.result.label(), test.result.tone())
                );
            }
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let patch = AircraftPatch {
        model: args.model,
        kind: args.kind,
        capacity: args.capacity,
        range_km: args.range,
        status: args.status,
    };
    let aircraft = ws.update_aircraft(&args.code, patch)?;

    if print_serialized(aircraft, global.format)? {
        return Ok(());
    }
    println!(
        "{} Updated aircraft {} ({})",
        style("✓").green(),
        style(&aircraft.code).cyan(),
        styled_label(aircraft.status.label(), aircraft.status.tone())
    );
    Ok(())
}
