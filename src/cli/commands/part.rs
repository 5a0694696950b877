//! `aerocode part` command - Part inventory management

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{confirm, format_date, print_serialized, styled_label, value_or_prompt};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{AeroError, Workspace};
use crate::entities::part::{Part, PartDraft, PartFilter, PartKind, PartPatch, PartStatus};

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// List parts with filtering
    List(ListArgs),

    /// Register a new part
    New(NewArgs),

    /// Show a part's details
    Show(ShowArgs),

    /// Change a part's fields (refreshes its last-updated date)
    Edit(EditArgs),

    /// Remove a part from the inventory
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<PartStatus>,

    /// Filter by part type
    #[arg(long, short = 't')]
    pub kind: Option<PartKind>,

    /// Only parts installed on this aircraft
    #[arg(long, short = 'a')]
    pub aircraft: Option<String>,

    /// Search in name, internal code, supplier and aircraft
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
    /// Internal part code
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Part name
    #[arg(long)]
    pub name: Option<String>,

    /// Part type
    #[arg(long, short = 't', default_value = "other")]
    pub kind: PartKind,

    /// Supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    /// Initial status
    #[arg(long, short = 's', default_value = "in-stock")]
    pub status: PartStatus,

    /// Aircraft the part is installed on
    #[arg(long, short = 'a')]
    pub aircraft: Option<String>,

    /// Entry date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub entry_date: Option<NaiveDate>,

    /// Warehouse location
    #[arg(long, short = 'l', default_value = "")]
    pub location: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Part id
    pub id: u32,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Part id
    pub id: u32,

    #[arg(long, short = 'c')]
    pub code: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 't')]
    pub kind: Option<PartKind>,

    #[arg(long)]
    pub supplier: Option<String>,

    #[arg(long, short = 's')]
    pub status: Option<PartStatus>,

    /// Install the part on this aircraft
    #[arg(long, short = 'a', conflicts_with = "detach")]
    pub aircraft: Option<String>,

    /// Remove the aircraft association
    #[arg(long)]
    pub detach: bool,

    #[arg(long)]
    pub entry_date: Option<NaiveDate>,

    #[arg(long, short = 'l')]
    pub location: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Part id
    pub id: u32,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 5),
    ColumnDef::new("code", "CODE", 10),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("kind", "TYPE", 14),
    ColumnDef::new("supplier", "SUPPLIER", 20),
    ColumnDef::new("status", "STATUS", 14),
    ColumnDef::new("aircraft", "AIRCRAFT", 8),
    ColumnDef::new("updated", "UPDATED", 10),
];

/// Run a part subcommand
pub fn run(cmd: PartCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartCommands::List(args) => run_list(args, ws, global),
        PartCommands::New(args) => run_new(args, ws, global),
        PartCommands::Show(args) => run_show(args, ws, global),
        PartCommands::Edit(args) => run_edit(args, ws, global),
        PartCommands::Delete(args) => run_delete(args, ws, global),
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = PartFilter {
        status: args.status,
        kind: args.kind,
        aircraft: args.aircraft,
        search: args.search,
    };
    let mut parts = ws.parts()?.filter(&filter);

    if let Some(limit) = args.limit {
        parts.truncate(limit);
    }

    if args.count {
        println!("{}", parts.len());
        return Ok(());
    }

    if print_serialized(&parts, global.format)? {
        return Ok(());
    }

    if parts.is_empty() {
        println!("No parts found.");
        return Ok(());
    }

    let rows = parts.iter().map(|p| {
        TableRow::new(p.id)
            .cell("id", CellValue::Key(p.id.to_string()))
            .cell("code", CellValue::text(&p.internal_code))
            .cell("name", CellValue::text(&p.name))
            .cell("kind", CellValue::badge(p.kind))
            .cell("supplier", CellValue::text(&p.supplier))
            .cell("status", CellValue::badge(p.status))
            .cell("aircraft", CellValue::opt_text(p.aircraft.as_deref()))
            .cell("updated", CellValue::Date(p.last_updated))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "part")
        .with_config(config)
        .output(rows, global.format)
}

fn run_new(args: NewArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let draft = PartDraft {
        internal_code: value_or_prompt(args.code, "Internal code")?,
        name: value_or_prompt(args.name, "Name")?,
        kind: args.kind,
        supplier: value_or_prompt(args.supplier, "Supplier")?,
        status: args.status,
        aircraft: args.aircraft,
        entry_date: args.entry_date,
        warehouse_location: args.location,
    };
    let part = ws.create_part(draft)?;
    print_created(part, "Registered", global)
}

fn run_show(args: ShowArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let part = ws
        .parts()?
        .get(&args.id)
        .ok_or_else(|| AeroError::not_found("part", args.id))?;

    if print_serialized(part, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", part.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} ({})",
        style("Part").bold(),
        style(part.id).cyan(),
        part.internal_code
    );
    println!("{}: {}", style("Name").bold(), style(&part.name).yellow());
    println!("{}: {}", style("Type").bold(), part.kind);
    println!("{}: {}", style("Supplier").bold(), part.supplier);
    println!(
        "{}: {}",
        style("Status").bold(),
        styled_label(part.status.label(), part.status.tone())
    );
    println!(
        "{}: {}",
        style("Aircraft").bold(),
        part.aircraft.as_deref().unwrap_or("-")
    );
    println!(
        "{}: {}",
        style("Location").bold(),
        if part.warehouse_location.is_empty() {
            "-"
        } else {
            part.warehouse_location.as_str()
        }
    );
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Entered").dim(),
        format_date(Some(part.entry_date)),
        style("Updated").dim(),
        format_date(Some(part.last_updated))
    );
    Ok(())
}

fn run_edit(args: EditArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let aircraft = if args.detach {
        Some(None)
    } else {
        args.aircraft.map(Some)
    };
    let patch = PartPatch {
        internal_code: args.code,
        name: args.name,
        kind: args.kind,
        supplier: args.supplier,
        status: args.status,
        aircraft,
        entry_date: args.entry_date,
        warehouse_location: args.location,
    };
    let part = ws.update_part(args.id, patch)?;
    print_created(part, "Updated", global)
}

fn run_delete(args: DeleteArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let name = ws
        .parts()?
        .get(&args.id)
        .map(|p| p.name.clone())
        .ok_or_else(|| AeroError::not_found("part", args.id))?;

    if !confirm(&format!("Delete part {} ({})?", args.id, name), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let part = ws.delete_part(args.id)?;
    if !global.quiet {
        println!(
            "{} Deleted part {} {}",
            style("✓").green(),
            style(part.id).cyan(),
            style(&part.name).yellow()
        );
    }
    Ok(())
}

fn print_created(part: &Part, verb: &str, global: &GlobalOpts) -> Result<()> {
    if print_serialized(part, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", part.id);
        return Ok(());
    }
    println!(
        "{} {} part {} {}",
        style("✓").green(),
        verb,
        style(part.id).cyan(),
        style(&part.name).yellow()
    );
    println!(
        "   {} | {} | {}",
        part.internal_code,
        styled_label(part.status.label(), part.status.tone()),
        part.aircraft.as_deref().unwrap_or("no aircraft")
    );
    Ok(())
}
