//! `aerocode user` command - Employee administration

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{print_serialized, styled_label, value_or_prompt};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{AccessLevel, AeroError, Workspace};
use crate::entities::employee::{Employee, EmployeeDraft, EmployeeFilter, EmployeePatch};
use crate::entities::stage::StageFilter;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List employees
    List(ListArgs),

    /// Register an employee
    New(NewArgs),

    /// Show an employee and the stages they work on
    Show(ShowArgs),

    /// Change an employee's fields
    Edit(EditArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by access level
    #[arg(long, short = 'l')]
    pub level: Option<AccessLevel>,

    /// Search in name and username
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
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Login name (unique, case-insensitive)
    #[arg(long)]
    pub username: Option<String>,

    /// Access level (default operator)
    #[arg(long, short = 'l')]
    pub level: Option<AccessLevel>,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Employee id
    pub id: u32,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Employee id
    pub id: u32,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, short = 'l')]
    pub level: Option<AccessLevel>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 5),
    ColumnDef::new("name", "NAME", 22),
    ColumnDef::new("username", "USERNAME", 14),
    ColumnDef::new("level", "LEVEL", 13),
    ColumnDef::new("phone", "PHONE", 16),
];

/// Run a user subcommand
pub fn run(cmd: UserCommands, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UserCommands::List(args) => run_list(args, ws, global),
        UserCommands::New(args) => run_new(args, ws, global),
        UserCommands::Show(args) => run_show(args, ws, global),
        UserCommands::Edit(args) => run_edit(args, ws, global),
    }
}

fn run_list(args: ListArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let filter = EmployeeFilter {
        level: args.level,
        search: args.search,
    };
    let mut employees = ws.employees()?.filter(&filter);

    if let Some(limit) = args.limit {
        employees.truncate(limit);
    }

    if args.count {
        println!("{}", employees.len());
        return Ok(());
    }

    if print_serialized(&employees, global.format)? {
        return Ok(());
    }

    if employees.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    let rows = employees.iter().map(|e| {
        TableRow::new(e.id)
            .cell("id", CellValue::Key(e.id.to_string()))
            .cell("name", CellValue::text(&e.name))
            .cell("username", CellValue::text(&e.username))
            .cell("level", CellValue::badge(e.level))
            .cell("phone", CellValue::opt_text(Some(e.phone.as_str())))
    });

    let config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COLUMNS, "employee")
        .with_config(config)
        .output(rows, global.format)
}

fn run_new(args: NewArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let draft = EmployeeDraft {
        name: value_or_prompt(args.name, "Name")?,
        level: args.level,
        phone: args.phone,
        address: args.address,
        username: value_or_prompt(args.username, "Username")?,
    };
    let employee = ws.create_employee(draft)?;
    print_changed(employee, "Registered", global)
}

fn run_show(args: ShowArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let employee = ws
        .employees()?
        .get(&args.id)
        .ok_or_else(|| AeroError::not_found("employee", args.id))?;

    if print_serialized(employee, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", employee.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Employee").bold(), style(employee.id).cyan());
    println!(
        "{}: {}",
        style("Name").bold(),
        style(&employee.name).yellow()
    );
    println!("{}: {}", style("Username").bold(), employee.username);
    println!(
        "{}: {}",
        style("Level").bold(),
        styled_label(employee.level.label(), employee.level.tone())
    );
    println!("{}: {}", style("Phone").bold(), or_dash(&employee.phone));
    println!("{}: {}", style("Address").bold(), or_dash(&employee.address));
    println!("{}", style("─".repeat(60)).dim());

    let assigned: Vec<_> = ws
        .stages(&StageFilter::default())?
        .into_iter()
        .filter(|r| r.stage.employees.contains(&employee.id))
        .collect();
    if !assigned.is_empty() {
        println!();
        println!("{} ({}):", style("Stages").bold(), assigned.len());
        for r in assigned {
            println!(
                "  • {}/{} {} ({})",
                r.aircraft,
                r.stage.id,
                r.stage.name,
                styled_label(r.stage.status.label(), r.stage.status.tone())
            );
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let patch = EmployeePatch {
        name: args.name,
        level: args.level,
        phone: args.phone,
        address: args.address,
        username: args.username,
    };
    let employee = ws.update_employee(args.id, patch)?;
    print_changed(employee, "Updated", global)
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn print_changed(employee: &Employee, verb: &str, global: &GlobalOpts) -> Result<()> {
    if print_serialized(employee, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", employee.id);
        return Ok(());
    }
    println!(
        "{} {} employee {} {} ({})",
        style("✓").green(),
        verb,
        style(employee.id).cyan(),
        style(&employee.name).yellow(),
        styled_label(employee.level.label(), employee.level.tone())
    );
    Ok(())
}
