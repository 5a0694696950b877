//! `aerocode status` command - Production dashboard
//!
//! Sections the current user may not open are left out.

use clap::ValueEnum;
use console::style;
use miette::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::print_serialized;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Labeled;
use crate::core::{Module, Workspace};
use crate::entities::aircraft::ProductionStatus;
use crate::entities::part::PartStatus;
use crate::entities::report::ReportStatus;
use crate::entities::stage::{StageFilter, StageStatus};
use crate::entities::test::TestResult;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Show only one section
    #[arg(long, short = 's')]
    pub section: Option<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Aircraft,
    Stages,
    Parts,
    Tests,
    Reports,
}

impl Section {
    const ALL: [Section; 5] = [
        Section::Aircraft,
        Section::Stages,
        Section::Parts,
        Section::Tests,
        Section::Reports,
    ];

    fn module(&self) -> Module {
        match self {
            Section::Aircraft => Module::Aircraft,
            Section::Stages => Module::Stages,
            Section::Parts => Module::Parts,
            Section::Tests => Module::Tests,
            Section::Reports => Module::Reports,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Section::Aircraft => "AIRCRAFT",
            Section::Stages => "PRODUCTION STAGES",
            Section::Parts => "PARTS",
            Section::Tests => "TESTS",
            Section::Reports => "REPORTS",
        }
    }
}

/// One status value and how many records hold it
#[derive(Debug, Serialize)]
struct Tally {
    label: &'static str,
    count: usize,
}

#[derive(Debug, Default, Serialize)]
struct Dashboard {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    sections: BTreeMap<&'static str, Vec<Tally>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overdue_stages: Option<usize>,
}

/// Count items per label, keeping every label even when its count is zero
fn tally<L, I>(values: I) -> Vec<Tally>
where
    L: Labeled + PartialEq,
    I: IntoIterator<Item = L>,
{
    let values: Vec<L> = values.into_iter().collect();
    L::ALL
        .iter()
        .map(|l| Tally {
            label: l.label(),
            count: values.iter().filter(|v| *v == l).count(),
        })
        .collect()
}

pub fn run(args: StatusArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let session = ws.session();
    session.require_user()?;

    let wanted: Vec<Section> = Section::ALL
        .into_iter()
        .filter(|s| args.section.map_or(true, |only| only == *s))
        .filter(|s| session.can_access(s.module()))
        .collect();

    if let Some(only) = args.section {
        if wanted.is_empty() {
            session.require_module(only.module())?;
        }
    }

    let today = ws.today();
    let mut dashboard = Dashboard::default();
    for section in &wanted {
        let rows = match section {
            Section::Aircraft => tally::<ProductionStatus, _>(
                ws.aircraft()?.list().iter().map(|a| a.status),
            ),
            Section::Stages => {
                let stages = ws.stages(&StageFilter::default())?;
                dashboard.overdue_stages = Some(
                    stages
                        .iter()
                        .filter(|r| !r.stage.is_done() && r.stage.deadline < today)
                        .count(),
                );
                tally::<StageStatus, _>(stages.iter().map(|r| r.stage.status))
            }
            Section::Parts => tally::<PartStatus, _>(ws.parts()?.list().iter().map(|p| p.status)),
            Section::Tests => tally::<TestResult, _>(ws.tests()?.list().iter().map(|t| t.result)),
            Section::Reports => {
                tally::<ReportStatus, _>(ws.reports()?.list().iter().map(|r| r.status))
            }
        };
        dashboard.sections.insert(section.title(), rows);
    }

    if print_serialized(&dashboard, global.format)? {
        return Ok(());
    }

    if global.format == OutputFormat::Auto || global.format == OutputFormat::Tsv {
        if let Some(user) = ws.session().current_user() {
            println!(
                "{} {}",
                style("AeroCode Production Status").bold().underlined(),
                style(format!("({})", user.name)).dim()
            );
            println!();
        }
    }

    for section in &wanted {
        let Some(rows) = dashboard.sections.get(section.title()) else {
            continue;
        };
        let mut builder = Builder::default();
        builder.push_record([section.title().to_string(), "COUNT".to_string()]);
        for row in rows {
            builder.push_record([row.label.to_string(), row.count.to_string()]);
        }
        let total: usize = rows.iter().map(|r| r.count).sum();
        builder.push_record(["total".to_string(), total.to_string()]);

        let mut table = builder.build();
        if global.format == OutputFormat::Md {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        println!("{}", table);

        if *section == Section::Stages {
            if let Some(overdue) = dashboard.overdue_stages.filter(|n| *n > 0) {
                println!("{} {} stage(s) past deadline", style("!").red().bold(), overdue);
            }
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_zero_counts() {
        let rows = tally([TestResult::Approved, TestResult::Approved, TestResult::Pending]);
        let counts: Vec<_> = rows.iter().map(|r| (r.label, r.count)).collect();
        assert_eq!(
            counts,
            vec![("PENDENTE", 1), ("APROVADO", 2), ("REPROVADO", 0)]
        );
    }
}
