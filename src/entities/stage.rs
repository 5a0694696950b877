//! Stage entity type - a production step inside an aircraft's build

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::entity::{Labeled, Tone};
use crate::core::filter::{matches_opt, matches_text, Criteria};

/// Progress of a production stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum StageStatus {
    #[serde(rename = "PENDENTE")]
    #[value(alias = "pendente")]
    Pending,
    #[serde(rename = "EM ANDAMENTO")]
    #[value(alias = "em-andamento")]
    InProgress,
    #[serde(rename = "CONCLUÍDA")]
    #[value(alias = "concluida")]
    Done,
}

impl Default for StageStatus {
    fn default() -> Self {
        StageStatus::Pending
    }
}

impl Labeled for StageStatus {
    const ALL: &'static [Self] = &[
        StageStatus::Pending,
        StageStatus::InProgress,
        StageStatus::Done,
    ];

    fn label(&self) -> &'static str {
        match self {
            StageStatus::Pending => "PENDENTE",
            StageStatus::InProgress => "EM ANDAMENTO",
            StageStatus::Done => "CONCLUÍDA",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            StageStatus::Pending => Tone::Muted,
            StageStatus::InProgress => Tone::Waiting,
            StageStatus::Done => Tone::Good,
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A production stage (etapa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Identifier, unique within the owning aircraft
    pub id: u32,

    pub name: String,

    /// Deadline for completion
    pub deadline: NaiveDate,

    #[serde(default)]
    pub status: StageStatus,

    /// Employees allocated to the stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub employees: Vec<u32>,
}

/// Input for adding a stage to an aircraft
#[derive(Debug, Clone)]
pub struct StageDraft {
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub status: StageStatus,
}

impl Stage {
    pub fn is_done(&self) -> bool {
        self.status == StageStatus::Done
    }
}

/// A stage together with the code of the aircraft that owns it
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageRef<'a> {
    pub aircraft: &'a str,
    #[serde(flatten)]
    pub stage: &'a Stage,
}

/// Filter for the cross-aircraft stage list
#[derive(Debug, Clone, Default)]
pub struct StageFilter {
    pub status: Option<StageStatus>,
    pub aircraft: Option<String>,
    pub search: Option<String>,
}

impl<'a> Criteria<StageRef<'a>> for StageFilter {
    fn matches(&self, r: &StageRef<'a>) -> bool {
        matches_opt(self.status, r.stage.status)
            && self
                .aircraft
                .as_deref()
                .map_or(true, |a| r.aircraft.eq_ignore_ascii_case(a.trim()))
            && matches_text(self.search.as_deref(), &[&r.stage.name, r.aircraft])
    }
}
