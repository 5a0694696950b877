//! Aircraft entity type - a production unit addressed by its code

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::entity::{next_id, Entity, Labeled, Tone};
use crate::core::error::{AeroError, AeroResult};
use crate::core::filter::{matches_opt, matches_text, Criteria};
use crate::entities::stage::{Stage, StageDraft, StageStatus};

/// Aircraft category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum AircraftKind {
    #[serde(rename = "COMERCIAL")]
    #[value(alias = "comercial")]
    Commercial,
    #[serde(rename = "CARGA")]
    #[value(alias = "carga")]
    Cargo,
    #[serde(rename = "MILITAR")]
    #[value(alias = "militar")]
    Military,
}

impl Default for AircraftKind {
    fn default() -> Self {
        AircraftKind::Commercial
    }
}

impl Labeled for AircraftKind {
    const ALL: &'static [Self] = &[
        AircraftKind::Commercial,
        AircraftKind::Cargo,
        AircraftKind::Military,
    ];

    fn label(&self) -> &'static str {
        match self {
            AircraftKind::Commercial => "COMERCIAL",
            AircraftKind::Cargo => "CARGA",
            AircraftKind::Military => "MILITAR",
        }
    }
}

impl std::fmt::Display for AircraftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Production status of an aircraft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ProductionStatus {
    #[serde(rename = "Em Produção")]
    #[value(alias = "em-producao")]
    InProduction,
    #[serde(rename = "Em Testes")]
    #[value(alias = "em-testes")]
    InTesting,
    #[serde(rename = "Pronta")]
    #[value(alias = "pronta")]
    Ready,
    #[serde(rename = "Entregue")]
    #[value(alias = "entregue")]
    Delivered,
    #[serde(rename = "Desativada")]
    #[value(alias = "desativada")]
    Decommissioned,
}

impl Default for ProductionStatus {
    fn default() -> Self {
        ProductionStatus::InProduction
    }
}

impl Labeled for ProductionStatus {
    const ALL: &'static [Self] = &[
        ProductionStatus::InProduction,
        ProductionStatus::InTesting,
        ProductionStatus::Ready,
        ProductionStatus::Delivered,
        ProductionStatus::Decommissioned,
    ];

    fn label(&self) -> &'static str {
        match self {
            ProductionStatus::InProduction => "Em Produção",
            ProductionStatus::InTesting => "Em Testes",
            ProductionStatus::Ready => "Pronta",
            ProductionStatus::Delivered => "Entregue",
            ProductionStatus::Decommissioned => "Desativada",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            ProductionStatus::InProduction => Tone::Waiting,
            ProductionStatus::InTesting => Tone::Active,
            ProductionStatus::Ready => Tone::Good,
            ProductionStatus::Delivered => Tone::Good,
            ProductionStatus::Decommissioned => Tone::Muted,
        }
    }
}

impl std::fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An aircraft under production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Unique code, stored upper-case (e.g. "E175")
    pub code: String,

    pub model: String,

    #[serde(default)]
    pub kind: AircraftKind,

    /// Passenger/crew capacity
    pub capacity: u32,

    /// Range in kilometres
    #[serde(default)]
    pub range_km: u32,

    #[serde(default)]
    pub status: ProductionStatus,

    /// Production stages in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, Default)]
pub struct AircraftDraft {
    pub code: String,
    pub model: String,
    pub kind: AircraftKind,
    pub capacity: Option<u32>,
    pub range_km: Option<u32>,
    pub status: Option<ProductionStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct AircraftPatch {
    pub model: Option<String>,
    pub kind: Option<AircraftKind>,
    pub capacity: Option<u32>,
    pub range_km: Option<u32>,
    pub status: Option<ProductionStatus>,
}

/// Upper-case, trimmed form used for storing and comparing codes
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl Entity for Aircraft {
    type Key = String;
    type Draft = AircraftDraft;
    type Patch = AircraftPatch;
    const KIND: &'static str = "aircraft";

    fn key(&self) -> String {
        self.code.clone()
    }

    fn has_key(&self, key: &String) -> bool {
        self.code.eq_ignore_ascii_case(key.trim())
    }

    fn validate(draft: &AircraftDraft) -> AeroResult<()> {
        if draft.model.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "model"));
        }
        Ok(())
    }

    fn assign_key(draft: &AircraftDraft, existing: &[Self]) -> AeroResult<String> {
        let code = normalize_code(&draft.code);
        if code.is_empty() || code.chars().any(char::is_whitespace) {
            return Err(AeroError::InvalidKey {
                kind: Self::KIND,
                key: code,
            });
        }
        if existing.iter().any(|a| a.has_key(&code)) {
            return Err(AeroError::DuplicateKey {
                kind: Self::KIND,
                key: code,
            });
        }
        Ok(code)
    }

    fn build(key: String, draft: AircraftDraft, _today: NaiveDate) -> Self {
        Aircraft {
            code: key,
            model: draft.model.trim().to_string(),
            kind: draft.kind,
            capacity: draft.capacity.unwrap_or(1),
            range_km: draft.range_km.unwrap_or(0),
            status: draft.status.unwrap_or_default(),
            stages: Vec::new(),
        }
    }

    fn merge(&mut self, patch: AircraftPatch, _today: NaiveDate) {
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(range_km) = patch.range_km {
            self.range_km = range_km;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

impl Aircraft {
    /// Share of concluded stages, 0-100 (0 when no stages exist)
    pub fn completion_pct(&self) -> u8 {
        if self.stages.is_empty() {
            return 0;
        }
        let done = self.stages.iter().filter(|s| s.is_done()).count();
        (done * 100 / self.stages.len()) as u8
    }

    pub fn stage(&self, id: u32) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    fn stage_index(&self, id: u32) -> AeroResult<usize> {
        self.stages
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AeroError::not_found("stage", format!("{}/{}", self.code, id)))
    }

    /// Append a stage; its id is one past the largest stage id of this aircraft
    pub fn add_stage(&mut self, draft: StageDraft) -> AeroResult<&Stage> {
        if draft.name.trim().is_empty() {
            return Err(AeroError::missing("stage", "name"));
        }
        let deadline = draft
            .deadline
            .ok_or_else(|| AeroError::missing("stage", "deadline"))?;

        let stage = Stage {
            id: next_id(self.stages.iter().map(|s| s.id)),
            name: draft.name.trim().to_string(),
            deadline,
            status: draft.status,
            employees: Vec::new(),
        };
        info!(aircraft = %self.code, stage = stage.id, "stage added");
        self.stages.push(stage);
        Ok(&self.stages[self.stages.len() - 1])
    }

    /// Move a pending stage to in-progress
    ///
    /// The stage right before it in execution order must already be done.
    pub fn start_stage(&mut self, id: u32) -> AeroResult<&Stage> {
        let idx = self.stage_index(id)?;
        let stage = &self.stages[idx];
        if stage.status != StageStatus::Pending {
            return Err(AeroError::InvalidTransition {
                subject: format!("stage '{}'", stage.name),
                action: "start",
                reason: format!("status is {}, expected {}", stage.status, StageStatus::Pending),
            });
        }
        if let Some(prev) = idx.checked_sub(1).map(|i| &self.stages[i]) {
            if !prev.is_done() {
                return Err(AeroError::InvalidTransition {
                    subject: format!("stage '{}'", stage.name),
                    action: "start",
                    reason: format!("previous stage '{}' is {}", prev.name, prev.status),
                });
            }
        }

        self.stages[idx].status = StageStatus::InProgress;
        info!(aircraft = %self.code, stage = id, "stage started");
        Ok(&self.stages[idx])
    }

    /// Move an in-progress stage to done
    pub fn finish_stage(&mut self, id: u32) -> AeroResult<&Stage> {
        let idx = self.stage_index(id)?;
        let stage = &mut self.stages[idx];
        if stage.status != StageStatus::InProgress {
            return Err(AeroError::InvalidTransition {
                subject: format!("stage '{}'", stage.name),
                action: "finish",
                reason: format!(
                    "status is {}, expected {}",
                    stage.status,
                    StageStatus::InProgress
                ),
            });
        }
        stage.status = StageStatus::Done;
        info!(aircraft = %self.code, stage = id, "stage finished");
        Ok(&self.stages[idx])
    }

    /// Allocate an employee to a stage (no-op if already allocated)
    pub fn assign_employee(&mut self, stage_id: u32, employee_id: u32) -> AeroResult<&Stage> {
        let idx = self.stage_index(stage_id)?;
        let stage = &mut self.stages[idx];
        if !stage.employees.contains(&employee_id) {
            stage.employees.push(employee_id);
            info!(aircraft = %self.code, stage = stage_id, employee = employee_id, "employee assigned");
        }
        Ok(&self.stages[idx])
    }

    /// Remove an employee from a stage (no-op if not allocated)
    pub fn unassign_employee(&mut self, stage_id: u32, employee_id: u32) -> AeroResult<&Stage> {
        let idx = self.stage_index(stage_id)?;
        self.stages[idx].employees.retain(|e| *e != employee_id);
        Ok(&self.stages[idx])
    }
}

/// List filter for aircraft
#[derive(Debug, Clone, Default)]
pub struct AircraftFilter {
    pub status: Option<ProductionStatus>,
    pub kind: Option<AircraftKind>,
    pub search: Option<String>,
}

impl Criteria<Aircraft> for AircraftFilter {
    fn matches(&self, a: &Aircraft) -> bool {
        matches_opt(self.status, a.status)
            && matches_opt(self.kind, a.kind)
            && matches_text(self.search.as_deref(), &[&a.code, &a.model])
    }
}
