//! Part entity type - inventory item, optionally fitted to an aircraft

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::entity::{next_id, Deletable, Entity, Labeled, Tone};
use crate::core::error::{AeroError, AeroResult};
use crate::core::filter::{matches_opt, matches_text, Criteria};

/// Part category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PartKind {
    #[serde(rename = "MOTOR")]
    #[value(alias = "motor")]
    Engine,
    #[serde(rename = "ASA")]
    #[value(alias = "asa")]
    Wing,
    #[serde(rename = "AVIONICA")]
    #[value(alias = "avionica")]
    Avionics,
    #[serde(rename = "FUSELAGEM")]
    #[value(alias = "fuselagem")]
    Fuselage,
    #[serde(rename = "TREM DE POUSO")]
    #[value(alias = "trem-de-pouso")]
    LandingGear,
    #[serde(rename = "OUTROS")]
    #[value(alias = "outros")]
    Other,
}

impl Default for PartKind {
    fn default() -> Self {
        PartKind::Other
    }
}

impl Labeled for PartKind {
    const ALL: &'static [Self] = &[
        PartKind::Engine,
        PartKind::Wing,
        PartKind::Avionics,
        PartKind::Fuselage,
        PartKind::LandingGear,
        PartKind::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            PartKind::Engine => "MOTOR",
            PartKind::Wing => "ASA",
            PartKind::Avionics => "AVIONICA",
            PartKind::Fuselage => "FUSELAGEM",
            PartKind::LandingGear => "TREM DE POUSO",
            PartKind::Other => "OUTROS",
        }
    }
}

impl std::fmt::Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Inventory status of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PartStatus {
    #[serde(rename = "EM ESTOQUE")]
    #[value(alias = "em-estoque")]
    InStock,
    #[serde(rename = "EM USO")]
    #[value(alias = "em-uso")]
    InUse,
    #[serde(rename = "EM MANUTENÇÃO")]
    #[value(alias = "em-manutencao")]
    InMaintenance,
    #[serde(rename = "DESCARTADA")]
    #[value(alias = "descartada")]
    Discarded,
    #[serde(rename = "REPARO")]
    #[value(alias = "reparo")]
    Repair,
}

impl Default for PartStatus {
    fn default() -> Self {
        PartStatus::InStock
    }
}

impl Labeled for PartStatus {
    const ALL: &'static [Self] = &[
        PartStatus::InStock,
        PartStatus::InUse,
        PartStatus::InMaintenance,
        PartStatus::Discarded,
        PartStatus::Repair,
    ];

    fn label(&self) -> &'static str {
        match self {
            PartStatus::InStock => "EM ESTOQUE",
            PartStatus::InUse => "EM USO",
            PartStatus::InMaintenance => "EM MANUTENÇÃO",
            PartStatus::Discarded => "DESCARTADA",
            PartStatus::Repair => "REPARO",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            PartStatus::InStock => Tone::Good,
            PartStatus::InUse => Tone::Active,
            PartStatus::InMaintenance | PartStatus::Repair => Tone::Waiting,
            PartStatus::Discarded => Tone::Bad,
        }
    }
}

impl std::fmt::Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A part (peça) in the warehouse or fitted to an aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: u32,

    /// Internal catalogue code
    pub internal_code: String,

    pub name: String,

    #[serde(default)]
    pub kind: PartKind,

    pub supplier: String,

    #[serde(default)]
    pub status: PartStatus,

    /// Code of the aircraft this part is associated with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,

    pub entry_date: NaiveDate,

    pub last_updated: NaiveDate,

    #[serde(default)]
    pub warehouse_location: String,
}

#[derive(Debug, Clone, Default)]
pub struct PartDraft {
    pub internal_code: String,
    pub name: String,
    pub kind: PartKind,
    pub supplier: String,
    pub status: PartStatus,
    pub aircraft: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub warehouse_location: String,
}

#[derive(Debug, Clone, Default)]
pub struct PartPatch {
    pub internal_code: Option<String>,
    pub name: Option<String>,
    pub kind: Option<PartKind>,
    pub supplier: Option<String>,
    pub status: Option<PartStatus>,
    /// `Some(None)` detaches the part from its aircraft
    pub aircraft: Option<Option<String>>,
    pub entry_date: Option<NaiveDate>,
    pub warehouse_location: Option<String>,
}

impl Entity for Part {
    type Key = u32;
    type Draft = PartDraft;
    type Patch = PartPatch;
    const KIND: &'static str = "part";

    fn key(&self) -> u32 {
        self.id
    }

    fn validate(draft: &PartDraft) -> AeroResult<()> {
        if draft.internal_code.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "internal_code"));
        }
        if draft.name.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "name"));
        }
        if draft.supplier.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "supplier"));
        }
        Ok(())
    }

    fn assign_key(_draft: &PartDraft, existing: &[Self]) -> AeroResult<u32> {
        Ok(next_id(existing.iter().map(|p| p.id)))
    }

    fn build(key: u32, draft: PartDraft, today: NaiveDate) -> Self {
        Part {
            id: key,
            internal_code: draft.internal_code.trim().to_string(),
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            supplier: draft.supplier.trim().to_string(),
            status: draft.status,
            aircraft: draft.aircraft.filter(|c| !c.trim().is_empty()),
            entry_date: draft.entry_date.unwrap_or(today),
            last_updated: today,
            warehouse_location: draft.warehouse_location,
        }
    }

    fn merge(&mut self, patch: PartPatch, today: NaiveDate) {
        if let Some(internal_code) = patch.internal_code {
            self.internal_code = internal_code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(aircraft) = patch.aircraft {
            self.aircraft = aircraft;
        }
        if let Some(entry_date) = patch.entry_date {
            self.entry_date = entry_date;
        }
        if let Some(location) = patch.warehouse_location {
            self.warehouse_location = location;
        }
        self.last_updated = today;
    }
}

impl Deletable for Part {}

/// List filter for parts
#[derive(Debug, Clone, Default)]
pub struct PartFilter {
    pub status: Option<PartStatus>,
    pub kind: Option<PartKind>,
    pub aircraft: Option<String>,
    pub search: Option<String>,
}

impl Criteria<Part> for PartFilter {
    fn matches(&self, p: &Part) -> bool {
        let aircraft = p.aircraft.as_deref().unwrap_or("");
        matches_opt(self.status, p.status)
            && matches_opt(self.kind, p.kind)
            && self
                .aircraft
                .as_deref()
                .map_or(true, |a| aircraft.eq_ignore_ascii_case(a.trim()))
            && matches_text(
                self.search.as_deref(),
                &[&p.name, &p.internal_code, &p.supplier, aircraft],
            )
    }
}
