//! Report entity type - generated document records
//!
//! A report's content is never produced here. Generation only creates a
//! pending record that a deferred job later marks as generated with a
//! download link.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::entity::{next_id, Deletable, Entity, Labeled, Tone};
use crate::core::error::{AeroError, AeroResult};
use crate::core::filter::{matches_opt, matches_text, Criteria};

/// Report category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReportKind {
    #[serde(rename = "PRODUCAO_GERAL")]
    #[value(alias = "producao-geral")]
    Production,
    #[serde(rename = "POR_AERONAVE")]
    #[value(alias = "por-aeronave")]
    PerAircraft,
    #[serde(rename = "PECA_LOGISTICA")]
    #[value(alias = "peca-logistica")]
    PartLogistics,
    #[serde(rename = "TESTES_QUALIDADE")]
    #[value(alias = "testes-qualidade")]
    Quality,
    #[serde(rename = "MANUTENCAO")]
    #[value(alias = "manutencao")]
    Maintenance,
}

impl Labeled for ReportKind {
    const ALL: &'static [Self] = &[
        ReportKind::Production,
        ReportKind::PerAircraft,
        ReportKind::PartLogistics,
        ReportKind::Quality,
        ReportKind::Maintenance,
    ];

    fn label(&self) -> &'static str {
        match self {
            ReportKind::Production => "PRODUCAO_GERAL",
            ReportKind::PerAircraft => "POR_AERONAVE",
            ReportKind::PartLogistics => "PECA_LOGISTICA",
            ReportKind::Quality => "TESTES_QUALIDADE",
            ReportKind::Maintenance => "MANUTENCAO",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Generation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReportStatus {
    #[serde(rename = "GERADO")]
    #[value(alias = "gerado")]
    Generated,
    #[serde(rename = "PENDENTE")]
    #[value(alias = "pendente")]
    Pending,
    #[serde(rename = "ERRO")]
    #[value(alias = "erro")]
    Error,
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Pending
    }
}

impl Labeled for ReportStatus {
    const ALL: &'static [Self] = &[
        ReportStatus::Generated,
        ReportStatus::Pending,
        ReportStatus::Error,
    ];

    fn label(&self) -> &'static str {
        match self {
            ReportStatus::Generated => "GERADO",
            ReportStatus::Pending => "PENDENTE",
            ReportStatus::Error => "ERRO",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            ReportStatus::Generated => Tone::Good,
            ReportStatus::Pending => Tone::Waiting,
            ReportStatus::Error => Tone::Bad,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A report (relatório) record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: u32,

    pub name: String,

    pub kind: ReportKind,

    pub generated_on: NaiveDate,

    /// Name of the user who requested it
    pub generated_by: String,

    #[serde(default)]
    pub status: ReportStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,

    /// Free-form generation parameters (e.g. aircraft, period)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub name: String,
    pub kind: ReportKind,
    pub generated_by: String,
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    /// Absent keeps the current link
    pub download_link: Option<String>,
}

impl Entity for Report {
    type Key = u32;
    type Draft = ReportDraft;
    type Patch = ReportPatch;
    const KIND: &'static str = "report";

    fn key(&self) -> u32 {
        self.id
    }

    fn validate(draft: &ReportDraft) -> AeroResult<()> {
        if draft.name.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "name"));
        }
        Ok(())
    }

    fn assign_key(_draft: &ReportDraft, existing: &[Self]) -> AeroResult<u32> {
        Ok(next_id(existing.iter().map(|r| r.id)))
    }

    fn build(key: u32, draft: ReportDraft, today: NaiveDate) -> Self {
        Report {
            id: key,
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            generated_on: today,
            generated_by: draft.generated_by,
            status: ReportStatus::Pending,
            download_link: None,
            parameters: draft.parameters,
        }
    }

    fn merge(&mut self, patch: ReportPatch, _today: NaiveDate) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(link) = patch.download_link.filter(|l| !l.is_empty()) {
            self.download_link = Some(link);
        }
    }
}

impl Deletable for Report {}

impl Report {
    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }

    /// Link of the generated file: `{prefix}/{kind}_{id}_{millis}.pdf`
    pub fn download_path(&self, prefix: &str, unix_millis: i64) -> String {
        format!(
            "{}/{}_{}_{}.pdf",
            prefix.trim_end_matches('/'),
            self.kind.label().to_lowercase(),
            self.id,
            unix_millis
        )
    }
}

/// List filter for reports
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub kind: Option<ReportKind>,
    pub search: Option<String>,
}

impl Criteria<Report> for ReportFilter {
    fn matches(&self, r: &Report) -> bool {
        matches_opt(self.status, r.status)
            && matches_opt(self.kind, r.kind)
            && matches_text(self.search.as_deref(), &[&r.name, &r.generated_by])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Store;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
    }

    fn draft(name: &str) -> ReportDraft {
        ReportDraft {
            name: name.to_string(),
            kind: ReportKind::PartLogistics,
            generated_by: "Eng. Chefe".to_string(),
            parameters: BTreeMap::new(),
        }
    }

    #[test]
    fn test_generate_starts_pending() {
        let mut store = Store::<Report>::default();
        let r = store.create(draft("Estoque"), today()).unwrap();
        assert_eq!(r.status, ReportStatus::Pending);
        assert_eq!(r.generated_on, today());
        assert!(r.download_link.is_none());
    }

    #[test]
    fn test_generate_requires_name() {
        let mut store = Store::<Report>::default();
        let err = store.create(draft(""), today()).unwrap_err();
        assert!(matches!(err, AeroError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_status_update_keeps_link_when_absent() {
        let mut store = Store::<Report>::default();
        store.create(draft("Estoque"), today()).unwrap();
        store.update(
            &1,
            ReportPatch {
                status: Some(ReportStatus::Generated),
                download_link: Some("/reports/a.pdf".into()),
            },
            today(),
        );
        let r = store
            .update(
                &1,
                ReportPatch {
                    status: Some(ReportStatus::Error),
                    download_link: None,
                },
                today(),
            )
            .unwrap();
        assert_eq!(r.status, ReportStatus::Error);
        assert_eq!(r.download_link.as_deref(), Some("/reports/a.pdf"));
    }

    #[test]
    fn test_download_path() {
        let r = Report::build(11, draft("x"), today());
        assert_eq!(
            r.download_path("/downloads/", 1_700_000_000_000),
            "/downloads/peca_logistica_11_1700000000000.pdf"
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            ReportKind::from_label("testes_qualidade"),
            Some(ReportKind::Quality)
        );
        assert_eq!(ReportKind::Quality.to_string(), "TESTES_QUALIDADE");
    }
}
