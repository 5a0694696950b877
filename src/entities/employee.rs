//! Employee entity type - staff records managed by administrators

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{next_id, Entity};
use crate::core::error::{AeroError, AeroResult};
use crate::core::filter::{matches_opt, matches_text, Criteria};
use crate::core::session::AccessLevel;

/// An employee (funcionário)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u32,

    pub name: String,

    #[serde(default)]
    pub level: AccessLevel,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    /// Login name, unique ignoring case
    pub username: String,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeDraft {
    pub name: String,
    pub level: Option<AccessLevel>,
    pub phone: String,
    pub address: String,
    pub username: String,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub level: Option<AccessLevel>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub username: Option<String>,
}

impl Entity for Employee {
    type Key = u32;
    type Draft = EmployeeDraft;
    type Patch = EmployeePatch;
    const KIND: &'static str = "employee";

    fn key(&self) -> u32 {
        self.id
    }

    fn validate(draft: &EmployeeDraft) -> AeroResult<()> {
        if draft.name.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "name"));
        }
        if draft.username.trim().is_empty() {
            return Err(AeroError::missing(Self::KIND, "username"));
        }
        Ok(())
    }

    fn assign_key(draft: &EmployeeDraft, existing: &[Self]) -> AeroResult<u32> {
        let username = draft.username.trim();
        if existing
            .iter()
            .any(|e| e.username.eq_ignore_ascii_case(username))
        {
            return Err(AeroError::DuplicateKey {
                kind: "username",
                key: username.to_string(),
            });
        }
        Ok(next_id(existing.iter().map(|e| e.id)))
    }

    fn build(key: u32, draft: EmployeeDraft, _today: NaiveDate) -> Self {
        Employee {
            id: key,
            name: draft.name.trim().to_string(),
            level: draft.level.unwrap_or_default(),
            phone: draft.phone,
            address: draft.address,
            username: draft.username.trim().to_string(),
        }
    }

    fn merge(&mut self, patch: EmployeePatch, _today: NaiveDate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
    }
}

/// List filter for employees
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub level: Option<AccessLevel>,
    pub search: Option<String>,
}

impl Criteria<Employee> for EmployeeFilter {
    fn matches(&self, e: &Employee) -> bool {
        matches_opt(self.level, e.level)
            && matches_text(self.search.as_deref(), &[&e.name, &e.username])
    }
}
