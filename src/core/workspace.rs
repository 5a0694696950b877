//! Workspace - every store, the session and pending report jobs in one place
//!
//! Commands receive a `&mut Workspace`. Reads check module visibility and
//! mutations check the matching permission before touching a store.

use chrono::{Local, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::error::{AeroError, AeroResult};
use crate::core::filter::Criteria;
use crate::core::fixtures;
use crate::core::session::{Module, Permission, Session, User};
use crate::core::store::Store;
use crate::core::timer::DeferredQueue;
use crate::entities::aircraft::{normalize_code, Aircraft, AircraftDraft, AircraftPatch};
use crate::entities::employee::{Employee, EmployeeDraft, EmployeePatch};
use crate::entities::part::{Part, PartDraft, PartPatch};
use crate::entities::report::{Report, ReportDraft, ReportKind, ReportPatch, ReportStatus};
use crate::entities::stage::{Stage, StageDraft, StageFilter, StageRef};
use crate::entities::test::{Test, TestDraft, TestResult};

pub struct Workspace {
    aircraft: Store<Aircraft>,
    employees: Store<Employee>,
    parts: Store<Part>,
    tests: Store<Test>,
    reports: Store<Report>,
    session: Session,
    config: Config,
    report_jobs: DeferredQueue<u32>,
}

impl Workspace {
    /// Workspace with empty stores
    pub fn empty(config: Config) -> Self {
        Self {
            aircraft: Store::default(),
            employees: Store::default(),
            parts: Store::default(),
            tests: Store::default(),
            reports: Store::default(),
            session: Session::with_latency(config.login_delay()),
            config,
            report_jobs: DeferredQueue::default(),
        }
    }

    /// Workspace loaded with the fixture data
    pub fn seeded(config: Config) -> Self {
        let mut ws = Self::empty(config);
        ws.aircraft = Store::new(fixtures::aircraft());
        ws.employees = Store::new(fixtures::employees());
        ws.parts = Store::new(fixtures::parts());
        ws.tests = Store::new(fixtures::tests());
        ws.reports = Store::new(fixtures::reports());
        ws
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ---- session ----

    pub fn login(&mut self, username: &str, password: &str) -> AeroResult<&User> {
        self.session.login(username, password)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    // ---- read access ----

    pub fn aircraft(&self) -> AeroResult<&Store<Aircraft>> {
        self.session.require_module(Module::Aircraft)?;
        Ok(&self.aircraft)
    }

    pub fn parts(&self) -> AeroResult<&Store<Part>> {
        self.session.require_module(Module::Parts)?;
        Ok(&self.parts)
    }

    pub fn tests(&self) -> AeroResult<&Store<Test>> {
        self.session.require_module(Module::Tests)?;
        Ok(&self.tests)
    }

    pub fn reports(&self) -> AeroResult<&Store<Report>> {
        self.session.require_module(Module::Reports)?;
        Ok(&self.reports)
    }

    pub fn employees(&self) -> AeroResult<&Store<Employee>> {
        self.session.require_module(Module::Administration)?;
        Ok(&self.employees)
    }

    /// Employee lookup for display purposes (stage crews), open to anyone logged in
    pub fn employee_name(&self, id: u32) -> Option<&str> {
        self.employees.get(&id).map(|e| e.name.as_str())
    }

    /// Every stage of every aircraft matching `filter`, aircraft by aircraft
    pub fn stages(&self, filter: &StageFilter) -> AeroResult<Vec<StageRef<'_>>> {
        self.session.require_module(Module::Stages)?;
        Ok(self
            .aircraft
            .list()
            .iter()
            .flat_map(|a| {
                a.stages.iter().map(move |s| StageRef {
                    aircraft: &a.code,
                    stage: s,
                })
            })
            .filter(|r| filter.matches(r))
            .collect())
    }

    /// One stage with its owning aircraft
    pub fn stage(&self, code: &str, id: u32) -> AeroResult<StageRef<'_>> {
        self.session.require_module(Module::Stages)?;
        let aircraft = self.find_aircraft(code)?;
        let stage = aircraft
            .stage(id)
            .ok_or_else(|| AeroError::not_found("stage", format!("{}/{}", aircraft.code, id)))?;
        Ok(StageRef {
            aircraft: &aircraft.code,
            stage,
        })
    }

    fn find_aircraft(&self, code: &str) -> AeroResult<&Aircraft> {
        self.aircraft
            .get(&normalize_code(code))
            .ok_or_else(|| AeroError::not_found(Aircraft::KIND, normalize_code(code)))
    }

    fn aircraft_mut(&mut self, code: &str) -> AeroResult<&mut Aircraft> {
        let key = normalize_code(code);
        self.aircraft
            .get_mut(&key)
            .ok_or_else(|| AeroError::not_found(Aircraft::KIND, key))
    }

    /// Resolve an aircraft reference to the stored code
    fn resolve_code(&self, code: &str) -> AeroResult<String> {
        self.find_aircraft(code).map(|a| a.code.clone())
    }

    // ---- aircraft ----

    pub fn create_aircraft(&mut self, draft: AircraftDraft) -> AeroResult<&Aircraft> {
        self.session.require_module(Module::Aircraft)?;
        self.session.require(Permission::Manage)?;
        let today = self.today();
        self.aircraft.create(draft, today)
    }

    pub fn update_aircraft(&mut self, code: &str, patch: AircraftPatch) -> AeroResult<&Aircraft> {
        self.session.require_module(Module::Aircraft)?;
        self.session.require(Permission::Manage)?;
        let today = self.today();
        let key = normalize_code(code);
        self.aircraft
            .update(&key, patch, today)
            .ok_or_else(|| AeroError::not_found(Aircraft::KIND, key))
    }

    // ---- stages ----

    pub fn add_stage(&mut self, code: &str, draft: StageDraft) -> AeroResult<&Stage> {
        self.session.require_module(Module::Stages)?;
        self.session.require(Permission::Manage)?;
        self.aircraft_mut(code)?.add_stage(draft)
    }

    pub fn start_stage(&mut self, code: &str, id: u32) -> AeroResult<&Stage> {
        self.session.require_module(Module::Stages)?;
        self.session.require(Permission::ExecuteStage)?;
        self.aircraft_mut(code)?.start_stage(id)
    }

    pub fn finish_stage(&mut self, code: &str, id: u32) -> AeroResult<&Stage> {
        self.session.require_module(Module::Stages)?;
        self.session.require(Permission::ExecuteStage)?;
        self.aircraft_mut(code)?.finish_stage(id)
    }

    pub fn assign_employee(&mut self, code: &str, stage: u32, employee: u32) -> AeroResult<&Stage> {
        self.session.require_module(Module::Stages)?;
        self.session.require(Permission::Manage)?;
        if self.employees.get(&employee).is_none() {
            return Err(AeroError::not_found("employee", employee));
        }
        self.aircraft_mut(code)?.assign_employee(stage, employee)
    }

    pub fn unassign_employee(
        &mut self,
        code: &str,
        stage: u32,
        employee: u32,
    ) -> AeroResult<&Stage> {
        self.session.require_module(Module::Stages)?;
        self.session.require(Permission::Manage)?;
        if self.employees.get(&employee).is_none() {
            return Err(AeroError::not_found("employee", employee));
        }
        self.aircraft_mut(code)?.unassign_employee(stage, employee)
    }

    // ---- parts ----

    pub fn create_part(&mut self, mut draft: PartDraft) -> AeroResult<&Part> {
        self.session.require_module(Module::Parts)?;
        self.session.require(Permission::Manage)?;
        if let Some(code) = draft.aircraft.as_deref().filter(|c| !c.trim().is_empty()) {
            draft.aircraft = Some(self.resolve_code(code)?);
        }
        let today = self.today();
        self.parts.create(draft, today)
    }

    pub fn update_part(&mut self, id: u32, mut patch: PartPatch) -> AeroResult<&Part> {
        self.session.require_module(Module::Parts)?;
        self.session.require(Permission::Manage)?;
        // A blank aircraft detaches the part, as it does on create
        if let Some(Some(code)) = &patch.aircraft {
            patch.aircraft = if code.trim().is_empty() {
                Some(None)
            } else {
                Some(Some(self.resolve_code(code)?))
            };
        }
        let today = self.today();
        self.parts
            .update(&id, patch, today)
            .ok_or_else(|| AeroError::not_found("part", id))
    }

    pub fn delete_part(&mut self, id: u32) -> AeroResult<Part> {
        self.session.require_module(Module::Parts)?;
        self.session.require(Permission::Manage)?;
        self.parts
            .delete(&id)
            .ok_or_else(|| AeroError::not_found("part", id))
    }

    // ---- employees ----

    pub fn create_employee(&mut self, draft: EmployeeDraft) -> AeroResult<&Employee> {
        self.session.require(Permission::AdministerUsers)?;
        let today = self.today();
        self.employees.create(draft, today)
    }

    pub fn update_employee(&mut self, id: u32, patch: EmployeePatch) -> AeroResult<&Employee> {
        self.session.require(Permission::AdministerUsers)?;
        if let Some(username) = patch.username.as_deref() {
            let taken = self
                .employees
                .list()
                .iter()
                .any(|e| e.id != id && e.username.eq_ignore_ascii_case(username.trim()));
            if taken {
                return Err(AeroError::DuplicateKey {
                    kind: "username",
                    key: username.trim().to_string(),
                });
            }
        }
        let today = self.today();
        self.employees
            .update(&id, patch, today)
            .ok_or_else(|| AeroError::not_found("employee", id))
    }

    // ---- tests ----

    pub fn schedule_test(&mut self, mut draft: TestDraft) -> AeroResult<&Test> {
        self.session.require_module(Module::Tests)?;
        self.session.require(Permission::Manage)?;
        draft.aircraft_code = self.resolve_code(&draft.aircraft_code)?;
        let today = self.today();
        self.tests.create(draft, today)
    }

    pub fn record_test(
        &mut self,
        id: u32,
        outcome: TestResult,
        performed: Option<NaiveDate>,
        notes: Option<String>,
    ) -> AeroResult<&Test> {
        self.session.require_module(Module::Tests)?;
        self.session.require(Permission::Manage)?;
        let today = self.today();
        let test = self
            .tests
            .get_mut(&id)
            .ok_or_else(|| AeroError::not_found("test", id))?;
        test.record(outcome, performed, notes, today)?;
        Ok(&*test)
    }

    // ---- reports ----

    /// Create a pending report and queue its completion
    pub fn generate_report(
        &mut self,
        name: &str,
        kind: ReportKind,
        parameters: BTreeMap<String, String>,
    ) -> AeroResult<&Report> {
        self.generate_report_at(name, kind, parameters, Instant::now())
    }

    pub fn generate_report_at(
        &mut self,
        name: &str,
        kind: ReportKind,
        parameters: BTreeMap<String, String>,
        now: Instant,
    ) -> AeroResult<&Report> {
        self.session.require_module(Module::Reports)?;
        let user = self.session.require(Permission::Manage)?;
        let draft = ReportDraft {
            name: name.to_string(),
            kind,
            generated_by: user.name.clone(),
            parameters,
        };
        let today = self.today();
        let delay = self.config.report_delay();
        let id = self.reports.create(draft, today)?.id;
        self.report_jobs.schedule_in(id, now, delay);
        debug!(report = id, delay_ms = delay.as_millis() as u64, "report queued");
        self.reports
            .get(&id)
            .ok_or_else(|| AeroError::not_found("report", id))
    }

    pub fn set_report_status(
        &mut self,
        id: u32,
        status: ReportStatus,
        link: Option<String>,
    ) -> AeroResult<&Report> {
        self.session.require_module(Module::Reports)?;
        self.session.require(Permission::Manage)?;
        let today = self.today();
        let patch = ReportPatch {
            status: Some(status),
            download_link: link,
        };
        self.reports
            .update(&id, patch, today)
            .ok_or_else(|| AeroError::not_found("report", id))
    }

    pub fn delete_report(&mut self, id: u32) -> AeroResult<Report> {
        self.session.require_module(Module::Reports)?;
        self.session.require(Permission::Manage)?;
        let report = self
            .reports
            .delete(&id)
            .ok_or_else(|| AeroError::not_found("report", id))?;
        // Ids are reused, so a queued job must not outlive its report
        let cancelled = self.report_jobs.cancel(|job| *job == id);
        debug!(report = id, cancelled, "report jobs cancelled");
        Ok(report)
    }

    /// Number of report jobs still waiting
    pub fn pending_jobs(&self) -> usize {
        self.report_jobs.len()
    }

    /// Run every report job due at `now`; returns the ids marked generated
    ///
    /// A job whose report was deleted or is no longer pending does nothing.
    pub fn tick(&mut self, now: Instant) -> Vec<u32> {
        let mut done = Vec::new();
        for id in self.report_jobs.drain_due(now) {
            let Some(report) = self.reports.get(&id).filter(|r| r.is_pending()) else {
                debug!(report = id, "report job skipped");
                continue;
            };
            let millis = Utc::now().timestamp_millis();
            let link = report.download_path(self.config.download_prefix(), millis);
            let today = self.today();
            let patch = ReportPatch {
                status: Some(ReportStatus::Generated),
                download_link: Some(link),
            };
            if self.reports.update(&id, patch, today).is_some() {
                info!(report = id, "report generated");
                done.push(id);
            }
        }
        done
    }

    /// Block until every queued report job has run
    pub fn wait_for_reports(&mut self) -> Vec<u32> {
        let mut done = Vec::new();
        while let Some(due) = self.report_jobs.next_due() {
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
            done.extend(self.tick(Instant::now()));
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::aircraft::{AircraftFilter, ProductionStatus};
    use crate::entities::stage::StageStatus;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            login_delay_ms: Some(0),
            report_delay_ms: Some(3000),
            ..Default::default()
        }
    }

    fn as_user(username: &str) -> Workspace {
        let mut ws = Workspace::seeded(config());
        ws.login(username, "123").unwrap();
        ws
    }

    #[test]
    fn test_ready_aircraft_from_fixtures() {
        let ws = as_user("engenheiro");
        let filter = AircraftFilter {
            status: Some(ProductionStatus::Ready),
            ..Default::default()
        };
        let codes: Vec<_> = ws
            .aircraft()
            .unwrap()
            .filter(&filter)
            .into_iter()
            .map(|a| a.code.as_str())
            .collect();
        assert_eq!(codes, ["A350", "A220", "F16"]);
    }

    #[test]
    fn test_anonymous_reads_rejected() {
        let ws = Workspace::seeded(config());
        assert_eq!(ws.parts().unwrap_err(), AeroError::NotAuthenticated);
    }

    #[test]
    fn test_operator_cannot_open_aircraft() {
        let ws = as_user("operador");
        assert!(matches!(
            ws.aircraft().unwrap_err(),
            AeroError::PermissionDenied { .. }
        ));
        assert!(ws.parts().is_ok());
    }

    #[test]
    fn test_part_aircraft_must_exist() {
        let mut ws = as_user("engenheiro");
        let draft = PartDraft {
            internal_code: "PC-900".into(),
            name: "Flap".into(),
            supplier: "Embraer".into(),
            aircraft: Some("e-999".into()),
            ..Default::default()
        };
        assert!(ws.create_part(draft.clone()).unwrap_err().is_not_found());

        let ok = PartDraft {
            aircraft: Some("kc390".into()),
            ..draft
        };
        let part = ws.create_part(ok).unwrap();
        assert_eq!(part.id, 111);
        assert_eq!(part.aircraft.as_deref(), Some("KC390"));
    }

    #[test]
    fn test_operator_cannot_create_part() {
        let mut ws = as_user("operador");
        let draft = PartDraft {
            internal_code: "PC-1".into(),
            name: "x".into(),
            supplier: "y".into(),
            ..Default::default()
        };
        assert!(matches!(
            ws.create_part(draft).unwrap_err(),
            AeroError::PermissionDenied { .. }
        ));
    }

    #[test]
    fn test_operator_runs_stages_admin_does_not() {
        let mut ws = as_user("operador");
        let s = ws.finish_stage("e175", 3).unwrap();
        assert_eq!(s.status, StageStatus::Done);
        assert_eq!(ws.start_stage("E175", 4).unwrap().status, StageStatus::InProgress);

        let mut admin = as_user("admin");
        assert!(matches!(
            admin.start_stage("F35", 1).unwrap_err(),
            AeroError::PermissionDenied { .. }
        ));
    }

    #[test]
    fn test_stage_list_across_aircraft() {
        let ws = as_user("operador");
        let all = ws.stages(&StageFilter::default()).unwrap();
        assert_eq!(all.len(), 6);
        let in_progress = ws
            .stages(&StageFilter {
                status: Some(StageStatus::InProgress),
                ..Default::default()
            })
            .unwrap();
        let owners: Vec<_> = in_progress.iter().map(|r| r.aircraft).collect();
        assert_eq!(owners, ["E175", "A350"]);
    }

    #[test]
    fn test_assign_requires_known_employee() {
        let mut ws = as_user("engenheiro");
        assert!(ws.assign_employee("F35", 1, 999).unwrap_err().is_not_found());
        let s = ws.assign_employee("F35", 1, 209).unwrap();
        assert_eq!(s.employees, vec![207, 209]);
    }

    #[test]
    fn test_schedule_and_record_test() {
        let mut ws = as_user("engenheiro");
        let draft = TestDraft {
            aircraft_code: "f16".into(),
            kind: crate::entities::test::TestKind::Flight,
            scheduled: ws.today(),
            responsible: "Ana Lima".into(),
        };
        let id = ws.schedule_test(draft).unwrap().id;
        assert_eq!(id, 11);

        let today = ws.today();
        let t = ws.record_test(id, TestResult::Approved, None, None).unwrap();
        assert_eq!(t.performed, Some(today));
        let err = ws.record_test(id, TestResult::Rejected, None, None).unwrap_err();
        assert!(matches!(err, AeroError::AlreadyRecorded { .. }));
    }

    #[test]
    fn test_report_completes_after_delay() {
        let mut ws = as_user("engenheiro");
        let start = Instant::now();
        let report = ws
            .generate_report_at("Estoque", ReportKind::PartLogistics, BTreeMap::new(), start)
            .unwrap();
        assert_eq!(report.id, 11);
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.generated_by, "Eng. Chefe");

        assert!(ws.tick(start + Duration::from_secs(1)).is_empty());
        assert_eq!(ws.tick(start + Duration::from_secs(3)), vec![11]);

        let done = ws.reports().unwrap().get(&11).unwrap();
        assert_eq!(done.status, ReportStatus::Generated);
        let link = done.download_link.as_deref().unwrap();
        assert!(link.starts_with("/downloads/peca_logistica_11_"));
        assert!(link.ends_with(".pdf"));
    }

    #[test]
    fn test_report_job_skips_deleted_report() {
        let mut ws = as_user("admin");
        let start = Instant::now();
        let id = ws
            .generate_report_at("Temp", ReportKind::Production, BTreeMap::new(), start)
            .unwrap()
            .id;
        ws.delete_report(id).unwrap();
        assert!(ws.tick(start + Duration::from_secs(5)).is_empty());
        assert_eq!(ws.pending_jobs(), 0);
    }

    #[test]
    fn test_reused_report_id_keeps_its_own_delay() {
        let mut ws = as_user("admin");
        let start = Instant::now();
        let first = ws
            .generate_report_at("A", ReportKind::Production, BTreeMap::new(), start)
            .unwrap()
            .id;
        ws.delete_report(first).unwrap();

        let later = start + Duration::from_secs(2);
        let second = ws
            .generate_report_at("B", ReportKind::Production, BTreeMap::new(), later)
            .unwrap()
            .id;
        assert_eq!(first, second);
        assert_eq!(ws.pending_jobs(), 1);

        assert!(ws.tick(start + Duration::from_secs(3)).is_empty());
        let report = ws.reports().unwrap().get(&second).unwrap();
        assert_eq!(report.status, ReportStatus::Pending);

        assert_eq!(ws.tick(later + Duration::from_secs(3)), vec![second]);
    }

    #[test]
    fn test_blank_aircraft_on_edit_detaches() {
        let mut ws = as_user("engenheiro");
        let patch = PartPatch {
            aircraft: Some(Some("  ".into())),
            ..Default::default()
        };
        let part = ws.update_part(102, patch).unwrap();
        assert_eq!(part.aircraft, None);
    }

    #[test]
    fn test_report_job_skips_manual_status() {
        let mut ws = as_user("admin");
        let start = Instant::now();
        let id = ws
            .generate_report_at("Temp", ReportKind::Production, BTreeMap::new(), start)
            .unwrap()
            .id;
        ws.set_report_status(id, ReportStatus::Error, None).unwrap();
        assert!(ws.tick(start + Duration::from_secs(5)).is_empty());
        assert_eq!(ws.reports().unwrap().get(&id).unwrap().status, ReportStatus::Error);
    }

    #[test]
    fn test_wait_for_reports_with_zero_delay() {
        let mut ws = Workspace::seeded(Config {
            login_delay_ms: Some(0),
            report_delay_ms: Some(0),
            ..Default::default()
        });
        ws.login("admin", "123").unwrap();
        ws.generate_report("Agora", ReportKind::Maintenance, BTreeMap::new())
            .unwrap();
        assert_eq!(ws.wait_for_reports(), vec![11]);
    }

    #[test]
    fn test_employee_admin_only() {
        let mut ws = as_user("engenheiro");
        let draft = EmployeeDraft {
            name: "Kitty Pryde".into(),
            username: "kitty".into(),
            ..Default::default()
        };
        assert!(ws.create_employee(draft.clone()).is_err());

        let mut admin = as_user("admin");
        let e = admin.create_employee(draft).unwrap();
        assert_eq!(e.id, 212);
    }

    #[test]
    fn test_update_employee_username_collision() {
        let mut ws = as_user("admin");
        let patch = EmployeePatch {
            username: Some("LOGAN".into()),
            ..Default::default()
        };
        assert!(matches!(
            ws.update_employee(202, patch).unwrap_err(),
            AeroError::DuplicateKey { .. }
        ));
    }

    #[test]
    fn test_update_unknown_aircraft() {
        let mut ws = as_user("admin");
        let err = ws
            .update_aircraft("ZZZ", AircraftPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
