//! SQLite storage layer for rcaloop
//!
//! This module handles persistent storage of:
//! - Incident (RCA) records and their full extracted text
//! - Remedial actions with ownership, due dates, and verification state
//! - Evidence rows attached to actions
//! - Dashboard statistics

mod schema;

pub use schema::SCHEMA;

use crate::search::SearchRow;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;

/// Generate a readable record identifier like `RCA-3FA9C1`.
pub fn gen_id(prefix: &str) -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, raw[..6].to_uppercase())
}

/// Lifecycle status of an incident record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RcaStatus {
    Open,
    Closed,
}

impl std::fmt::Display for RcaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RcaStatus::Open => write!(f, "Open"),
            RcaStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for RcaStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(RcaStatus::Open),
            "closed" => Ok(RcaStatus::Closed),
            other => anyhow::bail!("unknown RCA status: {}", other),
        }
    }
}

/// Lifecycle status of a remedial action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionStatus {
    Todo,
    InProgress,
    Done,
}

impl ActionStatus {
    /// Cycle to the next status, wrapping at the end.
    pub fn next(self) -> Self {
        match self {
            ActionStatus::Todo => ActionStatus::InProgress,
            ActionStatus::InProgress => ActionStatus::Done,
            ActionStatus::Done => ActionStatus::Todo,
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Todo => write!(f, "To Do"),
            ActionStatus::InProgress => write!(f, "In Progress"),
            ActionStatus::Done => write!(f, "Done"),
        }
    }
}

impl std::str::FromStr for ActionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "to do" | "todo" => Ok(ActionStatus::Todo),
            "in progress" | "in-progress" => Ok(ActionStatus::InProgress),
            "done" => Ok(ActionStatus::Done),
            other => anyhow::bail!("unknown action status: {}", other),
        }
    }
}

/// One stored incident record
#[derive(Debug, Clone, Serialize)]
pub struct RcaRecord {
    pub rca_id: String,
    pub oem: String,
    pub environment: String,
    pub title: String,
    pub incident_date: String,
    pub services_affected: String,
    pub root_cause: String,
    pub workaround: String,
    pub long_term_solutions: String,
    pub full_text: String,
    pub content_hash: String,
    pub created_at: String,
    pub status: String,
}

/// One stored remedial action
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    pub action_id: String,
    pub rca_id: String,
    pub action_text: String,
    pub owner_team: String,
    pub owner_person: String,
    pub due_date: String,
    pub status: String,
    pub verification_method: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<String>,
    pub notes: Option<String>,
}

/// One evidence row attached to an action
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceRecord {
    pub evidence_id: String,
    pub action_id: String,
    pub description: String,
    pub url: Option<String>,
    pub added_by: Option<String>,
    pub added_at: String,
}

/// Filters for the RCA audit view
#[derive(Debug, Clone, Default)]
pub struct RcaFilter {
    pub oem: Option<String>,
    pub environment: Option<String>,
    pub status: Option<String>,
    pub limit: Option<usize>,
}

/// Filters for the action tracker view
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    pub rca_id: Option<String>,
    pub status: Option<String>,
    /// Only actions past `today` and not Done
    pub overdue_on: Option<String>,
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", path.as_ref()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    // ==================== RCA records ====================

    /// Insert a new incident record
    pub fn insert_rca(&self, rca: &RcaRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO rcas (
                    rca_id, oem, environment, title, incident_date,
                    services_affected, root_cause, workaround,
                    long_term_solutions, full_text, content_hash,
                    created_at, status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    rca.rca_id,
                    rca.oem,
                    rca.environment,
                    rca.title,
                    rca.incident_date,
                    rca.services_affected,
                    rca.root_cause,
                    rca.workaround,
                    rca.long_term_solutions,
                    rca.full_text,
                    rca.content_hash,
                    rca.created_at,
                    rca.status,
                ],
            )
            .context("Failed to insert RCA record")?;

        Ok(())
    }

    /// Get an incident record by ID
    pub fn get_rca(&self, rca_id: &str) -> Result<Option<RcaRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT rca_id, oem, environment, title, incident_date,
                       services_affected, root_cause, workaround,
                       long_term_solutions, full_text, content_hash,
                       created_at, status
                FROM rcas WHERE rca_id = ?1
                "#,
                params![rca_id],
                rca_from_row,
            )
            .optional()
            .context("Failed to get RCA record")?;

        Ok(result)
    }

    /// Find an RCA whose stored full text has the given content hash
    pub fn find_rca_by_hash(&self, content_hash: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT rca_id FROM rcas WHERE content_hash = ?1",
                params![content_hash],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to look up RCA by content hash")?;

        Ok(result)
    }

    /// List incident records, newest first, with optional filters
    pub fn list_rcas(&self, filter: &RcaFilter) -> Result<Vec<RcaRecord>> {
        let mut sql = String::from(
            r#"
            SELECT rca_id, oem, environment, title, incident_date,
                   services_affected, root_cause, workaround,
                   long_term_solutions, full_text, content_hash,
                   created_at, status
            FROM rcas WHERE 1=1
            "#,
        );

        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref oem) = filter.oem {
            sql.push_str(&format!(" AND oem = ?{}", args.len() + 1));
            args.push(Box::new(oem.clone()));
        }
        if let Some(ref environment) = filter.environment {
            sql.push_str(&format!(" AND environment = ?{}", args.len() + 1));
            args.push(Box::new(environment.clone()));
        }
        if let Some(ref status) = filter.status {
            sql.push_str(&format!(" AND status = ?{}", args.len() + 1));
            args.push(Box::new(status.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, rca_id");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            rca_from_row,
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    /// Update an incident record's status
    pub fn update_rca_status(&self, rca_id: &str, status: RcaStatus) -> Result<()> {
        let count = self
            .conn
            .execute(
                "UPDATE rcas SET status = ?1 WHERE rca_id = ?2",
                params![status.to_string(), rca_id],
            )
            .context("Failed to update RCA status")?;

        if count == 0 {
            anyhow::bail!("RCA not found: {}", rca_id);
        }

        Ok(())
    }

    /// Searchable text of every stored record, for recurrence detection
    pub fn search_rows(&self) -> Result<Vec<SearchRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rca_id, title, root_cause FROM rcas")?;

        let rows = stmt.query_map([], |row| {
            Ok(SearchRow {
                rca_id: row.get(0)?,
                title: row.get(1)?,
                root_cause: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    // ==================== Actions ====================

    /// Insert a remedial action
    pub fn insert_action(&self, action: &ActionRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO actions (
                    action_id, rca_id, action_text, owner_team, owner_person,
                    due_date, status, verification_method, verified_by,
                    verified_at, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    action.action_id,
                    action.rca_id,
                    action.action_text,
                    action.owner_team,
                    action.owner_person,
                    action.due_date,
                    action.status,
                    action.verification_method,
                    action.verified_by,
                    action.verified_at,
                    action.notes,
                ],
            )
            .context("Failed to insert action")?;

        Ok(())
    }

    /// Get an action by ID
    pub fn get_action(&self, action_id: &str) -> Result<Option<ActionRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT action_id, rca_id, action_text, owner_team, owner_person,
                       due_date, status, verification_method, verified_by,
                       verified_at, notes
                FROM actions WHERE action_id = ?1
                "#,
                params![action_id],
                action_from_row,
            )
            .optional()
            .context("Failed to get action")?;

        Ok(result)
    }

    /// List actions ordered by due date, with optional filters
    pub fn list_actions(&self, filter: &ActionFilter) -> Result<Vec<ActionRecord>> {
        let mut sql = String::from(
            r#"
            SELECT action_id, rca_id, action_text, owner_team, owner_person,
                   due_date, status, verification_method, verified_by,
                   verified_at, notes
            FROM actions WHERE 1=1
            "#,
        );

        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref rca_id) = filter.rca_id {
            sql.push_str(&format!(" AND rca_id = ?{}", args.len() + 1));
            args.push(Box::new(rca_id.clone()));
        }
        if let Some(ref status) = filter.status {
            sql.push_str(&format!(" AND status = ?{}", args.len() + 1));
            args.push(Box::new(status.clone()));
        }
        if let Some(ref today) = filter.overdue_on {
            sql.push_str(&format!(
                " AND due_date < ?{} AND status != 'Done'",
                args.len() + 1
            ));
            args.push(Box::new(today.clone()));
        }

        sql.push_str(" ORDER BY due_date ASC, action_id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
            action_from_row,
        )?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    /// Actions belonging to one RCA
    pub fn actions_for_rca(&self, rca_id: &str) -> Result<Vec<ActionRecord>> {
        self.list_actions(&ActionFilter {
            rca_id: Some(rca_id.to_string()),
            ..Default::default()
        })
    }

    /// Update an action's status
    pub fn update_action_status(&self, action_id: &str, status: ActionStatus) -> Result<()> {
        let count = self
            .conn
            .execute(
                "UPDATE actions SET status = ?1 WHERE action_id = ?2",
                params![status.to_string(), action_id],
            )
            .context("Failed to update action status")?;

        if count == 0 {
            anyhow::bail!("Action not found: {}", action_id);
        }

        Ok(())
    }

    /// Update an action's ownership, due date, or notes. Only provided
    /// fields are changed.
    pub fn update_action_fields(
        &self,
        action_id: &str,
        owner_team: Option<&str>,
        owner_person: Option<&str>,
        due_date: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        let count = self
            .conn
            .execute(
                r#"
                UPDATE actions SET
                    owner_team = COALESCE(?1, owner_team),
                    owner_person = COALESCE(?2, owner_person),
                    due_date = COALESCE(?3, due_date),
                    notes = COALESCE(?4, notes)
                WHERE action_id = ?5
                "#,
                params![owner_team, owner_person, due_date, notes, action_id],
            )
            .context("Failed to update action")?;

        if count == 0 {
            anyhow::bail!("Action not found: {}", action_id);
        }

        Ok(())
    }

    /// Mark an action verified
    pub fn verify_action(&self, action_id: &str, verified_by: &str, verified_at: &str) -> Result<()> {
        let count = self
            .conn
            .execute(
                "UPDATE actions SET verified_by = ?1, verified_at = ?2 WHERE action_id = ?3",
                params![verified_by, verified_at, action_id],
            )
            .context("Failed to verify action")?;

        if count == 0 {
            anyhow::bail!("Action not found: {}", action_id);
        }

        Ok(())
    }

    // ==================== Evidence ====================

    /// Attach an evidence row to an action
    pub fn insert_evidence(&self, evidence: &EvidenceRecord) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO evidence (
                    evidence_id, action_id, description, url, added_by, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    evidence.evidence_id,
                    evidence.action_id,
                    evidence.description,
                    evidence.url,
                    evidence.added_by,
                    evidence.added_at,
                ],
            )
            .context("Failed to insert evidence")?;

        Ok(())
    }

    /// Evidence rows for one action, oldest first
    pub fn evidence_for_action(&self, action_id: &str) -> Result<Vec<EvidenceRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT evidence_id, action_id, description, url, added_by, added_at
            FROM evidence WHERE action_id = ?1
            ORDER BY added_at ASC, evidence_id
            "#,
        )?;

        let rows = stmt.query_map(params![action_id], |row| {
            Ok(EvidenceRecord {
                evidence_id: row.get(0)?,
                action_id: row.get(1)?,
                description: row.get(2)?,
                url: row.get(3)?,
                added_by: row.get(4)?,
                added_at: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    // ==================== Statistics ====================

    /// Get dashboard statistics. `today` (YYYY-MM-DD) anchors the overdue
    /// count.
    pub fn get_stats(&self, today: &str) -> Result<DashboardStats> {
        let total_rcas: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM rcas", [], |row| row.get(0))?;

        let open_rcas: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM rcas WHERE status = 'Open'",
            [],
            |row| row.get(0),
        )?;

        let total_actions: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))?;

        let done_actions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actions WHERE status = 'Done'",
            [],
            |row| row.get(0),
        )?;

        let in_progress_actions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actions WHERE status = 'In Progress'",
            [],
            |row| row.get(0),
        )?;

        let overdue_actions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actions WHERE due_date < ?1 AND status != 'Done'",
            params![today],
            |row| row.get(0),
        )?;

        let verified_actions: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actions WHERE verified_at IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        Ok(DashboardStats {
            total_rcas: total_rcas as usize,
            open_rcas: open_rcas as usize,
            total_actions: total_actions as usize,
            done_actions: done_actions as usize,
            in_progress_actions: in_progress_actions as usize,
            overdue_actions: overdue_actions as usize,
            verified_actions: verified_actions as usize,
        })
    }
}

/// Dashboard statistics
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_rcas: usize,
    pub open_rcas: usize,
    pub total_actions: usize,
    pub done_actions: usize,
    pub in_progress_actions: usize,
    pub overdue_actions: usize,
    pub verified_actions: usize,
}

impl DashboardStats {
    /// Fraction of actions closed, in [0, 1].
    pub fn closure_rate(&self) -> f64 {
        if self.total_actions == 0 {
            return 0.0;
        }
        self.done_actions as f64 / self.total_actions as f64
    }
}

fn rca_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RcaRecord> {
    Ok(RcaRecord {
        rca_id: row.get(0)?,
        oem: row.get(1)?,
        environment: row.get(2)?,
        title: row.get(3)?,
        incident_date: row.get(4)?,
        services_affected: row.get(5)?,
        root_cause: row.get(6)?,
        workaround: row.get(7)?,
        long_term_solutions: row.get(8)?,
        full_text: row.get(9)?,
        content_hash: row.get(10)?,
        created_at: row.get(11)?,
        status: row.get(12)?,
    })
}

fn action_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActionRecord> {
    Ok(ActionRecord {
        action_id: row.get(0)?,
        rca_id: row.get(1)?,
        action_text: row.get(2)?,
        owner_team: row.get(3)?,
        owner_person: row.get(4)?,
        due_date: row.get(5)?,
        status: row.get(6)?,
        verification_method: row.get(7)?,
        verified_by: row.get(8)?,
        verified_at: row.get(9)?,
        notes: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rca(id: &str, oem: &str, environment: &str) -> RcaRecord {
        RcaRecord {
            rca_id: id.to_string(),
            oem: oem.to_string(),
            environment: environment.to_string(),
            title: "Gateway outage in staging".to_string(),
            incident_date: "09/02/2026".to_string(),
            services_affected: "API gateway".to_string(),
            root_cause: "Session teardown raced the health probe.".to_string(),
            workaround: "Restarted the node.".to_string(),
            long_term_solutions: "Add a teardown barrier.".to_string(),
            full_text: "Gateway outage in staging\nRoot Cause\n...".to_string(),
            content_hash: crate::extract::content_hash(id),
            created_at: "2026-02-11".to_string(),
            status: RcaStatus::Open.to_string(),
        }
    }

    fn sample_action(id: &str, rca_id: &str, due: &str) -> ActionRecord {
        ActionRecord {
            action_id: id.to_string(),
            rca_id: rca_id.to_string(),
            action_text: "Add a teardown barrier before probe registration.".to_string(),
            owner_team: "Tech".to_string(),
            owner_person: String::new(),
            due_date: due.to_string(),
            status: ActionStatus::Todo.to_string(),
            verification_method: "Evidence link + independent verification".to_string(),
            verified_by: None,
            verified_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_database_creation() {
        let db = Database::open_in_memory().unwrap();
        let stats = db.get_stats("2026-02-11").unwrap();
        assert_eq!(stats.total_rcas, 0);
        assert_eq!(stats.total_actions, 0);
    }

    #[test]
    fn test_insert_and_get_rca() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();

        let rca = db.get_rca("RCA-AAAAAA").unwrap().unwrap();
        assert_eq!(rca.oem, "Acme");
        assert_eq!(rca.status, "Open");

        assert!(db.get_rca("RCA-MISSING").unwrap().is_none());
    }

    #[test]
    fn test_list_rcas_filters() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();
        db.insert_rca(&sample_rca("RCA-BBBBBB", "Acme", "Production")).unwrap();
        db.insert_rca(&sample_rca("RCA-CCCCCC", "Globex", "UAT")).unwrap();

        let all = db.list_rcas(&RcaFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let acme = db
            .list_rcas(&RcaFilter {
                oem: Some("Acme".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(acme.len(), 2);

        let uat_globex = db
            .list_rcas(&RcaFilter {
                oem: Some("Globex".to_string()),
                environment: Some("UAT".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(uat_globex.len(), 1);
        assert_eq!(uat_globex[0].rca_id, "RCA-CCCCCC");
    }

    #[test]
    fn test_duplicate_detection_by_hash() {
        let db = Database::open_in_memory().unwrap();
        let rca = sample_rca("RCA-AAAAAA", "Acme", "UAT");
        db.insert_rca(&rca).unwrap();

        assert_eq!(
            db.find_rca_by_hash(&rca.content_hash).unwrap(),
            Some("RCA-AAAAAA".to_string())
        );
        assert!(db.find_rca_by_hash("deadbeef").unwrap().is_none());
    }

    #[test]
    fn test_rca_status_update() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();

        db.update_rca_status("RCA-AAAAAA", RcaStatus::Closed).unwrap();
        let rca = db.get_rca("RCA-AAAAAA").unwrap().unwrap();
        assert_eq!(rca.status, "Closed");

        assert!(db.update_rca_status("RCA-MISSING", RcaStatus::Closed).is_err());
    }

    #[test]
    fn test_action_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();
        db.insert_action(&sample_action("ACT-111111", "RCA-AAAAAA", "2026-02-25"))
            .unwrap();

        db.update_action_status("ACT-111111", ActionStatus::InProgress)
            .unwrap();
        db.update_action_fields("ACT-111111", None, Some("J. Doe"), None, Some("kickoff held"))
            .unwrap();
        db.verify_action("ACT-111111", "QA team", "2026-03-01T10:00:00Z")
            .unwrap();

        let action = db.get_action("ACT-111111").unwrap().unwrap();
        assert_eq!(action.status, "In Progress");
        assert_eq!(action.owner_person, "J. Doe");
        assert_eq!(action.owner_team, "Tech");
        assert_eq!(action.verified_by.as_deref(), Some("QA team"));
    }

    #[test]
    fn test_overdue_filter() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();
        db.insert_action(&sample_action("ACT-111111", "RCA-AAAAAA", "2026-01-01"))
            .unwrap();
        db.insert_action(&sample_action("ACT-222222", "RCA-AAAAAA", "2026-12-01"))
            .unwrap();

        let mut done = sample_action("ACT-333333", "RCA-AAAAAA", "2026-01-01");
        done.status = ActionStatus::Done.to_string();
        db.insert_action(&done).unwrap();

        let overdue = db
            .list_actions(&ActionFilter {
                overdue_on: Some("2026-02-11".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].action_id, "ACT-111111");
    }

    #[test]
    fn test_evidence_rows() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();
        db.insert_action(&sample_action("ACT-111111", "RCA-AAAAAA", "2026-02-25"))
            .unwrap();

        db.insert_evidence(&EvidenceRecord {
            evidence_id: "EVD-111111".to_string(),
            action_id: "ACT-111111".to_string(),
            description: "Change ticket closed".to_string(),
            url: Some("https://tickets.example/42".to_string()),
            added_by: Some("ops".to_string()),
            added_at: "2026-03-01T10:00:00Z".to_string(),
        })
        .unwrap();

        let rows = db.evidence_for_action("ACT-111111").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Change ticket closed");
        assert!(db.evidence_for_action("ACT-999999").unwrap().is_empty());
    }

    #[test]
    fn test_stats_and_closure_rate() {
        let db = Database::open_in_memory().unwrap();
        db.insert_rca(&sample_rca("RCA-AAAAAA", "Acme", "UAT")).unwrap();
        db.insert_action(&sample_action("ACT-111111", "RCA-AAAAAA", "2026-01-01"))
            .unwrap();

        let mut done = sample_action("ACT-222222", "RCA-AAAAAA", "2026-01-01");
        done.status = ActionStatus::Done.to_string();
        db.insert_action(&done).unwrap();

        let stats = db.get_stats("2026-02-11").unwrap();
        assert_eq!(stats.total_rcas, 1);
        assert_eq!(stats.open_rcas, 1);
        assert_eq!(stats.total_actions, 2);
        assert_eq!(stats.done_actions, 1);
        assert_eq!(stats.overdue_actions, 1);
        assert!((stats.closure_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gen_id_shape() {
        let id = gen_id("RCA");
        assert!(id.starts_with("RCA-"));
        assert_eq!(id.len(), 10);
        assert_ne!(gen_id("RCA"), gen_id("RCA"));
    }

    #[test]
    fn test_action_status_cycle_and_parse() {
        assert_eq!(ActionStatus::Todo.next(), ActionStatus::InProgress);
        assert_eq!(ActionStatus::Done.next(), ActionStatus::Todo);
        assert_eq!("in progress".parse::<ActionStatus>().unwrap(), ActionStatus::InProgress);
        assert!("bogus".parse::<ActionStatus>().is_err());
    }
}
