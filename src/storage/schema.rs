//! Database schema definition

/// SQL schema for the rcaloop database
pub const SCHEMA: &str = r#"
-- Incident (RCA) records extracted from uploaded reports
CREATE TABLE IF NOT EXISTS rcas (
    rca_id TEXT PRIMARY KEY,
    oem TEXT NOT NULL,
    environment TEXT NOT NULL,
    title TEXT NOT NULL,
    incident_date TEXT,
    services_affected TEXT,
    root_cause TEXT,
    workaround TEXT,
    long_term_solutions TEXT,
    full_text TEXT,
    content_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Open'
);

CREATE INDEX IF NOT EXISTS idx_rcas_oem ON rcas(oem);
CREATE INDEX IF NOT EXISTS idx_rcas_environment ON rcas(environment);
CREATE INDEX IF NOT EXISTS idx_rcas_status ON rcas(status);
CREATE INDEX IF NOT EXISTS idx_rcas_hash ON rcas(content_hash);
CREATE INDEX IF NOT EXISTS idx_rcas_created ON rcas(created_at);

-- Remedial actions derived from a record's long-term solutions
CREATE TABLE IF NOT EXISTS actions (
    action_id TEXT PRIMARY KEY,
    rca_id TEXT NOT NULL,
    action_text TEXT NOT NULL,
    owner_team TEXT,
    owner_person TEXT,
    due_date TEXT,
    status TEXT NOT NULL DEFAULT 'To Do',
    verification_method TEXT,
    verified_by TEXT,
    verified_at TEXT,
    notes TEXT,
    FOREIGN KEY (rca_id) REFERENCES rcas(rca_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_actions_rca ON actions(rca_id);
CREATE INDEX IF NOT EXISTS idx_actions_status ON actions(status);
CREATE INDEX IF NOT EXISTS idx_actions_due ON actions(due_date);

-- Evidence rows attached to actions during verification
CREATE TABLE IF NOT EXISTS evidence (
    evidence_id TEXT PRIMARY KEY,
    action_id TEXT NOT NULL,
    description TEXT NOT NULL,
    url TEXT,
    added_by TEXT,
    added_at TEXT NOT NULL,
    FOREIGN KEY (action_id) REFERENCES actions(action_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_evidence_action ON evidence(action_id);
"#;
