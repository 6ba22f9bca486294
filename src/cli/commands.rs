//! Command implementations

use crate::cli::OutputFormat;
use crate::extract::{content_hash, linearize, load_docx, ExtractedReport, HeadingCatalogue, SectionExtractor};
use crate::search::{find_similar, SimilarMatch};
use crate::storage::{
    gen_id, ActionFilter, ActionRecord, ActionStatus, Database, EvidenceRecord, RcaFilter,
    RcaRecord, RcaStatus,
};
use crate::workspace::{AppConfig, Workspace};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Today's date as YYYY-MM-DD
pub fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Current timestamp in RFC 3339
fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Open an initialized workspace and its database
fn open_workspace(path: &Path) -> Result<(Workspace, Database)> {
    let workspace = Workspace::open(path)?;

    if !workspace.is_initialized() {
        anyhow::bail!("Workspace not initialized. Run 'rcaloop init' first.");
    }

    let db = Database::open(workspace.db_path())?;
    Ok((workspace, db))
}

/// Initialize a governance workspace
pub fn init(path: &Path, force: bool) -> Result<()> {
    let workspace = Workspace::open(path)?;

    if workspace.is_initialized() && !force {
        anyhow::bail!("Workspace already initialized. Use --force to re-initialize.");
    }

    workspace.init_data_dir()?;

    let db_path = workspace.db_path();
    let _db = Database::open(&db_path)?;

    workspace.config().save(workspace.root())?;

    println!("✓ Initialized rcaloop workspace in {:?}", workspace.root());
    println!("  Database: {:?}", db_path);
    println!("  Config: {:?}", workspace.data_dir().join("config.toml"));

    Ok(())
}

/// Result of ingesting one report file
#[derive(Debug)]
pub enum IngestOutcome {
    Stored { rca_id: String, actions: usize },
    Duplicate { existing: String },
}

/// Ingest one report or a directory of reports
pub fn ingest(
    path: &Path,
    target: &str,
    oem: &str,
    environment: &str,
    password: Option<&str>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let (workspace, db) = open_workspace(path)?;
    let config = workspace.config();

    check_upload_gate(config, password)?;

    if !config.is_known_environment(environment) {
        anyhow::bail!(
            "Unknown environment '{}'. Expected one of: {}",
            environment,
            config.environments.join(", ")
        );
    }

    let target_path = Path::new(target);
    let files = collect_report_files(target_path)?;

    if files.is_empty() {
        anyhow::bail!("No .docx reports found at {:?}", target_path);
    }

    for file in &files {
        let report = extract_report(file)?;

        if dry_run {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_report_text(&report),
            }
            continue;
        }

        match persist_report(&db, config, &report, oem, environment)? {
            IngestOutcome::Stored { rca_id, actions } => {
                info!(rca_id = %rca_id, actions, "stored report");
                println!("✓ Saved RCA {} ({} actions) from {:?}", rca_id, actions, file);
            }
            IngestOutcome::Duplicate { existing } => {
                warn!(existing = %existing, file = ?file, "duplicate report skipped");
                println!("⚠ Skipped {:?}: identical content already stored as {}", file, existing);
            }
        }
    }

    Ok(())
}

/// Check the shared-secret upload gate
pub fn check_upload_gate(config: &AppConfig, password: Option<&str>) -> Result<()> {
    if config.upload_password.as_deref().unwrap_or("").is_empty() {
        warn!("no upload password configured; uploads are ungated");
        return Ok(());
    }

    if !config.upload_authorised(password) {
        anyhow::bail!("Upload access denied: incorrect or missing password.");
    }

    Ok(())
}

/// Collect .docx files from a file or directory target
fn collect_report_files(target: &Path) -> Result<Vec<std::path::PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }

    if !target.is_dir() {
        anyhow::bail!("Target not found: {:?}", target);
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(target)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_str().unwrap_or("");
            !name.starts_with('.')
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if ext.eq_ignore_ascii_case("docx") {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Run the extraction pipeline over one report file
pub fn extract_report(file: &Path) -> Result<ExtractedReport> {
    let blocks = load_docx(file).with_context(|| format!("Failed to load report {:?}", file))?;
    let fragments = linearize(&blocks);
    debug!(file = ?file, fragments = fragments.len(), "linearized report body");

    let catalogue = HeadingCatalogue::standard();
    let extractor = SectionExtractor::new(&fragments, &catalogue);

    let doc_name = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report")
        .to_string();

    Ok(extractor.extract(&doc_name))
}

/// Persist one extracted report and its default-populated actions
pub fn persist_report(
    db: &Database,
    config: &AppConfig,
    report: &ExtractedReport,
    oem: &str,
    environment: &str,
) -> Result<IngestOutcome> {
    let hash = content_hash(&report.full_text);

    if let Some(existing) = db.find_rca_by_hash(&hash)? {
        return Ok(IngestOutcome::Duplicate { existing });
    }

    let rca_id = gen_id("RCA");
    let created = today();

    db.insert_rca(&RcaRecord {
        rca_id: rca_id.clone(),
        oem: oem.to_string(),
        environment: environment.to_string(),
        title: report.title.clone(),
        incident_date: report.incident_date.clone(),
        services_affected: report.services_affected.clone(),
        root_cause: report.root_cause.clone(),
        workaround: report.workaround.clone(),
        long_term_solutions: report.long_term_solutions.clone(),
        full_text: report.full_text.clone(),
        content_hash: hash,
        created_at: created,
        status: RcaStatus::Open.to_string(),
    })?;

    let due = (chrono::Local::now().date_naive()
        + chrono::Duration::days(config.action_due_days))
    .to_string();

    for action_text in &report.action_items {
        db.insert_action(&ActionRecord {
            action_id: gen_id("ACT"),
            rca_id: rca_id.clone(),
            action_text: action_text.clone(),
            owner_team: config.default_owner_team.clone(),
            owner_person: String::new(),
            due_date: due.clone(),
            status: ActionStatus::Todo.to_string(),
            verification_method: config.default_verification.clone(),
            verified_by: None,
            verified_at: None,
            notes: None,
        })?;
    }

    Ok(IngestOutcome::Stored {
        rca_id,
        actions: report.action_items.len(),
    })
}

fn print_report_text(report: &ExtractedReport) {
    println!("Title: {}", report.title);
    println!("Incident date: {}", report.incident_date);
    println!("Services affected: {}", report.services_affected);
    println!("\nRoot cause:\n{}", report.root_cause);
    println!("\nWorkaround:\n{}", report.workaround);
    println!("\nLong term solutions:\n{}", report.long_term_solutions);
    println!("\nAction items ({}):", report.action_items.len());
    for item in &report.action_items {
        println!("  - {}", item);
    }
}

/// List stored RCA records (audit view)
pub fn list(
    path: &Path,
    oem: Option<&str>,
    environment: Option<&str>,
    status: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    let records = db.list_rcas(&RcaFilter {
        oem: oem.map(|s| s.to_string()),
        environment: environment.map(|s| s.to_string()),
        status: status.map(normalize_rca_status).transpose()?,
        limit,
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No RCA records stored.");
                return Ok(());
            }

            println!("RCA Audit ({} records)", records.len());
            println!("=======================\n");
            for rca in &records {
                println!("{}  [{}]  {} / {}", rca.rca_id, rca.status, rca.oem, rca.environment);
                println!("  {}", rca.title);
                println!("  Created: {}  Incident date: {}", rca.created_at, rca.incident_date);
                println!();
            }
        }
    }

    Ok(())
}

fn normalize_rca_status(s: &str) -> Result<String> {
    Ok(s.parse::<RcaStatus>()?.to_string())
}

/// Show one RCA with its actions and their evidence
pub fn show(path: &Path, rca_id: &str, format: OutputFormat) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    let rca = db
        .get_rca(rca_id)?
        .ok_or_else(|| anyhow::anyhow!("RCA not found: {}", rca_id))?;
    let actions = db.actions_for_rca(rca_id)?;

    if format == OutputFormat::Json {
        let mut value = serde_json::to_value(&rca)?;
        value["actions"] = serde_json::to_value(&actions)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}  [{}]", rca.rca_id, rca.status);
    println!("=====================\n");
    println!("Title: {}", rca.title);
    println!("OEM: {}  Environment: {}", rca.oem, rca.environment);
    println!("Incident date: {}  Created: {}", rca.incident_date, rca.created_at);
    println!("Services affected: {}", rca.services_affected);
    println!("\nRoot cause:\n{}", rca.root_cause);
    println!("\nWorkaround:\n{}", rca.workaround);
    println!("\nLong term solutions:\n{}", rca.long_term_solutions);

    println!("\nActions ({}):", actions.len());
    for action in &actions {
        println!("\n  {}  [{}]  due {}", action.action_id, action.status, action.due_date);
        println!("    {}", action.action_text);
        if !action.owner_team.is_empty() || !action.owner_person.is_empty() {
            println!("    Owner: {} {}", action.owner_team, action.owner_person);
        }
        if let Some(ref by) = action.verified_by {
            println!(
                "    Verified by {} at {}",
                by,
                action.verified_at.as_deref().unwrap_or("-")
            );
        }

        let evidence = db.evidence_for_action(&action.action_id)?;
        for ev in &evidence {
            println!(
                "    Evidence: {} {}",
                ev.description,
                ev.url.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}

/// List remedial actions (tracker view)
pub fn actions(
    path: &Path,
    rca: Option<&str>,
    status: Option<&str>,
    overdue: bool,
    format: OutputFormat,
) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    let status = status
        .map(|s| s.parse::<ActionStatus>().map(|s| s.to_string()))
        .transpose()?;

    let records = db.list_actions(&ActionFilter {
        rca_id: rca.map(|s| s.to_string()),
        status,
        overdue_on: overdue.then(today),
    })?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No matching actions.");
                return Ok(());
            }

            println!("Action Tracker ({} actions)", records.len());
            println!("===========================\n");
            for action in &records {
                println!(
                    "{}  [{}]  due {}  ({})",
                    action.action_id, action.status, action.due_date, action.rca_id
                );
                println!("  {}", action.action_text);
                println!();
            }
        }
    }

    Ok(())
}

/// Update a remedial action
pub fn update(
    path: &Path,
    action_id: &str,
    status: Option<&str>,
    owner_team: Option<&str>,
    owner_person: Option<&str>,
    due: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    if let Some(status) = status {
        let status: ActionStatus = status.parse()?;
        db.update_action_status(action_id, status)?;
        println!("✓ {} status → {}", action_id, status);
    }

    if owner_team.is_some() || owner_person.is_some() || due.is_some() || notes.is_some() {
        if let Some(due) = due {
            chrono::NaiveDate::parse_from_str(due, "%Y-%m-%d")
                .with_context(|| format!("Invalid due date '{}', expected YYYY-MM-DD", due))?;
        }
        db.update_action_fields(action_id, owner_team, owner_person, due, notes)?;
        println!("✓ {} updated", action_id);
    }

    Ok(())
}

/// Mark an action as independently verified
pub fn verify(path: &Path, action_id: &str, by: &str) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    db.verify_action(action_id, by, &now_ts())?;
    println!("✓ {} verified by {}", action_id, by);

    Ok(())
}

/// Attach or list evidence for an action
pub fn evidence(
    path: &Path,
    action_id: &str,
    add: Option<&str>,
    url: Option<&str>,
    by: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    if db.get_action(action_id)?.is_none() {
        anyhow::bail!("Action not found: {}", action_id);
    }

    if let Some(description) = add {
        let record = EvidenceRecord {
            evidence_id: gen_id("EVD"),
            action_id: action_id.to_string(),
            description: description.to_string(),
            url: url.map(|s| s.to_string()),
            added_by: by.map(|s| s.to_string()),
            added_at: now_ts(),
        };
        db.insert_evidence(&record)?;
        println!("✓ Evidence {} attached to {}", record.evidence_id, action_id);
        return Ok(());
    }

    let rows = db.evidence_for_action(action_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No evidence attached to {}.", action_id);
                return Ok(());
            }
            for ev in &rows {
                println!(
                    "{}  {}  {}  ({})",
                    ev.evidence_id,
                    ev.description,
                    ev.url.as_deref().unwrap_or("-"),
                    ev.added_by.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    Ok(())
}

/// Find similar historical incidents
pub fn similar(path: &Path, text: &str, top: Option<usize>, format: OutputFormat) -> Result<()> {
    let (workspace, db) = open_workspace(path)?;

    let query = text.trim();
    if query.is_empty() {
        anyhow::bail!("Query text is empty.");
    }

    let rows = db.search_rows()?;
    let k = top.unwrap_or(workspace.config().top_k);
    let matches = find_similar(query, &rows, k);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
        OutputFormat::Text => {
            print_matches_text(&matches, workspace.config().similarity_threshold as f64)
        }
    }

    Ok(())
}

/// Print similarity matches in text format, flagging scores at or above
/// the recurrence threshold
pub fn print_matches_text(matches: &[SimilarMatch], threshold: f64) {
    if matches.is_empty() {
        println!("No stored records to compare against.");
        return;
    }

    println!("Recurrence candidates:");
    println!("======================\n");
    for m in matches {
        let flag = if m.score >= threshold {
            "  ⚠ likely recurrence"
        } else {
            ""
        };
        println!("{:.2}  {}  {}{}", m.score, m.rca_id, m.title, flag);
    }
}

/// Show dashboard statistics
pub fn status(path: &Path, format: OutputFormat) -> Result<()> {
    let (_workspace, db) = open_workspace(path)?;

    let stats = db.get_stats(&today())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("rcaloop Status");
            println!("==============\n");
            println!("RCA records: {} ({} open)", stats.total_rcas, stats.open_rcas);
            println!("Actions: {}", stats.total_actions);
            println!("  Done: {}", stats.done_actions);
            println!("  In progress: {}", stats.in_progress_actions);
            println!("  Overdue: {}", stats.overdue_actions);
            println!("  Verified: {}", stats.verified_actions);
            println!("Closure rate: {:.0}%", stats.closure_rate() * 100.0);
        }
    }

    Ok(())
}

/// Insert two synthetic demo records (no-op when records already exist)
pub fn seed(path: &Path) -> Result<()> {
    let (workspace, db) = open_workspace(path)?;
    let config = workspace.config();

    if db.list_rcas(&RcaFilter::default())?.len() >= 2 {
        println!("Demo records already present; nothing to do.");
        return Ok(());
    }

    let catalogue = HeadingCatalogue::standard();

    for (fragments, oem, environment) in [
        (demo_gateway_fragments(), "Acme Motors", "UAT"),
        (demo_billing_fragments(), "Acme Motors", "Testing"),
    ] {
        let extractor = SectionExtractor::new(&fragments, &catalogue);
        let report = extractor.extract("demo-report");

        match persist_report(&db, config, &report, oem, environment)? {
            IngestOutcome::Stored { rca_id, actions } => {
                println!("✓ Seeded {} ({} actions)", rca_id, actions);
            }
            IngestOutcome::Duplicate { existing } => {
                println!("⚠ Demo record already stored as {}", existing);
            }
        }
    }

    Ok(())
}

fn demo_gateway_fragments() -> Vec<String> {
    [
        "Gateway session outage during joint validation",
        "Incident Date",
        "09/02/2026",
        "Services Affected",
        "API gateway sessions in the staging region",
        "Customer Impact",
        "Validation runs were blocked until service restoration.",
        "Description",
        "Session establishment failed intermittently while the partner ran joint validation.",
        "Root Cause",
        "The gateway rejected session setup when the dynamic address flag was enabled.",
        "The default configuration follows the standard, which does not mandate rejection.",
        "Workaround (Actions to restore service)",
        "Disabled the dynamic address flag for the affected profile.",
        "Post-change validation confirmed connectivity was restored.",
        "Long Term Solutions (Actions to prevent recurrence)",
        "End-to-end connectivity validation becomes mandatory before any joint testing.",
        "Create an internal ticket to track pending validations until closure.",
        "Assign a named owner to re-trigger testing after contractual blockers clear.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn demo_billing_fragments() -> Vec<String> {
    [
        "Billing export delayed by overlapping schedules",
        "Incident Date",
        "11/02/2026",
        "Services Affected",
        "Nightly billing export",
        "Root Cause",
        "Two export schedules overlapped and serialized on the same table lock.",
        "Workaround",
        "Re-ran the export after the overlapping job completed.",
        "Long Term Solutions",
        "Stagger export schedules and alert when a run exceeds its window.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
