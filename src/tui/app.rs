//! TUI application state and logic

use crate::search::{find_similar, SimilarMatch};
use crate::storage::{ActionFilter, ActionRecord, ActionStatus, Database, DashboardStats, RcaFilter, RcaRecord, RcaStatus};
use crate::workspace::Workspace;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::Path;

/// Current view in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Main dashboard
    Dashboard,
    /// RCA audit list
    Rcas,
    /// Detailed RCA view
    RcaDetail,
    /// Action tracker
    Actions,
    /// Recurrence search
    Similar,
    /// Help screen
    Help,
}

/// Application state
pub struct AppState {
    /// Current view
    pub view: View,
    /// Selected RCA index
    pub selected_rca: usize,
    /// Selected action index
    pub selected_action: usize,
    /// Scroll offset for the detail view
    pub scroll_offset: usize,
    /// Search query buffer
    pub search_query: String,
    /// Whether in input mode
    pub input_mode: bool,
    /// Status message
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Dashboard,
            selected_rca: 0,
            selected_action: 0,
            scroll_offset: 0,
            search_query: String::new(),
            input_mode: false,
            status_message: None,
        }
    }
}

/// Main TUI application
pub struct App {
    /// Workspace handle
    pub workspace: Workspace,
    /// Database handle
    pub db: Database,
    /// Application state
    pub state: AppState,
    /// RCA records
    pub rcas: Vec<RcaRecord>,
    /// Actions shown in the tracker
    pub actions: Vec<ActionRecord>,
    /// Similarity matches for the current query
    pub matches: Vec<SimilarMatch>,
    /// Dashboard statistics
    pub stats: DashboardStats,
}

impl App {
    /// Create a new app instance
    pub fn new(path: &Path) -> Result<Self> {
        let workspace = Workspace::open(path)?;

        if !workspace.is_initialized() {
            anyhow::bail!("Workspace not initialized. Run 'rcaloop init' first.");
        }

        let db = Database::open(workspace.db_path())?;

        let rcas = db.list_rcas(&RcaFilter::default())?;
        let actions = db.list_actions(&ActionFilter::default())?;
        let stats = db.get_stats(&crate::cli::today())?;

        Ok(Self {
            workspace,
            db,
            state: AppState::default(),
            rcas,
            actions,
            matches: Vec::new(),
            stats,
        })
    }

    /// Reload lists and statistics from the database
    fn refresh(&mut self) -> Result<()> {
        self.rcas = self.db.list_rcas(&RcaFilter::default())?;
        self.actions = self.db.list_actions(&ActionFilter::default())?;
        self.stats = self.db.get_stats(&crate::cli::today())?;

        if self.state.selected_rca >= self.rcas.len() {
            self.state.selected_rca = self.rcas.len().saturating_sub(1);
        }
        if self.state.selected_action >= self.actions.len() {
            self.state.selected_action = self.actions.len().saturating_sub(1);
        }

        Ok(())
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Handle input mode
        if self.state.input_mode {
            return self.handle_input_key(key);
        }

        // Handle view-specific keys
        match self.state.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Rcas => self.handle_rcas_key(key),
            View::RcaDetail => self.handle_detail_key(key),
            View::Actions => self.handle_actions_key(key),
            View::Similar => self.handle_similar_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    /// Handle keys in dashboard view
    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('r') | KeyCode::Enter => {
                self.state.view = View::Rcas;
            }
            KeyCode::Char('a') => {
                self.state.view = View::Actions;
            }
            KeyCode::Char('s') | KeyCode::Char('/') => {
                self.state.view = View::Similar;
                self.state.input_mode = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.view = View::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in RCA list view
    fn handle_rcas_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.view = View::Dashboard;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.state.selected_rca > 0 {
                    self.state.selected_rca -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.selected_rca < self.rcas.len().saturating_sub(1) {
                    self.state.selected_rca += 1;
                }
            }
            KeyCode::Enter => {
                if !self.rcas.is_empty() {
                    self.state.scroll_offset = 0;
                    self.state.view = View::RcaDetail;
                }
            }
            KeyCode::Char('c') => {
                self.close_selected_rca()?;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.view = View::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in RCA detail view
    fn handle_detail_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.view = View::Rcas;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.state.scroll_offset > 0 {
                    self.state.scroll_offset -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.scroll_offset += 1;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in action tracker view
    fn handle_actions_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.view = View::Dashboard;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.state.selected_action > 0 {
                    self.state.selected_action -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.selected_action < self.actions.len().saturating_sub(1) {
                    self.state.selected_action += 1;
                }
            }
            KeyCode::Char('s') => {
                self.cycle_selected_action()?;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.view = View::Help;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in the similarity view
    fn handle_similar_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.view = View::Dashboard;
            }
            KeyCode::Char('/') | KeyCode::Char('e') => {
                self.state.input_mode = true;
            }
            KeyCode::Enter => {
                self.run_search()?;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in help view
    fn handle_help_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
                self.state.view = View::Dashboard;
            }
            _ => {}
        }
        Ok(false)
    }

    /// Handle keys in input mode
    fn handle_input_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => {
                self.state.input_mode = false;
            }
            KeyCode::Enter => {
                self.state.input_mode = false;
                self.run_search()?;
            }
            KeyCode::Backspace => {
                self.state.search_query.pop();
            }
            KeyCode::Char(c) => {
                self.state.search_query.push(c);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Run the recurrence search for the current query
    fn run_search(&mut self) -> Result<()> {
        let query = self.state.search_query.trim().to_string();
        if query.is_empty() {
            self.state.status_message = Some("Enter a query first".to_string());
            return Ok(());
        }

        let rows = self.db.search_rows()?;
        let k = self.workspace.config().top_k;
        self.matches = find_similar(&query, &rows, k);

        self.state.status_message = Some(format!("{} candidates", self.matches.len()));

        Ok(())
    }

    /// Close the selected RCA
    fn close_selected_rca(&mut self) -> Result<()> {
        if let Some(rca) = self.rcas.get(self.state.selected_rca) {
            let rca_id = rca.rca_id.clone();
            self.db.update_rca_status(&rca_id, RcaStatus::Closed)?;
            self.refresh()?;
            self.state.status_message = Some(format!("{} closed", rca_id));
        }
        Ok(())
    }

    /// Cycle the selected action's status
    fn cycle_selected_action(&mut self) -> Result<()> {
        if let Some(action) = self.actions.get(self.state.selected_action) {
            let action_id = action.action_id.clone();
            let next = action.status.parse::<ActionStatus>()?.next();
            self.db.update_action_status(&action_id, next)?;
            self.refresh()?;
            self.state.status_message = Some(format!("{} → {}", action_id, next));
        }
        Ok(())
    }

    /// Get the currently selected RCA
    pub fn selected_rca(&self) -> Option<&RcaRecord> {
        self.rcas.get(self.state.selected_rca)
    }
}
