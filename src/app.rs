//! Application state management for Dayboard.
//!
//! This module contains the core `App` struct that owns the session store,
//! the API client, the fetched resource collections, and all UI state.
//! Resource mutations replace the local copy with the record the server
//! returns; failures are logged and leave state unchanged.

use chrono::{Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::{CredentialStorage, SessionStore};
use crate::config::Config;
use crate::models::{entry_for, filter_by_type, Goal, GoalType, JournalEntry, Todo};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background refresh message channel.
/// A full refresh produces at most a handful of messages.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for goal titles and todo text.
/// Matches the backend's CharField max_length.
const MAX_INPUT_LENGTH: usize = 255;

/// Maximum length for the journal entry.
/// Keeps it roughly "one line", same cap the web editor enforces.
const MAX_JOURNAL_LENGTH: usize = 300;

/// Maximum length for login/signup form fields.
const MAX_FIELD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Goals,
    Todos,
    Journal,
    History,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Goals => "Goals",
            Tab::Todos => "Todos",
            Tab::Journal => "Journal",
            Tab::History => "History",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Goals => Tab::Todos,
            Tab::Todos => Tab::Journal,
            Tab::Journal => Tab::History,
            Tab::History => Tab::Goals,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Goals => Tab::History,
            Tab::Todos => Tab::Goals,
            Tab::Journal => Tab::Todos,
            Tab::History => Tab::Journal,
        }
    }
}

/// Which goal pane has focus on the Goals tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalPane {
    LongTerm,
    ShortTerm,
}

impl GoalPane {
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalPane::LongTerm => GoalType::LongTerm,
            GoalPane::ShortTerm => GoalType::ShortTerm,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// Typing a new goal/todo or editing the journal draft
    Inserting,
    ShowingHelp,
    LoggingIn,
    SigningUp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Signup form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    Username,
    Email,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from the background refresh task back to the event loop.
enum RefreshResult {
    Goals(Vec<Goal>),
    Todos(Vec<Todo>),
    Journal(Vec<JournalEntry>),
    RefreshComplete,
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub status_message: Option<String>,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Signup form state
    pub signup_username: String,
    pub signup_email: String,
    pub signup_password: String,
    pub signup_focus: SignupFocus,

    // Fetched data
    pub goals: Vec<Goal>,
    pub todos: Vec<Todo>,
    pub journal_entries: Vec<JournalEntry>,

    // Goals tab state
    pub goal_pane: GoalPane,
    pub goal_selection: usize,

    // Todos tab state
    pub todo_selection: usize,

    // History tab state
    pub history_selection: usize,

    // Journal tab state
    pub journal_draft: String,
    pub journal_dirty: bool,

    /// Text being typed for a new goal or todo
    pub input_buffer: String,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance. Rehydrates any prior session
    /// from durable storage before the first frame renders.
    pub fn new() -> anyhow::Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let storage = CredentialStorage::new(config.credential_dir()?)?;

        let mut session = SessionStore::new(storage.clone());
        session.initialize();
        debug!(authenticated = session.is_authenticated(), "Session initialized");

        let api = ApiClient::new(&config.api_base_url(), storage)?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var("DAYBOARD_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var("DAYBOARD_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            current_tab: Tab::Goals,
            status_message: None,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            signup_username: String::new(),
            signup_email: String::new(),
            signup_password: String::new(),
            signup_focus: SignupFocus::Username,

            goals: Vec::new(),
            todos: Vec::new(),
            journal_entries: Vec::new(),

            goal_pane: GoalPane::LongTerm,
            goal_selection: 0,
            todo_selection: 0,
            history_selection: 0,

            journal_draft: String::new(),
            journal_dirty: false,

            input_buffer: String::new(),

            refresh_rx: rx,
            refresh_tx: tx,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Username for the title bar greeting
    pub fn greeting_name(&self) -> Option<&str> {
        self.session.identity().map(|i| i.username.as_str())
    }

    /// Show the login overlay
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Show the signup overlay
    pub fn start_signup(&mut self) {
        self.state = AppState::SigningUp;
        self.signup_focus = SignupFocus::Username;
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form. On failure
    /// the overlay stays up with the recorded error rendered inline.
    pub async fn attempt_login(&mut self) {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;

        match self.session.login(&self.api, &username, &password).await {
            Ok(()) => {
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                self.refresh_all_background();
            }
            Err(_) => {
                // Stay on the form; the message comes from the session store
                self.login_error = self.session.last_error().map(|f| f.message.clone());
            }
        }
    }

    /// Attempt signup with the form fields; a successful registration
    /// auto-logs-in with the same credentials.
    pub async fn attempt_signup(&mut self) {
        let username = self.signup_username.trim().to_string();
        let email = self.signup_email.trim().to_string();
        let password = self.signup_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;

        match self
            .session
            .signup(&self.api, &username, &email, &password)
            .await
        {
            Ok(()) => {
                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.signup_password.clear();
                self.state = AppState::Normal;
                self.refresh_all_background();
            }
            Err(_) => {
                self.login_error = self.session.last_error().map(|f| f.message.clone());
            }
        }
    }

    /// Log out and drop everything fetched for the old user.
    pub fn logout(&mut self) {
        self.session.logout();
        self.goals.clear();
        self.todos.clear();
        self.journal_entries.clear();
        self.journal_draft.clear();
        self.journal_dirty = false;
        self.status_message = None;
        self.start_login();
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task that fetches goals, todos, and journal
    /// entries concurrently. Results are applied from the event loop via
    /// `check_background_tasks`.
    pub fn refresh_all_background(&mut self) {
        if !self.is_authenticated() {
            return;
        }

        info!("Starting background refresh");
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (goals, todos, journal) =
                tokio::join!(api.list_goals(), api.list_todos(), api.list_journal());

            match goals {
                Ok(goals) => Self::send_result(&tx, RefreshResult::Goals(goals)).await,
                Err(e) => {
                    error!(error = %e, "Failed to fetch goals");
                    Self::send_result(&tx, RefreshResult::Error(format!("Failed to fetch goals: {}", e)))
                        .await;
                }
            }

            match todos {
                Ok(todos) => Self::send_result(&tx, RefreshResult::Todos(todos)).await,
                Err(e) => error!(error = %e, "Failed to fetch todos"),
            }

            match journal {
                Ok(entries) => Self::send_result(&tx, RefreshResult::Journal(entries)).await,
                Err(e) => error!(error = %e, "Failed to fetch journal"),
            }

            Self::send_result(&tx, RefreshResult::RefreshComplete).await;
        });

        self.status_message = Some("Refreshing...".to_string());
    }

    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Drain completed background results and fold them into app state.
    /// Called once per event-loop tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            match result {
                RefreshResult::Goals(goals) => {
                    debug!(count = goals.len(), "Goals refreshed");
                    self.goals = goals;
                    self.clamp_selections();
                }
                RefreshResult::Todos(todos) => {
                    debug!(count = todos.len(), "Todos refreshed");
                    self.todos = todos;
                    self.clamp_selections();
                }
                RefreshResult::Journal(mut entries) => {
                    debug!(count = entries.len(), "Journal refreshed");
                    entries.sort_by(|a, b| b.date.cmp(&a.date));
                    self.journal_entries = entries;
                    self.clamp_selections();

                    // Seed the editor with today's entry unless the user
                    // has unsaved changes
                    if !self.journal_dirty {
                        self.journal_draft = self
                            .today_entry()
                            .map(|e| e.content.clone())
                            .unwrap_or_default();
                    }
                }
                RefreshResult::RefreshComplete => {
                    self.status_message = None;
                }
                RefreshResult::Error(msg) => {
                    debug!(msg, "Background refresh error");
                    self.status_message = None;
                }
            }
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn today_entry(&self) -> Option<&JournalEntry> {
        entry_for(&self.journal_entries, Self::today())
    }

    /// Goals for a pane, filtered client-side from the shared collection.
    pub fn goals_for(&self, pane: GoalPane) -> Vec<&Goal> {
        filter_by_type(&self.goals, pane.goal_type())
    }

    /// The goal currently under the cursor, if any.
    pub fn selected_goal(&self) -> Option<&Goal> {
        self.goals_for(self.goal_pane).get(self.goal_selection).copied()
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos.get(self.todo_selection)
    }

    fn clamp_selections(&mut self) {
        let visible_goals = self.goals_for(self.goal_pane).len();
        self.goal_selection = self.goal_selection.min(visible_goals.saturating_sub(1));
        self.todo_selection = self.todo_selection.min(self.todos.len().saturating_sub(1));
        self.history_selection = self
            .history_selection
            .min(self.journal_entries.len().saturating_sub(1));
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    /// Append a character to whichever buffer the Inserting state edits.
    pub fn push_input_char(&mut self, c: char) {
        match self.current_tab {
            Tab::Journal => {
                if push_limited(&mut self.journal_draft, c, MAX_JOURNAL_LENGTH) {
                    self.journal_dirty = true;
                }
            }
            _ => {
                push_limited(&mut self.input_buffer, c, MAX_INPUT_LENGTH);
            }
        }
    }

    pub fn pop_input_char(&mut self) {
        match self.current_tab {
            Tab::Journal => {
                if self.journal_draft.pop().is_some() {
                    self.journal_dirty = true;
                }
            }
            _ => {
                self.input_buffer.pop();
            }
        }
    }

    /// Append a character to the focused login/signup form field.
    pub fn push_form_char(&mut self, c: char) {
        let field = match self.state {
            AppState::LoggingIn => match self.login_focus {
                LoginFocus::Username => Some(&mut self.login_username),
                LoginFocus::Password => Some(&mut self.login_password),
                LoginFocus::Button => None,
            },
            AppState::SigningUp => match self.signup_focus {
                SignupFocus::Username => Some(&mut self.signup_username),
                SignupFocus::Email => Some(&mut self.signup_email),
                SignupFocus::Password => Some(&mut self.signup_password),
                SignupFocus::Button => None,
            },
            _ => None,
        };

        if let Some(field) = field {
            push_limited(field, c, MAX_FIELD_LENGTH);
        }
    }

    pub fn pop_form_char(&mut self) {
        let field = match self.state {
            AppState::LoggingIn => match self.login_focus {
                LoginFocus::Username => Some(&mut self.login_username),
                LoginFocus::Password => Some(&mut self.login_password),
                LoginFocus::Button => None,
            },
            AppState::SigningUp => match self.signup_focus {
                SignupFocus::Username => Some(&mut self.signup_username),
                SignupFocus::Email => Some(&mut self.signup_email),
                SignupFocus::Password => Some(&mut self.signup_password),
                SignupFocus::Button => None,
            },
            _ => None,
        };

        if let Some(field) = field {
            field.pop();
        }
    }

    // =========================================================================
    // Resource operations
    // =========================================================================
    //
    // Failures here are logged and otherwise silent; local state only
    // changes when the server confirms the mutation.

    /// Create a goal in the focused pane from the input buffer.
    pub async fn add_goal(&mut self) {
        let title = self.input_buffer.trim().to_string();
        if title.is_empty() {
            return;
        }

        match self.api.create_goal(&title, self.goal_pane.goal_type()).await {
            Ok(goal) => {
                debug!(id = goal.id, "Goal created");
                self.goals.push(goal);
                self.input_buffer.clear();
            }
            Err(e) => error!(error = %e, "Failed to add goal"),
        }
    }

    pub async fn delete_selected_goal(&mut self) {
        let Some(id) = self.selected_goal().map(|g| g.id) else {
            return;
        };

        match self.api.delete_goal(id).await {
            Ok(()) => {
                self.goals.retain(|g| g.id != id);
                self.clamp_selections();
            }
            Err(e) => error!(error = %e, "Failed to delete goal"),
        }
    }

    /// Create a todo from the input buffer.
    pub async fn add_todo(&mut self) {
        let text = self.input_buffer.trim().to_string();
        if text.is_empty() {
            return;
        }

        match self.api.create_todo(&text).await {
            Ok(todo) => {
                debug!(id = todo.id, "Todo created");
                self.todos.push(todo);
                self.input_buffer.clear();
            }
            Err(e) => error!(error = %e, "Failed to add todo"),
        }
    }

    /// Flip the selected todo's completion flag. The server's record
    /// replaces the local copy rather than trusting the optimistic value.
    pub async fn toggle_selected_todo(&mut self) {
        let Some((id, completed)) = self.selected_todo().map(|t| (t.id, t.completed)) else {
            return;
        };

        match self.api.set_todo_completed(id, !completed).await {
            Ok(updated) => {
                if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
                    *todo = updated;
                }
            }
            Err(e) => error!(error = %e, "Failed to toggle todo"),
        }
    }

    pub async fn delete_selected_todo(&mut self) {
        let Some(id) = self.selected_todo().map(|t| t.id) else {
            return;
        };

        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.todos.retain(|t| t.id != id);
                self.clamp_selections();
            }
            Err(e) => error!(error = %e, "Failed to delete todo"),
        }
    }

    /// Save the journal draft: patch today's entry if one exists,
    /// otherwise create it. The server record replaces the local copy.
    pub async fn save_journal(&mut self) {
        let content = self.journal_draft.trim().to_string();
        if content.is_empty() {
            return;
        }

        let existing_id = self.today_entry().map(|e| e.id);

        let result = match existing_id {
            Some(id) => self.api.update_journal_entry(id, &content).await,
            None => self.api.create_journal_entry(&content).await,
        };

        match result {
            Ok(entry) => {
                match self.journal_entries.iter_mut().find(|e| e.id == entry.id) {
                    Some(existing) => *existing = entry,
                    None => {
                        self.journal_entries.insert(0, entry);
                    }
                }
                self.journal_dirty = false;
                self.status_message = Some("Journal saved".to_string());
            }
            Err(e) => error!(error = %e, "Failed to save journal"),
        }
    }
}

/// Append `c` to `buf` unless it already holds `max_chars` characters.
/// Caps count characters, not bytes, so multibyte input gets the same
/// budget as ASCII. Returns whether the character was added.
fn push_limited(buf: &mut String, c: char, max_chars: usize) -> bool {
    if buf.chars().count() < max_chars {
        buf.push(c);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Goals.next(), Tab::Todos);
        assert_eq!(Tab::History.next(), Tab::Goals);
        assert_eq!(Tab::Goals.prev(), Tab::History);

        let mut tab = Tab::Goals;
        for _ in 0..4 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Goals);
    }

    #[test]
    fn test_goal_pane_maps_to_type() {
        assert_eq!(GoalPane::LongTerm.goal_type(), GoalType::LongTerm);
        assert_eq!(GoalPane::ShortTerm.goal_type(), GoalType::ShortTerm);
    }

    #[test]
    fn test_input_cap_counts_characters_not_bytes() {
        // 10 euro signs are 30 bytes but only 10 characters
        let mut buf = "€".repeat(10);
        assert!(push_limited(&mut buf, '€', 300));
        assert_eq!(buf.chars().count(), 11);

        let mut full = "あ".repeat(5);
        assert!(!push_limited(&mut full, 'x', 5));
        assert_eq!(full.chars().count(), 5);
    }
}
