//! Application state for the TUI.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use clientdash_core::analytics::{revenue_series, DashboardMetrics, RevenuePoint, StatusBreakdown};
use clientdash_core::chat::{ChatOutcome, ChatSession, OutboundMessage};
use clientdash_core::config::DisplayConfig;
use clientdash_core::ingest::{Generation, IngestResult, RefreshSequencer};
use clientdash_core::ClientRecord;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

/// Work the app asks the background worker to do.
#[derive(Debug)]
pub enum Command {
    /// Fetch and parse the sheet for this refresh generation
    Refresh(Generation),
    /// Post a chat message to the webhook
    SendChat(OutboundMessage),
}

/// Results delivered back by the background worker.
#[derive(Debug)]
pub enum TaskEvent {
    Ingested {
        generation: Generation,
        result: clientdash_core::Result<IngestResult>,
    },
    ChatReplied(ChatOutcome),
}

/// Main application state.
pub struct App {
    /// Symbol prefixed to money amounts
    pub currency_symbol: String,
    /// Periodic refresh, if enabled
    refresh_interval: Option<Duration>,

    // ========== Sheet data ==========
    /// Current record snapshot, replaced wholesale on each refresh
    pub records: Vec<ClientRecord>,
    /// KPIs derived from `records`
    pub metrics: DashboardMetrics,
    /// Status distribution derived from `records`
    pub breakdown: StatusBreakdown,
    /// Revenue bars derived from `records`
    pub revenue: Vec<RevenuePoint>,
    /// Orders overlapping refreshes
    refresh: RefreshSequencer,
    /// When the latest refresh was started
    last_refresh_started: Option<Instant>,
    /// False until the first refresh has settled
    has_loaded: bool,
    /// When the shown data was fetched
    pub last_synced: Option<DateTime<Utc>>,
    /// Why the most recent refresh failed, if it did
    pub last_error: Option<String>,
    /// Client table selection state
    pub table_state: TableState,

    // ========== Chat ==========
    /// Conversation, kept for the life of the process
    pub chat: ChatSession,
    /// Text being typed in the chat input
    pub chat_input: String,
    /// Whether the chat overlay is shown
    pub chat_open: bool,

    /// Advances every tick, drives spinners
    pub tick_count: usize,
    /// Work queued for the worker
    commands: Vec<Command>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new app with no data loaded.
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            currency_symbol: display.currency_symbol.clone(),
            refresh_interval: display.refresh_interval(),
            records: Vec::new(),
            metrics: DashboardMetrics::default(),
            breakdown: StatusBreakdown::default(),
            revenue: Vec::new(),
            refresh: RefreshSequencer::new(),
            last_refresh_started: None,
            has_loaded: false,
            last_synced: None,
            last_error: None,
            table_state: TableState::default(),
            chat: ChatSession::new(),
            chat_input: String::new(),
            chat_open: false,
            tick_count: 0,
            commands: Vec::new(),
            should_quit: false,
        }
    }

    /// Start a sheet refresh. A refresh already in flight is superseded.
    pub fn request_refresh(&mut self) {
        let generation = self.refresh.begin();
        self.last_refresh_started = Some(Instant::now());
        tracing::debug!(?generation, "Refresh requested");
        self.commands.push(Command::Refresh(generation));
    }

    /// True until the first refresh has produced data or an error.
    pub fn is_loading(&self) -> bool {
        !self.has_loaded
    }

    /// Whether a refresh is outstanding
    pub fn is_syncing(&self) -> bool {
        self.refresh.is_pending()
    }

    /// Drain the queued work.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Advance animations and fire the periodic refresh when it is due.
    pub fn tick(&mut self, now: Instant) {
        self.tick_count = self.tick_count.wrapping_add(1);

        let Some(interval) = self.refresh_interval else {
            return;
        };
        if self.is_syncing() {
            return;
        }
        let due = self
            .last_refresh_started
            .map_or(true, |started| now.saturating_duration_since(started) >= interval);
        if due {
            tracing::debug!("Periodic refresh due");
            self.request_refresh();
        }
    }

    /// Apply a result from the worker.
    pub fn apply(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Ingested { generation, result } => self.apply_ingest(generation, result),
            TaskEvent::ChatReplied(outcome) => {
                // Lands in the session whether or not the overlay is open.
                self.chat.complete(&outcome);
            }
        }
    }

    fn apply_ingest(
        &mut self,
        generation: Generation,
        result: clientdash_core::Result<IngestResult>,
    ) {
        if !self.refresh.is_current(generation) {
            tracing::debug!(?generation, "Discarding superseded refresh result");
            return;
        }

        match result {
            Ok(result) => {
                self.refresh.accept(generation);
                self.set_records(result.records);
                self.last_synced = Some(result.fetched_at);
                self.last_error = None;
            }
            Err(e) => {
                self.refresh.settle(generation);
                tracing::warn!(error = %e, "Sheet refresh failed, keeping previous data");
                self.last_error = Some(e.to_string());
            }
        }
        self.has_loaded = true;
    }

    fn set_records(&mut self, records: Vec<ClientRecord>) {
        self.metrics = DashboardMetrics::compute(&records);
        self.breakdown = StatusBreakdown::compute(&records);
        self.revenue = revenue_series(&records);
        self.records = records;

        let selected = match (self.records.len(), self.table_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.chat_open {
            self.handle_chat_key(key);
        } else {
            self.handle_dashboard_key(key);
        }
    }

    /// Handle keyboard input on the dashboard.
    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.request_refresh();
            }
            KeyCode::Char('c') => {
                self.chat_open = true;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select_first();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select_last();
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the chat overlay.
    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.chat_open = false;
            }
            KeyCode::Enter => {
                self.submit_chat();
            }
            // Input is read-only while a reply is pending.
            KeyCode::Backspace if !self.chat.is_awaiting() => {
                self.chat_input.pop();
            }
            KeyCode::Char(c) if !self.chat.is_awaiting() => {
                self.chat_input.push(c);
            }
            _ => {}
        }
    }

    fn submit_chat(&mut self) {
        if let Some(outbound) = self.chat.submit(&mut self.chat_input) {
            tracing::debug!(id = %outbound.message_id, "Chat message submitted");
            self.commands.push(Command::SendChat(outbound));
        }
    }

    /// Select the next row in the table.
    fn select_next(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.records.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Select the previous row in the table.
    fn select_previous(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.records.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Select the first row.
    fn select_first(&mut self) {
        if !self.records.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    /// Select the last row.
    fn select_last(&mut self) {
        if !self.records.is_empty() {
            self.table_state.select(Some(self.records.len() - 1));
        }
    }
}
