//! Review session: the page controller.
//!
//! A [`ReviewSession`] owns the [`ReviewState`], a [`Clock`] and a
//! [`TimerQueue`]. User actions update the state immediately and schedule
//! the simulated work; [`ReviewSession::poll`] completes whatever has come
//! due. Hosts poll on a timer (see [`ReviewSession::next_deadline`]); tests
//! drive a [`ManualClock`](crate::clock::ManualClock) and poll synchronously.

pub mod scheduler;
pub mod simulated;
mod state;

pub use scheduler::{Task, TimerQueue};
pub use state::*;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::image::ImageRef;
use crate::models::PatientHistory;
use crate::view::ViewModel;

/// Page controller for one review session.
pub struct ReviewSession<C: Clock = SystemClock> {
    state: ReviewState,
    config: SessionConfig,
    clock: C,
    timers: TimerQueue,
}

impl ReviewSession<SystemClock> {
    /// Session on wall-clock time with default delays.
    pub fn new() -> Self {
        Self::with_clock(SessionConfig::default(), SystemClock)
    }
}

impl Default for ReviewSession<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ReviewSession<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        Self {
            state: ReviewState::new(),
            config,
            clock,
            timers: TimerQueue::new(),
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Take a chosen file. `None` (the picker was dismissed) does nothing.
    pub fn upload_image(&mut self, file: Option<ImageRef>) {
        let Some(image) = file else {
            debug!("Upload dismissed without a file");
            return;
        };

        info!(
            digest = %image.digest(),
            mime = image.mime(),
            bytes = image.byte_len(),
            "Image selected"
        );
        self.state.select_image(image);
        self.run_analysis();
    }

    /// Start a simulated analysis of the selected image.
    pub fn run_analysis(&mut self) {
        self.state.begin_analysis();
        let image = self.state.selected_image.clone();
        let due = self.due_after(self.config.analysis_delay());

        debug!(%due, "Analysis scheduled");
        self.timers.schedule(due, Task::CompleteAnalysis { image });
    }

    /// Start saving the current analysis. Does nothing without one.
    pub fn save_analysis(&mut self) {
        let Some(analysis) = self.state.begin_save() else {
            debug!(
                has_analysis = self.state.analysis.is_some(),
                is_saving = self.state.is_saving,
                "Save ignored"
            );
            return;
        };

        let due = self.due_after(self.config.save_delay());
        debug!(analysis_id = %analysis.id, %due, "Save scheduled");
        self.timers.schedule(
            due,
            Task::CompleteSave {
                analysis: Box::new(analysis),
            },
        );
    }

    pub fn select_tab(&mut self, tab: Tab) {
        debug!(tab = tab.label(), "Tab selected");
        self.state.select_tab(tab);
    }

    /// Complete every task that has come due. Returns how many ran.
    pub fn poll(&mut self) -> usize {
        let due = self.timers.take_due(self.clock.now());
        let fired = due.len();
        for task in due {
            debug!(task = task.name(), pending = self.timers.len(), "Task due");
            self.complete(task);
        }
        fired
    }

    /// When the next scheduled task comes due.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    /// No simulated work is pending.
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// History for the history and labs tabs.
    pub fn current_history(&self) -> Option<&PatientHistory> {
        current_history(&self.state)
    }

    /// What the page should show right now.
    pub fn view(&self) -> ViewModel {
        ViewModel::from_state(&self.state)
    }

    fn complete(&mut self, task: Task) {
        match task {
            Task::CompleteAnalysis { image } => {
                let analysis = simulated::build_analysis(
                    uuid::Uuid::new_v4().to_string(),
                    self.clock.now(),
                    image,
                    self.state.carried_history(),
                );
                info!(
                    analysis_id = %analysis.id,
                    findings = analysis.findings.len(),
                    "Analysis complete"
                );
                self.state.complete_analysis(analysis);
            }
            Task::CompleteSave { analysis } => {
                let today = self.clock.today();
                let saved = self.state.complete_save(&analysis, today);
                info!(
                    analysis_id = %saved.id,
                    visits = saved.history.previous_visits.len(),
                    "Analysis saved"
                );
            }
        }
    }

    fn due_after(&self, delay: chrono::Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        now.checked_add_signed(delay)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
