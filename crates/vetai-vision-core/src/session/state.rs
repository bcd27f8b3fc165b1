//! Review state and its transitions.
//!
//! Everything here is pure: no clock, no timers, no I/O. The session driver
//! decides *when* a transition happens; this module decides *what* it does.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::record_date;
use crate::image::ImageRef;
use crate::models::{Analysis, PatientHistory};

use super::simulated;

/// The three views of the review page.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Analysis,
    History,
    Labs,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Analysis, Tab::History, Tab::Labs];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Analysis => "Analysis",
            Self::History => "History",
            Self::Labs => "Labs",
        }
    }
}

/// Everything the review page shows.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub selected_image: Option<ImageRef>,
    pub is_analyzing: bool,
    pub active_tab: Tab,
    /// The analysis awaiting review; at most one at a time
    pub analysis: Option<Analysis>,
    /// Saved analyses, oldest first
    pub saved_analyses: Vec<Analysis>,
    pub is_saving: bool,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `image` the selected image.
    pub fn select_image(&mut self, image: ImageRef) {
        self.selected_image = Some(image);
    }

    /// Mark an analysis as in flight.
    pub fn begin_analysis(&mut self) {
        self.is_analyzing = true;
    }

    /// Install a finished analysis and bring the analysis tab forward.
    pub fn complete_analysis(&mut self, analysis: Analysis) {
        self.analysis = Some(analysis);
        self.is_analyzing = false;
        self.active_tab = Tab::Analysis;
    }

    /// Whether a save can start now.
    pub fn can_save(&self) -> bool {
        self.analysis.is_some() && !self.is_saving
    }

    /// Mark a save as in flight and return the analysis being saved.
    ///
    /// Returns `None`, leaving the state untouched, when there is nothing to
    /// save or a save is already running.
    pub fn begin_save(&mut self) -> Option<Analysis> {
        if !self.can_save() {
            return None;
        }
        self.is_saving = true;
        self.analysis.clone()
    }

    /// Record `analysis` as saved on `today`.
    ///
    /// Prepends the AI Analysis visit to its history, appends it to the saved
    /// list, clears the current analysis and selected image, and switches to
    /// the history tab. Returns the saved record.
    pub fn complete_save(&mut self, analysis: &Analysis, today: NaiveDate) -> &Analysis {
        let saved = analysis.with_save_visit(record_date(today));
        self.saved_analyses.push(saved);

        self.analysis = None;
        self.selected_image = None;
        self.is_saving = false;
        self.active_tab = Tab::History;

        &self.saved_analyses[self.saved_analyses.len() - 1]
    }

    /// Switch tabs.
    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Most recently saved analysis.
    pub fn latest_saved(&self) -> Option<&Analysis> {
        self.saved_analyses.last()
    }

    /// History a new analysis starts from: the latest saved history, or the
    /// default chart when nothing has been saved.
    pub fn carried_history(&self) -> PatientHistory {
        self.latest_saved()
            .map(|a| a.history.clone())
            .unwrap_or_else(simulated::default_history)
    }

    /// Whether there is anything beyond the upload panel to show.
    pub fn has_results(&self) -> bool {
        self.analysis.is_some() || !self.saved_analyses.is_empty()
    }
}

/// History shown on the history and labs tabs.
///
/// The current analysis wins; otherwise the latest saved analysis; otherwise
/// there is nothing to show.
pub fn current_history(state: &ReviewState) -> Option<&PatientHistory> {
    state
        .analysis
        .as_ref()
        .or_else(|| state.latest_saved())
        .map(|a| &a.history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AI_ANALYSIS_REASON;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn analysis(id: &str, history: PatientHistory) -> Analysis {
        simulated::build_analysis(
            id.into(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            None,
            history,
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = ReviewState::new();
        assert_eq!(state.active_tab, Tab::Analysis);
        assert!(!state.is_analyzing);
        assert!(!state.is_saving);
        assert!(state.analysis.is_none());
        assert!(current_history(&state).is_none());
        assert!(!state.has_results());
    }

    #[test]
    fn test_complete_analysis_switches_tab() {
        let mut state = ReviewState::new();
        state.select_tab(Tab::Labs);
        state.begin_analysis();
        assert!(state.is_analyzing);

        state.complete_analysis(analysis("a1", state.carried_history()));

        assert!(!state.is_analyzing);
        assert_eq!(state.active_tab, Tab::Analysis);
        assert_eq!(state.analysis.as_ref().unwrap().id, "a1");
    }

    #[test]
    fn test_begin_save_without_analysis_is_noop() {
        let mut state = ReviewState::new();
        let before = state.clone();

        assert!(state.begin_save().is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_begin_save_twice_is_noop() {
        let mut state = ReviewState::new();
        state.complete_analysis(analysis("a1", state.carried_history()));

        assert!(state.begin_save().is_some());
        assert!(state.is_saving);
        assert!(state.begin_save().is_none());
    }

    #[test]
    fn test_complete_save() {
        let mut state = ReviewState::new();
        state.complete_analysis(analysis("a1", state.carried_history()));
        let snapshot = state.begin_save().unwrap();

        let saved = state.complete_save(&snapshot, today()).clone();

        let visit = saved.history.latest_visit().unwrap();
        assert_eq!(visit.date, "2024-03-01");
        assert_eq!(visit.reason, AI_ANALYSIS_REASON);
        assert_eq!(visit.diagnosis, snapshot.ai_suggestions.diagnosis);
        assert_eq!(visit.treatment, snapshot.ai_suggestions.treatment_summary());

        assert_eq!(state.saved_analyses.len(), 1);
        assert!(state.analysis.is_none());
        assert!(state.selected_image.is_none());
        assert!(!state.is_saving);
        assert_eq!(state.active_tab, Tab::History);
    }

    #[test]
    fn test_current_history_prefers_current_analysis() {
        let mut state = ReviewState::new();
        state.complete_analysis(analysis("a1", state.carried_history()));
        let snapshot = state.begin_save().unwrap();
        state.complete_save(&snapshot, today());

        // Falls back to the latest saved analysis
        assert_eq!(
            current_history(&state).unwrap().previous_visits.len(),
            3
        );

        state.complete_analysis(analysis("a2", PatientHistory::default()));
        assert!(current_history(&state).unwrap().previous_visits.is_empty());
    }

    #[test]
    fn test_carried_history_follows_latest_save() {
        let mut state = ReviewState::new();
        assert_eq!(state.carried_history(), simulated::default_history());

        state.complete_analysis(analysis("a1", state.carried_history()));
        let snapshot = state.begin_save().unwrap();
        state.complete_save(&snapshot, today());

        let carried = state.carried_history();
        assert_eq!(carried.previous_visits.len(), 3);
        assert_eq!(carried.previous_visits[0].reason, AI_ANALYSIS_REASON);
    }

    fn any_tab() -> impl Strategy<Value = Tab> {
        prop::sample::select(Tab::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn select_tab_is_idempotent(first in any_tab(), tab in any_tab()) {
            let mut once = ReviewState::new();
            once.select_tab(first);
            once.select_tab(tab);

            let mut twice = once.clone();
            twice.select_tab(tab);

            prop_assert_eq!(once, twice);
        }
    }
}
