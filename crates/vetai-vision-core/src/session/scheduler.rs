//! Deterministic timer queue for simulated work.

use chrono::{DateTime, Utc};

use crate::image::ImageRef;
use crate::models::Analysis;

/// Work waiting for its delay to elapse.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Finish an analysis started for `image`.
    CompleteAnalysis { image: Option<ImageRef> },
    /// Finish saving the analysis that was current when the save began.
    CompleteSave { analysis: Box<Analysis> },
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompleteAnalysis { .. } => "complete_analysis",
            Self::CompleteSave { .. } => "complete_save",
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: DateTime<Utc>,
    task: Task,
}

/// Pending tasks ordered by due time; ties keep scheduling order.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire at `due`.
    pub fn schedule(&mut self, due: DateTime<Utc>, task: Task) {
        let at = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(at, Scheduled { due, task });
    }

    /// Remove and return every task due at or before `now`, in firing order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<Task> {
        let split = self.pending.partition_point(|s| s.due <= now);
        self.pending.drain(..split).map(|s| s.task).collect()
    }

    /// Earliest due time, if anything is pending.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.first().map(|s| s.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn analysis_task() -> Task {
        Task::CompleteAnalysis { image: None }
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(t0() + Duration::seconds(2), analysis_task());

        assert!(queue.take_due(t0() + Duration::milliseconds(1999)).is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(t0() + Duration::seconds(2)));
    }

    #[test]
    fn test_due_at_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(t0() + Duration::seconds(2), analysis_task());

        let fired = queue.take_due(t0() + Duration::seconds(2));
        assert_eq!(fired.len(), 1);
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_orders_by_due_then_insertion() {
        let mut queue = TimerQueue::new();
        let later = t0() + Duration::seconds(5);
        let sooner = t0() + Duration::seconds(1);

        let analysis = crate::session::simulated::build_analysis(
            "a1".into(),
            t0(),
            None,
            Default::default(),
        );

        queue.schedule(later, analysis_task());
        queue.schedule(sooner, analysis_task());
        queue.schedule(
            later,
            Task::CompleteSave {
                analysis: Box::new(analysis),
            },
        );

        assert_eq!(queue.next_deadline(), Some(sooner));
        let names: Vec<_> = queue.take_due(later).iter().map(Task::name).collect();
        assert_eq!(
            names,
            vec!["complete_analysis", "complete_analysis", "complete_save"]
        );
    }
}
