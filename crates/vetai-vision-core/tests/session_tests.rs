//! Review session integration tests.
//!
//! Drive the session through upload, analysis and save on a manual clock.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use vetai_vision_core::models::AI_ANALYSIS_REASON;
use vetai_vision_core::view::TabBody;
use vetai_vision_core::{
    ImageRef, ManualClock, ReviewSession, SessionConfig, Severity, Tab,
};

fn xray() -> ImageRef {
    ImageRef::from_bytes(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a], "image/png").unwrap()
}

fn session() -> (ReviewSession<ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    let session = ReviewSession::with_clock(SessionConfig::default(), clock.clone());
    (session, clock)
}

/// Upload and wait out the analysis delay.
fn analyzed() -> (ReviewSession<ManualClock>, ManualClock) {
    let (mut session, clock) = session();
    session.upload_image(Some(xray()));
    clock.advance(Duration::seconds(2));
    session.poll();
    (session, clock)
}

fn save(session: &mut ReviewSession<ManualClock>, clock: &ManualClock) {
    session.save_analysis();
    clock.advance(Duration::seconds(1));
    session.poll();
}

#[test]
fn test_upload_eventually_produces_analysis() {
    let (mut session, clock) = session();

    session.upload_image(Some(xray()));
    assert!(session.state().is_analyzing);
    assert!(session.state().analysis.is_none());
    assert!(session.state().selected_image.is_some());

    // Not yet
    clock.advance(Duration::milliseconds(1999));
    assert_eq!(session.poll(), 0);
    assert!(session.state().is_analyzing);

    clock.advance(Duration::milliseconds(1));
    assert_eq!(session.poll(), 1);

    let state = session.state();
    assert!(!state.is_analyzing);
    assert_eq!(state.active_tab, Tab::Analysis);
    let analysis = state.analysis.as_ref().unwrap();
    assert_eq!(analysis.findings.len(), 3);
    assert_eq!(analysis.image_url.as_ref(), Some(&xray()));
    assert_eq!(analysis.timestamp, clock_now(&clock));
    assert!(session.is_idle());
}

fn clock_now(clock: &ManualClock) -> chrono::DateTime<Utc> {
    use vetai_vision_core::Clock;
    clock.now()
}

#[test]
fn test_empty_image_still_analyzed() {
    let (mut session, clock) = session();
    let empty = ImageRef::from_bytes(&[], "image/png").unwrap();

    session.upload_image(Some(empty.clone()));
    assert!(session.state().is_analyzing);
    assert!(session.next_deadline().is_some());

    clock.advance(Duration::seconds(2));
    assert_eq!(session.poll(), 1);
    let analysis = session.state().analysis.as_ref().unwrap();
    assert_eq!(analysis.image_url.as_ref(), Some(&empty));

    // Saved analyses with an empty image survive a JSON round trip
    let json = serde_json::to_string(analysis).unwrap();
    assert!(json.contains(r#""imageUrl":"data:image/png;base64,""#));
    let back: vetai_vision_core::Analysis = serde_json::from_str(&json).unwrap();
    assert_eq!(back.image_url, Some(empty));
}

#[test]
fn test_dismissed_upload_is_ignored() {
    let (mut session, _clock) = session();

    session.upload_image(None);

    assert!(!session.state().is_analyzing);
    assert!(session.state().selected_image.is_none());
    assert!(session.is_idle());
}

#[test]
fn test_save_moves_analysis_into_history() {
    let (mut session, clock) = analyzed();
    let diagnosis = session
        .state()
        .analysis
        .as_ref()
        .unwrap()
        .ai_suggestions
        .diagnosis
        .clone();

    session.save_analysis();
    assert!(session.state().is_saving);
    assert_eq!(session.state().saved_analyses.len(), 0);

    clock.advance(Duration::seconds(1));
    session.poll();

    let state = session.state();
    assert_eq!(state.saved_analyses.len(), 1);
    assert!(state.analysis.is_none());
    assert!(state.selected_image.is_none());
    assert!(!state.is_saving);
    assert_eq!(state.active_tab, Tab::History);

    let newest = &state.saved_analyses[0].history.previous_visits[0];
    assert_eq!(newest.reason, AI_ANALYSIS_REASON);
    assert_eq!(newest.diagnosis, diagnosis);
    assert_eq!(newest.date, "2024-03-01");
}

#[test]
fn test_save_without_analysis_is_noop() {
    let (mut session, clock) = session();

    session.save_analysis();
    clock.advance(Duration::seconds(5));

    assert_eq!(session.poll(), 0);
    assert!(!session.state().is_saving);
    assert!(session.state().saved_analyses.is_empty());
}

#[test]
fn test_double_save_records_once() {
    let (mut session, clock) = analyzed();

    session.save_analysis();
    session.save_analysis();
    clock.advance(Duration::seconds(1));

    assert_eq!(session.poll(), 1);
    assert_eq!(session.state().saved_analyses.len(), 1);
}

#[test]
fn test_history_carries_forward_between_analyses() {
    let (mut session, clock) = analyzed();
    save(&mut session, &clock);

    session.upload_image(Some(xray()));
    clock.advance(Duration::seconds(2));
    session.poll();

    // New analysis starts from the saved history
    let current = session.current_history().unwrap();
    assert_eq!(current.previous_visits.len(), 3);

    clock.advance(Duration::days(1));
    save(&mut session, &clock);

    let state = session.state();
    assert_eq!(state.saved_analyses.len(), 2);
    let visits = &state.saved_analyses[1].history.previous_visits;
    assert_eq!(visits.len(), 4);
    assert_eq!(visits[0].date, "2024-03-02");
    assert_eq!(visits[1].date, "2024-03-01");
    assert!(visits[..2].iter().all(|v| v.reason == AI_ANALYSIS_REASON));
    assert_eq!(visits[2].reason, "Annual checkup");

    // Lab results and medications are carried untouched
    assert_eq!(state.saved_analyses[1].history.lab_results.len(), 2);
    assert_eq!(state.saved_analyses[1].history.medications.len(), 1);
}

#[test]
fn test_current_history_without_active_analysis() {
    let (mut session, clock) = session();
    assert!(session.current_history().is_none());

    session.upload_image(Some(xray()));
    clock.advance(Duration::seconds(2));
    session.poll();
    save(&mut session, &clock);

    assert!(session.state().analysis.is_none());
    let history = session.current_history().unwrap();
    assert_eq!(history.previous_visits[0].reason, AI_ANALYSIS_REASON);

    session.select_tab(Tab::Labs);
    assert!(matches!(session.view().body, Some(TabBody::Labs(_))));
}

#[test]
fn test_next_deadline_tracks_pending_work() {
    let (mut session, clock) = session();
    assert!(session.next_deadline().is_none());

    session.upload_image(Some(xray()));
    assert_eq!(
        session.next_deadline(),
        Some(clock_now(&clock) + Duration::seconds(2))
    );
}

#[test]
fn test_immediate_config_completes_on_next_poll() {
    let clock = ManualClock::new(Utc::now());
    let mut session = ReviewSession::with_clock(SessionConfig::immediate(), clock);

    session.upload_image(Some(xray()));
    assert_eq!(session.poll(), 1);
    session.save_analysis();
    assert_eq!(session.poll(), 1);

    assert_eq!(session.state().saved_analyses.len(), 1);
}

#[test]
fn test_view_follows_session() {
    let (mut session, clock) = session();
    session.upload_image(Some(xray()));
    assert!(session.view().progress.is_some());

    clock.advance(Duration::seconds(2));
    session.poll();

    let view = session.view();
    assert!(view.progress.is_none());
    let Some(TabBody::Analysis(body)) = view.body else {
        panic!("expected analysis body");
    };
    assert!(body
        .findings
        .iter()
        .all(|f| matches!(f.tone, Severity::Low | Severity::Medium | Severity::High)));
    assert_eq!(view.header.save_button.unwrap().label, "Save Diagnostic");
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Upload,
    Save,
    Tab(Tab),
    Wait(i64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Upload),
        Just(Action::Save),
        prop::sample::select(Tab::ALL.to_vec()).prop_map(Action::Tab),
        (0i64..3000).prop_map(Action::Wait),
    ]
}

proptest! {
    #[test]
    fn saved_count_never_decreases_and_confidences_stay_bounded(
        actions in prop::collection::vec(action(), 1..40)
    ) {
        let (mut session, clock) = session();
        let mut saved = 0;

        for action in actions {
            match action {
                Action::Upload => session.upload_image(Some(xray())),
                Action::Save => session.save_analysis(),
                Action::Tab(tab) => session.select_tab(tab),
                Action::Wait(ms) => clock.advance(Duration::milliseconds(ms)),
            }
            session.poll();

            let state = session.state();
            prop_assert!(state.saved_analyses.len() >= saved);
            prop_assert!(state.saved_analyses.len() <= saved + 1);
            saved = state.saved_analyses.len();

            if let Some(analysis) = &state.analysis {
                for finding in &analysis.findings {
                    prop_assert!((0.0..=1.0).contains(&finding.confidence));
                }
            }
        }
    }
}
