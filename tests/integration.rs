//! End-to-end tests for the goalmatch engine.
//!
//! These exercise the pipeline a caller actually runs: build actions and
//! goals, infer relationships, triage them, and confirm or manually assign
//! the ones a human reviewed.

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Duration, Utc};

use goalmatch::config::MatchConfig;
use goalmatch::inference::{InferenceEngine, infer_for_period, quick_infer};
use goalmatch::lifecycle::{confirm, create_manual, replace_by_id};
use goalmatch::model::{Action, ActionabilityHints, Goal, MatchMethod, MatchSignal};
use goalmatch::triage::filter_ambiguous;

fn today() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-11-03T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Goal active from a week ago to a week ahead, tracking one metric.
fn fortnight_goal() -> Goal {
    Goal::new("Run 40km this fortnight")
        .with_window(today() - Duration::days(7), today() + Duration::days(7))
        .with_target("km", 40.0)
}

fn keyword_goal(keywords: &[&str]) -> Goal {
    fortnight_goal().with_hints(ActionabilityHints::new(["km"], keywords))
}

fn run_today() -> Action {
    Action::new("Morning run along the river", today()).with_measure("km", 5.0)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ── Scoring scenarios ──────────────────────────────────────────────────

#[test]
fn scenario_a_full_evidence_scores_one() {
    let engine = InferenceEngine::new();
    let eval = engine.evaluate(&run_today(), &keyword_goal(&["run"]));

    assert!(eval.outcome.is_match);
    assert_close(eval.outcome.overall_confidence, 1.0);
    assert_eq!(eval.keyword_match, Some(true));
}

#[test]
fn scenario_b_outside_window_never_matches() {
    let engine = InferenceEngine::new();
    let stale = Action::new("Morning run", today() - Duration::days(30)).with_measure("km", 5.0);
    let goal = keyword_goal(&["run"]);

    let eval = engine.evaluate(&stale, &goal);
    assert!(!eval.outcome.is_match);
    assert_eq!(eval.outcome.overall_confidence, 0.0);
    assert!(eval.metric.has_overlap, "metric evidence alone does not rescue it");

    assert!(engine.infer_pair(&stale, &goal, false).is_none());
}

#[test]
fn scenario_c_no_keyword_filter_scores_point_six() {
    let eval = InferenceEngine::new().evaluate(&run_today(), &fortnight_goal());
    assert!(eval.outcome.is_match);
    assert_close(eval.outcome.overall_confidence, 0.6);
    assert_eq!(eval.keyword_match, None);
}

#[test]
fn scenario_d_keyword_miss_still_matches_at_half() {
    let eval = InferenceEngine::new().evaluate(&run_today(), &keyword_goal(&["swim"]));
    assert!(eval.outcome.is_match);
    assert_close(eval.outcome.overall_confidence, 0.5);
    assert_eq!(eval.keyword_match, Some(false));
}

// ── Review flow ────────────────────────────────────────────────────────

#[test]
fn infer_triage_confirm_flow() {
    let engine = InferenceEngine::new();
    let focused = keyword_goal(&["run"]);
    let open_goal = Goal::new("Move more").with_target("km", 100.0).with_target("steps", 1e5);

    let run = run_today();
    let matches = engine.infer_matches(
        std::slice::from_ref(&run),
        &[focused.clone(), open_goal],
        true,
    );
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.match_method == MatchMethod::AutoInferred));
    assert!(matches.iter().all(|m| m.contribution == 5.0));

    let mut triaged = filter_ambiguous(matches, 0.7);
    assert_eq!(triaged.confident.len(), 1);
    assert!(triaged.confident[0].links(run.id, focused.id));
    assert_eq!(
        triaged.confident[0].matched_on,
        BTreeSet::from([MatchSignal::Period, MatchSignal::Unit, MatchSignal::Description])
    );

    // Half the open goal's metrics are evidenced: (0.5 + 0.25) × 0.6.
    assert_eq!(triaged.ambiguous.len(), 1);
    let pending = triaged.ambiguous[0].clone();
    assert_close(pending.confidence, 0.45);

    let confirmed = confirm(&pending);
    assert!(replace_by_id(&mut triaged.ambiguous, confirmed.clone()));
    assert_eq!(triaged.ambiguous.len(), 1);
    assert_eq!(triaged.ambiguous[0].id, pending.id);
    assert_eq!(triaged.ambiguous[0].match_method, MatchMethod::UserConfirmed);
    assert_eq!(confirm(&confirmed), confirmed);
}

#[test]
fn manual_assignment_for_unmatched_action() {
    let reading = Action::new("Chapter 3", today()).with_measure("pages", 30.0);
    let goal = fortnight_goal();

    assert!(quick_infer(std::slice::from_ref(&reading), std::slice::from_ref(&goal)).is_empty());

    let manual = create_manual(&reading, &goal, Some(2.0)).unwrap();
    assert_eq!(manual.match_method, MatchMethod::Manual);
    assert_eq!(manual.confidence, 1.0);
    assert_eq!(manual.contribution, 2.0);
    assert!(manual.matched_on.is_empty());
}

#[test]
fn malformed_hints_fall_back_to_unit_matching() {
    let goal = Goal::new("Run 40km")
        .with_window(today() - Duration::days(7), today() + Duration::days(7))
        .with_target("km", 40.0)
        .with_actionability_json("{\"units\": [\"km\"], \"keywords\": ");
    assert!(goal.hints.is_none());

    let eval = InferenceEngine::new().evaluate(&run_today(), &goal);
    assert!(eval.outcome.is_match);
    assert_close(eval.outcome.overall_confidence, 0.6);
}

// ── Batch behaviour ────────────────────────────────────────────────────

#[test]
fn sharded_and_sequential_runs_agree() {
    let goals: Vec<Goal> = (0..8)
        .map(|i| {
            let goal = if i % 2 == 0 { keyword_goal(&["run"]) } else { fortnight_goal() };
            goal.with_target("minutes", 300.0)
        })
        .collect();
    let actions: Vec<Action> = (0..64)
        .map(|i| {
            Action::new(if i % 3 == 0 { "run" } else { "walk" }, today() + Duration::hours(i))
                .with_measure("km", i as f64)
        })
        .collect();

    let key = |m: &goalmatch::model::ActionGoalRelationship| {
        (m.action_id, m.goal_id, (m.confidence * 1e6) as i64)
    };

    let mut sequential: Vec<_> = InferenceEngine::new()
        .with_parallelism(false, 0)
        .infer_matches(&actions, &goals, true)
        .iter()
        .map(key)
        .collect();
    let mut sharded: Vec<_> = InferenceEngine::new()
        .with_parallelism(true, 1)
        .infer_matches(&actions, &goals, true)
        .iter()
        .map(key)
        .collect();

    sequential.sort();
    sharded.sort();
    assert_eq!(sequential, sharded);
    assert_eq!(sequential.len(), actions.len() * goals.len());
}

#[test]
fn cancelled_run_stops_early() {
    let actions: Vec<Action> = (0..10).map(|_| run_today()).collect();
    let goals = [fortnight_goal()];
    let engine = InferenceEngine::new().with_chunk_size(2);

    let cancel = AtomicBool::new(true);
    assert!(engine.infer_matches_cancellable(&actions, &goals, true, &cancel).is_empty());

    let cancel = AtomicBool::new(false);
    assert_eq!(engine.infer_matches_cancellable(&actions, &goals, true, &cancel).len(), 10);
}

#[test]
fn configured_policy_changes_scores() {
    let mut config = MatchConfig::default();
    config.scoring.no_keyword_factor = 0.8;
    config.validate().unwrap();

    let actions = [run_today()];
    let goals = [fortnight_goal()];
    let session = infer_for_period(
        &config.engine(),
        &actions,
        &goals,
        today() - Duration::days(1),
        today() + Duration::days(1),
        config.confidence_threshold,
    );
    assert_eq!(session.confident.len(), 1);
    assert_close(session.confident[0].confidence, 0.8);
}
