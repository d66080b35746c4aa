use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use mail_pipeline_core::{run_series, step_fn, Pipeline, PipelineError, StepSlot};

#[derive(Debug, Clone, Default, PartialEq)]
struct Trail {
    seen: Vec<String>,
    total: u32,
}

type Executed = Arc<Mutex<Vec<&'static str>>>;

fn recording_step(name: &'static str, add: u32, executed: &Executed) -> StepSlot<Trail> {
    let executed = Arc::clone(executed);
    StepSlot::resolved(step_fn(name, move |mut trail: Trail| {
        let executed = Arc::clone(&executed);
        async move {
            executed.lock().expect("poisoned mutex").push(name);
            trail.seen.push(format!("{name}@{}", trail.total));
            trail.total += add;
            Ok(trail)
        }
    }))
}

fn failing_step(name: &'static str, message: &'static str, executed: &Executed) -> StepSlot<Trail> {
    let executed = Arc::clone(executed);
    StepSlot::resolved(step_fn(name, move |_trail: Trail| {
        let executed = Arc::clone(&executed);
        async move {
            executed.lock().expect("poisoned mutex").push(name);
            Err::<Trail, _>(anyhow!(message)).context("while running failing step")
        }
    }))
}

fn executed_names(executed: &Executed) -> Vec<&'static str> {
    executed.lock().expect("poisoned mutex").clone()
}

#[tokio::test]
async fn runs_steps_in_order_threading_each_result_into_the_next() {
    let executed = Executed::default();
    let slots = vec![
        recording_step("first", 1, &executed),
        recording_step("second", 10, &executed),
        recording_step("third", 100, &executed),
    ];

    let trail = run_series(slots, Trail::default())
        .await
        .expect("pipeline should succeed");

    assert_eq!(executed_names(&executed), vec!["first", "second", "third"]);
    assert_eq!(trail.seen, vec!["first@0", "second@1", "third@11"]);
    assert_eq!(trail.total, 111);
}

#[tokio::test]
async fn invalid_slot_fails_before_any_step_runs() {
    let executed = Executed::default();
    let slots = vec![
        recording_step("first", 1, &executed),
        StepSlot::unresolved("42"),
        recording_step("third", 100, &executed),
    ];

    let error = run_series(slots, Trail::default())
        .await
        .expect_err("invalid slot should fail the pipeline");

    assert!(matches!(&error, PipelineError::InvalidStep { index: 1, step } if step == "42"));
    assert!(error.to_string().contains("42"));
    assert!(executed_names(&executed).is_empty());
}

#[tokio::test]
async fn failing_step_stops_the_pipeline_and_keeps_the_original_error() {
    let executed = Executed::default();
    let slots = vec![
        recording_step("first", 1, &executed),
        failing_step("second", "config bucket unreachable", &executed),
        recording_step("third", 100, &executed),
    ];

    let error = run_series(slots, Trail::default())
        .await
        .expect_err("failing step should fail the pipeline");

    assert_eq!(executed_names(&executed), vec!["first", "second"]);
    assert_eq!(error.step_name(), "second");
    let source = error.step_error().expect("step failure should carry its source");
    assert_eq!(source.to_string(), "while running failing step");
    assert_eq!(source.root_cause().to_string(), "config bucket unreachable");
    assert!(format!("{source:?}").contains("config bucket unreachable"));
    assert!(error.to_string().contains("while running failing step"));
}

#[tokio::test]
async fn built_pipeline_holds_no_state_between_runs() {
    let executed = Executed::default();
    let pipeline = Pipeline::new(vec![
        recording_step("first", 2, &executed),
        recording_step("second", 3, &executed),
    ])
    .expect("valid pipeline");

    let first = pipeline.run(Trail::default()).await.expect("first run");
    let second = pipeline.run(Trail::default()).await.expect("second run");

    assert_eq!(first, second);
    assert_eq!(first.total, 5);
    assert_eq!(executed_names(&executed).len(), 4);
}
