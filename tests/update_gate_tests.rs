use std::sync::Arc;

use chart_lifecycle::api::{
    GateSnapshot, RedrawDecision, RedrawTopic, VizRegistry, VizStrategy, evaluate_redraw,
    should_redraw,
};
use chart_lifecycle::core::{
    AnnotationData, CacheBuster, ChartId, ChartStatus, FormData, QueryResult, RenderInput,
    StatusSnapshot, Viewport,
};
use serde_json::json;

fn ready_input() -> RenderInput {
    RenderInput::new(ChartId::new(11), "dist_bar", Viewport::new(800, 400))
        .with_query_result(Arc::new(QueryResult::new(json!([{"metric": 3}]))))
        .with_annotation_data(Arc::new(AnnotationData(json!({"layer": []}))))
        .with_form_data(Arc::new(
            FormData::new()
                .with_option("viz_type", "dist_bar")
                .with_option("color_scheme", "bnbColors"),
        ))
        .with_cache_buster(CacheBuster::new(1))
}

fn decide(prev: &RenderInput, next: &RenderInput, status: &StatusSnapshot) -> RedrawDecision {
    let prev_status = StatusSnapshot::with_status(ChartStatus::Rendered);
    evaluate_redraw(
        GateSnapshot::new(prev, &prev_status),
        GateSnapshot::new(next, status),
        &VizRegistry::default(),
    )
}

#[test]
fn unchanged_ready_input_is_withheld() {
    let prev = ready_input();
    let next = prev.clone();
    let status = StatusSnapshot::with_status(ChartStatus::Success);

    assert_eq!(decide(&prev, &next, &status), RedrawDecision::Unchanged);
}

#[test]
fn new_query_result_identity_redraws_even_with_equal_content() {
    let prev = ready_input();
    let next = prev
        .clone()
        .with_query_result(Arc::new(QueryResult::new(json!([{"metric": 3}]))));
    let status = StatusSnapshot::with_status(ChartStatus::Rendered);

    match decide(&prev, &next, &status) {
        RedrawDecision::Changed(topics) => {
            assert!(topics.contains(RedrawTopic::QueryResult));
            assert!(!topics.is_cosmetic());
        }
        other => panic!("expected change, got {other:?}"),
    }
}

#[test]
fn each_tracked_field_authorizes_redraw() {
    let prev = ready_input();
    let status = StatusSnapshot::with_status(ChartStatus::Rendered);
    let cases = [
        (
            RedrawTopic::Annotations,
            prev.clone()
                .with_annotation_data(Arc::new(AnnotationData(json!({"layer": []})))),
        ),
        (
            RedrawTopic::Width,
            prev.clone().with_viewport(Viewport::new(801, 400)),
        ),
        (
            RedrawTopic::Height,
            prev.clone().with_viewport(Viewport::new(800, 401)),
        ),
        (RedrawTopic::ForceRender, prev.clone().with_trigger_render(true)),
        (
            RedrawTopic::ColorScheme,
            prev.clone().with_form_data(Arc::new(
                FormData::new()
                    .with_option("viz_type", "dist_bar")
                    .with_option("color_scheme", "lyftColors"),
            )),
        ),
        (
            RedrawTopic::CacheBuster,
            prev.clone().with_cache_buster(CacheBuster::new(2)),
        ),
    ];

    for (topic, next) in cases {
        let decision = decide(&prev, &next, &status);
        assert_eq!(
            decision,
            RedrawDecision::Changed(chart_lifecycle::api::RedrawTopics::from_topic(topic)),
            "{topic:?}"
        );
    }
}

#[test]
fn unrelated_form_option_change_is_ignored() {
    let prev = ready_input();
    let next = prev.clone().with_form_data(Arc::new(
        FormData::new()
            .with_option("viz_type", "dist_bar")
            .with_option("color_scheme", "bnbColors")
            .with_option("show_legend", false),
    ));
    let status = StatusSnapshot::with_status(ChartStatus::Rendered);

    assert_eq!(decide(&prev, &next, &status), RedrawDecision::Unchanged);
}

#[test]
fn not_ready_states_withhold_redraw() {
    let prev = ready_input();
    let next = prev.clone().with_viewport(Viewport::new(100, 100));

    let null_status = StatusSnapshot::default();
    let loading = StatusSnapshot::with_status(ChartStatus::Loading);
    let errored = StatusSnapshot::with_status(ChartStatus::Error);
    let mut overlay = StatusSnapshot::with_status(ChartStatus::Success);
    overlay.refresh_overlay_visible = true;

    for status in [null_status, loading, errored, overlay] {
        assert_eq!(decide(&prev, &next, &status), RedrawDecision::NotReady);
    }

    let mut missing_results = next.clone();
    missing_results.query_result = None;
    let status = StatusSnapshot::with_status(ChartStatus::Success);
    assert_eq!(decide(&prev, &missing_results, &status), RedrawDecision::NotReady);
}

#[test]
fn registered_override_type_always_redraws() {
    let mut registry = VizRegistry::empty();
    registry
        .register("heatmap_live", VizStrategy::always_redraw())
        .expect("register");
    let input = RenderInput::new(ChartId::new(2), "heatmap_live", Viewport::new(10, 10));
    let status = StatusSnapshot::with_status(ChartStatus::Loading);

    assert!(should_redraw(
        GateSnapshot::new(&input, &status),
        GateSnapshot::new(&input, &status),
        &registry,
    ));
}
