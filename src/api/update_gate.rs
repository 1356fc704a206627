//! Pure redraw decision between two consecutive input snapshots.
//!
//! Rules are evaluated in order and the first match wins:
//! 1. visualization types registered as always-redraw authorize unconditionally,
//! 2. inputs whose results are not displayable withhold the redraw,
//! 3. otherwise a redraw happens iff a tracked field changed.

use serde::{Deserialize, Serialize};

use crate::core::{RenderInput, StatusSnapshot, same_payload};

use super::{RedrawTopic, RedrawTopics, VizRegistry};

/// One side of a gate evaluation: the input plus the status it was seen with.
#[derive(Debug, Clone, Copy)]
pub struct GateSnapshot<'a> {
    pub input: &'a RenderInput,
    pub status: &'a StatusSnapshot,
}

impl<'a> GateSnapshot<'a> {
    #[must_use]
    pub fn new(input: &'a RenderInput, status: &'a StatusSnapshot) -> Self {
        Self { input, status }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "topics")]
pub enum RedrawDecision {
    /// The visualization type redraws on every update cycle.
    TypeOverride,
    /// Results are missing, failed, still loading, or covered by the refresh overlay.
    NotReady,
    Changed(RedrawTopics),
    Unchanged,
}

impl RedrawDecision {
    #[must_use]
    pub const fn is_redraw(self) -> bool {
        matches!(self, Self::TypeOverride | Self::Changed(_))
    }
}

#[must_use]
pub fn evaluate_redraw(
    prev: GateSnapshot<'_>,
    next: GateSnapshot<'_>,
    registry: &VizRegistry,
) -> RedrawDecision {
    if registry.requires_unconditional_redraw(&next.input.viz_type) {
        return RedrawDecision::TypeOverride;
    }
    if !results_ready(next) {
        return RedrawDecision::NotReady;
    }
    let topics = changed_topics(prev.input, next.input);
    if topics.is_none() {
        RedrawDecision::Unchanged
    } else {
        RedrawDecision::Changed(topics)
    }
}

#[must_use]
pub fn should_redraw(prev: GateSnapshot<'_>, next: GateSnapshot<'_>, registry: &VizRegistry) -> bool {
    evaluate_redraw(prev, next, registry).is_redraw()
}

#[must_use]
pub fn results_ready(snapshot: GateSnapshot<'_>) -> bool {
    snapshot.input.query_result.is_some()
        && snapshot.status.status.is_some_and(|status| status.is_displayable())
        && !snapshot.input.query_result_has_error()
        && !snapshot.status.refresh_overlay_visible
}

/// Tracked fields that differ between `prev` and `next`.
///
/// Payloads compare by identity; the force flag counts whenever `next` sets it.
#[must_use]
pub fn changed_topics(prev: &RenderInput, next: &RenderInput) -> RedrawTopics {
    RedrawTopics::none()
        .with_topic_if(
            RedrawTopic::QueryResult,
            !same_payload(&prev.query_result, &next.query_result),
        )
        .with_topic_if(
            RedrawTopic::Annotations,
            !same_payload(&prev.annotation_data, &next.annotation_data),
        )
        .with_topic_if(RedrawTopic::Width, prev.viewport.width != next.viewport.width)
        .with_topic_if(RedrawTopic::Height, prev.viewport.height != next.viewport.height)
        .with_topic_if(RedrawTopic::ForceRender, next.trigger_render)
        .with_topic_if(
            RedrawTopic::ColorScheme,
            prev.form_data.color_scheme() != next.form_data.color_scheme(),
        )
        .with_topic_if(RedrawTopic::CacheBuster, prev.cache_buster != next.cache_buster)
}
