//! Browser-facing bridge over `timeline_core`.
//!
//! # Responsibility
//! - Expose layout and interval generation to the web UI via `wasm-bindgen`.
//! - Speak JSON strings so the UI keeps its plain event objects.
//!
//! # Invariants
//! - Exported functions never panic and never return `Err` to JavaScript.
//! - Every response is a JSON envelope `{ ok, items, message }`.

use log::warn;
use serde::{Deserialize, Serialize};
use timeline_core::{
    core_version as core_version_inner, parse_timeline_date, ping as ping_inner, EventOffset,
    IntervalGenerator, IntervalType, LayoutEngine, Orientation, TimelineBounds, TimelineEvent,
    TimelineId,
};
use wasm_bindgen::prelude::wasm_bindgen;

/// Response envelope shared by every JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse<T> {
    pub ok: bool,
    pub items: Vec<T>,
    pub message: String,
}

impl<T> BridgeResponse<T> {
    fn success(items: Vec<T>) -> Self {
        let message = format!("{} item(s).", items.len());
        Self {
            ok: true,
            items,
            message,
        }
    }

    fn failure(message: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            ok: false,
            items,
            message: message.into(),
        }
    }
}

/// Layout request as posted by the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    #[serde(default)]
    pub orientation: Option<String>,
    pub start: String,
    pub end: String,
    /// Rendered axis length; omitted means the assumed canvas size.
    #[serde(default)]
    pub canvas_extent_px: Option<f64>,
    #[serde(default)]
    pub events: Vec<EventInput>,
}

/// Layout-relevant subset of a UI event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    /// Opaque UI identifier, echoed back untouched.
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub x_offset: Option<f64>,
    #[serde(default)]
    pub y_offset: Option<f64>,
    #[serde(default)]
    pub auto_layouted: bool,
}

/// Position of one event after layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPosition {
    pub id: String,
    pub x_offset: Option<f64>,
    pub y_offset: Option<f64>,
    pub auto_layouted: bool,
    pub auto_offset_perpendicular: Option<f64>,
    pub auto_offset_axis: Option<f64>,
}

/// Interval tick as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickItem {
    pub date: String,
    pub position_percent: f64,
    pub label: String,
}

/// Interval type option for the settings picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalOption {
    pub kind: String,
    pub tick_count: u64,
    pub available: bool,
}

#[wasm_bindgen]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[wasm_bindgen]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Runs auto layout over a JSON `LayoutRequest`.
///
/// On malformed bounds the events are echoed back unchanged with `ok = false`.
#[wasm_bindgen]
pub fn layout_events_json(request_json: &str) -> String {
    to_json(&layout_events_response(request_json))
}

/// Generates interval ticks; invalid bounds or type yield an empty list.
#[wasm_bindgen]
pub fn generate_intervals_json(
    start: &str,
    end: &str,
    interval_type: &str,
    even_count: Option<u32>,
) -> String {
    to_json(&generate_intervals_response(start, end, interval_type, even_count))
}

/// Lists interval types with their tick counts and availability.
///
/// `even_count` only changes the count reported for `even`.
#[wasm_bindgen]
pub fn available_intervals_json(start: &str, end: &str, even_count: Option<u32>) -> String {
    let response = match parse_bounds(start, end) {
        Some(bounds) => BridgeResponse::success(
            IntervalGenerator::default()
                .availability(&bounds, even_count)
                .into_iter()
                .map(|entry| IntervalOption {
                    kind: entry.kind.as_str().to_string(),
                    tick_count: entry.tick_count,
                    available: entry.available,
                })
                .collect(),
        ),
        None => BridgeResponse::failure("invalid timeline bounds", Vec::new()),
    };
    to_json(&response)
}

fn layout_events_response(request_json: &str) -> BridgeResponse<EventPosition> {
    let request: LayoutRequest = match serde_json::from_str(request_json) {
        Ok(request) => request,
        Err(err) => {
            warn!("event=bridge_layout module=wasm status=error error_code=bad_request error={err}");
            return BridgeResponse::failure(format!("layout_events failed: {err}"), Vec::new());
        }
    };

    let orientation = match request.orientation.as_deref() {
        None => Orientation::default(),
        Some(value) => match value.parse::<Orientation>() {
            Ok(orientation) => orientation,
            Err(err) => {
                return BridgeResponse::failure(
                    format!("layout_events failed: {err}"),
                    echo_positions(&request.events),
                );
            }
        },
    };

    let Some(bounds) = parse_bounds(&request.start, &request.end) else {
        return BridgeResponse::failure(
            "layout_events failed: invalid timeline bounds",
            echo_positions(&request.events),
        );
    };

    let events = request
        .events
        .iter()
        .map(to_timeline_event)
        .collect::<Vec<_>>();
    let mut engine = LayoutEngine::default();
    if let Some(extent) = request.canvas_extent_px {
        engine = engine.with_canvas_extent(extent);
    }

    let positions = request
        .events
        .iter()
        .zip(engine.layout(&events, orientation, &bounds))
        .map(|(input, event)| EventPosition {
            id: input.id.clone(),
            x_offset: event.offset.map(|offset| offset.x),
            y_offset: event.offset.map(|offset| offset.y),
            auto_layouted: event.auto_layouted,
            auto_offset_perpendicular: event.auto_offset.map(|auto| auto.perpendicular),
            auto_offset_axis: event.auto_offset.map(|auto| auto.axis),
        })
        .collect();
    BridgeResponse::success(positions)
}

fn generate_intervals_response(
    start: &str,
    end: &str,
    interval_type: &str,
    even_count: Option<u32>,
) -> BridgeResponse<TickItem> {
    let kind = match interval_type.parse::<IntervalType>() {
        Ok(kind) => kind,
        Err(err) => {
            return BridgeResponse::failure(format!("generate_intervals failed: {err}"), Vec::new());
        }
    };

    let ticks = IntervalGenerator::default().generate_from_parts(
        parse_timeline_date(start),
        parse_timeline_date(end),
        kind,
        even_count,
    );
    if ticks.is_empty() {
        return BridgeResponse::failure("invalid timeline bounds", Vec::new());
    }

    BridgeResponse::success(
        ticks
            .into_iter()
            .map(|tick| TickItem {
                date: tick.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
                position_percent: tick.position_percent,
                label: tick.label,
            })
            .collect(),
    )
}

fn parse_bounds(start: &str, end: &str) -> Option<TimelineBounds> {
    TimelineBounds::from_parts(parse_timeline_date(start), parse_timeline_date(end))
}

fn to_timeline_event(input: &EventInput) -> TimelineEvent {
    let date = input.date.as_deref().and_then(parse_timeline_date);
    let mut event = TimelineEvent::new(TimelineId::nil(), input.id.as_str(), date);
    if let (Some(x), Some(y)) = (input.x_offset, input.y_offset) {
        event.offset = Some(EventOffset { x, y });
        event.auto_layouted = input.auto_layouted;
    }
    event
}

fn echo_positions(events: &[EventInput]) -> Vec<EventPosition> {
    events
        .iter()
        .map(|input| EventPosition {
            id: input.id.clone(),
            x_offset: input.x_offset,
            y_offset: input.y_offset,
            auto_layouted: input.auto_layouted,
            auto_offset_perpendicular: None,
            auto_offset_axis: None,
        })
        .collect()
}

fn to_json<T: Serialize>(response: &BridgeResponse<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        format!(r#"{{"ok":false,"items":[],"message":"serialization failed: {err}"}}"#)
    })
}
