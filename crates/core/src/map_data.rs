//! Temporal/spatial aggregation of responses for map playback.
//!
//! Responses are pinned to coordinates through the form's location item,
//! then bucketed into fixed one-week intervals between the earliest and
//! latest response timestamps. The bucket count is capped; a range that
//! would need more buckets is an error rather than an oversized result.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::hierarchy::{attach_options, ItemNode, OptionNode};
use crate::item::ItemType;
use crate::response_view::ResponseView;
use crate::types::DbId;

/// Fixed bucket width: one week, in milliseconds.
pub const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Hard cap on the number of playback buckets.
pub const MAX_INTERVALS: usize = 100;

/// Optional narrowing of the aggregated responses.
#[derive(Debug, Clone, Default)]
pub struct MapFilter {
    /// Use this location item instead of the form's first one.
    pub location_item_id: Option<DbId>,
    /// Keep only responses that answered this item.
    pub item_id: Option<DbId>,
    /// Keep only responses that picked this option (with `item_id`).
    pub option_id: Option<DbId>,
}

/// A response that survived filtering, with its resolved coordinates and
/// parsed timestamp attached.
#[derive(Debug, Clone, Serialize)]
pub struct MappedResponse {
    #[serde(flatten)]
    pub response: ResponseView,
    pub lat: f64,
    pub lng: f64,
    /// Parsed response timestamp in epoch milliseconds.
    pub timestamp: i64,
}

/// The aggregated map payload.
#[derive(Debug, Serialize)]
pub struct MapData {
    /// The chosen location item; its options are the map-point captions.
    pub location_item: ItemNode,
    /// Choice/scale items usable as per-point captions.
    pub caption_items: Vec<ItemNode>,
    /// Bucket start (epoch ms) to the responses inside that bucket.
    pub intervaled_responses: BTreeMap<i64, Vec<MappedResponse>>,
    pub responses: Vec<MappedResponse>,
}

/// Parse a stored response timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` (also `T`-separated), and a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
    }
    None
}

/// Successive bucket start timestamps covering `[from, to]`.
///
/// The first bucket starts at `from`; further starts step by `width`
/// while they stay strictly below `to`.
pub fn bucket_starts(from: i64, to: i64, width: i64) -> Vec<i64> {
    let mut starts = vec![from];
    let mut next = from;
    loop {
        next += width;
        if next >= to {
            break;
        }
        starts.push(next);
    }
    starts
}

/// Aggregate responses into the map payload.
///
/// Returns `Ok(None)` when no response survives filtering — an empty map
/// is not an error. Responses must already be reduced to their public
/// view; this function only drops the ones that cannot be placed.
pub fn build_map_data(
    mut items: Vec<ItemNode>,
    options: Vec<OptionNode>,
    responses: Vec<ResponseView>,
    filter: &MapFilter,
) -> Result<Option<MapData>, CoreError> {
    attach_options(&mut items, options);

    let location_item = pick_location_item(&items, filter.location_item_id)?;

    let caption_items: Vec<ItemNode> = items
        .iter()
        .filter(|item| {
            matches!(item.item_type, ItemType::Choice | ItemType::Scale)
                && !item.settings.hidden_from_map
        })
        .cloned()
        .collect();

    let mut mappable: Vec<MappedResponse> = responses
        .into_iter()
        .filter(|response| matches_filter(response, filter))
        .filter_map(|response| place_response(response, location_item.id))
        .collect();

    if mappable.is_empty() {
        return Ok(None);
    }

    // Range is computed from explicit timestamp order, never from the
    // caller's list order.
    mappable.sort_by_key(|response| response.timestamp);

    let earliest = mappable[0].timestamp;
    let latest = mappable[mappable.len() - 1].timestamp;
    let starts = bucket_starts(earliest, latest, WEEK_MS);

    if starts.len() > MAX_INTERVALS {
        return Err(CoreError::IntervalTooSmall);
    }

    let mut intervaled: BTreeMap<i64, Vec<MappedResponse>> =
        starts.iter().map(|&start| (start, Vec::new())).collect();

    for response in &mappable {
        // First bucket that can hold the timestamp; at most one per response.
        if let Some(&start) = starts
            .iter()
            .find(|&&start| response.timestamp <= start + WEEK_MS)
        {
            if let Some(bucket) = intervaled.get_mut(&start) {
                bucket.push(response.clone());
            }
        }
    }

    Ok(Some(MapData {
        location_item,
        caption_items,
        intervaled_responses: intervaled,
        responses: mappable,
    }))
}

/// The explicitly requested location item, else the form's first
/// location-choice item.
fn pick_location_item(items: &[ItemNode], requested: Option<DbId>) -> Result<ItemNode, CoreError> {
    let mut location_items = items
        .iter()
        .filter(|item| item.item_type == ItemType::LocationChoice);

    let picked = match requested {
        Some(id) => location_items.find(|item| item.id == id),
        None => location_items.next(),
    };

    picked.cloned().ok_or(CoreError::NoLocationItem)
}

fn matches_filter(response: &ResponseView, filter: &MapFilter) -> bool {
    match (filter.item_id, filter.option_id) {
        (Some(item_id), Some(option_id)) => response
            .items
            .iter()
            .any(|item| item.item_id == item_id && item.option_id == Some(option_id)),
        (Some(item_id), None) => response.items.iter().any(|item| item.item_id == item_id),
        _ => true,
    }
}

/// Resolve a response's coordinates (through the location item's bound
/// option) and its timestamp. Responses missing either are dropped.
fn place_response(response: ResponseView, location_item_id: DbId) -> Option<MappedResponse> {
    let (lat, lng) = response
        .items
        .iter()
        .find(|item| item.item_id == location_item_id)
        .and_then(|item| item.option_settings.as_ref())
        .and_then(|settings| settings.coordinates())?;

    let timestamp = response
        .datetime
        .as_deref()
        .and_then(parse_timestamp_ms)?;

    Some(MappedResponse {
        response,
        lat,
        lng,
        timestamp,
    })
}
