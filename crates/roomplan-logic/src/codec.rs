//! Transport codec. Layout to a restorable JSON string and back.
//!
//! The string is a versioned envelope around the full [`LayoutState`].
//! Decoding is all-or-nothing: a string that fails to parse or describes an
//! impossible layout never yields a partial state. [`decode_or_default`]
//! is the boundary helper that falls back to an empty layout.
//!
//! A decoded layout satisfies the same invariants the commands keep:
//! positive footprints, attachments on their walls with doors on the floor,
//! and a selection that names an existing object.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::LAYOUT_FORMAT_VERSION;
use crate::model::{LayoutState, Selection};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout version {0}")]
    UnsupportedVersion(u32),
    #[error("room has non-positive dimensions: {0}×{1}")]
    InvalidRoom(f64, f64),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("{kind} #{id} has non-positive size {width}×{height}")]
    DegenerateSize {
        kind: &'static str,
        id: u32,
        width: f64,
        height: f64,
    },
}

fn positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    layout: &'a LayoutState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    layout: LayoutState,
}

/// Serialize a layout, preserving every field.
pub fn encode_layout(layout: &LayoutState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: LAYOUT_FORMAT_VERSION,
        layout,
    })?)
}

/// Parse and check a layout string.
pub fn decode_layout(input: &str) -> Result<LayoutState, CodecError> {
    let envelope: Envelope = serde_json::from_str(input)?;
    if envelope.version != LAYOUT_FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(envelope.version));
    }
    let mut layout = envelope.layout;
    if !layout.room.is_valid() {
        return Err(CodecError::InvalidRoom(layout.room.width, layout.room.height));
    }

    let mut seen = HashSet::new();
    for item in &layout.items {
        if !seen.insert(item.id) {
            return Err(CodecError::DuplicateId {
                kind: "item",
                id: item.id,
            });
        }
        if !(positive(item.width) && positive(item.height)) {
            return Err(CodecError::DegenerateSize {
                kind: "item",
                id: item.id,
                width: item.width,
                height: item.height,
            });
        }
    }

    seen.clear();
    let room = layout.room;
    for a in &mut layout.attachments {
        if !seen.insert(a.id) {
            return Err(CodecError::DuplicateId {
                kind: "attachment",
                id: a.id,
            });
        }
        if !(positive(a.width) && positive(a.height)) {
            return Err(CodecError::DegenerateSize {
                kind: "attachment",
                id: a.id,
                width: a.width,
                height: a.height,
            });
        }
        let (x, y) = (a.x, a.y);
        a.clamp_to_wall(&room);
        if (a.x, a.y) != (x, y) {
            log::warn!(
                "Attachment #{} moved onto its wall: ({}, {}) -> ({}, {})",
                a.id,
                x,
                y,
                a.x,
                a.y
            );
        }
    }

    let dangling = match layout.selection {
        Some(Selection::Item(id)) => layout.item(id).is_none(),
        Some(Selection::Attachment(id)) => layout.attachment(id).is_none(),
        None => false,
    };
    if dangling {
        log::warn!("Clearing selection of missing {:?}", layout.selection);
        layout.selection = None;
    }
    Ok(layout)
}

/// Decode, or log why not and return the default empty layout.
pub fn decode_or_default(input: &str) -> LayoutState {
    match decode_layout(input) {
        Ok(layout) => layout,
        Err(e) => {
            log::warn!("Discarding unreadable layout, starting empty: {}", e);
            LayoutState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add_attachment, add_item, rotate_item, update_item, ItemUpdate};
    use crate::model::{AttachmentKind, Room, WallSide};
    use crate::presets::{attachment_preset, furniture_preset};

    fn sample() -> LayoutState {
        let layout = LayoutState::new(Room::new(108.0, 132.0));
        let layout = add_item(&layout, &furniture_preset("desk").unwrap());
        let layout = rotate_item(&layout, 1);
        let layout = update_item(
            &layout,
            1,
            &ItemUpdate {
                image_ref: Some("img:desk-photo".into()),
                procedural_ref: Some("gen:42".into()),
                ..ItemUpdate::default()
            },
        );
        add_attachment(&layout, &attachment_preset(AttachmentKind::Shelf, WallSide::Right))
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let layout = sample();
        let decoded = decode_layout(&encode_layout(&layout).unwrap()).unwrap();
        assert_eq!(decoded, layout);
        assert_eq!(decoded.selection, Some(Selection::Attachment(1)));
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(decode_or_default("not a layout"), LayoutState::default());
        assert_eq!(decode_or_default(""), LayoutState::default());
    }

    #[test]
    fn test_missing_room_rejected() {
        let err = decode_layout(r#"{"version":1,"layout":{"items":[]}}"#).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn test_bad_rotation_rejected() {
        let input = r#"{"version":1,"layout":{"room":{"width":100,"height":100},
            "items":[{"id":1,"kind":"x","width":1,"height":1,"x":0,"y":0,"rotation":45}]}}"#;
        assert!(decode_layout(input).is_err());
    }

    #[test]
    fn test_version_and_room_checked() {
        let future = r#"{"version":9,"layout":{"room":{"width":100,"height":100}}}"#;
        assert!(matches!(decode_layout(future), Err(CodecError::UnsupportedVersion(9))));
        let flat = r#"{"version":1,"layout":{"room":{"width":0,"height":100}}}"#;
        assert!(matches!(decode_layout(flat), Err(CodecError::InvalidRoom(..))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut layout = sample();
        let copy = layout.items[0].clone();
        layout.items.push(copy);
        let encoded = encode_layout(&layout).unwrap();
        assert!(matches!(
            decode_layout(&encoded),
            Err(CodecError::DuplicateId { kind: "item", id: 1 })
        ));
        assert_eq!(decode_or_default(&encoded), LayoutState::default());
    }

    #[test]
    fn test_degenerate_item_rejected() {
        let input = r#"{"version":1,"layout":{"room":{"width":100,"height":100},
            "items":[{"id":1,"kind":"box","width":-5,"height":0,"x":0,"y":0}]}}"#;
        assert!(matches!(
            decode_layout(input),
            Err(CodecError::DegenerateSize { kind: "item", id: 1, .. })
        ));
        assert_eq!(decode_or_default(input), LayoutState::default());
    }

    #[test]
    fn test_degenerate_attachment_rejected() {
        let input = r#"{"version":1,"layout":{"room":{"width":100,"height":100},
            "attachments":[{"id":3,"kind":"window","side":"back","x":0,"y":30,"width":0,"height":48}]}}"#;
        assert!(matches!(
            decode_layout(input),
            Err(CodecError::DegenerateSize { kind: "attachment", id: 3, .. })
        ));
    }

    #[test]
    fn test_attachments_clamped_onto_walls() {
        let input = r#"{"version":1,"layout":{"room":{"width":100,"height":120},
            "attachments":[
                {"id":1,"kind":"door","side":"front","x":500,"y":40,"width":32,"height":80},
                {"id":2,"kind":"shelf","side":"left","x":-8,"y":-3,"width":30,"height":2}
            ]}}"#;
        let layout = decode_layout(input).unwrap();
        let door = layout.attachment(1).unwrap();
        assert_eq!((door.x, door.y), (68.0, 0.0));
        let shelf = layout.attachment(2).unwrap();
        assert_eq!((shelf.x, shelf.y), (0.0, 0.0));
    }

    #[test]
    fn test_dangling_selection_cleared() {
        let input = r#"{"version":1,"layout":{"room":{"width":100,"height":100},
            "items":[{"id":1,"kind":"box","width":10,"height":10,"x":0,"y":0}],
            "selection":{"kind":"attachment","id":9}}}"#;
        let layout = decode_layout(input).unwrap();
        assert_eq!(layout.selection, None);
        assert_eq!(layout.items.len(), 1);

        let kept = input.replace(r#"{"kind":"attachment","id":9}"#, r#"{"kind":"item","id":1}"#);
        assert_eq!(decode_layout(&kept).unwrap().selection, Some(Selection::Item(1)));
    }
}
