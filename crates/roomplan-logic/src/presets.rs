//! Furniture and wall-fixture presets.
//!
//! A preset is the template an "add" command instantiates. The built-in
//! catalog covers common bedroom/office pieces; [`parse_presets`] loads an
//! alternative catalog from JSON.
//!
//! ```
//! use roomplan_logic::presets::{furniture_preset, furniture_presets};
//!
//! let bed = furniture_preset("queen_bed").unwrap();
//! assert_eq!((bed.width, bed.height), (60.0, 80.0));
//! assert!(furniture_presets().len() >= 8);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{attachment_defaults as ad, render_heights};
use crate::model::{AttachmentKind, WallAttachment, WallSide};

/// Template for a new furniture item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPreset {
    pub kind: String,
    pub label: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub vertical_extent: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl ItemPreset {
    pub fn new(kind: &str, label: &str, width: f64, height: f64, extent: f64, color: &str) -> Self {
        Self {
            kind: kind.to_string(),
            label: label.to_string(),
            width,
            height,
            vertical_extent: Some(extent),
            color: Some(color.to_string()),
        }
    }

    /// A preset with a non-positive footprint cannot be placed.
    pub fn is_placeable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Built-in furniture catalog (inches).
pub fn furniture_presets() -> Vec<ItemPreset> {
    vec![
        ItemPreset::new("queen_bed", "Queen Bed", 60.0, 80.0, 24.0, "#8d6e63"),
        ItemPreset::new("twin_bed", "Twin Bed", 38.0, 75.0, 24.0, "#a1887f"),
        ItemPreset::new("desk", "Desk", 24.0, 48.0, 30.0, "#6d4c41"),
        ItemPreset::new("dresser", "Dresser", 18.0, 60.0, 34.0, "#795548"),
        ItemPreset::new("nightstand", "Nightstand", 18.0, 18.0, 26.0, "#8d6e63"),
        ItemPreset::new("bookshelf", "Bookshelf", 12.0, 36.0, 72.0, "#5d4037"),
        ItemPreset::new("armchair", "Armchair", 32.0, 34.0, render_heights::FURNITURE_DEFAULT, "#607d8b"),
        ItemPreset::new("sofa", "Sofa", 36.0, 84.0, 32.0, "#546e7a"),
    ]
}

/// Look up a built-in preset by kind.
pub fn furniture_preset(kind: &str) -> Option<ItemPreset> {
    furniture_presets().into_iter().find(|p| p.kind == kind)
}

/// Parse a preset catalog from a JSON array. Presets with a non-positive
/// footprint are dropped with a warning.
pub fn parse_presets(json: &str) -> Result<Vec<ItemPreset>, serde_json::Error> {
    let presets: Vec<ItemPreset> = serde_json::from_str(json)?;
    let (placeable, rejected): (Vec<_>, Vec<_>) =
        presets.into_iter().partition(ItemPreset::is_placeable);
    for p in &rejected {
        log::warn!(
            "Dropping preset '{}' with non-positive footprint {}×{}",
            p.kind,
            p.width,
            p.height
        );
    }
    Ok(placeable)
}

/// Default fixture of the given kind at the start of `side`. The id is a
/// placeholder; [`crate::commands::add_attachment`] assigns the real one.
pub fn attachment_preset(kind: AttachmentKind, side: WallSide) -> WallAttachment {
    let (width, height, elevation, outward_offset) = match kind {
        AttachmentKind::Window => (ad::WINDOW_WIDTH, ad::WINDOW_HEIGHT, ad::WINDOW_ELEVATION, None),
        AttachmentKind::Door => (ad::DOOR_WIDTH, ad::DOOR_HEIGHT, 0.0, None),
        AttachmentKind::Shelf => (
            ad::SHELF_WIDTH,
            ad::SHELF_HEIGHT,
            ad::SHELF_ELEVATION,
            Some(ad::SHELF_DEPTH),
        ),
    };
    WallAttachment {
        id: 0,
        kind,
        side,
        x: 0.0,
        y: elevation,
        width,
        height,
        outward_offset,
    }
}

/// One default fixture of every kind on `side`, for a fixture palette.
pub fn attachment_presets(side: WallSide) -> Vec<WallAttachment> {
    AttachmentKind::all()
        .into_iter()
        .map(|kind| attachment_preset(kind, side))
        .collect()
}
