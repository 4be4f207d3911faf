//! Spatial model. Room, furniture items, wall attachments, selection.
//!
//! Everything here is plain data in unrotated room space. View rotation is
//! never stored on the model; see [`crate::view`].

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROOM_HEIGHT, DEFAULT_ROOM_WIDTH};
use crate::geometry::Rect;

/// Quarter-turn rotation. Serialized as integer degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn all() -> [Rotation; 4] {
        [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ]
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Rotation> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Next quarter turn clockwise, wrapping 270 → 0.
    pub fn next(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// True for 90 and 270, where width and height trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {}", degrees))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

/// The room: an axis-aligned rectangle with its origin at one corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub width: f64,
    pub height: f64,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROOM_WIDTH,
            height: DEFAULT_ROOM_HEIGHT,
        }
    }
}

impl Room {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Length of the given wall: room width for front/back, height for the sides.
    pub fn wall_length(&self, side: WallSide) -> f64 {
        match side {
            WallSide::Front | WallSide::Back => self.width,
            WallSide::Left | WallSide::Right => self.height,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// A placed piece of furniture.
///
/// `(x, y)` is the unrotated top-left corner; `width`/`height` are the
/// footprint before `rotation` is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: u32,
    pub kind: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: Rotation,
    /// Render height for extruded views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_extent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedural_ref: Option<String>,
}

impl FurnitureItem {
    /// Footprint after the item's own rotation.
    pub fn effective_size(&self) -> (f64, f64) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Effective rectangle in room space.
    pub fn rect(&self) -> Rect {
        let (w, h) = self.effective_size();
        Rect::new(self.x, self.y, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Window,
    Door,
    Shelf,
}

impl AttachmentKind {
    pub fn all() -> [AttachmentKind; 3] {
        [AttachmentKind::Window, AttachmentKind::Door, AttachmentKind::Shelf]
    }

    /// Doors always sit on the floor.
    pub fn is_floor_pinned(self) -> bool {
        matches!(self, AttachmentKind::Door)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallSide {
    Front,
    Back,
    Left,
    Right,
}

impl WallSide {
    pub fn all() -> [WallSide; 4] {
        [WallSide::Front, WallSide::Back, WallSide::Left, WallSide::Right]
    }
}

/// A fixture mounted on one of the four walls.
///
/// `x` runs along the wall, `y` is the height of its bottom edge off the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAttachment {
    pub id: u32,
    pub kind: AttachmentKind,
    pub side: WallSide,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Distance the fixture stands off the wall into the room (shelf depth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outward_offset: Option<f64>,
}

impl WallAttachment {
    /// Clamp into the wall: `x ∈ [0, wall_length - width]`, `y ≥ 0`, doors on
    /// the floor. A wall shorter than the fixture pins `x` to 0.
    pub fn clamp_to_wall(&mut self, room: &Room) {
        let max_x = (room.wall_length(self.side) - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
        self.y = if self.kind.is_floor_pinned() {
            0.0
        } else {
            self.y.max(0.0)
        };
    }
}

/// Current selection. Holding one kind clears the other by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Selection {
    Item(u32),
    Attachment(u32),
}

/// The whole editable layout. This is the unit the transport codec
/// persists and the unit every view and validity function reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutState {
    pub room: Room,
    #[serde(default)]
    pub items: Vec<FurnitureItem>,
    #[serde(default)]
    pub attachments: Vec<WallAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl LayoutState {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            ..Self::default()
        }
    }

    pub fn item(&self, id: u32) -> Option<&FurnitureItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn attachment(&self, id: u32) -> Option<&WallAttachment> {
        self.attachments.iter().find(|a| a.id == id)
    }

    pub fn selected_item_id(&self) -> Option<u32> {
        match self.selection {
            Some(Selection::Item(id)) => Some(id),
            _ => None,
        }
    }

    pub fn selected_attachment_id(&self) -> Option<u32> {
        match self.selection {
            Some(Selection::Attachment(id)) => Some(id),
            _ => None,
        }
    }

    pub fn next_item_id(&self) -> u32 {
        self.items.iter().map(|i| i.id).max().map_or(1, |m| m + 1)
    }

    pub fn next_attachment_id(&self) -> u32 {
        self.attachments.iter().map(|a| a.id).max().map_or(1, |m| m + 1)
    }
}
