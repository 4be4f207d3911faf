//! Layout commands. The only way the spatial model changes.
//!
//! Every command is a pure function from `&LayoutState` to a new
//! `LayoutState`. Commands never enforce validity: resizing the room or
//! moving an item may leave the layout out of bounds or overlapping, and
//! [`crate::validity`] reports that separately.
//!
//! Commands that name an unknown id return an unchanged copy.
//!
//! ```
//! use roomplan_logic::commands::{add_item, move_item};
//! use roomplan_logic::model::{LayoutState, Room};
//! use roomplan_logic::presets::furniture_preset;
//!
//! let layout = LayoutState::new(Room::new(108.0, 132.0));
//! let bed = furniture_preset("queen_bed").unwrap();
//! let layout = add_item(&layout, &bed);
//! let id = layout.items[0].id;
//! let layout = move_item(&layout, id, 10.0, 10.0);
//! assert_eq!((layout.items[0].x, layout.items[0].y), (10.0, 10.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DUPLICATE_OFFSET;
use crate::model::{FurnitureItem, LayoutState, Rotation, Selection, WallAttachment, WallSide};
use crate::presets::ItemPreset;

/// Partial room resize. `None` leaves the dimension alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Partial item edit for resize/recolor/reference changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub vertical_extent: Option<f64>,
    pub color: Option<String>,
    pub image_ref: Option<String>,
    pub procedural_ref: Option<String>,
}

/// Partial attachment edit. The result is clamped onto its wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentUpdate {
    pub side: Option<WallSide>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub outward_offset: Option<f64>,
}

/// A queued layout command, as issued by a UI command source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutCommand {
    AddItem { preset: ItemPreset },
    MoveItem { id: u32, x: f64, y: f64 },
    RotateItem { id: u32 },
    UpdateItem { id: u32, update: ItemUpdate },
    DeleteItem { id: u32 },
    DuplicateItem { id: u32 },
    ResizeRoom { update: RoomUpdate },
    AddAttachment { attachment: WallAttachment },
    UpdateAttachment { id: u32, update: AttachmentUpdate },
    DeleteAttachment { id: u32 },
    Select { id: Option<u32> },
    SelectAttachment { id: Option<u32> },
}

/// Apply one command.
pub fn apply_command(layout: &LayoutState, command: &LayoutCommand) -> LayoutState {
    log::debug!("Applying {:?}", command);
    match command {
        LayoutCommand::AddItem { preset } => add_item(layout, preset),
        LayoutCommand::MoveItem { id, x, y } => move_item(layout, *id, *x, *y),
        LayoutCommand::RotateItem { id } => rotate_item(layout, *id),
        LayoutCommand::UpdateItem { id, update } => update_item(layout, *id, update),
        LayoutCommand::DeleteItem { id } => delete_item(layout, *id),
        LayoutCommand::DuplicateItem { id } => duplicate_item(layout, *id),
        LayoutCommand::ResizeRoom { update } => resize_room(layout, *update),
        LayoutCommand::AddAttachment { attachment } => add_attachment(layout, attachment),
        LayoutCommand::UpdateAttachment { id, update } => update_attachment(layout, *id, *update),
        LayoutCommand::DeleteAttachment { id } => delete_attachment(layout, *id),
        LayoutCommand::Select { id } => select(layout, *id),
        LayoutCommand::SelectAttachment { id } => select_attachment(layout, *id),
    }
}

fn positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

// ── Items ───────────────────────────────────────────────────────────────

/// Add a new item from `preset`, centered in the room on whole units, and
/// select it. A preset with a non-positive footprint is rejected.
pub fn add_item(layout: &LayoutState, preset: &ItemPreset) -> LayoutState {
    let mut next = layout.clone();
    if !preset.is_placeable() {
        log::warn!("Rejected preset '{}' with degenerate footprint", preset.kind);
        return next;
    }
    let id = layout.next_item_id();
    let room = layout.room;
    next.items.push(FurnitureItem {
        id,
        kind: preset.kind.clone(),
        width: preset.width,
        height: preset.height,
        x: ((room.width - preset.width) / 2.0).round(),
        y: ((room.height - preset.height) / 2.0).round(),
        rotation: Rotation::Deg0,
        vertical_extent: preset.vertical_extent,
        color: preset.color.clone(),
        image_ref: None,
        procedural_ref: None,
    });
    next.selection = Some(Selection::Item(id));
    next
}

/// Set an item's unrotated top-left corner.
pub fn move_item(layout: &LayoutState, id: u32, x: f64, y: f64) -> LayoutState {
    let mut next = layout.clone();
    if !(x.is_finite() && y.is_finite()) {
        log::warn!("Ignored non-finite move of item #{} to ({}, {})", id, x, y);
        return next;
    }
    if let Some(item) = next.items.iter_mut().find(|i| i.id == id) {
        item.x = x;
        item.y = y;
    }
    next
}

/// Toggle the item between 0° and 90°. An item already carrying a half turn
/// toggles between 180° and 270°.
pub fn rotate_item(layout: &LayoutState, id: u32) -> LayoutState {
    let mut next = layout.clone();
    if let Some(item) = next.items.iter_mut().find(|i| i.id == id) {
        item.rotation = match item.rotation {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg180,
        };
    }
    next
}

/// Resize, recolor, or retarget an item's visual references.
pub fn update_item(layout: &LayoutState, id: u32, update: &ItemUpdate) -> LayoutState {
    let mut next = layout.clone();
    let Some(item) = next.items.iter_mut().find(|i| i.id == id) else {
        return next;
    };
    for (field, value, slot) in [
        ("width", update.width, &mut item.width),
        ("height", update.height, &mut item.height),
    ] {
        match value {
            Some(v) if positive(v) => *slot = v,
            Some(v) => log::warn!("Rejected {} {} for item #{}", field, v, id),
            None => {}
        }
    }
    match update.vertical_extent {
        Some(v) if positive(v) => item.vertical_extent = Some(v),
        Some(v) => log::warn!("Rejected vertical extent {} for item #{}", v, id),
        None => {}
    }
    if let Some(color) = &update.color {
        item.color = Some(color.clone());
    }
    if let Some(image_ref) = &update.image_ref {
        item.image_ref = Some(image_ref.clone());
    }
    if let Some(procedural_ref) = &update.procedural_ref {
        item.procedural_ref = Some(procedural_ref.clone());
    }
    next
}

/// Remove an item, clearing the selection if it pointed at it.
pub fn delete_item(layout: &LayoutState, id: u32) -> LayoutState {
    let mut next = layout.clone();
    next.items.retain(|i| i.id != id);
    if next.selection == Some(Selection::Item(id)) {
        next.selection = None;
    }
    next
}

/// Clone an item under a fresh id, offset by [`DUPLICATE_OFFSET`] on both
/// axes, and select the copy.
pub fn duplicate_item(layout: &LayoutState, id: u32) -> LayoutState {
    duplicate_item_with_offset(layout, id, DUPLICATE_OFFSET)
}

/// [`duplicate_item`] with a caller-chosen offset.
pub fn duplicate_item_with_offset(layout: &LayoutState, id: u32, offset: f64) -> LayoutState {
    let mut next = layout.clone();
    let Some(source) = layout.item(id) else {
        return next;
    };
    let new_id = layout.next_item_id();
    next.items.push(FurnitureItem {
        id: new_id,
        x: source.x + offset,
        y: source.y + offset,
        ..source.clone()
    });
    next.selection = Some(Selection::Item(new_id));
    next
}

// ── Room ────────────────────────────────────────────────────────────────

/// Resize the room. Non-positive dimensions are ignored per field. Items
/// are left where they are even if they end up out of bounds; attachments
/// are re-clamped onto their (possibly shorter) walls.
pub fn resize_room(layout: &LayoutState, update: RoomUpdate) -> LayoutState {
    let mut next = layout.clone();
    match update.width {
        Some(w) if positive(w) => next.room.width = w,
        Some(w) => log::warn!("Rejected room width {}", w),
        None => {}
    }
    match update.height {
        Some(h) if positive(h) => next.room.height = h,
        Some(h) => log::warn!("Rejected room height {}", h),
        None => {}
    }
    let room = next.room;
    for a in &mut next.attachments {
        a.clamp_to_wall(&room);
    }
    next
}

// ── Attachments ─────────────────────────────────────────────────────────

/// Add a wall fixture under a fresh id, clamped onto its wall, and select it.
pub fn add_attachment(layout: &LayoutState, attachment: &WallAttachment) -> LayoutState {
    let mut next = layout.clone();
    if !(positive(attachment.width) && positive(attachment.height)) {
        log::warn!(
            "Rejected {:?} with degenerate size {}×{}",
            attachment.kind,
            attachment.width,
            attachment.height
        );
        return next;
    }
    let id = layout.next_attachment_id();
    let mut placed = WallAttachment {
        id,
        ..attachment.clone()
    };
    placed.clamp_to_wall(&layout.room);
    next.attachments.push(placed);
    next.selection = Some(Selection::Attachment(id));
    next
}

/// Edit a wall fixture. The result is clamped so that
/// `x ∈ [0, wall_length - width]` and `y ≥ 0`; doors ignore `y` entirely.
pub fn update_attachment(layout: &LayoutState, id: u32, update: AttachmentUpdate) -> LayoutState {
    let mut next = layout.clone();
    let room = next.room;
    let Some(a) = next.attachments.iter_mut().find(|a| a.id == id) else {
        return next;
    };
    if let Some(side) = update.side {
        a.side = side;
    }
    if let Some(x) = update.x.filter(|x| x.is_finite()) {
        a.x = x;
    }
    if let Some(y) = update.y.filter(|y| y.is_finite()) {
        if a.kind.is_floor_pinned() {
            log::debug!("Door #{} elevation is pinned, ignoring y={}", id, y);
        } else {
            a.y = y;
        }
    }
    if let Some(w) = update.width.filter(|w| positive(*w)) {
        a.width = w;
    }
    if let Some(h) = update.height.filter(|h| positive(*h)) {
        a.height = h;
    }
    if let Some(o) = update.outward_offset.filter(|o| o.is_finite() && *o >= 0.0) {
        a.outward_offset = Some(o);
    }
    a.clamp_to_wall(&room);
    next
}

/// Remove a wall fixture, clearing the selection if it pointed at it.
pub fn delete_attachment(layout: &LayoutState, id: u32) -> LayoutState {
    let mut next = layout.clone();
    next.attachments.retain(|a| a.id != id);
    if next.selection == Some(Selection::Attachment(id)) {
        next.selection = None;
    }
    next
}

// ── Selection ───────────────────────────────────────────────────────────

/// Select an item (clearing any attachment selection). `None` or an
/// unknown id clears the selection.
pub fn select(layout: &LayoutState, id: Option<u32>) -> LayoutState {
    let mut next = layout.clone();
    next.selection = id
        .filter(|id| layout.item(*id).is_some())
        .map(Selection::Item);
    next
}

/// Select an attachment (clearing any item selection). `None` or an
/// unknown id clears the selection.
pub fn select_attachment(layout: &LayoutState, id: Option<u32>) -> LayoutState {
    let mut next = layout.clone();
    next.selection = id
        .filter(|id| layout.attachment(*id).is_some())
        .map(Selection::Attachment);
    next
}
