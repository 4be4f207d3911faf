//! Depth ordering for painter's-algorithm rendering.
//!
//! Rank = `rotated.x + rotated.y` of an object's anchor in the current view;
//! lower rank is farther from the viewer and is drawn first. Ordering only
//! affects rendering, never the model.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::model::{FurnitureItem, LayoutState, Room, WallAttachment};
use crate::view::{attachment_world_position, rotate_room_point, ViewAngle};

/// Something the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Drawable {
    Item(u32),
    Attachment(u32),
}

/// Depth rank of a room-space point under `angle`.
pub fn depth_rank(p: Vec2, angle: ViewAngle, room: &Room) -> f64 {
    let r = rotate_room_point(p, angle, room.width, room.height);
    r.x + r.y
}

pub fn item_depth(item: &FurnitureItem, angle: ViewAngle, room: &Room) -> f64 {
    depth_rank(Vec2::new(item.x, item.y), angle, room)
}

pub fn attachment_depth(attachment: &WallAttachment, angle: ViewAngle, room: &Room) -> f64 {
    let p = attachment_world_position(attachment, angle, room);
    p.x + p.y
}

/// Items back to front. Stable: equal ranks keep list order.
pub fn sort_items_by_depth<'a>(
    items: &'a [FurnitureItem],
    angle: ViewAngle,
    room: &Room,
) -> Vec<&'a FurnitureItem> {
    let mut ranked: Vec<(f64, &FurnitureItem)> = items
        .iter()
        .map(|i| (item_depth(i, angle, room), i))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, i)| i).collect()
}

/// Every item and attachment back to front. Attachments are listed before
/// items on equal rank so furniture draws over the wall it stands against.
pub fn draw_order(layout: &LayoutState, angle: ViewAngle) -> Vec<Drawable> {
    let room = &layout.room;
    let mut ranked: Vec<(f64, Drawable)> = layout
        .attachments
        .iter()
        .map(|a| (attachment_depth(a, angle, room), Drawable::Attachment(a.id)))
        .chain(
            layout
                .items
                .iter()
                .map(|i| (item_depth(i, angle, room), Drawable::Item(i.id))),
        )
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, d)| d).collect()
}

/// An attachment is dimmed when some item ranks more than `buffer` in front
/// of it.
pub fn is_attachment_occluded(
    attachment: &WallAttachment,
    items: &[FurnitureItem],
    angle: ViewAngle,
    room: &Room,
    buffer: f64,
) -> bool {
    let rank = attachment_depth(attachment, angle, room);
    items
        .iter()
        .any(|i| item_depth(i, angle, room) - rank > buffer)
}

/// Ids of all occluded attachments in the layout.
pub fn occluded_attachments(layout: &LayoutState, angle: ViewAngle, buffer: f64) -> Vec<u32> {
    layout
        .attachments
        .iter()
        .filter(|a| is_attachment_occluded(a, &layout.items, angle, &layout.room, buffer))
        .map(|a| a.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OCCLUSION_BUFFER;
    use crate::model::{AttachmentKind, Rotation, WallSide};

    fn item_at(id: u32, x: f64, y: f64) -> FurnitureItem {
        FurnitureItem {
            id,
            kind: "box".into(),
            width: 10.0,
            height: 10.0,
            x,
            y,
            rotation: Rotation::Deg0,
            vertical_extent: None,
            color: None,
            image_ref: None,
            procedural_ref: None,
        }
    }

    fn window(side: WallSide, x: f64) -> WallAttachment {
        WallAttachment {
            id: 1,
            kind: AttachmentKind::Window,
            side,
            x,
            y: 30.0,
            width: 36.0,
            height: 48.0,
            outward_offset: None,
        }
    }

    #[test]
    fn test_sort_back_to_front() {
        let room = Room::new(100.0, 100.0);
        let items = vec![item_at(1, 50.0, 50.0), item_at(2, 0.0, 0.0), item_at(3, 90.0, 0.0)];
        let ids: Vec<u32> = sort_items_by_depth(&items, Rotation::Deg0, &room)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_half_turn_reverses_order() {
        let room = Room::new(100.0, 100.0);
        let items = vec![item_at(1, 10.0, 10.0), item_at(2, 60.0, 60.0)];
        let front: Vec<u32> = sort_items_by_depth(&items, Rotation::Deg0, &room)
            .iter()
            .map(|i| i.id)
            .collect();
        let back: Vec<u32> = sort_items_by_depth(&items, Rotation::Deg180, &room)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(front, vec![1, 2]);
        assert_eq!(back, vec![2, 1]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let room = Room::new(100.0, 100.0);
        let items = vec![item_at(1, 20.0, 10.0), item_at(2, 10.0, 20.0)];
        let ids: Vec<u32> = sort_items_by_depth(&items, Rotation::Deg0, &room)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_occlusion_buffer() {
        let room = Room::new(100.0, 100.0);
        // Back wall window at x=20: rank 20.
        let w = window(WallSide::Back, 20.0);
        assert!(!is_attachment_occluded(&w, &[item_at(1, 25.0, 5.0)], Rotation::Deg0, &room, OCCLUSION_BUFFER));
        assert!(is_attachment_occluded(&w, &[item_at(1, 25.0, 6.0)], Rotation::Deg0, &room, OCCLUSION_BUFFER));
        // From the opposite side the same item is behind the wall fixture.
        assert!(!is_attachment_occluded(&w, &[item_at(1, 25.0, 6.0)], Rotation::Deg180, &room, OCCLUSION_BUFFER));
    }

    #[test]
    fn test_draw_order_mixes_attachments() {
        let mut layout = LayoutState::new(Room::new(100.0, 100.0));
        layout.items = vec![item_at(1, 50.0, 50.0)];
        layout.attachments = vec![window(WallSide::Back, 10.0)];
        let order = draw_order(&layout, Rotation::Deg0);
        assert_eq!(order, vec![Drawable::Attachment(1), Drawable::Item(1)]);
        let order = draw_order(&layout, Rotation::Deg180);
        assert_eq!(order, vec![Drawable::Item(1), Drawable::Attachment(1)]);
        assert_eq!(occluded_attachments(&layout, Rotation::Deg0, OCCLUSION_BUFFER), vec![1]);
    }
}
