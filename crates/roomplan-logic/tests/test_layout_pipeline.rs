//! Integration tests for the layout pipeline.
//!
//! Exercises: presets → commands → validity → view transform → drag
//! sessions → depth ordering → transport codec.
//!
//! All tests are pure logic, with no renderer or UI.

use std::collections::HashSet;

use roomplan_logic::codec::{decode_or_default, encode_layout};
use roomplan_logic::commands::{
    add_attachment, add_item, move_item, resize_room, rotate_item, update_attachment,
    AttachmentUpdate, LayoutCommand, RoomUpdate,
};
use roomplan_logic::config::PlannerConfig;
use roomplan_logic::constants::ROUND_TRIP_TOLERANCE;
use roomplan_logic::depth::{draw_order, Drawable};
use roomplan_logic::drag::{DragController, DragTarget};
use roomplan_logic::geometry::{Point3, Vec2};
use roomplan_logic::model::{AttachmentKind, LayoutState, Room, Rotation, WallSide};
use roomplan_logic::presets::{attachment_preset, furniture_preset};
use roomplan_logic::session::EditorSession;
use roomplan_logic::validity::compute_invalid_ids;
use roomplan_logic::view::{
    project_to_screen, rotate_room_point, rotated_room_dimensions, unproject_screen_delta,
    ProjectionMode, Projector, View,
};

// ── Helpers ────────────────────────────────────────────────────────────

/// Room 108×132 with a queen bed at (10,10) and a desk rotated 90° at (80,10).
fn bedroom() -> (LayoutState, u32, u32) {
    let layout = LayoutState::new(Room::new(108.0, 132.0));
    let layout = add_item(&layout, &furniture_preset("queen_bed").unwrap());
    let bed = layout.items[0].id;
    let layout = move_item(&layout, bed, 10.0, 10.0);

    let layout = add_item(&layout, &furniture_preset("desk").unwrap());
    let desk = layout.items[1].id;
    let layout = rotate_item(&layout, desk);
    let layout = move_item(&layout, desk, 80.0, 10.0);
    (layout, bed, desk)
}

fn views() -> Vec<View> {
    let mut out = Vec::new();
    for mode in [ProjectionMode::Isometric, ProjectionMode::TopDown] {
        for angle in Rotation::all() {
            out.push(View::new(angle, Projector::new(mode, 4.0)));
        }
    }
    out
}

// ── Scenario tests ─────────────────────────────────────────────────────

#[test]
fn rotated_desk_overhangs_room() {
    let (layout, bed, desk) = bedroom();
    let d = layout.item(desk).unwrap();
    assert_eq!(d.effective_size(), (48.0, 24.0));
    assert_eq!(d.rect().max_x(), 128.0);

    let invalid = compute_invalid_ids(&layout.room, &layout.items, None);
    assert!(invalid.contains(&desk), "desk reaches x=128 in a 108 room");
    assert!(!invalid.contains(&bed), "bed fits");
}

#[test]
fn dragging_desk_inside_trades_bounds_for_overlap() {
    let (layout, bed, desk) = bedroom();
    for view in views() {
        let mut drags = DragController::default();
        let target = DragTarget::Item(desk);
        drags.begin_drag(&layout, target, view).unwrap();

        let screen = view.room_delta_to_screen(Vec2::new(-20.0, 0.0));
        let update = drags.update_drag(&layout, target, screen).unwrap();
        assert_eq!(update.position, Vec2::new(60.0, 10.0), "{:?}", view);
        // Desk at x=60..108 fits the room but now crosses the bed (x=10..70).
        assert_eq!(update.invalid_ids, HashSet::from([bed, desk]));

        let next = drags.commit_drag(&layout, target).unwrap();
        assert_eq!(next.item(desk).map(|d| (d.x, d.y)), Some((60.0, 10.0)));
    }
}

#[test]
fn resize_creates_invalid_state_without_correction() {
    let (layout, bed, _) = bedroom();
    let shrunk = resize_room(
        &layout,
        RoomUpdate {
            width: Some(50.0),
            height: None,
        },
    );
    let invalid = compute_invalid_ids(&shrunk.room, &shrunk.items, None);
    assert!(invalid.contains(&bed));
    assert_eq!(shrunk.item(bed), layout.item(bed));
}

#[test]
fn door_stays_on_floor_through_updates_and_drags() {
    let layout = LayoutState::new(Room::new(108.0, 132.0));
    let layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Door, WallSide::Front));
    let id = layout.attachments[0].id;

    let layout = update_attachment(
        &layout,
        id,
        AttachmentUpdate {
            y: Some(40.0),
            ..AttachmentUpdate::default()
        },
    );
    assert_eq!(layout.attachment(id).unwrap().y, 0.0);

    for view in views() {
        let mut drags = DragController::default();
        let target = DragTarget::Attachment(id);
        drags.begin_drag(&layout, target, view).unwrap();
        let lift = view.projector.project(Point3::new(0.0, 0.0, 30.0));
        drags.update_drag(&layout, target, lift).unwrap();
        let next = drags.commit_drag(&layout, target).unwrap();
        assert_eq!(next.attachment(id).unwrap().y, 0.0, "{:?}", view);
    }
}

// ── Transform properties ───────────────────────────────────────────────

#[test]
fn quarter_turn_has_order_four() {
    let (w, h) = (108.0, 132.0);
    for &(x, y) in &[(0.0, 0.0), (10.0, 10.0), (107.5, 3.25), (54.0, 131.0)] {
        let p = Vec2::new(x, y);
        let mut q = p;
        let (mut cw, mut ch) = (w, h);
        for _ in 0..4 {
            q = rotate_room_point(q, Rotation::Deg90, cw, ch);
            (cw, ch) = rotated_room_dimensions(cw, ch, Rotation::Deg90);
        }
        assert!(q.approx_eq(p, ROUND_TRIP_TOLERANCE));
    }
}

#[test]
fn ground_projection_inverts() {
    for &(dx, dy) in &[(3.0, -4.0), (0.125, 0.5), (-250.0, 999.0)] {
        for &ppu in &[0.25, 2.0, 12.0] {
            let s = project_to_screen(dx, dy, 0.0, ppu);
            let back = unproject_screen_delta(s.x, s.y, ppu).unwrap();
            assert!(back.approx_eq(Vec2::new(dx, dy), ROUND_TRIP_TOLERANCE));
        }
    }
}

// ── Rendering order ────────────────────────────────────────────────────

#[test]
fn draw_order_flips_with_view() {
    let (layout, bed, desk) = bedroom();
    let layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Window, WallSide::Back));
    let window = layout.attachments[0].id;

    let front = draw_order(&layout, Rotation::Deg0);
    assert_eq!(front[0], Drawable::Attachment(window));
    assert_eq!(front.len(), 3);

    let back = draw_order(&layout, Rotation::Deg180);
    assert_eq!(*back.last().unwrap(), Drawable::Attachment(window));
    assert!(back.contains(&Drawable::Item(bed)));
    assert!(back.contains(&Drawable::Item(desk)));
}

// ── Session + codec ────────────────────────────────────────────────────

#[test]
fn session_round_trips_through_transport() {
    let (layout, _, desk) = bedroom();
    let encoded = encode_layout(&layout).unwrap();
    let mut session = EditorSession::restore(&encoded, PlannerConfig::default());
    assert_eq!(session.layout(), &layout);
    assert!(session.is_invalid(desk));

    session.apply(&LayoutCommand::RotateItem { id: desk });
    assert!(!session.is_invalid(desk), "unrotated desk spans x=80..104");

    let restored = decode_or_default(&session.export().unwrap());
    assert_eq!(&restored, session.layout());
}

#[test]
fn session_drags_two_items_independently() {
    let (layout, bed, desk) = bedroom();
    let mut session = EditorSession::new(layout, PlannerConfig::default());
    session.begin_drag(DragTarget::Item(bed)).unwrap();
    session.begin_drag(DragTarget::Item(desk)).unwrap();
    assert!(session.begin_drag(DragTarget::Item(bed)).is_err());

    let view = session.view();
    let down = view.room_delta_to_screen(Vec2::new(0.0, 30.0));
    session.update_drag(DragTarget::Item(bed), down).unwrap();
    session.cancel_drag(DragTarget::Item(desk));
    session.commit_drag(DragTarget::Item(bed)).unwrap();

    let l = session.layout();
    assert_eq!(l.item(bed).map(|b| (b.x, b.y)), Some((10.0, 40.0)));
    assert_eq!(l.item(desk).map(|d| (d.x, d.y)), Some((80.0, 10.0)));
}
