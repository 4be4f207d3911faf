//! View transform. Quadrant rotation of room space and projection to screen.
//!
//! Three coordinate systems are involved:
//!
//! | Space | Origin | Notes |
//! |-------|--------|-------|
//! | Room | room corner | where the model lives, `W × H` |
//! | Rotated room | corner after rotation | `H × W` at 90°/270° |
//! | Screen | projection origin | pixels, isometric 2:1 or top-down |
//!
//! Rotation is about the room's own corner, not its center, so every
//! quadrant maps the room rectangle onto `[0, W'] × [0, H']` of the rotated
//! dimensions. Both projection modes share the rotation math and differ only
//! in [`ProjectionMode`].
//!
//! ```
//! use roomplan_logic::geometry::Vec2;
//! use roomplan_logic::model::Rotation;
//! use roomplan_logic::view::{rotate_room_point, unrotate_room_point};
//!
//! let p = Vec2::new(10.0, 20.0);
//! let r = rotate_room_point(p, Rotation::Deg90, 108.0, 132.0);
//! assert_eq!(r, Vec2::new(112.0, 10.0));
//! assert_eq!(unrotate_room_point(r, Rotation::Deg90, 108.0, 132.0), p);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PIXELS_PER_UNIT;
use crate::geometry::{Point3, Vec2};
use crate::model::{Room, Rotation, WallAttachment, WallSide};

/// The display rotation. Independent of any item's own rotation.
pub type ViewAngle = Rotation;

// ── Quadrant rotation ───────────────────────────────────────────────────

/// Room space → rotated room space, for a room of unrotated size `W × H`.
///
/// - 0°: identity
/// - 90°: `(x, y) → (H − y, x)`
/// - 180°: `(x, y) → (W − x, H − y)`
/// - 270°: `(x, y) → (y, W − x)`
pub fn rotate_room_point(p: Vec2, angle: ViewAngle, width: f64, height: f64) -> Vec2 {
    match angle {
        Rotation::Deg0 => p,
        Rotation::Deg90 => Vec2::new(height - p.y, p.x),
        Rotation::Deg180 => Vec2::new(width - p.x, height - p.y),
        Rotation::Deg270 => Vec2::new(p.y, width - p.x),
    }
}

/// Rotated room space → room space. Exact inverse of [`rotate_room_point`]
/// for the same unrotated `W × H`.
pub fn unrotate_room_point(p: Vec2, angle: ViewAngle, width: f64, height: f64) -> Vec2 {
    match angle {
        Rotation::Deg0 => p,
        Rotation::Deg90 => Vec2::new(p.y, height - p.x),
        Rotation::Deg180 => Vec2::new(width - p.x, height - p.y),
        Rotation::Deg270 => Vec2::new(width - p.y, p.x),
    }
}

/// Linear part of [`rotate_room_point`], for displacements.
pub fn rotate_delta(d: Vec2, angle: ViewAngle) -> Vec2 {
    match angle {
        Rotation::Deg0 => d,
        Rotation::Deg90 => Vec2::new(-d.y, d.x),
        Rotation::Deg180 => Vec2::new(-d.x, -d.y),
        Rotation::Deg270 => Vec2::new(d.y, -d.x),
    }
}

/// Rotated displacement → room displacement (the transpose of
/// [`rotate_delta`]).
pub fn unrotate_delta(d: Vec2, angle: ViewAngle) -> Vec2 {
    match angle {
        Rotation::Deg0 => d,
        Rotation::Deg90 => Vec2::new(d.y, -d.x),
        Rotation::Deg180 => Vec2::new(-d.x, -d.y),
        Rotation::Deg270 => Vec2::new(-d.y, d.x),
    }
}

/// Room size as seen in the rotated view: `(H, W)` at 90°/270°.
pub fn rotated_room_dimensions(width: f64, height: f64, angle: ViewAngle) -> (f64, f64) {
    if angle.swaps_axes() {
        (height, width)
    } else {
        (width, height)
    }
}

// ── Projection ──────────────────────────────────────────────────────────

/// Isometric 2:1 projection of a rotated-room point:
/// `sx = (x − y)·ppu`, `sy = (x + y)·ppu/2 − z·ppu`.
pub fn project_to_screen(x: f64, y: f64, z: f64, ppu: f64) -> Vec2 {
    Vec2::new((x - y) * ppu, (x + y) * ppu / 2.0 - z * ppu)
}

/// Inverse of [`project_to_screen`] on the ground plane (`z = 0`) for a
/// screen displacement. `None` when `ppu` is not a positive finite number.
pub fn unproject_screen_delta(sx: f64, sy: f64, ppu: f64) -> Option<Vec2> {
    if !(ppu > 0.0 && ppu.is_finite()) || !(sx.is_finite() && sy.is_finite()) {
        return None;
    }
    Some(Vec2::new(
        (sx + 2.0 * sy) / (2.0 * ppu),
        (2.0 * sy - sx) / (2.0 * ppu),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// 2:1 diamond projection with elevation.
    #[default]
    Isometric,
    /// Flat plan view; elevation is not visible.
    TopDown,
}

/// Along-wall and elevation displacement recovered from a screen drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallDelta {
    pub along: f64,
    /// `None` in top-down mode, where height off the floor is not visible.
    pub elevation: Option<f64>,
}

/// Projection mode plus scale. Maps rotated-room space to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub mode: ProjectionMode,
    pub pixels_per_unit: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Isometric,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }
}

impl Projector {
    pub fn new(mode: ProjectionMode, pixels_per_unit: f64) -> Self {
        Self {
            mode,
            pixels_per_unit,
        }
    }

    fn scale(&self) -> Option<f64> {
        let ppu = self.pixels_per_unit;
        (ppu > 0.0 && ppu.is_finite()).then_some(ppu)
    }

    /// Project a rotated-room point (or displacement; the map is linear).
    pub fn project(&self, p: Point3) -> Vec2 {
        match self.mode {
            ProjectionMode::Isometric => project_to_screen(p.x, p.y, p.z, self.pixels_per_unit),
            ProjectionMode::TopDown => {
                Vec2::new(p.x * self.pixels_per_unit, p.y * self.pixels_per_unit)
            }
        }
    }

    /// Screen displacement → rotated-room displacement on the floor.
    pub fn unproject_ground(&self, screen: Vec2) -> Option<Vec2> {
        let ppu = self.scale()?;
        if !screen.is_finite() {
            return None;
        }
        match self.mode {
            ProjectionMode::Isometric => unproject_screen_delta(screen.x, screen.y, ppu),
            ProjectionMode::TopDown => Some(Vec2::new(screen.x / ppu, screen.y / ppu)),
        }
    }

    /// Screen displacement → displacement on a wall plane, where `along` is
    /// the wall's unit direction in rotated-room space (axis-aligned).
    pub fn unproject_wall(&self, screen: Vec2, along: Vec2) -> Option<WallDelta> {
        let ppu = self.scale()?;
        if !screen.is_finite() {
            return None;
        }
        match self.mode {
            ProjectionMode::Isometric => {
                // Axis-aligned unit direction, so ux - uy is ±1.
                let a = screen.x / ((along.x - along.y) * ppu);
                let dz = a * (along.x + along.y) / 2.0 - screen.y / ppu;
                Some(WallDelta {
                    along: a,
                    elevation: Some(dz),
                })
            }
            ProjectionMode::TopDown => Some(WallDelta {
                along: (screen.x * along.x + screen.y * along.y) / ppu,
                elevation: None,
            }),
        }
    }
}

/// Display rotation plus projection: everything a renderer or pointer
/// handler needs to go between room space and the screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct View {
    pub angle: ViewAngle,
    pub projector: Projector,
}

impl View {
    pub fn new(angle: ViewAngle, projector: Projector) -> Self {
        Self { angle, projector }
    }

    /// Room point at `elevation` → screen position.
    pub fn room_to_screen(&self, room: &Room, p: Vec2, elevation: f64) -> Vec2 {
        let r = rotate_room_point(p, self.angle, room.width, room.height);
        self.projector.project(Point3::new(r.x, r.y, elevation))
    }

    /// Room displacement on the floor → screen displacement.
    pub fn room_delta_to_screen(&self, d: Vec2) -> Vec2 {
        let r = rotate_delta(d, self.angle);
        self.projector.project(Point3::new(r.x, r.y, 0.0))
    }

    /// Screen displacement → room displacement on the floor.
    pub fn screen_delta_to_room(&self, s: Vec2) -> Option<Vec2> {
        let rotated = self.projector.unproject_ground(s)?;
        Some(unrotate_delta(rotated, self.angle))
    }
}

// ── Walls ───────────────────────────────────────────────────────────────

/// Unit direction of increasing along-wall offset, in room space.
pub fn wall_direction(side: WallSide) -> Vec2 {
    match side {
        WallSide::Front | WallSide::Back => Vec2::new(1.0, 0.0),
        WallSide::Left | WallSide::Right => Vec2::new(0.0, 1.0),
    }
}

/// Point on the room perimeter (unrotated), `inset` units into the room.
///
/// Back is `y = 0`, front `y = H`, left `x = 0`, right `x = W`.
pub fn wall_anchor(side: WallSide, along: f64, inset: f64, width: f64, height: f64) -> Vec2 {
    match side {
        WallSide::Back => Vec2::new(along, inset),
        WallSide::Front => Vec2::new(along, height - inset),
        WallSide::Left => Vec2::new(inset, along),
        WallSide::Right => Vec2::new(width - inset, along),
    }
}

/// Wall placement → rotated 3D point. The planar part is rotated with the
/// view; elevation passes through.
pub fn wall_to_world(
    side: WallSide,
    along: f64,
    elevation: f64,
    angle: ViewAngle,
    width: f64,
    height: f64,
) -> Point3 {
    let p = wall_anchor(side, along, 0.0, width, height);
    let r = rotate_room_point(p, angle, width, height);
    Point3::new(r.x, r.y, elevation)
}

/// Rotated 3D anchor of an attachment, honoring its outward offset.
pub fn attachment_world_position(attachment: &WallAttachment, angle: ViewAngle, room: &Room) -> Point3 {
    let inset = attachment.outward_offset.unwrap_or(0.0);
    let p = wall_anchor(attachment.side, attachment.x, inset, room.width, room.height);
    let r = rotate_room_point(p, angle, room.width, room.height);
    Point3::new(r.x, r.y, attachment.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ROUND_TRIP_TOLERANCE as TOL;

    const W: f64 = 108.0;
    const H: f64 = 132.0;

    #[test]
    fn test_quarter_turn_formulas() {
        let p = Vec2::new(10.0, 20.0);
        assert_eq!(rotate_room_point(p, Rotation::Deg0, W, H), p);
        assert_eq!(rotate_room_point(p, Rotation::Deg90, W, H), Vec2::new(112.0, 10.0));
        assert_eq!(rotate_room_point(p, Rotation::Deg180, W, H), Vec2::new(98.0, 112.0));
        assert_eq!(rotate_room_point(p, Rotation::Deg270, W, H), Vec2::new(20.0, 98.0));
    }

    #[test]
    fn test_four_quarter_turns_is_identity() {
        let p = Vec2::new(17.25, 93.5);
        let (mut w, mut h) = (W, H);
        let mut q = p;
        for _ in 0..4 {
            q = rotate_room_point(q, Rotation::Deg90, w, h);
            (w, h) = rotated_room_dimensions(w, h, Rotation::Deg90);
        }
        assert!(q.approx_eq(p, TOL), "{:?} != {:?}", q, p);
    }

    #[test]
    fn test_two_quarter_turns_is_half_turn() {
        let p = Vec2::new(3.0, 40.0);
        let once = rotate_room_point(p, Rotation::Deg90, W, H);
        let twice = rotate_room_point(once, Rotation::Deg90, H, W);
        assert!(twice.approx_eq(rotate_room_point(p, Rotation::Deg180, W, H), TOL));
    }

    #[test]
    fn test_rotation_maps_room_onto_rotated_room() {
        for angle in Rotation::all() {
            let (rw, rh) = rotated_room_dimensions(W, H, angle);
            for corner in [
                Vec2::new(0.0, 0.0),
                Vec2::new(W, 0.0),
                Vec2::new(0.0, H),
                Vec2::new(W, H),
            ] {
                let r = rotate_room_point(corner, angle, W, H);
                assert!(r.x >= 0.0 && r.x <= rw && r.y >= 0.0 && r.y <= rh);
                assert!(unrotate_room_point(r, angle, W, H).approx_eq(corner, TOL));
            }
        }
    }

    #[test]
    fn test_delta_rotation_matches_point_rotation() {
        let a = Vec2::new(12.0, 30.0);
        let b = Vec2::new(20.0, 25.0);
        for angle in Rotation::all() {
            let ra = rotate_room_point(a, angle, W, H);
            let rb = rotate_room_point(b, angle, W, H);
            let d = rotate_delta(b - a, angle);
            assert!((rb - ra).approx_eq(d, TOL));
            assert!(unrotate_delta(d, angle).approx_eq(b - a, TOL));
        }
    }

    #[test]
    fn test_projection_inverse_round_trip() {
        for &(dx, dy) in &[(0.0, 0.0), (1.0, 0.0), (-7.5, 13.25), (1e4, -3e3)] {
            for &ppu in &[0.5, 1.0, 4.0, 17.3] {
                let s = project_to_screen(dx, dy, 0.0, ppu);
                let back = unproject_screen_delta(s.x, s.y, ppu).unwrap();
                assert!(back.approx_eq(Vec2::new(dx, dy), TOL));
            }
        }
    }

    #[test]
    fn test_unproject_rejects_degenerate_scale() {
        assert_eq!(unproject_screen_delta(1.0, 1.0, 0.0), None);
        assert_eq!(unproject_screen_delta(1.0, 1.0, -2.0), None);
        assert_eq!(unproject_screen_delta(f64::NAN, 1.0, 2.0), None);
        let flat = Projector::new(ProjectionMode::TopDown, 0.0);
        assert_eq!(flat.unproject_ground(Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_elevation_raises_screen_point() {
        let ground = project_to_screen(10.0, 10.0, 0.0, 2.0);
        let raised = project_to_screen(10.0, 10.0, 5.0, 2.0);
        assert_eq!(ground.x, raised.x);
        assert_eq!(raised.y, ground.y - 10.0);
    }

    #[test]
    fn test_top_down_ignores_elevation() {
        let p = Projector::new(ProjectionMode::TopDown, 3.0);
        assert_eq!(p.project(Point3::new(2.0, 5.0, 40.0)), Vec2::new(6.0, 15.0));
        let back = p.unproject_ground(Vec2::new(6.0, 15.0)).unwrap();
        assert!(back.approx_eq(Vec2::new(2.0, 5.0), TOL));
    }

    #[test]
    fn test_view_round_trip_all_angles_and_modes() {
        let room = Room::new(W, H);
        let d = Vec2::new(-9.0, 14.5);
        for mode in [ProjectionMode::Isometric, ProjectionMode::TopDown] {
            for angle in Rotation::all() {
                let view = View::new(angle, Projector::new(mode, 4.0));
                let s = view.room_delta_to_screen(d);
                let back = view.screen_delta_to_room(s).unwrap();
                assert!(back.approx_eq(d, TOL), "{:?} {:?}: {:?}", mode, angle, back);

                let a = Vec2::new(5.0, 6.0);
                let sa = view.room_to_screen(&room, a, 0.0);
                let sb = view.room_to_screen(&room, a + d, 0.0);
                assert!((sb - sa).approx_eq(s, TOL));
            }
        }
    }

    #[test]
    fn test_wall_plane_round_trip() {
        let projector = Projector::new(ProjectionMode::Isometric, 4.0);
        for side in WallSide::all() {
            for angle in Rotation::all() {
                let u = rotate_delta(wall_direction(side), angle);
                let (a, dz) = (7.0, -3.0);
                let s = projector.project(Point3::new(a * u.x, a * u.y, dz));
                let back = projector.unproject_wall(s, u).unwrap();
                assert!((back.along - a).abs() < TOL);
                assert!((back.elevation.unwrap() - dz).abs() < TOL);
            }
        }
    }

    #[test]
    fn test_wall_to_world() {
        let p = wall_to_world(WallSide::Back, 30.0, 40.0, Rotation::Deg0, W, H);
        assert_eq!(p, Point3::new(30.0, 0.0, 40.0));
        let p = wall_to_world(WallSide::Front, 30.0, 0.0, Rotation::Deg0, W, H);
        assert_eq!(p, Point3::new(30.0, H, 0.0));
        let p = wall_to_world(WallSide::Right, 12.0, 5.0, Rotation::Deg180, W, H);
        assert_eq!(p, Point3::new(0.0, H - 12.0, 5.0));
        let p = wall_to_world(WallSide::Left, 12.0, 5.0, Rotation::Deg90, W, H);
        assert_eq!(p, Point3::new(H - 12.0, 0.0, 5.0));
    }

    #[test]
    fn test_attachment_outward_offset() {
        let room = Room::new(W, H);
        let shelf = WallAttachment {
            id: 1,
            kind: crate::model::AttachmentKind::Shelf,
            side: WallSide::Right,
            x: 20.0,
            y: 48.0,
            width: 30.0,
            height: 2.0,
            outward_offset: Some(8.0),
        };
        let p = attachment_world_position(&shelf, Rotation::Deg0, &room);
        assert_eq!(p, Point3::new(W - 8.0, 20.0, 48.0));
    }
}
