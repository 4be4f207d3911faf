//! Drag/snap controller. Pointer motion in the projected view back to room
//! space, with grid snapping.
//!
//! Algorithm, per drag sample:
//! 1. Take the raw screen displacement since the drag started
//! 2. Invert the projection to a rotated-room displacement
//! 3. Invert the view rotation to a room displacement
//! 4. Candidate = stored position + displacement
//! 5. Snap each axis to the grid if strictly within the threshold, else
//!    round to whole units
//! 6. Evaluate the snapped rectangle as a hypothetical placement and derive
//!    the screen position from the snapped delta, so the object visibly snaps
//! 7. On commit, write the snapped position through the layout commands
//!
//! Wall attachments use the same steps on the wall plane: the along-wall
//! axis is clamped into the wall and doors stay on the floor.
//!
//! Each gesture is a [`DragSession`]; [`DragController`] owns at most one
//! session per target, so two pointers cannot drag the same object.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commands::{move_item, update_attachment, AttachmentUpdate};
use crate::constants::{GRID_SIZE, SNAP_THRESHOLD};
use crate::geometry::{Point3, Vec2};
use crate::model::LayoutState;
use crate::validity::{compute_invalid_ids, HypotheticalPlacement};
use crate::view::{attachment_world_position, rotate_delta, wall_direction, View};

/// What a drag gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragTarget {
    Item(u32),
    Attachment(u32),
}

impl fmt::Display for DragTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragTarget::Item(id) => write!(f, "item #{}", id),
            DragTarget::Attachment(id) => write!(f, "attachment #{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragError {
    #[error("{0} does not exist in the layout")]
    UnknownTarget(DragTarget),
    #[error("{0} is already being dragged")]
    AlreadyDragging(DragTarget),
    #[error("{0} is not being dragged")]
    NotDragging(DragTarget),
    #[error("screen delta ({x}, {y}) cannot be mapped onto the room")]
    DegenerateInput { x: f64, y: f64 },
}

/// Grid snapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    pub grid_size: f64,
    pub threshold: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            threshold: SNAP_THRESHOLD,
        }
    }
}

impl SnapSettings {
    pub fn snap(&self, value: f64) -> f64 {
        snap_coordinate(value, self.grid_size, self.threshold)
    }
}

/// Snap to the nearest multiple of `grid` when strictly closer than
/// `threshold`, otherwise round to the nearest whole unit.
///
/// The nearest multiple rounds half away from zero, so with
/// `threshold <= grid / 2` a value midway between two grid lines never snaps.
pub fn snap_coordinate(value: f64, grid: f64, threshold: f64) -> f64 {
    if grid > 0.0 {
        let nearest = (value / grid).round() * grid;
        if (value - nearest).abs() < threshold {
            return nearest;
        }
    }
    value.round()
}

/// Result of one drag-move sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DragUpdate {
    pub target: DragTarget,
    /// Snapped position: `(x, y)` in room space for items, `(along-wall
    /// offset, elevation)` for attachments.
    pub position: Vec2,
    /// Where the object should be drawn, consistent with `position`.
    pub screen_position: Vec2,
    /// Invalid item ids if the drag were committed now.
    pub invalid_ids: HashSet<u32>,
}

/// One pointer gesture: idle → dragging → idle.
#[derive(Debug, Clone)]
pub struct DragSession {
    target: DragTarget,
    view: View,
    snap: SnapSettings,
    origin: Vec2,
    anchor_screen: Vec2,
    candidate: Option<Vec2>,
}

impl DragSession {
    /// Capture the target's stored position and its screen anchor. Nothing in
    /// the layout changes.
    pub fn begin(
        layout: &LayoutState,
        target: DragTarget,
        view: View,
        snap: SnapSettings,
    ) -> Result<Self, DragError> {
        let (origin, anchor_screen) = match target {
            DragTarget::Item(id) => {
                let item = layout.item(id).ok_or(DragError::UnknownTarget(target))?;
                let origin = Vec2::new(item.x, item.y);
                (origin, view.room_to_screen(&layout.room, origin, 0.0))
            }
            DragTarget::Attachment(id) => {
                let a = layout.attachment(id).ok_or(DragError::UnknownTarget(target))?;
                let anchor = attachment_world_position(a, view.angle, &layout.room);
                (Vec2::new(a.x, a.y), view.projector.project(anchor))
            }
        };
        log::debug!("Drag start on {} at ({}, {})", target, origin.x, origin.y);
        Ok(Self {
            target,
            view,
            snap,
            origin,
            anchor_screen,
            candidate: None,
        })
    }

    pub fn target(&self) -> DragTarget {
        self.target
    }

    /// Last snapped position, if any sample has mapped onto the room.
    pub fn candidate(&self) -> Option<Vec2> {
        self.candidate
    }

    /// Screen position of the target when the drag began.
    pub fn anchor_screen(&self) -> Vec2 {
        self.anchor_screen
    }

    /// Process a screen displacement measured from the drag start.
    /// A sample that cannot be mapped leaves the previous candidate alone.
    pub fn update(&mut self, layout: &LayoutState, screen_delta: Vec2) -> Result<DragUpdate, DragError> {
        let degenerate = DragError::DegenerateInput {
            x: screen_delta.x,
            y: screen_delta.y,
        };
        let (position, screen_offset, invalid_ids) = match self.target {
            DragTarget::Item(id) => {
                let item = layout.item(id).ok_or(DragError::UnknownTarget(self.target))?;
                let delta = self.view.screen_delta_to_room(screen_delta).ok_or(degenerate)?;
                let candidate = self.origin + delta;
                let snapped = Vec2::new(self.snap.snap(candidate.x), self.snap.snap(candidate.y));
                let hypothetical = HypotheticalPlacement {
                    item_id: id,
                    rect: item.rect().with_origin(snapped),
                };
                let invalid =
                    compute_invalid_ids(&layout.room, &layout.items, Some(hypothetical));
                (snapped, self.view.room_delta_to_screen(snapped - self.origin), invalid)
            }
            DragTarget::Attachment(id) => {
                let a = layout.attachment(id).ok_or(DragError::UnknownTarget(self.target))?;
                let along_dir = rotate_delta(wall_direction(a.side), self.view.angle);
                let wall = self
                    .view
                    .projector
                    .unproject_wall(screen_delta, along_dir)
                    .ok_or(degenerate)?;

                let max_along = (layout.room.wall_length(a.side) - a.width).max(0.0);
                let along = self.snap.snap(self.origin.x + wall.along).clamp(0.0, max_along);
                let elevation = if a.kind.is_floor_pinned() {
                    0.0
                } else {
                    wall.elevation
                        .map_or(self.origin.y, |dz| self.snap.snap(self.origin.y + dz).max(0.0))
                };

                let moved = along - self.origin.x;
                let offset = self.view.projector.project(Point3::new(
                    along_dir.x * moved,
                    along_dir.y * moved,
                    elevation - self.origin.y,
                ));
                let invalid = compute_invalid_ids(&layout.room, &layout.items, None);
                (Vec2::new(along, elevation), offset, invalid)
            }
        };

        self.candidate = Some(position);
        Ok(DragUpdate {
            target: self.target,
            position,
            screen_position: self.anchor_screen + screen_offset,
            invalid_ids,
        })
    }

    /// Write the last snapped position into the layout. With no mapped
    /// sample the layout comes back unchanged.
    pub fn commit(self, layout: &LayoutState) -> LayoutState {
        let Some(p) = self.candidate else {
            log::debug!("Drag on {} ended without a placement", self.target);
            return layout.clone();
        };
        log::debug!("Drag commit on {} at ({}, {})", self.target, p.x, p.y);
        match self.target {
            DragTarget::Item(id) => move_item(layout, id, p.x, p.y),
            DragTarget::Attachment(id) => update_attachment(
                layout,
                id,
                AttachmentUpdate {
                    x: Some(p.x),
                    y: Some(p.y),
                    ..AttachmentUpdate::default()
                },
            ),
        }
    }
}

/// Owns the in-progress drags. Sessions on different targets are
/// independent; a target has at most one owner.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    snap: SnapSettings,
    sessions: HashMap<DragTarget, DragSession>,
}

impl DragController {
    pub fn new(snap: SnapSettings) -> Self {
        Self {
            snap,
            sessions: HashMap::new(),
        }
    }

    pub fn is_dragging(&self, target: DragTarget) -> bool {
        self.sessions.contains_key(&target)
    }

    pub fn active_targets(&self) -> impl Iterator<Item = DragTarget> + '_ {
        self.sessions.keys().copied()
    }

    pub fn begin_drag(
        &mut self,
        layout: &LayoutState,
        target: DragTarget,
        view: View,
    ) -> Result<(), DragError> {
        if self.sessions.contains_key(&target) {
            return Err(DragError::AlreadyDragging(target));
        }
        let session = DragSession::begin(layout, target, view, self.snap)?;
        self.sessions.insert(target, session);
        Ok(())
    }

    pub fn update_drag(
        &mut self,
        layout: &LayoutState,
        target: DragTarget,
        screen_delta: Vec2,
    ) -> Result<DragUpdate, DragError> {
        let session = self
            .sessions
            .get_mut(&target)
            .ok_or(DragError::NotDragging(target))?;
        session.update(layout, screen_delta)
    }

    /// End the drag and return the layout with the snapped position applied.
    pub fn commit_drag(
        &mut self,
        layout: &LayoutState,
        target: DragTarget,
    ) -> Result<LayoutState, DragError> {
        let session = self
            .sessions
            .remove(&target)
            .ok_or(DragError::NotDragging(target))?;
        Ok(session.commit(layout))
    }

    /// Drop the drag without touching the layout. Returns whether one existed.
    pub fn cancel_drag(&mut self, target: DragTarget) -> bool {
        let existed = self.sessions.remove(&target).is_some();
        if existed {
            log::debug!("Drag cancelled on {}", target);
        }
        existed
    }
}
