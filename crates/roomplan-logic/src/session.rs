//! Editor session. The committed layout plus the non-persisted view state.
//!
//! The session owns the view angle, projection settings, in-progress drags
//! and the cached invalid-id set, and recomputes that set after every
//! mutation. UI code drives it with [`LayoutCommand`]s and drag calls;
//! renderers read [`EditorSession::draw_order`] and friends.
//!
//! ```
//! use roomplan_logic::commands::LayoutCommand;
//! use roomplan_logic::config::PlannerConfig;
//! use roomplan_logic::model::{LayoutState, Room};
//! use roomplan_logic::presets::furniture_preset;
//! use roomplan_logic::session::EditorSession;
//!
//! let mut session = EditorSession::new(LayoutState::new(Room::new(50.0, 50.0)), PlannerConfig::default());
//! session.apply(&LayoutCommand::AddItem { preset: furniture_preset("queen_bed").unwrap() });
//! assert!(session.has_invalid_items()); // 60×80 does not fit in 50×50
//! ```

use std::collections::HashSet;

use crate::codec::{decode_or_default, encode_layout, CodecError};
use crate::commands::{apply_command, duplicate_item_with_offset, LayoutCommand};
use crate::config::PlannerConfig;
use crate::depth::{draw_order, occluded_attachments, Drawable};
use crate::drag::{DragController, DragError, DragTarget, DragUpdate};
use crate::geometry::Vec2;
use crate::model::LayoutState;
use crate::validity::{compute_invalid_ids, describe_issues, ValidationIssue};
use crate::view::{rotated_room_dimensions, View, ViewAngle};

#[derive(Debug, Clone)]
pub struct EditorSession {
    layout: LayoutState,
    config: PlannerConfig,
    view_angle: ViewAngle,
    drags: DragController,
    invalid_ids: HashSet<u32>,
}

impl EditorSession {
    /// Start a session. Unusable config values are replaced by defaults.
    pub fn new(layout: LayoutState, config: PlannerConfig) -> Self {
        let (config, warnings) = config.sanitized();
        for w in &warnings {
            log::warn!("Config {}: {}", w.field, w.message);
        }
        let invalid_ids = compute_invalid_ids(&layout.room, &layout.items, None);
        Self {
            layout,
            config,
            view_angle: ViewAngle::default(),
            drags: DragController::new(config.snap_settings()),
            invalid_ids,
        }
    }

    /// Restore from a transport string, starting empty if it is unreadable.
    pub fn restore(input: &str, config: PlannerConfig) -> Self {
        Self::new(decode_or_default(input), config)
    }

    pub fn export(&self) -> Result<String, CodecError> {
        encode_layout(&self.layout)
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn view_angle(&self) -> ViewAngle {
        self.view_angle
    }

    pub fn view(&self) -> View {
        View::new(self.view_angle, self.config.projector())
    }

    /// Cycle the display rotation by a quarter turn.
    pub fn rotate_view(&mut self) -> ViewAngle {
        self.view_angle = self.view_angle.next();
        log::debug!("View angle now {}°", self.view_angle.degrees());
        self.view_angle
    }

    pub fn set_view_angle(&mut self, angle: ViewAngle) {
        self.view_angle = angle;
    }

    /// Room size as drawn in the current view.
    pub fn rotated_room_dimensions(&self) -> (f64, f64) {
        rotated_room_dimensions(self.layout.room.width, self.layout.room.height, self.view_angle)
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Apply a command and refresh the invalid set.
    pub fn apply(&mut self, command: &LayoutCommand) {
        let next = match command {
            LayoutCommand::DuplicateItem { id } => {
                duplicate_item_with_offset(&self.layout, *id, self.config.duplicate_offset)
            }
            _ => apply_command(&self.layout, command),
        };
        self.replace_layout(next);
    }

    fn replace_layout(&mut self, layout: LayoutState) {
        self.layout = layout;
        self.invalid_ids = compute_invalid_ids(&self.layout.room, &self.layout.items, None);
        if !self.invalid_ids.is_empty() {
            log::debug!("{} invalid item(s) after update", self.invalid_ids.len());
        }
    }

    // ── Validity ────────────────────────────────────────────────────────

    pub fn invalid_ids(&self) -> &HashSet<u32> {
        &self.invalid_ids
    }

    pub fn is_invalid(&self, id: u32) -> bool {
        self.invalid_ids.contains(&id)
    }

    pub fn has_invalid_items(&self) -> bool {
        !self.invalid_ids.is_empty()
    }

    pub fn issues(&self) -> Vec<ValidationIssue> {
        describe_issues(&self.layout.room, &self.layout.items)
    }

    // ── Drags ───────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self, target: DragTarget) -> Result<(), DragError> {
        let view = self.view();
        self.drags.begin_drag(&self.layout, target, view)
    }

    pub fn update_drag(&mut self, target: DragTarget, screen_delta: Vec2) -> Result<DragUpdate, DragError> {
        self.drags.update_drag(&self.layout, target, screen_delta)
    }

    pub fn commit_drag(&mut self, target: DragTarget) -> Result<(), DragError> {
        let next = self.drags.commit_drag(&self.layout, target)?;
        self.replace_layout(next);
        Ok(())
    }

    pub fn cancel_drag(&mut self, target: DragTarget) -> bool {
        self.drags.cancel_drag(target)
    }

    pub fn is_dragging(&self, target: DragTarget) -> bool {
        self.drags.is_dragging(target)
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn draw_order(&self) -> Vec<Drawable> {
        draw_order(&self.layout, self.view_angle)
    }

    pub fn occluded_attachments(&self) -> Vec<u32> {
        occluded_attachments(&self.layout, self.view_angle, self.config.occlusion_buffer)
    }
}
