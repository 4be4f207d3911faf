//! Pure layout logic for RoomPlan.
//!
//! This crate is the spatial core of the room planner: where furniture and
//! wall fixtures are in room coordinates, whether the arrangement is
//! plausible, and how room space maps to a rotatable projected view and
//! back. Functions take plain data and return results, with no renderer,
//! UI, or storage dependency, so every piece is unit-testable and shared by
//! the headless harness and any front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`codec`] | Versioned JSON transport string, with empty-layout fallback |
//! | [`commands`] | Pure layout commands (add/move/rotate/delete/duplicate, attachments, selection) |
//! | [`config`] | Planner configuration (grid, snap threshold, projection scale) |
//! | [`constants`] | Grid, snapping, default room and fixture sizes |
//! | [`depth`] | Painter's-algorithm draw order and wall-fixture occlusion |
//! | [`drag`] | Screen-space drag → snapped room position, per-gesture sessions |
//! | [`geometry`] | `Vec2`, `Point3`, axis-aligned `Rect` |
//! | [`model`] | Room, furniture items, wall attachments, layout state |
//! | [`presets`] | Built-in furniture catalog and fixture defaults |
//! | [`session`] | Editor session threading view angle, drags and validity |
//! | [`validity`] | Bounds and overlap detection, advisory diagnostics |
//! | [`view`] | Quadrant rotation, isometric/top-down projection, wall anchors |

pub mod codec;
pub mod commands;
pub mod config;
pub mod constants;
pub mod depth;
pub mod drag;
pub mod geometry;
pub mod model;
pub mod presets;
pub mod session;
pub mod validity;
pub mod view;
