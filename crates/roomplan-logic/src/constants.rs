//! Layout constants. Grid, snapping, default room size, render heights.
//!
//! All lengths are in room units (inches). Screen quantities are in pixels.

/// Grid spacing that drag positions snap to.
pub const GRID_SIZE: f64 = 6.0;

/// A candidate snaps only when strictly closer than this to a grid line.
pub const SNAP_THRESHOLD: f64 = 2.0;

/// Offset applied on both axes when duplicating an item.
pub const DUPLICATE_OFFSET: f64 = 5.0;

/// Depth-rank margin before an item is considered to occlude a wall fixture.
pub const OCCLUSION_BUFFER: f64 = 10.0;

/// Default screen scale for both projection modes.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 4.0;

/// Room used for a fresh or unrecoverable layout (10ft × 12ft).
pub const DEFAULT_ROOM_WIDTH: f64 = 120.0;
pub const DEFAULT_ROOM_HEIGHT: f64 = 144.0;

/// Relative tolerance for projection and rotation round trips.
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-6;

/// Transport envelope version written by [`crate::codec::encode_layout`].
pub const LAYOUT_FORMAT_VERSION: u32 = 1;

pub mod render_heights {
    //! Extrusion heights used when an item or preset omits `vertical_extent`.
    pub const FURNITURE_DEFAULT: f64 = 30.0;
    pub const WALL: f64 = 96.0;
}

pub mod attachment_defaults {
    //! Default sizes (width × height, elevation) for wall fixtures.
    pub const WINDOW_WIDTH: f64 = 36.0;
    pub const WINDOW_HEIGHT: f64 = 48.0;
    pub const WINDOW_ELEVATION: f64 = 30.0;

    pub const DOOR_WIDTH: f64 = 32.0;
    pub const DOOR_HEIGHT: f64 = 80.0;

    pub const SHELF_WIDTH: f64 = 30.0;
    pub const SHELF_HEIGHT: f64 = 2.0;
    pub const SHELF_ELEVATION: f64 = 48.0;
    pub const SHELF_DEPTH: f64 = 8.0;
}
