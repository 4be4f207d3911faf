//! Planner configuration. Snapping, duplication, occlusion and projection.
//!
//! Every field has a default from [`crate::constants`], so a JSON config
//! only needs to name what it overrides.
//!
//! ```
//! use roomplan_logic::config::PlannerConfig;
//! use roomplan_logic::view::ProjectionMode;
//!
//! let config = PlannerConfig::from_json(r#"{"grid_size": 12, "projection": "top_down"}"#).unwrap();
//! assert_eq!(config.grid_size, 12.0);
//! assert_eq!(config.snap_threshold, 2.0);
//! assert_eq!(config.projection, ProjectionMode::TopDown);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PIXELS_PER_UNIT, DUPLICATE_OFFSET, GRID_SIZE, OCCLUSION_BUFFER, SNAP_THRESHOLD,
};
use crate::drag::SnapSettings;
use crate::view::{ProjectionMode, Projector};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Grid spacing for drag snapping.
    pub grid_size: f64,
    /// Snap only when strictly closer than this to a grid line.
    pub snap_threshold: f64,
    /// Offset applied when duplicating an item.
    pub duplicate_offset: f64,
    /// Depth-rank margin for dimming wall fixtures behind furniture.
    pub occlusion_buffer: f64,
    /// Screen scale.
    pub pixels_per_unit: f64,
    pub projection: ProjectionMode,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            duplicate_offset: DUPLICATE_OFFSET,
            occlusion_buffer: OCCLUSION_BUFFER,
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            projection: ProjectionMode::Isometric,
        }
    }
}

/// A config problem. Invalid fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn snap_settings(&self) -> SnapSettings {
        SnapSettings {
            grid_size: self.grid_size,
            threshold: self.snap_threshold,
        }
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.projection, self.pixels_per_unit)
    }

    /// Check every field, replacing unusable values with defaults.
    pub fn sanitized(&self) -> (Self, Vec<ConfigWarning>) {
        let defaults = Self::default();
        let mut out = *self;
        let mut warnings = Vec::new();

        let checks: [(&'static str, &mut f64, f64, bool); 5] = [
            ("grid_size", &mut out.grid_size, defaults.grid_size, false),
            ("snap_threshold", &mut out.snap_threshold, defaults.snap_threshold, true),
            ("duplicate_offset", &mut out.duplicate_offset, defaults.duplicate_offset, true),
            ("occlusion_buffer", &mut out.occlusion_buffer, defaults.occlusion_buffer, true),
            ("pixels_per_unit", &mut out.pixels_per_unit, defaults.pixels_per_unit, false),
        ];
        for (field, value, default, allow_zero) in checks {
            let ok = value.is_finite() && (*value > 0.0 || (allow_zero && *value == 0.0));
            if !ok {
                warnings.push(ConfigWarning {
                    field,
                    message: format!("{} = {} is not usable, using {}", field, value, default),
                });
                *value = default;
            }
        }
        (out, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.grid_size, 6.0);
        assert_eq!(c.snap_threshold, 2.0);
        assert_eq!(c.duplicate_offset, 5.0);
        assert_eq!(c.occlusion_buffer, 10.0);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(PlannerConfig::from_json("{}").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_sanitize_replaces_bad_fields() {
        let bad = PlannerConfig {
            grid_size: 0.0,
            pixels_per_unit: -3.0,
            snap_threshold: 0.0,
            ..PlannerConfig::default()
        };
        let (fixed, warnings) = bad.sanitized();
        assert_eq!(fixed.grid_size, GRID_SIZE);
        assert_eq!(fixed.pixels_per_unit, DEFAULT_PIXELS_PER_UNIT);
        // Zero threshold just disables snapping.
        assert_eq!(fixed.snap_threshold, 0.0);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.field == "pixels_per_unit"));
    }

    #[test]
    fn test_snap_settings_follow_config() {
        let c = PlannerConfig {
            grid_size: 12.0,
            snap_threshold: 3.0,
            ..PlannerConfig::default()
        };
        assert_eq!(c.snap_settings().snap(10.0), 12.0);
    }
}
