//! RoomPlan Headless Layout Harness
//!
//! Sweeps the layout core across every view angle and both projection
//! modes. Runs entirely in-process, with no renderer or UI.
//!
//! Usage:
//!   cargo run -p roomplan-simtest
//!   cargo run -p roomplan-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p roomplan-simtest

use std::collections::HashSet;

use roomplan_logic::codec::{decode_layout, decode_or_default, encode_layout};
use roomplan_logic::commands::{
    add_attachment, add_item, move_item, rotate_item, update_attachment, AttachmentUpdate,
};
use roomplan_logic::config::PlannerConfig;
use roomplan_logic::constants::ROUND_TRIP_TOLERANCE;
use roomplan_logic::depth::{attachment_depth, draw_order, item_depth, occluded_attachments, Drawable};
use roomplan_logic::drag::{snap_coordinate, DragController, DragTarget};
use roomplan_logic::geometry::{Point3, Vec2};
use roomplan_logic::model::{AttachmentKind, LayoutState, Room, Rotation, WallSide};
use roomplan_logic::presets::{attachment_preset, furniture_preset, furniture_presets, parse_presets};
use roomplan_logic::validity::compute_invalid_ids;
use roomplan_logic::view::{
    rotate_delta, rotate_room_point, rotated_room_dimensions, unrotate_room_point, wall_direction,
    ProjectionMode, Projector, View,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Preset catalog (same JSON a front end would ship) ───────────────────
const PRESETS_JSON: &str = include_str!("../../../data/furniture_presets.json");

/// Room sizes swept by the transform checks. Includes a square and a
/// strongly non-square room so axis swaps are visible.
const ROOMS: [(f64, f64); 4] = [(108.0, 132.0), (120.0, 144.0), (96.0, 96.0), (240.0, 60.0)];

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== RoomPlan Layout Harness ===\n");

    let mut results = Vec::new();

    // 1. Preset catalog validation
    results.extend(validate_preset_catalog(verbose));

    // 2. Quadrant rotation group
    results.extend(validate_rotation_group(verbose));

    // 3. Projection round trips
    results.extend(validate_projection(verbose));

    // 4. Validity engine
    results.extend(validate_validity(verbose));

    // 5. Snapping
    results.extend(validate_snapping(verbose));

    // 6. Drag sweep over every view
    results.extend(validate_drag_sweep(verbose));

    // 7. Depth ordering and occlusion
    results.extend(validate_depth(verbose));

    // 8. Transport codec
    results.extend(validate_codec(verbose));

    // 9. End-to-end scenario
    results.extend(validate_bedroom_scenario(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        log::error!("{} harness check(s) failed", failed);
        std::process::exit(1);
    }
}

fn all_views() -> Vec<View> {
    let mut views = Vec::new();
    for mode in [ProjectionMode::Isometric, ProjectionMode::TopDown] {
        for angle in Rotation::all() {
            views.push(View::new(angle, Projector::new(mode, 4.0)));
        }
    }
    views
}

fn view_label(view: &View) -> String {
    let mode = match view.projector.mode {
        ProjectionMode::Isometric => "iso",
        ProjectionMode::TopDown => "top",
    };
    format!("{}@{}", mode, view.angle.degrees())
}

fn sample_points(w: f64, h: f64) -> Vec<Vec2> {
    let mut points = Vec::new();
    for i in 0..=4 {
        for j in 0..=4 {
            points.push(Vec2::new(w * i as f64 / 4.0, h * j as f64 / 4.0));
        }
    }
    points.push(Vec2::new(17.25, 93.5));
    points.push(Vec2::new(-5.0, h + 3.0));
    points
}

// ── 1. Preset Catalog ───────────────────────────────────────────────────

fn validate_preset_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Preset Catalog ---");
    let mut results = Vec::new();

    let presets = match parse_presets(PRESETS_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::check(
                "presets_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    log::info!("Loaded {} presets from data/furniture_presets.json", presets.len());
    results.push(TestResult::check(
        "presets_not_empty",
        presets.len() >= furniture_presets().len(),
        format!("{} presets loaded", presets.len()),
    ));

    let mut kinds = HashSet::new();
    let dupes: Vec<_> = presets.iter().filter(|p| !kinds.insert(p.kind.as_str())).collect();
    results.push(TestResult::check(
        "presets_unique_kinds",
        dupes.is_empty(),
        if dupes.is_empty() {
            "every kind appears once".to_string()
        } else {
            format!("{} duplicated kinds", dupes.len())
        },
    ));

    // Built-in catalog must agree with the shipped file.
    let mismatched: Vec<String> = furniture_presets()
        .iter()
        .filter(|b| {
            !presets
                .iter()
                .any(|p| p.kind == b.kind && p.width == b.width && p.height == b.height)
        })
        .map(|b| b.kind.clone())
        .collect();
    results.push(TestResult::check(
        "presets_match_builtin",
        mismatched.is_empty(),
        if mismatched.is_empty() {
            "built-in footprints match data file".to_string()
        } else {
            format!("mismatched: {:?}", mismatched)
        },
    ));

    // Every preset can be placed in the default room.
    let room = Room::default();
    let too_big: Vec<_> = presets
        .iter()
        .filter(|p| p.width > room.width || p.height > room.height)
        .map(|p| p.kind.as_str())
        .collect();
    results.push(TestResult::check(
        "presets_fit_default_room",
        too_big.is_empty(),
        format!("{} presets larger than {}×{}", too_big.len(), room.width, room.height),
    ));

    if verbose {
        for p in &presets {
            println!("    {:<12} {:>4}×{:<4} {}", p.kind, p.width, p.height, p.label);
        }
    }

    results
}

// ── 2. Rotation Group ───────────────────────────────────────────────────

fn validate_rotation_group(verbose: bool) -> Vec<TestResult> {
    println!("--- Rotation Group ---");
    let mut results = Vec::new();

    let mut order_four_failures = 0;
    let mut inverse_failures = 0;
    let mut bounds_failures = 0;
    let mut checked = 0;

    for &(w, h) in &ROOMS {
        for p in sample_points(w, h) {
            let mut q = p;
            let (mut cw, mut ch) = (w, h);
            for _ in 0..4 {
                q = rotate_room_point(q, Rotation::Deg90, cw, ch);
                (cw, ch) = rotated_room_dimensions(cw, ch, Rotation::Deg90);
            }
            if !q.approx_eq(p, ROUND_TRIP_TOLERANCE) {
                order_four_failures += 1;
            }

            for angle in Rotation::all() {
                checked += 1;
                let r = rotate_room_point(p, angle, w, h);
                let back = unrotate_room_point(r, angle, w, h);
                if !back.approx_eq(p, ROUND_TRIP_TOLERANCE) {
                    inverse_failures += 1;
                }
                let inside = p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h;
                let (rw, rh) = rotated_room_dimensions(w, h, angle);
                if inside && !(r.x >= 0.0 && r.x <= rw && r.y >= 0.0 && r.y <= rh) {
                    bounds_failures += 1;
                }
            }
        }
    }

    results.push(TestResult::check(
        "rotation_order_four",
        order_four_failures == 0,
        format!("{} points returned after four quarter turns", checked / 4 - order_four_failures),
    ));
    results.push(TestResult::check(
        "rotation_inverse",
        inverse_failures == 0,
        format!("{}/{} unrotate(rotate(p)) == p", checked - inverse_failures, checked),
    ));
    results.push(TestResult::check(
        "rotation_keeps_room_inside",
        bounds_failures == 0,
        format!("{} interior points left the rotated room", bounds_failures),
    ));

    if verbose {
        for angle in Rotation::all() {
            let (rw, rh) = rotated_room_dimensions(108.0, 132.0, angle);
            println!("    {:>3}° → {}×{}", angle.degrees(), rw, rh);
        }
    }

    results
}

// ── 3. Projection ───────────────────────────────────────────────────────

fn validate_projection(verbose: bool) -> Vec<TestResult> {
    println!("--- Projection ---");
    let mut results = Vec::new();

    let deltas = [
        Vec2::new(3.0, -4.0),
        Vec2::new(0.125, 0.5),
        Vec2::new(-250.0, 999.0),
        Vec2::new(12.0, 12.0),
    ];

    let mut ground_failures = Vec::new();
    for view in all_views() {
        for &d in &deltas {
            let s = view.room_delta_to_screen(d);
            match view.screen_delta_to_room(s) {
                Some(back) if back.approx_eq(d, ROUND_TRIP_TOLERANCE) => {}
                other => ground_failures.push(format!("{} {:?} → {:?}", view_label(&view), d, other)),
            }
        }
    }
    results.push(TestResult::check(
        "projection_ground_round_trip",
        ground_failures.is_empty(),
        if ground_failures.is_empty() {
            format!("{} deltas × 8 views", deltas.len())
        } else {
            ground_failures.join("; ")
        },
    ));

    let mut wall_failures = Vec::new();
    for view in all_views() {
        for side in WallSide::all() {
            let dir = rotate_delta(wall_direction(side), view.angle);
            let (along, dz) = (18.0, 6.0);
            let screen = view
                .projector
                .project(Point3::new(dir.x * along, dir.y * along, dz));
            match view.projector.unproject_wall(screen, dir) {
                Some(w) => {
                    let elevation_ok = match view.projector.mode {
                        ProjectionMode::Isometric => w.elevation.is_some_and(|e| (e - dz).abs() < 1e-9),
                        ProjectionMode::TopDown => w.elevation.is_none(),
                    };
                    if (w.along - along).abs() > 1e-9 || !elevation_ok {
                        wall_failures.push(format!("{} {:?}: {:?}", view_label(&view), side, w));
                    }
                }
                None => wall_failures.push(format!("{} {:?}: unmapped", view_label(&view), side)),
            }
        }
    }
    results.push(TestResult::check(
        "projection_wall_round_trip",
        wall_failures.is_empty(),
        if wall_failures.is_empty() {
            "4 walls × 8 views".to_string()
        } else {
            wall_failures.join("; ")
        },
    ));

    let degenerate = Projector::new(ProjectionMode::Isometric, 0.0);
    results.push(TestResult::check(
        "projection_degenerate_scale",
        degenerate.unproject_ground(Vec2::new(4.0, 2.0)).is_none(),
        "zero pixels-per-unit yields no mapping",
    ));

    if verbose {
        let p = Projector::default().project(Point3::new(10.0, 0.0, 0.0));
        println!("    iso (10,0,0) → ({}, {})", p.x, p.y);
    }

    results
}

// ── 4. Validity ─────────────────────────────────────────────────────────

fn validate_validity(_verbose: bool) -> Vec<TestResult> {
    println!("--- Validity ---");
    let mut results = Vec::new();

    let base = LayoutState::new(Room::new(100.0, 100.0));
    let Some(nightstand) = furniture_preset("nightstand") else {
        results.push(TestResult::check("validity_preset", false, "nightstand preset missing"));
        return results;
    };
    let layout = add_item(&base, &nightstand);
    let layout = add_item(&layout, &nightstand);

    let cases: [(&str, (f64, f64), (f64, f64), usize); 5] = [
        ("validity_apart", (0.0, 0.0), (50.0, 50.0), 0),
        ("validity_touching_edges", (0.0, 0.0), (18.0, 0.0), 0),
        ("validity_overlap", (0.0, 0.0), (17.0, 0.0), 2),
        ("validity_flush_far_wall", (82.0, 82.0), (0.0, 0.0), 0),
        ("validity_out_of_bounds", (83.0, 0.0), (0.0, 40.0), 1),
    ];

    for (name, a, b, expected) in cases {
        let l = move_item(&layout, 1, a.0, a.1);
        let l = move_item(&l, 2, b.0, b.1);
        let invalid = compute_invalid_ids(&l.room, &l.items, None);
        results.push(TestResult::check(
            name,
            invalid.len() == expected,
            format!("{} invalid (expected {})", invalid.len(), expected),
        ));
    }

    results
}

// ── 5. Snapping ─────────────────────────────────────────────────────────

fn validate_snapping(_verbose: bool) -> Vec<TestResult> {
    println!("--- Snapping ---");
    let cases = [
        (7.5, 6.0),
        (4.0, 4.0),
        (5.0, 6.0),
        (13.9, 12.0),
        (9.0, 9.0),
        (-7.5, -6.0),
        (0.4, 0.0),
    ];
    cases
        .iter()
        .map(|&(input, expected)| {
            let got = snap_coordinate(input, 6.0, 2.0);
            TestResult::check(
                format!("snap_{}", input),
                got == expected,
                format!("{} → {} (expected {})", input, got, expected),
            )
        })
        .collect()
}

// ── 6. Drag Sweep ───────────────────────────────────────────────────────

fn validate_drag_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Drag Sweep ---");
    let mut results = Vec::new();

    let Some(desk) = furniture_preset("desk") else {
        results.push(TestResult::check("drag_preset", false, "desk preset missing"));
        return results;
    };
    let layout = LayoutState::new(Room::new(108.0, 132.0));
    let layout = move_item(&add_item(&layout, &desk), 1, 30.0, 30.0);
    let layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Door, WallSide::Front));
    let layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Window, WallSide::Left));

    for view in all_views() {
        let label = view_label(&view);
        let mut drags = DragController::default();

        // Item follows the pointer in room space regardless of view.
        let item = DragTarget::Item(1);
        let moved = drags.begin_drag(&layout, item, view).and_then(|_| {
            let screen = view.room_delta_to_screen(Vec2::new(12.0, -6.0));
            drags.update_drag(&layout, item, screen)
        });
        let item_ok = matches!(&moved, Ok(u) if u.position == Vec2::new(42.0, 24.0));
        results.push(TestResult::check(
            format!("drag_item_{}", label),
            item_ok,
            format!("{:?}", moved.as_ref().map(|u| u.position)),
        ));
        let committed = drags.commit_drag(&layout, item);
        results.push(TestResult::check(
            format!("drag_item_commit_{}", label),
            matches!(&committed, Ok(l) if l.item(1).map(|i| (i.x, i.y)) == Some((42.0, 24.0))),
            "committed position matches preview",
        ));

        // Door stays on the floor whatever the pointer does.
        let door = DragTarget::Attachment(1);
        let lifted = drags.begin_drag(&layout, door, view).and_then(|_| {
            let dir = rotate_delta(wall_direction(WallSide::Front), view.angle);
            let screen = view.projector.project(Point3::new(dir.x * 12.0, dir.y * 12.0, 30.0));
            drags.update_drag(&layout, door, screen)
        });
        results.push(TestResult::check(
            format!("drag_door_pinned_{}", label),
            matches!(&lifted, Ok(u) if u.position == Vec2::new(12.0, 0.0)),
            format!("{:?}", lifted.as_ref().map(|u| u.position)),
        ));
        drags.cancel_drag(door);

        // Window rises in isometric views and keeps its elevation top-down.
        let window = DragTarget::Attachment(2);
        let raised = drags.begin_drag(&layout, window, view).and_then(|_| {
            let dir = rotate_delta(wall_direction(WallSide::Left), view.angle);
            let screen = view.projector.project(Point3::new(dir.x * 12.0, dir.y * 12.0, 6.0));
            drags.update_drag(&layout, window, screen)
        });
        let expected_elevation = match view.projector.mode {
            ProjectionMode::Isometric => 36.0,
            ProjectionMode::TopDown => 30.0,
        };
        results.push(TestResult::check(
            format!("drag_window_{}", label),
            matches!(&raised, Ok(u) if u.position == Vec2::new(12.0, expected_elevation)),
            format!("{:?}", raised.as_ref().map(|u| u.position)),
        ));
        let committed = drags.commit_drag(&layout, window);
        results.push(TestResult::check(
            format!("drag_window_commit_{}", label),
            matches!(&committed, Ok(l) if l.attachment(2).map(|a| (a.x, a.y)) == Some((12.0, expected_elevation))),
            "attachment written on commit",
        ));

        if verbose {
            if let Ok(u) = &moved {
                println!(
                    "    {:<7} item → ({}, {}) screen ({:.1}, {:.1})",
                    label, u.position.x, u.position.y, u.screen_position.x, u.screen_position.y
                );
            }
        }
    }

    // Door elevation edits are ignored outside drags too.
    let edited = update_attachment(
        &layout,
        1,
        AttachmentUpdate {
            y: Some(40.0),
            ..AttachmentUpdate::default()
        },
    );
    results.push(TestResult::check(
        "door_update_pinned",
        edited.attachment(1).map(|a| a.y) == Some(0.0),
        "door elevation edit ignored",
    ));

    results
}

// ── 7. Depth ────────────────────────────────────────────────────────────

fn validate_depth(verbose: bool) -> Vec<TestResult> {
    println!("--- Depth ---");
    let mut results = Vec::new();

    let (layout, _, _) = match bedroom() {
        Some(b) => b,
        None => {
            results.push(TestResult::check("depth_setup", false, "bedroom presets missing"));
            return results;
        }
    };
    let mut layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Window, WallSide::Back));
    for side in [WallSide::Left, WallSide::Right, WallSide::Front] {
        layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Shelf, side));
    }

    for angle in Rotation::all() {
        let order = draw_order(&layout, angle);
        let ranks: Vec<f64> = order
            .iter()
            .filter_map(|d| match *d {
                Drawable::Item(id) => layout.item(id).map(|i| item_depth(i, angle, &layout.room)),
                Drawable::Attachment(id) => layout
                    .attachment(id)
                    .map(|a| attachment_depth(a, angle, &layout.room)),
            })
            .collect();
        let sorted = ranks.windows(2).all(|w| w[0] <= w[1]);
        let complete = order.len() == layout.items.len() + layout.attachments.len();
        results.push(TestResult::check(
            format!("depth_order_{}", angle.degrees()),
            sorted && complete,
            format!("{} drawables back to front", order.len()),
        ));

        if verbose {
            let occluded = occluded_attachments(&layout, angle, PlannerConfig::default().occlusion_buffer);
            println!("    {:>3}° occluded attachments: {:?}", angle.degrees(), occluded);
        }
    }

    results
}

// ── 8. Codec ────────────────────────────────────────────────────────────

fn validate_codec(_verbose: bool) -> Vec<TestResult> {
    println!("--- Codec ---");
    let mut results = Vec::new();

    let Some((layout, _, _)) = bedroom() else {
        results.push(TestResult::check("codec_setup", false, "bedroom presets missing"));
        return results;
    };
    let layout = add_attachment(&layout, &attachment_preset(AttachmentKind::Shelf, WallSide::Right));

    let round_trip = encode_layout(&layout).map_err(|e| e.to_string()).and_then(|s| {
        decode_layout(&s).map_err(|e| e.to_string())
    });
    results.push(TestResult::check(
        "codec_round_trip",
        round_trip.as_ref() == Ok(&layout),
        match &round_trip {
            Ok(l) => format!("{} items, {} attachments", l.items.len(), l.attachments.len()),
            Err(e) => e.clone(),
        },
    ));

    for (name, input) in [
        ("codec_garbage", "not a layout"),
        ("codec_empty", ""),
        ("codec_future_version", r#"{"version":99,"layout":{"room":{"width":10,"height":10}}}"#),
    ] {
        results.push(TestResult::check(
            name,
            decode_or_default(input) == LayoutState::default(),
            "falls back to empty layout",
        ));
    }

    results
}

// ── 9. Scenario ─────────────────────────────────────────────────────────

/// Room 108×132 with a queen bed at (10,10) and a desk rotated 90° at
/// (80,10). Returns the layout and the bed/desk ids.
fn bedroom() -> Option<(LayoutState, u32, u32)> {
    let layout = LayoutState::new(Room::new(108.0, 132.0));
    let layout = add_item(&layout, &furniture_preset("queen_bed")?);
    let bed = layout.next_item_id() - 1;
    let layout = move_item(&layout, bed, 10.0, 10.0);
    let layout = add_item(&layout, &furniture_preset("desk")?);
    let desk = layout.next_item_id() - 1;
    let layout = rotate_item(&layout, desk);
    let layout = move_item(&layout, desk, 80.0, 10.0);
    Some((layout, bed, desk))
}

fn validate_bedroom_scenario(_verbose: bool) -> Vec<TestResult> {
    println!("--- Bedroom Scenario ---");
    let mut results = Vec::new();

    let Some((layout, bed, desk)) = bedroom() else {
        results.push(TestResult::check("scenario_setup", false, "bedroom presets missing"));
        return results;
    };
    let invalid = compute_invalid_ids(&layout.room, &layout.items, None);

    results.push(TestResult::check(
        "scenario_bed_valid",
        !invalid.contains(&bed),
        "queen bed at (10,10) fits",
    ));
    results.push(TestResult::check(
        "scenario_desk_out_of_bounds",
        invalid.contains(&desk),
        match layout.item(desk) {
            Some(d) => format!("desk spans x={}..{} in a {} room", d.x, d.rect().max_x(), layout.room.width),
            None => "desk missing".to_string(),
        },
    ));

    let unrotated = rotate_item(&layout, desk);
    results.push(TestResult::check(
        "scenario_unrotated_desk_fits",
        compute_invalid_ids(&unrotated.room, &unrotated.items, None).is_empty(),
        "24×48 desk at (80,10) is inside",
    ));

    results
}
