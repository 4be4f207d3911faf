//! Validity engine. Bounds and overlap checks over item footprints.
//!
//! Pure functions that take the room and item list and report which items
//! are out of bounds or overlapping another. The result is advisory: it
//! never blocks an edit. Wall attachments are not checked here; their
//! placement is clamped when they are updated.
//!
//! [`compute_invalid_ids`] and [`describe_issues`] read the same list of
//! problems, so the id set and the diagnostics always agree.

use std::collections::HashSet;

use crate::geometry::Rect;
use crate::model::{FurnitureItem, Room};

/// An item's position during a drag, evaluated in place of its stored one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HypotheticalPlacement {
    pub item_id: u32,
    pub rect: Rect,
}

/// Advisory diagnostic for one invalid placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub category: &'static str,
    pub item_ids: Vec<u32>,
    pub message: String,
}

/// One problem, by index into the item list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Problem {
    OutOfBounds(usize),
    Overlap(usize, usize),
}

fn effective_rects(
    items: &[FurnitureItem],
    hypothetical: Option<HypotheticalPlacement>,
) -> Vec<Rect> {
    items
        .iter()
        .map(|item| match hypothetical {
            Some(h) if h.item_id == item.id => h.rect,
            _ => item.rect(),
        })
        .collect()
}

/// One O(n) bounds pass, then an O(n²) pairwise pass. Touching edges are
/// not an overlap.
fn find_problems(room: &Room, rects: &[Rect]) -> Vec<Problem> {
    let mut problems: Vec<Problem> = rects
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.within(room.width, room.height))
        .map(|(i, _)| Problem::OutOfBounds(i))
        .collect();

    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                problems.push(Problem::Overlap(i, j));
            }
        }
    }
    problems
}

/// Ids of items that are out of bounds or overlap another item. Both
/// members of an overlapping pair are marked.
pub fn compute_invalid_ids(
    room: &Room,
    items: &[FurnitureItem],
    hypothetical: Option<HypotheticalPlacement>,
) -> HashSet<u32> {
    let rects = effective_rects(items, hypothetical);
    let mut invalid = HashSet::new();
    for problem in find_problems(room, &rects) {
        match problem {
            Problem::OutOfBounds(i) => {
                invalid.insert(items[i].id);
            }
            Problem::Overlap(i, j) => {
                invalid.insert(items[i].id);
                invalid.insert(items[j].id);
            }
        }
    }
    invalid
}

/// Aggregate flag for the "layout has problems" banner.
pub fn has_invalid_items(room: &Room, items: &[FurnitureItem]) -> bool {
    !compute_invalid_ids(room, items, None).is_empty()
}

/// Human-readable diagnostics, one per out-of-bounds item and one per
/// overlapping pair.
pub fn describe_issues(room: &Room, items: &[FurnitureItem]) -> Vec<ValidationIssue> {
    let rects = effective_rects(items, None);
    find_problems(room, &rects)
        .into_iter()
        .map(|problem| match problem {
            Problem::OutOfBounds(i) => {
                let (item, r) = (&items[i], rects[i]);
                ValidationIssue {
                    category: "bounds",
                    item_ids: vec![item.id],
                    message: format!(
                        "{} #{} extends outside room: ({:.1},{:.1})→({:.1},{:.1}) vs room {}×{}",
                        item.kind,
                        item.id,
                        r.min_x(),
                        r.min_y(),
                        r.max_x(),
                        r.max_y(),
                        room.width,
                        room.height
                    ),
                }
            }
            Problem::Overlap(i, j) => {
                let (a, b) = (&items[i], &items[j]);
                ValidationIssue {
                    category: "overlap",
                    item_ids: vec![a.id, b.id],
                    message: format!("{} #{} overlaps {} #{}", a.kind, a.id, b.kind, b.id),
                }
            }
        })
        .collect()
}
