//! Picks the single drop candidate a dragged box is "over".
//!
//! Two tiers: among candidates that intersect the dragged box, the one
//! whose center is closest wins; when nothing intersects, the candidate
//! with the smallest mean corner distance over the full set wins. Ties go
//! to the candidate listed first.

use crate::model::entity::EntityRef;
use crate::model::geometry::{Point, Rect};

/// A drop candidate with its measured bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    pub target: EntityRef,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(target: EntityRef, rect: Rect) -> Self {
        Droppable { target, rect }
    }
}

/// Resolve the best drop candidate for `dragged`, or `None` when there are
/// no candidates at all.
pub fn resolve<'a>(dragged: &Rect, candidates: &'a [Droppable]) -> Option<&'a Droppable> {
    let overlapping = rect_intersection(dragged, candidates);
    if overlapping.is_empty() {
        closest_corners(dragged, candidates.iter())
    } else {
        closest_center(dragged, overlapping.into_iter())
    }
}

/// Candidates whose box overlaps `dragged`, in candidate order
pub fn rect_intersection<'a>(dragged: &Rect, candidates: &'a [Droppable]) -> Vec<&'a Droppable> {
    candidates
        .iter()
        .filter(|c| c.rect.intersects(dragged))
        .collect()
}

/// Candidate whose center is nearest to the dragged box's center
pub fn closest_center<'a>(
    dragged: &Rect,
    candidates: impl Iterator<Item = &'a Droppable>,
) -> Option<&'a Droppable> {
    let center = dragged.center();
    min_by_distance(candidates, |c| c.rect.center().distance(center))
}

/// Candidate whose corners are, on average, nearest to the dragged box's
/// corresponding corners
pub fn closest_corners<'a>(
    dragged: &Rect,
    candidates: impl Iterator<Item = &'a Droppable>,
) -> Option<&'a Droppable> {
    let corners = dragged.corners();
    min_by_distance(candidates, |c| corner_distance(&corners, &c.rect))
}

fn corner_distance(corners: &[Point; 4], rect: &Rect) -> f64 {
    let total: f64 = rect
        .corners()
        .iter()
        .zip(corners.iter())
        .map(|(a, b)| a.distance(*b))
        .sum();
    total / 4.0
}

/// First candidate with the strictly smallest distance. NaN distances
/// never win.
fn min_by_distance<'a>(
    candidates: impl Iterator<Item = &'a Droppable>,
    distance: impl Fn(&Droppable) -> f64,
) -> Option<&'a Droppable> {
    let mut best: Option<(&'a Droppable, f64)> = None;
    for c in candidates {
        let d = distance(c);
        match best {
            Some((_, best_d)) if !(d < best_d) => {}
            _ if d.is_nan() => {}
            _ => best = Some((c, d)),
        }
    }
    best.map(|(c, _)| c)
}
