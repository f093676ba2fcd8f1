use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity::EntityRef;

/// A pointer position in layout coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Vertical midpoint, used for insert-before/after decisions
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Corners in a fixed order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.left(), self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// True when the two boxes share a region of positive area. Boxes that
    /// only touch along an edge do not intersect, and neither does a box
    /// with NaN coordinates.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Same box moved so that its center sits on `p`
    pub fn centered_on(&self, p: Point) -> Rect {
        Rect::new(
            p.x - self.width / 2.0,
            p.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

/// Source of current bounding boxes for drop candidates.
///
/// `None` means the entity cannot be measured right now (e.g. it is not
/// mounted because its group is collapsed).
pub trait GeometryProvider {
    fn bounds(&self, entity: &EntityRef) -> Option<Rect>;
}

/// A measured layout: bounding boxes keyed by entity, in candidate order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    rects: IndexMap<EntityRef, Rect>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: EntityRef, rect: Rect) {
        self.rects.insert(entity, rect);
    }

    pub fn with(mut self, entity: EntityRef, rect: Rect) -> Self {
        self.insert(entity, rect);
        self
    }

    pub fn remove(&mut self, entity: &EntityRef) -> Option<Rect> {
        self.rects.shift_remove(entity)
    }

    /// All measured entities in insertion order
    pub fn candidates(&self) -> Vec<EntityRef> {
        self.rects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl GeometryProvider for Layout {
    fn bounds(&self, entity: &EntityRef) -> Option<Rect> {
        self.rects.get(entity).copied()
    }
}

/// Layouts are stored as a list of `{kind, id, x, y, width, height}`
/// objects since JSON object keys must be strings.
#[derive(Serialize, Deserialize)]
struct LayoutEntry {
    #[serde(flatten)]
    entity: EntityRef,
    #[serde(flatten)]
    rect: Rect,
}

impl Serialize for Layout {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<LayoutEntry> = self
            .rects
            .iter()
            .map(|(entity, rect)| LayoutEntry {
                entity: entity.clone(),
                rect: *rect,
            })
            .collect();
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<LayoutEntry>::deserialize(deserializer)?;
        Ok(Layout {
            rects: entries.into_iter().map(|e| (e.entity, e.rect)).collect(),
        })
    }
}
