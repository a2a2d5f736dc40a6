//! Shape assembly: classify contours into exteriors and holes and union
//! overlapping parts.
//!
//! Ring roles follow the nonzero winding convention of the font: the ring
//! with the largest absolute area is always an exterior, so its orientation
//! fixes the exterior direction (TrueType and CFF fonts disagree on it).
//! Rings with the opposite orientation are holes.

use cavalier_contours::polyline::{BooleanOp, PlineSource, PlineSourceMut, PlineVertex, Polyline};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{BoundingBox, Contour, Point};

/// Rings with less area than this (in squared design units) enclose nothing.
const MIN_RING_AREA: f64 = 1e-9;

/// Vertex spacing below which consecutive boolean-result vertices merge.
const DEDUP_TOLERANCE: f64 = 1e-7;

/// Role of a ring within a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingRole {
    Exterior,
    Hole,
}

/// One connected filled region: an exterior ring minus its holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePart {
    pub exterior: Contour,
    pub holes: Vec<Contour>,
}

impl ShapePart {
    pub fn new(exterior: Contour) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.exterior.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }

    /// Filled area: exterior area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Contour::area).sum();
        (self.exterior.area() - holes).max(0.0)
    }
}

/// The filled region of a single character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shape {
    pub parts: Vec<ShapePart>,
}

impl Shape {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Bounds of all exteriors.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.parts
            .iter()
            .filter_map(|p| p.exterior.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Empty shapes and shapes whose bounds have no width or height.
    pub fn is_degenerate(&self) -> bool {
        self.bounds().map_or(true, |b| b.is_degenerate())
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.parts.iter().any(|part| part.contains(p))
    }

    pub fn area(&self) -> f64 {
        self.parts.iter().map(ShapePart::area).sum()
    }

    pub fn hole_count(&self) -> usize {
        self.parts.iter().map(|p| p.holes.len()).sum()
    }

    /// All rings with their roles, exteriors first within each part.
    pub fn rings(&self) -> impl Iterator<Item = (RingRole, &Contour)> {
        self.parts.iter().flat_map(|part| {
            std::iter::once((RingRole::Exterior, &part.exterior))
                .chain(part.holes.iter().map(|h| (RingRole::Hole, h)))
        })
    }

    /// Copy of the shape with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Shape {
        Shape {
            parts: self
                .parts
                .iter()
                .map(|part| ShapePart {
                    exterior: part.exterior.scaled(factor),
                    holes: part.holes.iter().map(|h| h.scaled(factor)).collect(),
                })
                .collect(),
        }
    }
}

/// Assemble raw contours of one character into a unioned [`Shape`].
pub fn build_shape(contours: Vec<Contour>) -> Shape {
    let rings: Vec<Contour> = contours
        .into_iter()
        .filter(|c| !c.is_degenerate() && c.area() > MIN_RING_AREA)
        .collect();

    let Some(dominant) = rings
        .iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .map(Contour::signed_area)
    else {
        return Shape::empty();
    };
    let exterior_sign = dominant.signum();

    let mut parts: Vec<ShapePart> = Vec::new();
    let mut holes: Vec<Contour> = Vec::new();
    for ring in rings {
        if ring.signed_area().signum() == exterior_sign {
            parts.push(ShapePart::new(ccw(ring)));
        } else {
            holes.push(cw(ring));
        }
    }

    for hole in holes {
        match parent_of(&hole, &parts) {
            Some(idx) => parts[idx].holes.push(hole),
            None => debug!(points = hole.len(), "Dropping hole outside every exterior"),
        }
    }

    let parts = union_parts(parts);
    debug!(parts = parts.len(), "Built shape");
    Shape { parts }
}

/// Index of the smallest exterior enclosing `hole`.
fn parent_of(hole: &Contour, parts: &[ShapePart]) -> Option<usize> {
    parts
        .iter()
        .enumerate()
        .filter(|(_, part)| encloses(&part.exterior, hole))
        .min_by(|(_, a), (_, b)| a.exterior.area().total_cmp(&b.exterior.area()))
        .map(|(idx, _)| idx)
}

/// A vertex strictly inside, or bounds within bounds. The bounds check
/// catches holes whose vertices all sit on the exterior's edges.
fn encloses(exterior: &Contour, hole: &Contour) -> bool {
    if hole.points.iter().any(|p| exterior.contains(p)) {
        return true;
    }
    match (exterior.bounds(), hole.bounds()) {
        (Some(e), Some(h)) => {
            h.min_x >= e.min_x && h.min_y >= e.min_y && h.max_x <= e.max_x && h.max_y <= e.max_y
        }
        _ => false,
    }
}

/// Repeatedly merge overlapping parts until every pair is disjoint.
fn union_parts(mut parts: Vec<ShapePart>) -> Vec<ShapePart> {
    'restart: loop {
        for i in 0..parts.len() {
            for j in (i + 1)..parts.len() {
                let bounds_meet = match (parts[i].exterior.bounds(), parts[j].exterior.bounds()) {
                    (Some(a), Some(b)) => a.intersects(&b),
                    _ => false,
                };
                if !bounds_meet || !fills_overlap(&parts[i], &parts[j]) {
                    continue;
                }
                if let Some(merged) = merge_parts(&parts[i], &parts[j]) {
                    parts.swap_remove(j);
                    parts[i] = merged;
                    continue 'restart;
                }
            }
        }
        return parts;
    }
}

/// Whether the filled regions of two parts share area. Exteriors that only
/// meet inside a hole of either part do not count, which keeps an island
/// sitting in a counter (the dot of a dotted zero) as its own part.
fn fills_overlap(a: &ShapePart, b: &ShapePart) -> bool {
    let common = to_pline(&a.exterior).boolean(&to_pline(&b.exterior), BooleanOp::And);
    common.pos_plines.iter().any(|r| {
        let region = from_pline(&r.pline);
        !region.is_degenerate()
            && region.area() > MIN_RING_AREA
            && !a.holes.iter().chain(&b.holes).any(|h| covers(h, &region))
    })
}

/// `region` lies entirely within `hole`.
fn covers(hole: &Contour, region: &Contour) -> bool {
    to_pline(region)
        .boolean(&to_pline(hole), BooleanOp::Not)
        .pos_plines
        .iter()
        .all(|r| from_pline(&r.pline).area() <= MIN_RING_AREA)
}

/// Union of two parts, or `None` when their exteriors do not overlap.
///
/// Holes of the union are the parts of each hole not covered by the other
/// exterior, the overlap of holes from both sides, and any gaps the union of
/// the exteriors encloses.
fn merge_parts(a: &ShapePart, b: &ShapePart) -> Option<ShapePart> {
    let ext_a = to_pline(&a.exterior);
    let ext_b = to_pline(&b.exterior);
    let union = ext_a.boolean(&ext_b, BooleanOp::Or);
    if union.pos_plines.len() != 1 {
        return None;
    }

    let exterior = ccw(from_pline(&union.pos_plines[0].pline));
    if exterior.is_degenerate() {
        return None;
    }

    let mut holes: Vec<Contour> = union
        .neg_plines
        .iter()
        .map(|r| cw(from_pline(&r.pline)))
        .collect();

    for hole in &a.holes {
        holes.extend(boolean_rings(hole, &ext_b, BooleanOp::Not));
    }
    for hole in &b.holes {
        holes.extend(boolean_rings(hole, &ext_a, BooleanOp::Not));
    }
    for ha in &a.holes {
        for hb in &b.holes {
            holes.extend(boolean_rings(ha, &to_pline(hb), BooleanOp::And));
        }
    }
    holes.retain(|h| !h.is_degenerate() && h.area() > MIN_RING_AREA);

    Some(ShapePart { exterior, holes })
}

fn boolean_rings(ring: &Contour, other: &Polyline<f64>, op: BooleanOp) -> Vec<Contour> {
    let result = to_pline(ring).boolean(other, op);
    result
        .pos_plines
        .iter()
        .map(|r| cw(from_pline(&r.pline)))
        .collect()
}

/// Closed polyline with counter-clockwise orientation.
fn to_pline(contour: &Contour) -> Polyline<f64> {
    let ring = ccw(contour.clone());
    let mut pline = Polyline::new();
    for p in &ring.points {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

fn from_pline(pline: &Polyline<f64>) -> Contour {
    let mut points: Vec<Point> = Vec::with_capacity(pline.vertex_data.len());
    for v in &pline.vertex_data {
        let p = Point::new(v.x, v.y);
        if let Some(last) = points.last() {
            if last.distance_to(&p) < DEDUP_TOLERANCE {
                continue;
            }
        }
        points.push(p);
    }
    if points.len() > 1 && points[0].distance_to(&points[points.len() - 1]) < DEDUP_TOLERANCE {
        points.pop();
    }
    Contour::new(points)
}

fn ccw(contour: Contour) -> Contour {
    if contour.signed_area() < 0.0 {
        contour.reversed()
    } else {
        contour
    }
}

fn cw(contour: Contour) -> Contour {
    if contour.signed_area() > 0.0 {
        contour.reversed()
    } else {
        contour
    }
}
