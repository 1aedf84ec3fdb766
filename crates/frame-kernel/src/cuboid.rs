//! Axis-aligned cuboid and rectangle arithmetic backing [`crate::BoxKernel`].

use frame_types::{Point2, Rect2};
use nalgebra::{Point3, Vector3};

use crate::types::{Axis, BoundingBox3, Plane, Segment3};

/// Coincidence tolerance for cuboid bookkeeping.
pub(crate) const EPS: f64 = 1e-9;

/// A solid axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cuboid {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Cuboid {
    pub fn from_corners(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Sweep a rectangle on `plane` along the plane normal by `distance`.
    pub fn swept(plane: &Plane, rect: &Rect2, distance: f64) -> Self {
        let a = plane.to_world(rect.min);
        let mut b = plane.to_world(rect.max);
        b[plane.normal.index()] += distance;
        Self::from_corners(a, b)
    }

    pub fn volume(&self) -> f64 {
        let size = self.max - self.min;
        size.x * size.y * size.z
    }

    pub fn is_degenerate(&self) -> bool {
        (0..3).any(|i| self.max[i] - self.min[i] <= EPS)
    }

    pub fn bbox(&self) -> BoundingBox3 {
        BoundingBox3::new(self.min, self.max)
    }

    fn overlap_on(&self, other: &Cuboid, axis: usize) -> f64 {
        self.max[axis].min(other.max[axis]) - self.min[axis].max(other.min[axis])
    }

    /// Volume shared with `other`, zero when they only touch.
    pub fn intersection_volume(&self, other: &Cuboid) -> f64 {
        (0..3).map(|i| self.overlap_on(other, i).max(0.0)).product()
    }

    /// True when the two share positive volume.
    pub fn overlaps(&self, other: &Cuboid) -> bool {
        (0..3).all(|i| self.overlap_on(other, i) > EPS)
    }

    /// True when the two share volume, a face patch, an edge or a corner.
    pub fn touches(&self, other: &Cuboid) -> bool {
        (0..3).all(|i| self.overlap_on(other, i) >= -EPS)
    }

    /// Pieces of `self` outside `tool`, split slab by slab along X, Y, Z.
    pub fn subtract(&self, tool: &Cuboid) -> Vec<Cuboid> {
        if !self.overlaps(tool) {
            return vec![*self];
        }
        let mut pieces = Vec::new();
        let mut rest = *self;
        for axis in 0..3 {
            if rest.min[axis] < tool.min[axis] - EPS {
                let mut piece = rest;
                piece.max[axis] = tool.min[axis];
                pieces.push(piece);
                rest.min[axis] = tool.min[axis];
            }
            if rest.max[axis] > tool.max[axis] + EPS {
                let mut piece = rest;
                piece.min[axis] = tool.max[axis];
                pieces.push(piece);
                rest.max[axis] = tool.max[axis];
            }
        }
        pieces
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Cuboid {
        Cuboid {
            min: self.min + *offset,
            max: self.max + *offset,
        }
    }

    /// The cuboid's footprint in the local coordinates of a plane normal to `axis`.
    pub fn footprint(&self, axis: Axis) -> Rect2 {
        let (u, v) = axis.local_axes();
        Rect2::new(
            self.min[u.index()],
            self.min[v.index()],
            self.max[u.index()],
            self.max[v.index()],
        )
    }
}

/// Subtract every cuboid of `tools` from every cuboid of `cells`.
pub(crate) fn subtract_all(cells: &[Cuboid], tools: &[Cuboid]) -> Vec<Cuboid> {
    let mut remaining = cells.to_vec();
    for tool in tools {
        remaining = remaining
            .iter()
            .flat_map(|cell| cell.subtract(tool))
            .filter(|cell| !cell.is_degenerate())
            .collect();
    }
    remaining
}

/// Pieces of `a` outside `b`, at most four.
pub(crate) fn subtract_rect(a: &Rect2, b: &Rect2) -> Vec<Rect2> {
    if a.overlap_area(b) <= EPS * EPS {
        return vec![*a];
    }
    let mut pieces = Vec::new();
    let mut rest = *a;
    if rest.min.x < b.min.x - EPS {
        pieces.push(Rect2::new(rest.min.x, rest.min.y, b.min.x, rest.max.y));
        rest.min.x = b.min.x;
    }
    if rest.max.x > b.max.x + EPS {
        pieces.push(Rect2::new(b.max.x, rest.min.y, rest.max.x, rest.max.y));
        rest.max.x = b.max.x;
    }
    if rest.min.y < b.min.y - EPS {
        pieces.push(Rect2::new(rest.min.x, rest.min.y, rest.max.x, b.min.y));
    }
    if rest.max.y > b.max.y + EPS {
        pieces.push(Rect2::new(rest.min.x, b.max.y, rest.max.x, rest.max.y));
    }
    pieces
}

/// A planar rectangular patch of a body's boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Patch {
    pub axis: Axis,
    /// Outward normal points along +axis when true.
    pub positive: bool,
    /// Plane position along `axis`.
    pub coord: f64,
    pub rect: Rect2,
}

impl Patch {
    pub fn plane(&self) -> Plane {
        Plane {
            normal: self.axis,
            offset: self.coord,
        }
    }

    pub fn normal(&self) -> Vector3<f64> {
        if self.positive {
            self.axis.unit()
        } else {
            -self.axis.unit()
        }
    }

    pub fn bbox(&self) -> BoundingBox3 {
        let plane = self.plane();
        BoundingBox3::new(plane.to_world(self.rect.min), plane.to_world(self.rect.max))
    }

    pub fn center(&self) -> Point3<f64> {
        self.plane().to_world(self.rect.center())
    }

    pub fn contains(&self, p: &Point3<f64>, tol: f64) -> bool {
        if (p[self.axis.index()] - self.coord).abs() > tol {
            return false;
        }
        let local = self.plane().to_local(p);
        local.x >= self.rect.min.x - tol
            && local.x <= self.rect.max.x + tol
            && local.y >= self.rect.min.y - tol
            && local.y <= self.rect.max.y + tol
    }

    pub fn edges(&self) -> Vec<Segment3> {
        let plane = self.plane();
        let r = &self.rect;
        let corners = [
            Point2::new(r.min.x, r.min.y),
            Point2::new(r.max.x, r.min.y),
            Point2::new(r.max.x, r.max.y),
            Point2::new(r.min.x, r.max.y),
        ];
        (0..4)
            .map(|i| Segment3 {
                start: plane.to_world(corners[i]),
                end: plane.to_world(corners[(i + 1) % 4]),
            })
            .collect()
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Patch {
        let (u, v) = self.axis.local_axes();
        let du = offset[u.index()];
        let dv = offset[v.index()];
        Patch {
            coord: self.coord + offset[self.axis.index()],
            rect: Rect2::new(
                self.rect.min.x + du,
                self.rect.min.y + dv,
                self.rect.max.x + du,
                self.rect.max.y + dv,
            ),
            ..*self
        }
    }

    /// Same plane, same side and the same rectangle.
    pub fn same_patch(&self, other: &Patch) -> bool {
        let close = |p: f64, q: f64| (p - q).abs() <= EPS;
        self.same_plane(other)
            && close(self.rect.min.x, other.rect.min.x)
            && close(self.rect.min.y, other.rect.min.y)
            && close(self.rect.max.x, other.rect.max.x)
            && close(self.rect.max.y, other.rect.max.y)
    }

    fn same_plane(&self, other: &Patch) -> bool {
        self.axis == other.axis
            && self.positive == other.positive
            && (self.coord - other.coord).abs() <= EPS
    }
}

/// Boundary patches of a set of disjoint cuboids forming one body.
///
/// Each cuboid side loses the parts in contact with a neighbouring cuboid
/// of the same set; coplanar leftovers sharing a full edge are merged.
pub(crate) fn boundary_patches(cells: &[Cuboid]) -> Vec<Patch> {
    let mut patches = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let a = axis.index();
            for positive in [false, true] {
                let coord = if positive { cell.max[a] } else { cell.min[a] };
                let mut pieces = vec![cell.footprint(axis)];
                for (j, other) in cells.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let opposite = if positive { other.min[a] } else { other.max[a] };
                    if (opposite - coord).abs() > EPS {
                        continue;
                    }
                    let cover = other.footprint(axis);
                    pieces = pieces
                        .iter()
                        .flat_map(|piece| subtract_rect(piece, &cover))
                        .filter(|piece| piece.width() > EPS && piece.height() > EPS)
                        .collect();
                }
                patches.extend(pieces.into_iter().map(|rect| Patch {
                    axis,
                    positive,
                    coord,
                    rect,
                }));
            }
        }
    }
    merge_patches(patches)
}

fn merge_patches(mut patches: Vec<Patch>) -> Vec<Patch> {
    loop {
        let mut merged_any = false;
        'outer: for i in 0..patches.len() {
            for j in (i + 1)..patches.len() {
                if !patches[i].same_plane(&patches[j]) {
                    continue;
                }
                if let Some(rect) = merge_rects(&patches[i].rect, &patches[j].rect) {
                    patches[i].rect = rect;
                    patches.remove(j);
                    merged_any = true;
                    break 'outer;
                }
            }
        }
        if !merged_any {
            return patches;
        }
    }
}

/// Union of two rectangles when it is itself a rectangle sharing a full edge.
fn merge_rects(a: &Rect2, b: &Rect2) -> Option<Rect2> {
    let close = |p: f64, q: f64| (p - q).abs() <= EPS;
    let same_rows = close(a.min.y, b.min.y) && close(a.max.y, b.max.y);
    if same_rows && (close(a.max.x, b.min.x) || close(b.max.x, a.min.x)) {
        return Some(Rect2::new(
            a.min.x.min(b.min.x),
            a.min.y,
            a.max.x.max(b.max.x),
            a.max.y,
        ));
    }
    let same_cols = close(a.min.x, b.min.x) && close(a.max.x, b.max.x);
    if same_cols && (close(a.max.y, b.min.y) || close(b.max.y, a.min.y)) {
        return Some(Rect2::new(
            a.min.x,
            a.min.y.min(b.min.y),
            a.max.x,
            a.max.y.max(b.max.y),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(min: [f64; 3], max: [f64; 3]) -> Cuboid {
        Cuboid::from_corners(Point3::from(min), Point3::from(max))
    }

    #[test]
    fn subtract_disjoint_keeps_cell() {
        let a = cube([0.0; 3], [1.0; 3]);
        let b = cube([2.0; 3], [3.0; 3]);
        assert_eq!(a.subtract(&b), vec![a]);
    }

    #[test]
    fn subtract_preserves_volume_balance() {
        let a = cube([0.0; 3], [4.0, 4.0, 4.0]);
        let tool = cube([1.0, 1.0, -1.0], [2.0, 3.0, 5.0]);
        let pieces = a.subtract(&tool);
        let remaining: f64 = pieces.iter().map(Cuboid::volume).sum();
        assert!((remaining - (64.0 - 8.0)).abs() < 1e-9);
        assert!(pieces.iter().all(|p| !p.overlaps(&tool)));
    }

    #[test]
    fn touching_is_not_overlapping() {
        let a = cube([0.0; 3], [1.0; 3]);
        let b = cube([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
        assert!(a.touches(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn single_cell_has_six_patches() {
        let patches = boundary_patches(&[cube([0.0; 3], [1.0, 2.0, 3.0])]);
        assert_eq!(patches.len(), 6);
        let area: f64 = patches.iter().map(|p| p.rect.area()).sum();
        assert!((area - 2.0 * (2.0 + 3.0 + 6.0)).abs() < 1e-9);
    }

    #[test]
    fn stacked_cells_merge_back_into_six_faces() {
        let cells = [
            cube([0.0; 3], [1.0, 1.0, 1.0]),
            cube([0.0, 1.0, 0.0], [1.0, 2.0, 1.0]),
        ];
        let patches = boundary_patches(&cells);
        assert_eq!(patches.len(), 6);
    }

    #[test]
    fn notched_block_exposes_notch_faces() {
        let block = cube([0.0; 3], [3.0, 1.0, 3.0]);
        let notch = cube([1.0, 0.5, -1.0], [2.0, 2.0, 4.0]);
        let cells = subtract_all(&[block], &[notch]);
        let patches = boundary_patches(&cells);
        // The notch floor faces +Y at y = 0.5.
        assert!(patches
            .iter()
            .any(|p| p.axis == Axis::Y && p.positive && (p.coord - 0.5).abs() < 1e-12));
        let volume: f64 = cells.iter().map(Cuboid::volume).sum();
        assert!((volume - (9.0 - 1.5)).abs() < 1e-9);
    }

    #[test]
    fn rect_subtraction_leaves_frame() {
        let a = Rect2::new(0.0, 0.0, 3.0, 3.0);
        let hole = Rect2::new(1.0, 1.0, 2.0, 2.0);
        let pieces = subtract_rect(&a, &hole);
        assert_eq!(pieces.len(), 4);
        let area: f64 = pieces.iter().map(Rect2::area).sum();
        assert!((area - 8.0).abs() < 1e-12);
    }
}
