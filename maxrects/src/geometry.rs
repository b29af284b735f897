use crate::coord::Coordinate;

/// An axis-aligned rectangle with no payload attached.
///
/// Bins describe their free space as a list of these, and every placed
/// [`Rectangle`](crate::Rectangle) stores its geometry in one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<N> {
    pub pos: (N, N),
    pub size: (N, N),
}

impl<N: Coordinate> Rect<N> {
    #[inline]
    pub fn new(pos: (N, N), size: (N, N)) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn max(&self) -> (N, N) {
        (self.pos.0 + self.size.0, self.pos.1 + self.size.1)
    }

    #[inline]
    pub fn area(&self) -> N::Area {
        N::area(self.size.0, self.size.1)
    }

    /// Whether the interiors of the two rectangles overlap. Rectangles that
    /// only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect<N>) -> bool {
        let self_max = self.max();
        let other_max = other.max();

        other.pos.0 < self_max.0
            && other_max.0 > self.pos.0
            && other.pos.1 < self_max.1
            && other_max.1 > self.pos.1
    }

    /// Whether `other` lies entirely inside this rectangle, boundary
    /// included.
    pub fn contains(&self, other: &Rect<N>) -> bool {
        let self_max = self.max();
        let other_max = other.max();

        other.pos.0 >= self.pos.0
            && other.pos.1 >= self.pos.1
            && other_max.0 <= self_max.0
            && other_max.1 <= self_max.1
    }

    /// Whether a rectangle of the given size could be placed inside this one
    /// without rotating it.
    #[inline]
    pub fn fits(&self, size: (N, N)) -> bool {
        self.size.0 >= size.0 && self.size.1 >= size.1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new((0, 0), (10, 10));
        let b = Rect::new((10, 0), (10, 10));
        let c = Rect::new((0, 10), (10, 10));

        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn overlapping_interiors_intersect() {
        let a = Rect::new((0, 0), (10, 10));
        let b = Rect::new((9, 9), (10, 10));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn containment_includes_boundary() {
        let outer = Rect::new((0, 0), (10, 10));

        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new((2, 2), (8, 8))));
        assert!(!outer.contains(&Rect::new((2, 2), (9, 8))));
        assert!(!Rect::new((2, 2), (8, 8)).contains(&outer));
    }
}
