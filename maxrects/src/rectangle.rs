use crate::{coord::Coordinate, geometry::Rect};

/// A rectangle to pack, along with the data the caller wants to get back
/// after packing.
///
/// Before packing, only the size matters. Bins fill in the position (and the
/// rotation, if they were allowed to rotate it) when the rectangle is placed.
///
/// Every setter that actually changes something bumps a dirty counter, which
/// bins and packers use to decide what needs repacking.
#[derive(Debug, Clone)]
pub struct Rectangle<N = u32, D = ()> {
    pub(crate) rect: Rect<N>,
    pub(crate) rotated: bool,
    pub(crate) allow_rotation: bool,
    pub(crate) oversized: bool,
    pub(crate) data: D,
    pub(crate) dirty_counter: usize,
}

impl<N: Coordinate> Rectangle<N, ()> {
    #[inline]
    pub fn new(size: (N, N)) -> Self {
        Self::with_data(size, ())
    }
}

impl<N: Coordinate, D> Rectangle<N, D> {
    pub fn with_data(size: (N, N), data: D) -> Self {
        Self {
            rect: Rect::new((N::zero(), N::zero()), size),
            rotated: false,
            allow_rotation: false,
            oversized: false,
            data,
            dirty_counter: 0,
        }
    }

    /// Builder-style toggle for [`set_allow_rotation`](Self::set_allow_rotation)
    /// that doesn't mark the rectangle dirty.
    pub fn rotation_allowed(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    #[inline]
    pub fn width(&self) -> N {
        self.rect.size.0
    }

    #[inline]
    pub fn height(&self) -> N {
        self.rect.size.1
    }

    #[inline]
    pub fn x(&self) -> N {
        self.rect.pos.0
    }

    #[inline]
    pub fn y(&self) -> N {
        self.rect.pos.1
    }

    #[inline]
    pub fn size(&self) -> (N, N) {
        self.rect.size
    }

    #[inline]
    pub fn position(&self) -> (N, N) {
        self.rect.pos
    }

    #[inline]
    pub fn min(&self) -> (N, N) {
        self.rect.pos
    }

    #[inline]
    pub fn max(&self) -> (N, N) {
        self.rect.max()
    }

    #[inline]
    pub fn rect(&self) -> Rect<N> {
        self.rect
    }

    #[inline]
    pub fn area(&self) -> N::Area {
        self.rect.area()
    }

    /// The longer of the two sides.
    #[inline]
    pub fn max_side(&self) -> N {
        self.rect.size.0.max_of(self.rect.size.1)
    }

    #[inline]
    pub fn is_rotated(&self) -> bool {
        self.rotated
    }

    #[inline]
    pub fn is_rotation_allowed(&self) -> bool {
        self.allow_rotation
    }

    /// Whether this rectangle was too large for any regular bin and ended up
    /// alone in an oversized bin.
    #[inline]
    pub fn is_oversized(&self) -> bool {
        self.oversized
    }

    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the payload. The payload can't be compared, so this
    /// always marks the rectangle dirty.
    pub fn data_mut(&mut self) -> &mut D {
        self.dirty_counter += 1;
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Whether the interiors of the two rectangles overlap. Rectangles that
    /// only touch along an edge don't collide.
    pub fn collides_with<E>(&self, other: &Rectangle<N, E>) -> bool {
        self.rect.intersects(&other.rect)
    }

    /// Whether `other` lies within this rectangle, edges included.
    pub fn contains<E>(&self, other: &Rectangle<N, E>) -> bool {
        self.rect.contains(&other.rect)
    }

    pub fn set_width(&mut self, width: N) {
        if width != self.rect.size.0 {
            self.rect.size.0 = width;
            self.dirty_counter += 1;
        }
    }

    pub fn set_height(&mut self, height: N) {
        if height != self.rect.size.1 {
            self.rect.size.1 = height;
            self.dirty_counter += 1;
        }
    }

    pub fn set_x(&mut self, x: N) {
        if x != self.rect.pos.0 {
            self.rect.pos.0 = x;
            self.dirty_counter += 1;
        }
    }

    pub fn set_y(&mut self, y: N) {
        if y != self.rect.pos.1 {
            self.rect.pos.1 = y;
            self.dirty_counter += 1;
        }
    }

    pub fn set_position(&mut self, (x, y): (N, N)) {
        self.set_x(x);
        self.set_y(y);
    }

    /// Rotates the rectangle by 90 degrees, swapping its width and height.
    ///
    /// Does nothing unless rotation is allowed for this rectangle.
    pub fn set_rotation(&mut self, rotated: bool) {
        if !self.allow_rotation || rotated == self.rotated {
            return;
        }

        self.rect.size = (self.rect.size.1, self.rect.size.0);
        self.rotated = rotated;
        self.dirty_counter += 1;
    }

    pub fn set_allow_rotation(&mut self, allow: bool) {
        if allow != self.allow_rotation {
            self.allow_rotation = allow;
            self.dirty_counter += 1;
        }
    }

    pub fn set_data(&mut self, data: D) {
        self.data = data;
        self.dirty_counter += 1;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty_counter > 0
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        if dirty {
            self.dirty_counter += 1;
        } else {
            self.dirty_counter = 0;
        }
    }
}

/// Rectangles compare by geometry only. Payload, flags and dirty state are
/// ignored.
impl<N: Coordinate, D, E> PartialEq<Rectangle<N, E>> for Rectangle<N, D> {
    fn eq(&self, other: &Rectangle<N, E>) -> bool {
        self.rect == other.rect
    }
}
