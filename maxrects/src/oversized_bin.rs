use crate::{bin::Bin, coord::Coordinate, options::PackingOptions, rectangle::Rectangle};

/// A bin holding a single rectangle that was too large for a regular bin.
///
/// The bin is exactly as large as its rectangle and never accepts anything
/// else, which lets packers keep track of items they can't pack without
/// treating them specially everywhere else.
#[derive(Debug, Clone)]
pub struct OversizedElementBin<N, D> {
    rects: Vec<Rectangle<N, D>>,
    width: N,
    height: N,
    max_width: N,
    max_height: N,
    options: PackingOptions<N>,
    dirty_counter: usize,
}

impl<N, D> OversizedElementBin<N, D> {
    pub fn into_rects(self) -> Vec<Rectangle<N, D>> {
        self.rects
    }
}

impl<N: Coordinate, D> OversizedElementBin<N, D> {
    pub fn new(mut rect: Rectangle<N, D>) -> Self {
        let (width, height) = rect.size();
        rect.oversized = true;

        Self {
            rects: vec![rect],
            width,
            height,
            max_width: width,
            max_height: height,
            options: PackingOptions::default(),
            dirty_counter: 0,
        }
    }

    pub fn with_size(width: N, height: N, data: D) -> Self {
        Self::new(Rectangle::with_data((width, height), data))
    }

    /// The one rectangle this bin holds.
    #[inline]
    pub fn rect(&self) -> &Rectangle<N, D> {
        &self.rects[0]
    }
}

impl<N: Coordinate, D> Bin<N, D> for OversizedElementBin<N, D> {
    fn add(&mut self, rect: Rectangle<N, D>) -> Result<usize, Rectangle<N, D>> {
        Err(rect)
    }

    fn repack(&mut self) -> Vec<Rectangle<N, D>> {
        Vec::new()
    }

    fn reset(&mut self) {
        self.set_dirty(false);
    }

    fn update_size(&mut self) {
        self.max_width = self.width;
        self.max_height = self.height;
    }

    #[inline]
    fn rects(&self) -> &[Rectangle<N, D>] {
        &self.rects
    }

    #[inline]
    fn rects_mut(&mut self) -> &mut [Rectangle<N, D>] {
        &mut self.rects
    }

    #[inline]
    fn width(&self) -> N {
        self.width
    }

    #[inline]
    fn height(&self) -> N {
        self.height
    }

    #[inline]
    fn max_width(&self) -> N {
        self.max_width
    }

    #[inline]
    fn max_height(&self) -> N {
        self.max_height
    }

    #[inline]
    fn options(&self) -> &PackingOptions<N> {
        &self.options
    }

    #[inline]
    fn dirty_counter(&self) -> usize {
        self.dirty_counter
    }

    #[inline]
    fn dirty_counter_mut(&mut self) -> &mut usize {
        &mut self.dirty_counter
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sized_to_its_rectangle() {
        let bin = OversizedElementBin::with_size(2048u32, 4096, "huge");

        assert_eq!((bin.width(), bin.height()), (2048, 4096));
        assert_eq!((bin.max_width(), bin.max_height()), (2048, 4096));
        assert_eq!(bin.rects().len(), 1);
        assert!(bin.rect().is_oversized());
        assert_eq!(*bin.rect().data(), "huge");
    }

    #[test]
    fn never_accepts_more() {
        let mut bin = OversizedElementBin::new(Rectangle::new((5000u32, 10)));

        let rejected = bin.add(Rectangle::new((1, 1))).unwrap_err();
        assert_eq!(rejected.size(), (1, 1));
        assert!(!rejected.is_oversized());
        assert_eq!(bin.rects().len(), 1);
    }

    #[test]
    fn repack_and_reset_keep_the_rectangle() {
        let mut bin = OversizedElementBin::new(Rectangle::new((5000u32, 10)));
        bin.set_dirty(true);

        assert!(bin.repack().is_empty());
        assert_eq!(bin.rects().len(), 1);

        bin.reset();
        assert!(!bin.is_dirty());
        assert_eq!(bin.rects().len(), 1);
    }

    #[test]
    fn clone_keeps_oversized_flag() {
        let bin = OversizedElementBin::new(Rectangle::new((5000u32, 10)));
        let copy = bin.clone();

        assert!(copy.rect().is_oversized());
        assert!(copy.rect() == bin.rect());
    }
}
