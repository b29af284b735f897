use crate::{
    coord::Coordinate, maxrects_bin::MaxRectsBin, options::PackingOptions,
    oversized_bin::OversizedElementBin, rectangle::Rectangle,
};

/// The operations every kind of bin supports.
///
/// Bins are also `Clone` whenever their payload type is, which gives callers
/// a deep snapshot to fall back on before trying a speculative repack.
pub trait Bin<N: Coordinate, D> {
    /// Tries to place a rectangle in this bin, returning its index in
    /// [`rects`](Self::rects).
    ///
    /// A rectangle that doesn't fit is handed back in `Err`. That's the normal
    /// "bin is full" signal, not a failure.
    fn add(&mut self, rect: Rectangle<N, D>) -> Result<usize, Rectangle<N, D>>;

    /// Lays out every placed rectangle again from scratch, returning the ones
    /// that no longer fit. Those are removed from the bin.
    ///
    /// Indices into [`rects`](Self::rects) are not stable across a repack.
    fn repack(&mut self) -> Vec<Rectangle<N, D>>;

    /// Empties the bin and returns it to its freshly constructed state.
    fn reset(&mut self);

    /// Recomputes the reported size from the rectangles currently placed.
    fn update_size(&mut self);

    fn rects(&self) -> &[Rectangle<N, D>];

    fn rects_mut(&mut self) -> &mut [Rectangle<N, D>];

    fn width(&self) -> N;

    fn height(&self) -> N;

    fn max_width(&self) -> N;

    fn max_height(&self) -> N;

    fn options(&self) -> &PackingOptions<N>;

    fn dirty_counter(&self) -> usize;

    fn dirty_counter_mut(&mut self) -> &mut usize;

    /// A bin is dirty if it was marked dirty itself, or if any rectangle in it
    /// is.
    fn is_dirty(&self) -> bool {
        self.dirty_counter() > 0 || self.rects().iter().any(Rectangle::is_dirty)
    }

    /// Marking a bin dirty only touches the bin. Marking it clean also clears
    /// every rectangle inside it.
    fn set_dirty(&mut self, dirty: bool) {
        if dirty {
            *self.dirty_counter_mut() += 1;
        } else {
            *self.dirty_counter_mut() = 0;
            for rect in self.rects_mut() {
                rect.set_dirty(false);
            }
        }
    }

    /// Fraction of the reported area covered by placed rectangles.
    fn occupancy(&self) -> f64
    where
        N: Into<f64>,
    {
        let width: f64 = self.width().into();
        let height: f64 = self.height().into();
        if width * height <= 0.0 {
            return 0.0;
        }

        let used: f64 = self
            .rects()
            .iter()
            .map(|rect| -> f64 {
                let width: f64 = rect.width().into();
                let height: f64 = rect.height().into();
                width * height
            })
            .sum();
        used / (width * height)
    }
}

/// Either kind of bin a [`MaxRectsPacker`](crate::MaxRectsPacker) can hold.
#[derive(Debug, Clone)]
pub enum AnyBin<N, D> {
    MaxRects(MaxRectsBin<N, D>),
    Oversized(OversizedElementBin<N, D>),
}

impl<N, D> AnyBin<N, D> {
    #[inline]
    pub fn is_oversized(&self) -> bool {
        match self {
            AnyBin::MaxRects(_) => false,
            AnyBin::Oversized(_) => true,
        }
    }

    /// Consumes the bin, giving back the rectangles placed in it.
    pub fn into_rects(self) -> Vec<Rectangle<N, D>> {
        match self {
            AnyBin::MaxRects(bin) => bin.into_rects(),
            AnyBin::Oversized(bin) => bin.into_rects(),
        }
    }
}

impl<N, D> From<MaxRectsBin<N, D>> for AnyBin<N, D> {
    fn from(bin: MaxRectsBin<N, D>) -> Self {
        AnyBin::MaxRects(bin)
    }
}

impl<N, D> From<OversizedElementBin<N, D>> for AnyBin<N, D> {
    fn from(bin: OversizedElementBin<N, D>) -> Self {
        AnyBin::Oversized(bin)
    }
}

macro_rules! dispatch {
    ($self:ident, $bin:ident => $body:expr) => {
        match $self {
            AnyBin::MaxRects($bin) => $body,
            AnyBin::Oversized($bin) => $body,
        }
    };
}

impl<N: Coordinate, D> Bin<N, D> for AnyBin<N, D> {
    fn add(&mut self, rect: Rectangle<N, D>) -> Result<usize, Rectangle<N, D>> {
        dispatch!(self, bin => bin.add(rect))
    }

    fn repack(&mut self) -> Vec<Rectangle<N, D>> {
        dispatch!(self, bin => bin.repack())
    }

    fn reset(&mut self) {
        dispatch!(self, bin => bin.reset())
    }

    fn update_size(&mut self) {
        dispatch!(self, bin => bin.update_size())
    }

    fn rects(&self) -> &[Rectangle<N, D>] {
        dispatch!(self, bin => bin.rects())
    }

    fn rects_mut(&mut self) -> &mut [Rectangle<N, D>] {
        dispatch!(self, bin => bin.rects_mut())
    }

    fn width(&self) -> N {
        dispatch!(self, bin => bin.width())
    }

    fn height(&self) -> N {
        dispatch!(self, bin => bin.height())
    }

    fn max_width(&self) -> N {
        dispatch!(self, bin => bin.max_width())
    }

    fn max_height(&self) -> N {
        dispatch!(self, bin => bin.max_height())
    }

    fn options(&self) -> &PackingOptions<N> {
        dispatch!(self, bin => bin.options())
    }

    fn dirty_counter(&self) -> usize {
        dispatch!(self, bin => bin.dirty_counter())
    }

    fn dirty_counter_mut(&mut self) -> &mut usize {
        dispatch!(self, bin => bin.dirty_counter_mut())
    }
}
