use std::{cmp::Ordering, mem};

use crate::{
    bin::{AnyBin, Bin},
    coord::Coordinate,
    error::{Error, Result},
    maxrects_bin::MaxRectsBin,
    options::{PackingLogic, PackingOptions},
    oversized_bin::OversizedElementBin,
    rectangle::Rectangle,
};

/// Identifies a rectangle placed by a [`MaxRectsPacker`]: the index of its
/// bin, and its index within that bin.
///
/// Handles stay valid while rectangles are only being added, including across
/// calls to [`MaxRectsPacker::next`]. Calling [`MaxRectsPacker::repack`] or
/// [`MaxRectsPacker::reset`] invalidates every handle issued before it; a stale
/// handle may point at nothing, or at a different rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectHandle {
    pub bin: usize,
    pub index: usize,
}

/// Packs rectangles into as many bins as it needs.
///
/// New rectangles go into the first bin, starting from the current bin
/// cursor, that has room for them. When none does, a new bin is created.
/// Rectangles too large to ever fit in a bin get an
/// [`OversizedElementBin`] of their own.
#[derive(Debug, Clone)]
pub struct MaxRectsPacker<N = u32, D = ()> {
    bins: Vec<AnyBin<N, D>>,
    width: N,
    height: N,
    padding: N,
    options: PackingOptions<N>,
    current_bin_index: usize,
}

impl<N: Coordinate, D> MaxRectsPacker<N, D> {
    /// Creates a packer whose bins are at most `width` by `height`, with
    /// `padding` between neighbouring rectangles.
    pub fn new(width: N, height: N, padding: N, options: PackingOptions<N>) -> Self {
        Self {
            bins: Vec::new(),
            width,
            height,
            padding,
            options,
            current_bin_index: 0,
        }
    }

    #[inline]
    pub fn bins(&self) -> &[AnyBin<N, D>] {
        &self.bins
    }

    #[inline]
    pub fn options(&self) -> &PackingOptions<N> {
        &self.options
    }

    #[inline]
    pub fn width(&self) -> N {
        self.width
    }

    #[inline]
    pub fn height(&self) -> N {
        self.height
    }

    #[inline]
    pub fn padding(&self) -> N {
        self.padding
    }

    /// The first bin new rectangles may be placed in.
    #[inline]
    pub fn current_bin_index(&self) -> usize {
        self.current_bin_index
    }

    /// Packs a rectangle of the given size carrying `data`. The rectangle may
    /// be rotated if the packer's options allow rotation.
    pub fn add(&mut self, width: N, height: N, data: D) -> Option<RectHandle> {
        let rect =
            Rectangle::with_data((width, height), data).rotation_allowed(self.options.allow_rotation);

        self.add_rect(rect)
    }

    /// Packs a caller-built rectangle.
    ///
    /// This only returns `None` if a brand new bin can't hold a rectangle that
    /// is small enough for one, which happens with degenerate bin sizes.
    pub fn add_rect(&mut self, rect: Rectangle<N, D>) -> Option<RectHandle> {
        if !self.fits_empty_bin(&rect) {
            log::debug!(
                "{:?} does not fit in a {:?}x{:?} bin, giving it its own bin",
                rect.size(),
                self.width,
                self.height
            );

            self.bins.push(OversizedElementBin::new(rect).into());
            return Some(RectHandle {
                bin: self.bins.len() - 1,
                index: 0,
            });
        }

        let mut rect = rect;
        for bin_index in self.current_bin_index..self.bins.len() {
            match self.bins[bin_index].add(rect) {
                Ok(index) => {
                    return Some(RectHandle {
                        bin: bin_index,
                        index,
                    })
                }
                Err(rejected) => rect = rejected,
            }
        }

        let mut bin = MaxRectsBin::new(self.width, self.height, self.padding, self.options);
        let placed = bin.add(rect);
        self.bins.push(bin.into());

        log::debug!("Created bin {}", self.bins.len() - 1);

        match placed {
            Ok(index) => Some(RectHandle {
                bin: self.bins.len() - 1,
                index,
            }),
            Err(rejected) => {
                log::warn!(
                    "{:?} did not fit in a fresh {:?}x{:?} bin",
                    rejected.size(),
                    self.width,
                    self.height
                );
                None
            }
        }
    }

    /// Packs every rectangle, largest first.
    ///
    /// For [`PackingLogic::MaxEdge`], rectangles are ordered by their longest
    /// side. Otherwise, they're ordered by area.
    pub fn add_batch<I>(&mut self, rects: I)
    where
        I: IntoIterator<Item = Rectangle<N, D>>,
    {
        let mut rects: Vec<_> = rects.into_iter().collect();

        // `tag` and `exclusive_tag` are reserved: tagged and untagged batches
        // are currently packed the same way.
        self.sort_rects(&mut rects);

        log::trace!("Packing batch of {} rectangles", rects.len());

        for rect in rects {
            self.add_rect(rect);
        }
    }

    /// Starts a new page: rectangles added after this call only go into bins
    /// created after it. Returns the new cursor.
    pub fn next(&mut self) -> usize {
        self.current_bin_index = self.bins.len();
        self.current_bin_index
    }

    /// Throws away every bin and moves the cursor back to the start.
    pub fn reset(&mut self) {
        self.bins.clear();
        self.current_bin_index = 0;
    }

    /// Lays out rectangles again after they've been changed.
    ///
    /// A quick repack only touches dirty bins, and adds whatever no longer fits
    /// in its bin back into the packer. A full repack, which only runs if
    /// anything is dirty, pulls every rectangle out and packs them all from
    /// scratch.
    pub fn repack(&mut self, quick: bool) {
        if quick {
            let mut unpacked = Vec::new();
            for bin in &mut self.bins {
                if bin.is_dirty() {
                    unpacked.extend(bin.repack());
                }
            }

            log::debug!("Quick repack displaced {} rectangles", unpacked.len());

            if !unpacked.is_empty() {
                self.add_batch(unpacked);
            }
            return;
        }

        if !self.is_dirty() {
            return;
        }

        let bins = mem::take(&mut self.bins);
        self.reset();

        let rects: Vec<_> = bins.into_iter().flat_map(AnyBin::into_rects).collect();
        log::debug!("Full repack of {} rectangles", rects.len());

        self.add_batch(rects);
    }

    /// Whether any bin, or any rectangle in any bin, is dirty.
    pub fn is_dirty(&self) -> bool {
        self.bins.iter().any(|bin| bin.is_dirty())
    }

    /// Marks every bin, and every rectangle in it, clean or dirty.
    pub fn set_dirty(&mut self, dirty: bool) {
        for bin in &mut self.bins {
            bin.set_dirty(dirty);
        }
    }

    /// Every placed rectangle, in bin order and then in insertion order.
    pub fn all_rects(&self) -> Vec<&Rectangle<N, D>> {
        self.bins.iter().flat_map(|bin| bin.rects()).collect()
    }

    pub fn get(&self, handle: RectHandle) -> Option<&Rectangle<N, D>> {
        self.bins.get(handle.bin)?.rects().get(handle.index)
    }

    /// Mutable access to a placed rectangle. Changing it through its setters
    /// marks it dirty, so the next [`repack`](Self::repack) will lay it out
    /// again.
    pub fn get_mut(&mut self, handle: RectHandle) -> Option<&mut Rectangle<N, D>> {
        self.bins
            .get_mut(handle.bin)?
            .rects_mut()
            .get_mut(handle.index)
    }

    /// Like [`get`](Self::get), but reports a stale handle as an error.
    pub fn try_get(&self, handle: RectHandle) -> Result<&Rectangle<N, D>> {
        self.get(handle).ok_or(Error::StaleHandle { handle })
    }

    /// Whether a fresh bin could ever hold this rectangle, upright or rotated.
    fn fits_empty_bin(&self, rect: &Rectangle<N, D>) -> bool {
        let double_border = self.options.border * N::two();
        let usable_width = self.width.clamped_sub(double_border);
        let usable_height = self.height.clamped_sub(double_border);
        let (width, height) = rect.size();

        let upright = width <= usable_width && height <= usable_height;
        let rotated = self.options.allow_rotation
            && rect.is_rotation_allowed()
            && height <= usable_width
            && width <= usable_height;

        upright || rotated
    }

    fn sort_rects(&self, rects: &mut [Rectangle<N, D>]) {
        let logic = self.options.logic;

        rects.sort_by(|a, b| {
            let (a_key, b_key) = match logic {
                PackingLogic::MaxEdge => (a.max_side().widen(), b.max_side().widen()),
                PackingLogic::MaxArea | PackingLogic::BestShortSide => (a.area(), b.area()),
            };

            b_key.partial_cmp(&a_key).unwrap_or(Ordering::Equal)
        });
    }
}
