use std::{cmp::Ordering, mem};

use crate::{
    bin::Bin,
    coord::Coordinate,
    geometry::Rect,
    options::{PackingLogic, PackingOptions},
    rectangle::Rectangle,
};

/// A bin that packs rectangles using the maximal rectangles method.
///
/// The bin keeps a list of free regions that together cover all of its
/// unoccupied space. Free regions are allowed to overlap each other; after
/// every placement, each region the new rectangle touches is split into the
/// parts that remain free, and any region fully contained in another one is
/// pruned.
#[derive(Debug, Clone)]
pub struct MaxRectsBin<N, D> {
    rects: Vec<Rectangle<N, D>>,
    free_rects: Vec<Rect<N>>,
    width: N,
    height: N,
    max_width: N,
    max_height: N,
    padding: N,
    border: N,
    options: PackingOptions<N>,
    dirty_counter: usize,
}

impl<N, D> MaxRectsBin<N, D> {
    pub fn into_rects(self) -> Vec<Rectangle<N, D>> {
        self.rects
    }
}

impl<N: Coordinate, D> MaxRectsBin<N, D> {
    /// Creates an empty bin that can hold up to `max_width` by `max_height`.
    ///
    /// `padding` is the space kept between neighbouring rectangles, while
    /// `options.border` is kept clear along the edges of the bin.
    pub fn new(max_width: N, max_height: N, padding: N, options: PackingOptions<N>) -> Self {
        let mut bin = Self {
            rects: Vec::new(),
            free_rects: Vec::new(),
            width: N::zero(),
            height: N::zero(),
            max_width,
            max_height,
            padding,
            border: options.border,
            options,
            dirty_counter: 0,
        };

        bin.reset_free_space();
        bin
    }

    /// Creates a rectangle with the given size and payload and adds it to the
    /// bin. The rectangle may be rotated if the bin's options allow it.
    pub fn add_sized(&mut self, width: N, height: N, data: D) -> Result<usize, Rectangle<N, D>> {
        let rect =
            Rectangle::with_data((width, height), data).rotation_allowed(self.options.allow_rotation);

        self.add(rect)
    }

    /// Adds every rectangle in order, returning one result per input.
    pub fn add_bulk<I>(&mut self, rects: I) -> Vec<Result<usize, Rectangle<N, D>>>
    where
        I: IntoIterator<Item = Rectangle<N, D>>,
    {
        let rects = rects.into_iter();
        self.rects.reserve(rects.size_hint().0);

        rects.map(|rect| self.add(rect)).collect()
    }

    /// The regions of the bin currently considered free. These may overlap.
    #[inline]
    pub fn free_rects(&self) -> &[Rect<N>] {
        &self.free_rects
    }

    #[inline]
    pub fn padding(&self) -> N {
        self.padding
    }

    #[inline]
    pub fn border(&self) -> N {
        self.border
    }

    fn can_rotate(&self, rect: &Rectangle<N, D>) -> bool {
        self.options.allow_rotation && rect.allow_rotation
    }

    /// Finds where a rectangle would go, trying it upright first and then
    /// rotated. Returns the padded region to reserve and whether the
    /// rectangle needs to be rotated to fit there.
    fn find_placement(&self, rect: &Rectangle<N, D>) -> Option<(Rect<N>, bool)> {
        let (width, height) = rect.size();

        if let Some(node) = self.find_position((width + self.padding, height + self.padding)) {
            return Some((node, false));
        }

        if self.can_rotate(rect) {
            if let Some(node) = self.find_position((height + self.padding, width + self.padding)) {
                return Some((node, true));
            }
        }

        None
    }

    /// Scores every free region that can hold `size` with the configured
    /// heuristic and returns the best one, lowest score first.
    fn find_position(&self, size: (N, N)) -> Option<Rect<N>> {
        let mut best: Option<(Rect<N>, (N::Area, N::Area))> = None;

        for free_rect in &self.free_rects {
            if !free_rect.fits(size) {
                continue;
            }

            let leftover_x = free_rect.size.0 - size.0;
            let leftover_y = free_rect.size.1 - size.1;
            let short_side = leftover_x.min_of(leftover_y);
            let long_side = leftover_x.max_of(leftover_y);

            let score = match self.options.logic {
                PackingLogic::BestShortSide => (short_side.widen(), long_side.widen()),
                PackingLogic::MaxEdge => (long_side.widen(), short_side.widen()),
                PackingLogic::MaxArea => (
                    free_rect.area() - N::area(size.0, size.1),
                    short_side.widen(),
                ),
            };

            let is_better = match &best {
                Some((_, best_score)) => score < *best_score,
                None => true,
            };

            if is_better {
                best = Some((Rect::new(free_rect.pos, size), score));
            }
        }

        best.map(|(node, _)| node)
    }

    /// Reserves `node` in the free list.
    fn place_node(&mut self, node: &Rect<N>) {
        self.split_free_rects(node);
        self.prune_free_list();
    }

    /// Replaces every free region that overlaps `used` with the up to four
    /// pieces of it that are still free.
    fn split_free_rects(&mut self, used: &Rect<N>) {
        let mut remainders = Vec::new();

        self.free_rects.retain(|free_rect| {
            if free_rect.intersects(used) {
                split_free_rect(free_rect, used, &mut remainders);
                false
            } else {
                true
            }
        });

        self.free_rects.extend(remainders);
    }

    /// Drops every free region that is contained by another one.
    fn prune_free_list(&mut self) {
        let mut i = 0;

        'outer: while i < self.free_rects.len() {
            let mut j = i + 1;

            while j < self.free_rects.len() {
                if self.free_rects[j].contains(&self.free_rects[i]) {
                    self.free_rects.remove(i);
                    continue 'outer;
                }

                if self.free_rects[i].contains(&self.free_rects[j]) {
                    self.free_rects.remove(j);
                } else {
                    j += 1;
                }
            }

            i += 1;
        }
    }

    /// Grows the reported size to cover `far_edge`, if smart sizing is on.
    fn grow_to_fit(&mut self, far_edge: (N, N)) {
        if !self.options.smart {
            return;
        }

        let width = self.width.max_of(far_edge.0);
        let height = self.height.max_of(far_edge.1);
        let (width, height) = self.round_size(width, height);

        self.width = width;
        self.height = height;
    }

    fn round_size(&self, mut width: N, mut height: N) -> (N, N) {
        if self.options.power_of_two {
            width = width.next_power_of_two();
            height = height.next_power_of_two();
        }

        if self.options.square {
            let side = width.max_of(height);
            width = side;
            height = side;
        }

        (width, height)
    }

    fn initial_size(&self) -> (N, N) {
        if self.options.smart {
            (N::zero(), N::zero())
        } else {
            (self.max_width, self.max_height)
        }
    }

    /// Clears the free list back to a single region covering the whole bin,
    /// but keeps the placed rectangles around.
    fn reset_free_space(&mut self) {
        let (width, height) = self.initial_size();
        self.width = width;
        self.height = height;

        let double_border = self.border * N::two();
        let free_width = (self.max_width + self.padding).clamped_sub(double_border);
        let free_height = (self.max_height + self.padding).clamped_sub(double_border);

        self.free_rects.clear();
        self.free_rects.push(Rect::new(
            (self.border, self.border),
            (free_width, free_height),
        ));

        self.set_dirty(false);
    }
}

/// Pushes the parts of `free_rect` that lie outside of `used` on each side.
/// Pieces may overlap each other; only pieces with positive area are kept.
fn split_free_rect<N: Coordinate>(free_rect: &Rect<N>, used: &Rect<N>, out: &mut Vec<Rect<N>>) {
    let free_max = free_rect.max();
    let used_max = used.max();

    if used.pos.0 < free_max.0 && used_max.0 > free_rect.pos.0 {
        // Above the used node.
        if used.pos.1 > free_rect.pos.1 && used.pos.1 < free_max.1 {
            let mut piece = *free_rect;
            piece.size.1 = used.pos.1 - free_rect.pos.1;
            out.push(piece);
        }

        // Below the used node.
        if used_max.1 < free_max.1 {
            let mut piece = *free_rect;
            piece.pos.1 = used_max.1;
            piece.size.1 = free_max.1 - used_max.1;
            out.push(piece);
        }
    }

    if used.pos.1 < free_max.1 && used_max.1 > free_rect.pos.1 {
        // Left of the used node.
        if used.pos.0 > free_rect.pos.0 && used.pos.0 < free_max.0 {
            let mut piece = *free_rect;
            piece.size.0 = used.pos.0 - free_rect.pos.0;
            out.push(piece);
        }

        // Right of the used node.
        if used_max.0 < free_max.0 {
            let mut piece = *free_rect;
            piece.pos.0 = used_max.0;
            piece.size.0 = free_max.0 - used_max.0;
            out.push(piece);
        }
    }
}

impl<N: Coordinate, D> Bin<N, D> for MaxRectsBin<N, D> {
    fn add(&mut self, mut rect: Rectangle<N, D>) -> Result<usize, Rectangle<N, D>> {
        // `tag` and `exclusive_tag` are reserved and don't influence placement
        // yet.

        let (node, rotated) = match self.find_placement(&rect) {
            Some(placement) => placement,
            None => {
                log::trace!(
                    "No room for {:?} in bin with {} free regions",
                    rect.size(),
                    self.free_rects.len()
                );
                return Err(rect);
            }
        };

        self.place_node(&node);

        if rotated {
            let was_rotated = rect.rotated;
            rect.set_rotation(!was_rotated);
        }
        rect.set_position(node.pos);

        // Only rectangles held by an oversized bin are flagged oversized.
        rect.oversized = false;

        log::trace!(
            "Placed {:?} at {:?}{}",
            rect.size(),
            rect.position(),
            if rotated { " (rotated)" } else { "" }
        );

        let far_edge = rect.max();
        self.rects.push(rect);
        self.set_dirty(true);
        self.grow_to_fit(far_edge);

        Ok(self.rects.len() - 1)
    }

    fn repack(&mut self) -> Vec<Rectangle<N, D>> {
        self.reset_free_space();

        let mut order: Vec<usize> = (0..self.rects.len()).collect();
        order.sort_by(|&a, &b| {
            self.rects[b]
                .max_side()
                .partial_cmp(&self.rects[a].max_side())
                .unwrap_or(Ordering::Equal)
        });

        let mut failed = vec![false; self.rects.len()];

        for index in order {
            let (node, rotated) = match self.find_placement(&self.rects[index]) {
                Some(placement) => placement,
                None => {
                    failed[index] = true;
                    continue;
                }
            };

            self.place_node(&node);

            let rect = &mut self.rects[index];
            if rotated {
                let was_rotated = rect.rotated;
                rect.set_rotation(!was_rotated);
            }
            rect.set_position(node.pos);
            rect.set_dirty(true);

            let far_edge = rect.max();
            self.grow_to_fit(far_edge);
        }

        let mut unpacked = Vec::new();
        for (rect, failed) in mem::take(&mut self.rects).into_iter().zip(failed) {
            if failed {
                unpacked.push(rect);
            } else {
                self.rects.push(rect);
            }
        }

        log::debug!(
            "Repacked bin: {} rectangles kept, {} no longer fit",
            self.rects.len(),
            unpacked.len()
        );

        unpacked
    }

    fn reset(&mut self) {
        self.rects.clear();
        self.reset_free_space();
    }

    fn update_size(&mut self) {
        if !self.options.smart || self.rects.is_empty() {
            let (width, height) = self.initial_size();
            self.width = width;
            self.height = height;
            return;
        }

        let mut far_edge = (N::zero(), N::zero());
        for rect in &self.rects {
            let max = rect.max();
            far_edge = (far_edge.0.max_of(max.0), far_edge.1.max_of(max.1));
        }

        let (width, height) = self.round_size(far_edge.0, far_edge.1);
        self.width = width;
        self.height = height;
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
