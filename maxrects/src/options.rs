#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The heuristic a bin uses to pick between every free region that can hold
/// a new rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PackingLogic {
    /// Best area fit: pick the region that leaves the least area unused,
    /// breaking ties on the shorter leftover side.
    MaxArea,

    /// Best long side fit: pick the region whose longer leftover side is
    /// smallest, breaking ties on the shorter leftover side.
    MaxEdge,

    /// Best short side fit: pick the region whose shorter leftover side is
    /// smallest, breaking ties on the longer leftover side.
    BestShortSide,
}

impl Default for PackingLogic {
    fn default() -> Self {
        PackingLogic::MaxEdge
    }
}

/// Configuration shared by a packer and every bin it creates.
///
/// Options are copied into each bin when the bin is constructed and are not
/// expected to change while packing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "N: Deserialize<'de> + Default"))
)]
pub struct PackingOptions<N> {
    /// Grow a bin's reported size to fit its contents instead of always
    /// reporting the maximum size.
    pub smart: bool,

    /// Round grown sizes up to the next power of two.
    pub power_of_two: bool,

    /// Force reported width and height to be equal, after power of two
    /// rounding.
    pub square: bool,

    /// Allow rectangles to be rotated by 90 degrees when they don't fit
    /// upright. Individual rectangles must also allow rotation.
    pub allow_rotation: bool,

    /// Reserved for grouping rectangles by tag. Accepted, but currently has
    /// no effect on packing.
    pub tag: bool,

    /// Reserved for keeping differently tagged rectangles in separate bins.
    /// Accepted, but currently has no effect on packing.
    pub exclusive_tag: bool,

    /// Space kept clear along every edge of a bin.
    pub border: N,

    pub logic: PackingLogic,
}

impl<N: Default> Default for PackingOptions<N> {
    fn default() -> Self {
        Self {
            smart: true,
            power_of_two: true,
            square: false,
            allow_rotation: false,
            tag: false,
            exclusive_tag: true,
            border: N::default(),
            logic: PackingLogic::default(),
        }
    }
}
