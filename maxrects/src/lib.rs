//! Maxrects is a library for packing rectangles into as few fixed-size bins as
//! possible, built for generating texture atlases and spritesheets.
//!
//! Bins track their free space with the maximal rectangles method: a list of
//! possibly overlapping free regions that is split after every placement and
//! pruned of regions contained by other regions. [`MaxRectsPacker`] spreads
//! rectangles over as many [`MaxRectsBin`]s as it needs, and keeps rectangles
//! that could never fit in their own [`OversizedElementBin`].
//!
//! ## Example
//! ```
//! use maxrects::{Bin, MaxRectsPacker, PackingOptions, Rectangle};
//!
//! // Configure a packer with the size of the bins it should produce.
//! let options = PackingOptions {
//!     smart: true,
//!     power_of_two: true,
//!     ..PackingOptions::default()
//! };
//! let mut packer = MaxRectsPacker::new(512u32, 512, 2, options);
//!
//! // Batches are sorted largest first before they're packed, which tends to
//! // produce denser bins.
//! packer.add_batch(vec![
//!     Rectangle::with_data((128, 64), "button"),
//!     Rectangle::with_data((64, 64), "icon"),
//!     Rectangle::with_data((1, 300), "divider"),
//! ]);
//!
//! // Single rectangles hand back a handle that can be used to look them up.
//! let handle = packer.add(32, 32, "cursor").unwrap();
//! assert_eq!(*packer.get(handle).unwrap().data(), "cursor");
//!
//! for bin in packer.bins() {
//!     println!("{}x{} bin with {} items", bin.width(), bin.height(), bin.rects().len());
//! }
//! ```
//!
//! ## Features
//! - `serde`: derives `Serialize` and `Deserialize` for [`PackingOptions`] and
//!   [`PackingLogic`].

mod bin;
mod coord;
mod error;
mod geometry;
mod maxrects_bin;
mod options;
mod oversized_bin;
mod packer;
mod rectangle;

pub use bin::*;
pub use coord::*;
pub use error::*;
pub use geometry::*;
pub use maxrects_bin::*;
pub use options::*;
pub use oversized_bin::*;
pub use packer::*;
pub use rectangle::*;
