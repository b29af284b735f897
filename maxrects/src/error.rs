use thiserror::Error;

use crate::packer::RectHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The handle was issued before a repack or reset and no longer points at
    /// a placed rectangle.
    #[error("Handle {handle:?} does not refer to a placed rectangle")]
    StaleHandle { handle: RectHandle },
}
