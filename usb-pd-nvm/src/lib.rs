//! Default NVM configuration image for STUSB4500 USB-PD sink controllers
//!
//! The NVM holds five 8-byte sectors that the controller loads at power-up. The bytes are treated as opaque, the
//! register map they encode is documented by the controller datasheet.
#![no_std]
#![warn(missing_docs)]

pub(crate) mod fmt;

pub mod image;
pub mod pdo;
pub mod provision;
pub mod sector;

pub use image::{full_image, get_sector, NvmImage, DEFAULT_IMAGE};
pub use sector::{Sector, SectorIndex, SectorMask, Sectors, IMAGE_SIZE, NUM_SECTORS, SECTOR_SIZE};

/// Error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Sector index is not in `0..NUM_SECTORS`, contains the requested index.
    ///
    /// Negative indices have no `usize` value and are reported as `usize::MAX`.
    OutOfRange(usize),
    /// Buffer is not exactly `IMAGE_SIZE` bytes, contains the actual length
    InvalidLength(usize),
}
