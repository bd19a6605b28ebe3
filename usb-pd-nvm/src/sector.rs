//! Sector addressing
use bitflags::bitflags;

use crate::Error;

/// Size of a single NVM sector in bytes
pub const SECTOR_SIZE: usize = 8;
/// Number of sectors in the NVM
pub const NUM_SECTORS: usize = 5;
/// Total size of an NVM image in bytes
pub const IMAGE_SIZE: usize = SECTOR_SIZE * NUM_SECTORS;

/// Contents of a single sector
pub type Sector = [u8; SECTOR_SIZE];
/// Contents of every sector, in address order
pub type Sectors = [Sector; NUM_SECTORS];

/// Validated sector index, always in `0..NUM_SECTORS`
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SectorIndex(u8);

impl SectorIndex {
    /// Create a sector index, returns `None` if out of range
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_SECTORS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Sector index as used to address the sector in the NVM control register
    pub const fn address(self) -> u8 {
        self.0
    }

    /// Sector index as an array index
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all sector indices in address order
    pub fn all() -> impl DoubleEndedIterator<Item = SectorIndex> + ExactSizeIterator {
        (0..NUM_SECTORS as u8).map(SectorIndex)
    }
}

impl TryFrom<usize> for SectorIndex {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        SectorIndex::new(value).ok_or(Error::OutOfRange(value))
    }
}

/// Negative values fail with `Error::OutOfRange(usize::MAX)`
impl TryFrom<i32> for SectorIndex {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let index = usize::try_from(value).map_err(|_| Error::OutOfRange(usize::MAX))?;
        SectorIndex::try_from(index)
    }
}

impl From<SectorIndex> for usize {
    fn from(index: SectorIndex) -> Self {
        index.get()
    }
}

/// Set of sectors
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SectorMask(u8);

bitflags! {
    impl SectorMask: u8 {
        /// Sector 0
        const SECTOR_0 = (1 << 0);
        /// Sector 1
        const SECTOR_1 = (1 << 1);
        /// Sector 2
        const SECTOR_2 = (1 << 2);
        /// Sector 3
        const SECTOR_3 = (1 << 3);
        /// Sector 4
        const SECTOR_4 = (1 << 4);
    }
}

impl SectorMask {
    /// Mask containing a single sector
    pub const fn sector(index: SectorIndex) -> Self {
        Self(1 << index.0)
    }

    /// Returns true if the given sector is part of the mask
    pub fn contains_sector(self, index: SectorIndex) -> bool {
        self.contains(Self::sector(index))
    }

    /// Add a sector to the mask
    pub fn insert_sector(&mut self, index: SectorIndex) {
        self.insert(Self::sector(index));
    }

    /// Number of sectors in the mask
    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Iterate over the sectors in the mask, in address order
    pub fn sectors(self) -> impl Iterator<Item = SectorIndex> {
        SectorIndex::all().filter(move |index| self.contains_sector(*index))
    }
}
