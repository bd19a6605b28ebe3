//! NVM image table
use crate::sector::{Sector, SectorIndex, SectorMask, Sectors, IMAGE_SIZE, NUM_SECTORS, SECTOR_SIZE};
use crate::Error;

/// Default NVM image, two sink PDOs
pub const DEFAULT_IMAGE: NvmImage = NvmImage::new([
    [0x00, 0x00, 0xB0, 0xAB, 0x00, 0x45, 0x00, 0x00],
    [0x00, 0x40, 0x9C, 0x1C, 0xFF, 0x01, 0x3C, 0xDF],
    [0x02, 0x40, 0x0F, 0x00, 0x32, 0x00, 0xFC, 0xF1],
    [0x00, 0x19, 0x54, 0xAF, 0xFB, 0x35, 0x5F, 0x00],
    [0x00, 0x64, 0x90, 0x21, 0x43, 0x00, 0x50, 0xFB],
]);

/// Complete NVM image, sectors stored in address order
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvmImage {
    sectors: Sectors,
}

impl NvmImage {
    /// Create an image from its sectors
    pub const fn new(sectors: Sectors) -> Self {
        Self { sectors }
    }

    /// Create an image from a flat byte buffer, which must be exactly `IMAGE_SIZE` bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != IMAGE_SIZE {
            return Err(Error::InvalidLength(bytes.len()));
        }

        let mut sectors = [[0u8; SECTOR_SIZE]; NUM_SECTORS];
        for (sector, chunk) in sectors.iter_mut().zip(bytes.chunks_exact(SECTOR_SIZE)) {
            sector.copy_from_slice(chunk);
        }

        Ok(Self::new(sectors))
    }

    /// Get the contents of a sector
    pub fn sector(&self, index: usize) -> Result<&Sector, Error> {
        let index = SectorIndex::try_from(index)?;
        Ok(self.sector_at(index))
    }

    /// Get the contents of a sector, the index is already known to be valid
    pub const fn sector_at(&self, index: SectorIndex) -> &Sector {
        &self.sectors[index.get()]
    }

    /// All sectors in address order
    pub const fn sectors(&self) -> &Sectors {
        &self.sectors
    }

    /// Image as a contiguous byte slice
    pub fn as_bytes(&self) -> &[u8] {
        self.sectors.as_flattened()
    }

    /// Image as a flat byte array
    pub const fn to_bytes(&self) -> [u8; IMAGE_SIZE] {
        let mut bytes = [0u8; IMAGE_SIZE];

        // const fn, so no iterators
        let mut i = 0;
        while i < IMAGE_SIZE {
            bytes[i] = self.sectors[i / SECTOR_SIZE][i % SECTOR_SIZE];
            i += 1;
        }

        bytes
    }

    /// Iterate over sectors along with their index
    pub fn iter(&self) -> impl Iterator<Item = (SectorIndex, &Sector)> + '_ {
        SectorIndex::all().map(move |index| (index, self.sector_at(index)))
    }

    /// Returns the sectors of `other` that differ from this image
    pub fn diff(&self, other: &Sectors) -> SectorMask {
        let mut mask = SectorMask::empty();
        for (index, sector) in self.iter() {
            if *sector != other[index.get()] {
                mask.insert_sector(index);
            }
        }

        mask
    }
}

impl Default for NvmImage {
    fn default() -> Self {
        DEFAULT_IMAGE
    }
}

impl From<Sectors> for NvmImage {
    fn from(sectors: Sectors) -> Self {
        Self::new(sectors)
    }
}

impl AsRef<[u8]> for NvmImage {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Get a sector of the default image
pub fn get_sector(index: usize) -> Result<&'static Sector, Error> {
    const IMAGE: &NvmImage = &DEFAULT_IMAGE;
    IMAGE.sector(index)
}

/// Get the full default image
pub const fn full_image() -> [u8; IMAGE_SIZE] {
    DEFAULT_IMAGE.to_bytes()
}
