//! Checks the NVM contents of a device against an image and reprograms it when they differ.
//!
//! The bus-level sequence (unlocking the NVM, loading and erasing sectors, polling for completion) is left to the
//! implementor of [`NvmController`], this module only decides whether a write is needed and verifies the result.
use core::future::Future;

use crate::fmt::{debug, error, info, trace, warn};
use crate::image::NvmImage;
use crate::sector::{SectorMask, Sectors};

/// Device driver interface for NVM access, implementations are expected to hold the NVM unlocked
pub trait NvmController {
    /// Type of error returned by the bus
    type BusError;

    /// Read back all sectors
    fn read_sectors(&mut self) -> impl Future<Output = Result<Sectors, Self::BusError>>;
    /// Erase and program all sectors
    fn write_sectors(&mut self, sectors: &Sectors) -> impl Future<Output = Result<(), Self::BusError>>;
}

/// Result of a successful provisioning run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Device already contained the image
    Unchanged,
    /// Device was reprogrammed, contains the sectors that differed
    Updated(SectorMask),
}

impl Outcome {
    /// Returns true if the device was written
    pub fn updated(self) -> bool {
        matches!(self, Outcome::Updated(_))
    }
}

/// Provisioning error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProvisionError<E> {
    /// Bus error
    Bus(E),
    /// Read back after programming did not match, contains the mismatching sectors
    Verify(SectorMask),
}

impl<E> From<E> for ProvisionError<E> {
    fn from(value: E) -> Self {
        ProvisionError::Bus(value)
    }
}

/// Make sure the device NVM contains `image`, writing it only when the current contents differ
pub async fn provision<C: NvmController>(
    controller: &mut C,
    image: &NvmImage,
) -> Result<Outcome, ProvisionError<C::BusError>> {
    let current = controller.read_sectors().await.inspect_err(|_| error!("NVM read failed"))?;

    let mismatch = image.diff(&current);
    if mismatch.is_empty() {
        info!("NVM OK");
        return Ok(Outcome::Unchanged);
    }

    for index in mismatch.sectors() {
        debug!("NVM sector {} differs", index.address());
    }

    controller
        .write_sectors(image.sectors())
        .await
        .inspect_err(|_| error!("NVM write failed"))?;
    trace!("NVM written, verifying");

    let written = controller.read_sectors().await.inspect_err(|_| error!("NVM read failed"))?;
    let remaining = image.diff(&written);
    if !remaining.is_empty() {
        error!("NVM verify failed, {} sector(s) differ", remaining.count());
        return Err(ProvisionError::Verify(remaining));
    }

    warn!("NVM updated, {} sector(s) rewritten", mismatch.count());
    Ok(Outcome::Updated(mismatch))
}

#[cfg(test)]
mod test {
    use embassy_futures::block_on;

    use super::*;
    use crate::image::DEFAULT_IMAGE;
    use crate::sector::{NUM_SECTORS, SECTOR_SIZE};

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct BusError;

    /// In-memory NVM
    struct MockNvm {
        sectors: Sectors,
        reads: usize,
        writes: usize,
        fail_read: bool,
        fail_write: bool,
        /// Sector that silently ignores writes
        stuck: Option<usize>,
    }

    impl MockNvm {
        fn new(sectors: Sectors) -> Self {
            Self {
                sectors,
                reads: 0,
                writes: 0,
                fail_read: false,
                fail_write: false,
                stuck: None,
            }
        }
    }

    impl NvmController for MockNvm {
        type BusError = BusError;

        async fn read_sectors(&mut self) -> Result<Sectors, Self::BusError> {
            self.reads += 1;
            if self.fail_read {
                return Err(BusError);
            }

            Ok(self.sectors)
        }

        async fn write_sectors(&mut self, sectors: &Sectors) -> Result<(), Self::BusError> {
            self.writes += 1;
            if self.fail_write {
                return Err(BusError);
            }

            for (i, (dst, src)) in self.sectors.iter_mut().zip(sectors).enumerate() {
                if self.stuck != Some(i) {
                    *dst = *src;
                }
            }

            Ok(())
        }
    }

    #[test]
    fn test_unchanged() {
        let mut nvm = MockNvm::new(*DEFAULT_IMAGE.sectors());

        assert_eq!(block_on(provision(&mut nvm, &DEFAULT_IMAGE)), Ok(Outcome::Unchanged));
        assert_eq!(nvm.reads, 1);
        assert_eq!(nvm.writes, 0);
    }

    #[test]
    fn test_updated() {
        let mut sectors = *DEFAULT_IMAGE.sectors();
        sectors[3][2] = 0x50;
        sectors[3][4] = 0xF5;
        sectors[4][1] = 0x4B;
        let mut nvm = MockNvm::new(sectors);

        let outcome = block_on(provision(&mut nvm, &DEFAULT_IMAGE)).unwrap();
        assert_eq!(outcome, Outcome::Updated(SectorMask::SECTOR_3 | SectorMask::SECTOR_4));
        assert!(outcome.updated());
        assert_eq!(nvm.sectors, *DEFAULT_IMAGE.sectors());
        assert_eq!(nvm.reads, 2);
        assert_eq!(nvm.writes, 1);

        // Second run finds nothing to do
        assert_eq!(block_on(provision(&mut nvm, &DEFAULT_IMAGE)), Ok(Outcome::Unchanged));
        assert_eq!(nvm.writes, 1);
    }

    #[test]
    fn test_blank_device() {
        let mut nvm = MockNvm::new([[0xFF; SECTOR_SIZE]; NUM_SECTORS]);

        let outcome = block_on(provision(&mut nvm, &DEFAULT_IMAGE)).unwrap();
        assert_eq!(outcome, Outcome::Updated(SectorMask::all()));
        assert_eq!(nvm.sectors, *DEFAULT_IMAGE.sectors());
    }

    #[test]
    fn test_read_error() {
        let mut nvm = MockNvm::new(*DEFAULT_IMAGE.sectors());
        nvm.fail_read = true;

        assert_eq!(block_on(provision(&mut nvm, &DEFAULT_IMAGE)), Err(ProvisionError::Bus(BusError)));
        assert_eq!(nvm.writes, 0);
    }

    #[test]
    fn test_write_error() {
        let mut nvm = MockNvm::new([[0x00; SECTOR_SIZE]; NUM_SECTORS]);
        nvm.fail_write = true;

        assert_eq!(block_on(provision(&mut nvm, &DEFAULT_IMAGE)), Err(ProvisionError::Bus(BusError)));
        assert_eq!(nvm.writes, 1);
        assert_eq!(nvm.reads, 1);
    }

    #[test]
    fn test_verify_error() {
        let mut nvm = MockNvm::new([[0x00; SECTOR_SIZE]; NUM_SECTORS]);
        nvm.stuck = Some(2);

        assert_eq!(
            block_on(provision(&mut nvm, &DEFAULT_IMAGE)),
            Err(ProvisionError::Verify(SectorMask::SECTOR_2))
        );
        assert_eq!(nvm.writes, 1);
        assert_eq!(nvm.reads, 2);
    }

    #[test]
    fn test_custom_image() {
        let image = NvmImage::new([[0xA5; SECTOR_SIZE]; NUM_SECTORS]);
        let mut nvm = MockNvm::new(*DEFAULT_IMAGE.sectors());

        assert_eq!(
            block_on(provision(&mut nvm, &image)),
            Ok(Outcome::Updated(SectorMask::all()))
        );
        assert_eq!(nvm.sectors, *image.sectors());
    }
}
