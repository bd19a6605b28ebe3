use embassy_futures::block_on;
use log::*;
use usb_pd_nvm::pdo::{self, FixedPdo, PdoChannel, PdoController};
use usb_pd_nvm::provision::{self, NvmController, Outcome};
use usb_pd_nvm::{Sectors, DEFAULT_IMAGE};

/// NVM contents as shipped by an earlier firmware revision
const PREVIOUS_IMAGE: Sectors = [
    [0x00, 0x00, 0xB0, 0xAB, 0x00, 0x45, 0x00, 0x00],
    [0x00, 0x40, 0x9C, 0x1C, 0xFF, 0x01, 0x3C, 0xDF],
    [0x02, 0x40, 0x0F, 0x00, 0x32, 0x00, 0xFC, 0xF1],
    [0x00, 0x19, 0x50, 0xAF, 0xF5, 0x35, 0x5F, 0x00],
    [0x00, 0x4B, 0x90, 0x21, 0x43, 0x00, 0x40, 0xFB],
];

#[derive(Debug)]
struct BusError;

/// Simulated controller NVM
struct Nvm {
    sectors: Sectors,
}

/// Simulated sink PDO registers
#[derive(Default)]
struct Pdos {
    slots: [u32; 3],
    count: u8,
}

impl PdoController for Pdos {
    type BusError = BusError;

    async fn set_pdo(&mut self, channel: PdoChannel, pdo: FixedPdo) -> Result<(), Self::BusError> {
        info!("Writing {:#010x} to register {:#04x}", u32::from(pdo), channel.address());
        self.slots[usize::from(channel.number()) - 1] = pdo.into();
        Ok(())
    }

    async fn set_pdo_count(&mut self, count: u8) -> Result<(), Self::BusError> {
        self.count = count;
        Ok(())
    }

    async fn renegotiate(&mut self) -> Result<(), Self::BusError> {
        info!("Soft reset, {} PDO(s) advertised", self.count);
        Ok(())
    }
}

impl NvmController for Nvm {
    type BusError = BusError;

    async fn read_sectors(&mut self) -> Result<Sectors, Self::BusError> {
        info!("Reading NVM");
        Ok(self.sectors)
    }

    async fn write_sectors(&mut self, sectors: &Sectors) -> Result<(), Self::BusError> {
        info!("Erasing and programming NVM");
        self.sectors = *sectors;
        Ok(())
    }
}

fn main() {
    env_logger::builder().filter_level(log::LevelFilter::Trace).init();

    let mut nvm = Nvm {
        sectors: PREVIOUS_IMAGE,
    };

    for _ in 0..2 {
        match block_on(provision::provision(&mut nvm, &DEFAULT_IMAGE)) {
            Ok(Outcome::Unchanged) => info!("Device already provisioned"),
            Ok(Outcome::Updated(mask)) => info!("Device provisioned, rewrote {:?}", mask),
            Err(e) => error!("Provisioning failed: {:?}", e),
        }
    }

    for (index, sector) in DEFAULT_IMAGE.iter() {
        info!("Sector {}: {:02X?}", index.address(), sector);
    }

    // Runtime override of the second sink PDO, 20 V at 1 A
    let mut pdos = Pdos::default();
    if let Err(e) = block_on(pdo::apply_pdo(
        &mut pdos,
        PdoChannel::Pdo2,
        FixedPdo::from_millis(20000, 1000),
    )) {
        error!("PDO override failed: {:?}", e);
    }
}
