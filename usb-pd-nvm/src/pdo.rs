//! Sink PDO definitions and the runtime override applied on top of the NVM defaults
//!
//! The NVM image sets the sink PDOs loaded at power-up. After provisioning, [`apply_pdo`] replaces one of them in the
//! controller registers, enables it and triggers a renegotiation with the source.
use core::future::Future;

use bitfield::bitfield;

use crate::fmt::{error, info};

/// Voltage field unit in mV
const VOLTAGE_UNIT_MV: u32 = 50;
/// Current field unit in mA
const CURRENT_UNIT_MA: u32 = 10;
/// Largest value representable by the 10-bit voltage and current fields
const FIELD_MAX: u32 = 0x3FF;

bitfield! {
    /// Fixed supply power data object
    #[derive(Copy, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct FixedPdo(u32);
    impl Debug;

    /// Supply type, zero for fixed supplies
    pub fixed, _: 31, 30;
    /// Dual-role power
    pub dual_role_power, set_dual_role_power: 29;
    /// Sink needs more than vSafe5V for full functionality
    pub higher_capability, set_higher_capability: 28;
    /// Unconstrained power
    pub unconstrained_power, set_unconstrained_power: 27;
    /// USB communications capable
    pub usb_communications_capable, set_usb_communications_capable: 26;
    /// Dual-role data
    pub dual_role_data, set_dual_role_data: 25;
    /// Fast role swap required current
    pub fast_role_swap, set_fast_role_swap: 24, 23;
    /// Reserved
    pub reserved, _: 22, 20;
    /// Voltage in 50 mV units
    pub voltage, set_voltage: 19, 10;
    /// Operational current in 10 mA units
    pub current, set_current: 9, 0;
}

impl FixedPdo {
    /// Create a PDO from raw field values, voltage in 50 mV units and current in 10 mA units
    pub fn new(voltage: u16, current: u16) -> Self {
        let mut pdo = Self(0);
        pdo.set_voltage(u32::from(voltage).min(FIELD_MAX));
        pdo.set_current(u32::from(current).min(FIELD_MAX));
        pdo
    }

    /// Create a PDO from a voltage in mV and a current in mA, rounding down to the field resolution
    pub fn from_millis(voltage_mv: u32, current_ma: u32) -> Self {
        let mut pdo = Self(0);
        pdo.set_voltage((voltage_mv / VOLTAGE_UNIT_MV).min(FIELD_MAX));
        pdo.set_current((current_ma / CURRENT_UNIT_MA).min(FIELD_MAX));
        pdo
    }

    /// Voltage in mV
    pub fn voltage_mv(&self) -> u32 {
        self.voltage() * VOLTAGE_UNIT_MV
    }

    /// Current in mA
    pub fn current_ma(&self) -> u32 {
        self.current() * CURRENT_UNIT_MA
    }

    /// Maximum power in mW
    pub fn max_power_mw(&self) -> u32 {
        self.voltage_mv() * self.current_ma() / 1000
    }
}

impl From<u32> for FixedPdo {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<FixedPdo> for u32 {
    fn from(pdo: FixedPdo) -> Self {
        pdo.0
    }
}

/// Sink PDO register slot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdoChannel {
    /// PDO1, always 5 V
    Pdo1,
    /// PDO2
    Pdo2,
    /// PDO3
    Pdo3,
}

impl PdoChannel {
    /// Register address of the sink PDO slot
    pub const fn address(self) -> u8 {
        match self {
            PdoChannel::Pdo1 => 0x85,
            PdoChannel::Pdo2 => 0x89,
            PdoChannel::Pdo3 => 0x8D,
        }
    }

    /// Position of the slot, also the number of PDOs to enable so that this slot is the highest one advertised
    pub const fn number(self) -> u8 {
        match self {
            PdoChannel::Pdo1 => 1,
            PdoChannel::Pdo2 => 2,
            PdoChannel::Pdo3 => 3,
        }
    }
}

/// Device driver interface for the sink PDO registers
pub trait PdoController {
    /// Type of error returned by the bus
    type BusError;

    /// Write a sink PDO slot
    fn set_pdo(&mut self, channel: PdoChannel, pdo: FixedPdo) -> impl Future<Output = Result<(), Self::BusError>>;
    /// Set the number of sink PDOs advertised to the source
    fn set_pdo_count(&mut self, count: u8) -> impl Future<Output = Result<(), Self::BusError>>;
    /// Issue a PD soft reset so the new PDOs are negotiated
    fn renegotiate(&mut self) -> impl Future<Output = Result<(), Self::BusError>>;
}

/// Override a sink PDO, advertise PDOs up to and including `channel`, then renegotiate
pub async fn apply_pdo<C: PdoController>(
    controller: &mut C,
    channel: PdoChannel,
    pdo: FixedPdo,
) -> Result<(), C::BusError> {
    controller
        .set_pdo(channel, pdo)
        .await
        .inspect_err(|_| error!("Failed to set PDO{}", channel.number()))?;
    controller.set_pdo_count(channel.number()).await?;
    controller.renegotiate().await?;

    info!(
        "PDO{} set to {} mV, {} mA",
        channel.number(),
        pdo.voltage_mv(),
        pdo.current_ma()
    );
    Ok(())
}
