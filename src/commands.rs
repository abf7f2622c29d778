//! PMBus command codes used by the DPS460.

use strum_macros::EnumIter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum PmbusCommand {
    /// __R/W__ - Selects the logical page subsequent commands apply to.
    Page = 0x00,
    /// __W__ - Clears all latched status and fault bits.
    ClearFaults = 0x03,
    /// __R/W__ - Fan 1/2 configuration.
    FanConfig12 = 0x3A,
    /// __R/W__ - Fan 1 speed command.
    ///
    /// On the DPS460 this is a raw value, see [`FanScaling`](crate::fan::FanScaling).
    FanCommand1 = 0x3B,
    /// __R/W__ - Fan 2 speed command. Unused, the DPS460 has one fan.
    FanCommand2 = 0x3C,
    /// __R__ - Summary status word.
    StatusWord = 0x79,
    /// __R__ - Temperature status.
    StatusTemperature = 0x7D,
    /// __R__ - Fan 1/2 status.
    StatusFans12 = 0x81,
    /// __R__ - First temperature sensor.
    ReadTemperature1 = 0x8D,
    /// __R__ - Second temperature sensor.
    ReadTemperature2 = 0x8E,
    /// __R__ - Fan 1 measured speed.
    ReadFanSpeed1 = 0x90,
}

impl From<PmbusCommand> for u8 {
    fn from(value: PmbusCommand) -> Self {
        value as u8
    }
}
