//! This crate provides the fan target and PEC control core for the Delta DPS460 power supply.
//!
//! The DPS460 is a PMBus device. Its voltage, current and temperature channels are handled
//! by a generic PMBus engine, which this crate talks to through [`pmbus::PmbusEngine`]. What
//! the DPS460 needs on top of that is:
//! * A `fan1_target` attribute. `FAN_COMMAND_1` takes a raw value rather than an RPM, see
//!   [`fan::FanScaling`].
//! * A `pec` attribute to turn packet error checking on and off. Writes won't work without
//!   PEC, so it is enabled on probe.
//!
//! The adapter the PSU sits on must support SMBus byte data, word data and PEC.
//!
//! ```ignore
//! let psu = Dps460::probe(&engine, client, host)?;
//! psu.store(DpsAttribute::Fan1Target, "12600\n")?;
//! assert_eq!(psu.show(DpsAttribute::Fan1Target)?.as_str(), "12600\n");
//! psu.remove();
//! ```

pub mod attrs;
pub mod commands;
pub mod dps460;
pub mod error;
pub mod fan;
pub mod info;
pub mod pmbus;
pub mod smbus;

pub use attrs::DpsAttribute;
pub use dps460::Dps460;

#[cfg(test)]
mod mock;
