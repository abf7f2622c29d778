//! The DPS460 specific attributes: `fan1_target` and `pec`.
//!
//! Both are read and written as decimal text, the way sysfs attributes are.
//! Reads end in a newline, writes may carry one trailing newline.

use core::fmt::{self, Write};
use core::num::ParseIntError;

use strum_macros::{EnumCount as EnumCountMacro, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, warn};

use crate::{
    commands::PmbusCommand,
    error::{Error, Result},
    fan::FanScaling,
    pmbus::{PmbusData, PmbusEngine},
    smbus::SmbusClient,
};

/// Text produced by reading an attribute.
pub type AttrText = heapless::String<16>;

/// We are only concerned with the first fan, which lives on page 0.
const FAN_PAGE: u8 = 0;
const FAN: FanScaling = FanScaling::DPS460;

/// Owner read/write, everyone else read.
pub const ATTR_MODE: u16 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCountMacro, EnumString, IntoStaticStr)]
pub enum DpsAttribute {
    /// Fan 1 target speed in RPM.
    #[strum(serialize = "fan1_target")]
    Fan1Target,
    /// Whether transactions carry a PEC byte, `0` or `1`.
    #[strum(serialize = "pec")]
    Pec,
}

impl DpsAttribute {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn mode(self) -> u16 {
        ATTR_MODE
    }
}

impl fmt::Display for DpsAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of attributes created and removed together.
#[derive(Debug)]
pub struct AttributeGroup {
    pub name: &'static str,
    pub attrs: &'static [DpsAttribute],
}

pub static DPS460_ATTR_GROUP: AttributeGroup = AttributeGroup {
    name: "dni_dps460",
    attrs: &[DpsAttribute::Fan1Target, DpsAttribute::Pec],
};

/// Where attribute groups get exposed, e.g. a device's sysfs directory.
pub trait AttributeHost {
    type Error: fmt::Debug;

    fn create_group(&self, group: &'static AttributeGroup) -> core::result::Result<(), Self::Error>;

    fn remove_group(&self, group: &'static AttributeGroup);
}

impl<T: AttributeHost + ?Sized> AttributeHost for &T {
    type Error = T::Error;

    fn create_group(&self, group: &'static AttributeGroup) -> core::result::Result<(), T::Error> {
        (**self).create_group(group)
    }

    fn remove_group(&self, group: &'static AttributeGroup) {
        (**self).remove_group(group)
    }
}

/// Read an attribute as text.
pub fn show<E: PmbusEngine>(
    engine: &E,
    data: &PmbusData<E::Client>,
    attr: DpsAttribute,
) -> Result<AttrText, E::Error> {
    let value = match attr {
        DpsAttribute::Fan1Target => get_target(engine, data)?,
        DpsAttribute::Pec => show_pec(data),
    };
    Ok(to_text(value))
}

/// Write an attribute from text. Returns the number of bytes consumed.
pub fn store<E: PmbusEngine>(
    engine: &E,
    data: &PmbusData<E::Client>,
    attr: DpsAttribute,
    buf: &str,
) -> Result<usize, E::Error> {
    match attr {
        DpsAttribute::Fan1Target => set_target(engine, data, buf),
        DpsAttribute::Pec => set_pec(data, buf),
    }
}

/// Read back the commanded fan 1 speed in RPM.
pub fn get_target<E: PmbusEngine>(engine: &E, data: &PmbusData<E::Client>) -> Result<u32, E::Error> {
    let raw = {
        let _guard = data.lock_update();
        let raw = engine
            .read_word_data(data, FAN_PAGE, PmbusCommand::FanCommand1)
            .map_err(|e| {
                warn!("Failed to read FAN_COMMAND_1: {:?}", e);
                Error::Transport(e)
            })?;
        engine.clear_faults(data);
        raw
    };
    Ok(FAN.raw_to_rpm(raw))
}

/// Command a new fan 1 speed. The request is clamped to the supported range.
pub fn set_target<E: PmbusEngine>(
    engine: &E,
    data: &PmbusData<E::Client>,
    buf: &str,
) -> Result<usize, E::Error> {
    let rpm = parse_long(buf)?;
    let clamped = FAN.clamp_rpm(rpm);
    if i64::from(clamped) != rpm {
        debug!("Fan target {} RPM clamped to {} RPM", rpm, clamped);
    }
    let raw = FAN.rpm_to_raw(rpm);

    let _guard = data.lock_update();
    engine
        .write_word_data(data, FAN_PAGE, PmbusCommand::FanCommand1, raw)
        .map_err(|e| {
            warn!("Failed to write FAN_COMMAND_1 = {:#06x}: {:?}", raw, e);
            Error::Transport(e)
        })?;
    engine.clear_faults(data);

    Ok(buf.len())
}

/// `1` if PEC is enabled on the client, else `0`.
pub fn show_pec<C: SmbusClient>(data: &PmbusData<C>) -> u32 {
    u32::from(data.client().pec())
}

/// Any non-zero value enables PEC.
pub fn set_pec<C: SmbusClient, E: fmt::Debug>(data: &PmbusData<C>, buf: &str) -> Result<usize, E> {
    let val = parse_long(buf)?;
    data.client().set_pec(val != 0);
    debug!("PEC {}", if val != 0 { "enabled" } else { "disabled" });
    Ok(buf.len())
}

/// Base 10, optionally signed, with at most one trailing newline.
fn parse_long(buf: &str) -> core::result::Result<i64, ParseIntError> {
    buf.strip_suffix('\n').unwrap_or(buf).parse()
}

fn to_text(value: u32) -> AttrText {
    let mut text = AttrText::new();
    // u32::MAX and a newline is 11 bytes, well within capacity.
    let _ = writeln!(text, "{}", value);
    text
}
