//! The capability descriptor handed to the generic PMBus engine.

use std::collections::TryReserveError;

use modular_bitfield::prelude::*;

/// Upper bound on logical pages a PMBus device may declare.
pub const PMBUS_PAGES: usize = 32;

/// Which channels a page exposes. Bit positions follow the Linux PMBus core.
#[bitfield]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmbusFunc {
    pub have_vin: bool,
    pub have_vcap: bool,
    pub have_vout: bool,
    pub have_iin: bool,
    pub have_iout: bool,
    pub have_pin: bool,
    pub have_pout: bool,
    pub have_fan12: bool,
    pub have_fan34: bool,
    pub have_temp: bool,
    pub have_temp2: bool,
    pub have_temp3: bool,
    pub have_status_vout: bool,
    pub have_status_iout: bool,
    pub have_status_input: bool,
    pub have_status_temp: bool,
    pub have_status_fan12: bool,
    pub have_status_fan34: bool,
    pub have_status_vmon: bool,
    #[skip]
    __: B13,
}

/// Describes a device to the PMBus engine.
///
/// Not `Clone`: it is moved into the engine on probe and only comes back if
/// the engine rejects the device.
#[derive(Debug, PartialEq, Eq)]
pub struct DriverInfo {
    pages: u8,
    func: Box<[PmbusFunc]>,
}

impl DriverInfo {
    /// Allocate a descriptor with `pages` pages and no channels.
    ///
    /// `pages` is capped at [`PMBUS_PAGES`].
    pub fn new(pages: u8) -> Result<Self, TryReserveError> {
        let pages = pages.min(PMBUS_PAGES as u8);
        let mut func = Vec::new();
        func.try_reserve_exact(pages as usize)?;
        func.resize(pages as usize, PmbusFunc::new());
        Ok(Self {
            pages,
            func: func.into_boxed_slice(),
        })
    }

    /// Descriptor for the DPS460: one page with one fan and two temperatures.
    pub fn dps460() -> Result<Self, TryReserveError> {
        let page0 = PmbusFunc::new()
            .with_have_fan12(true)
            .with_have_status_fan12(true)
            .with_have_temp(true)
            .with_have_temp2(true)
            .with_have_status_temp(true);
        Ok(Self::new(1)?.with_page_func(0, page0))
    }

    /// Set the channels of one page. Out of range pages are ignored.
    pub fn with_page_func(mut self, page: u8, func: PmbusFunc) -> Self {
        if let Some(slot) = self.func.get_mut(page as usize) {
            *slot = func;
        }
        self
    }

    pub fn pages(&self) -> u8 {
        self.pages
    }

    /// Channels of `page`, or `None` past the last page.
    pub fn func(&self, page: u8) -> Option<PmbusFunc> {
        self.func.get(page as usize).copied()
    }
}
