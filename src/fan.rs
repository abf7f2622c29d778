//! Fan speed scaling.
//!
//! `FAN_COMMAND_1` on the DPS460 does not take an RPM. It takes a raw value
//! which has a linear relation to RPM:
//!
//! `rpm = (rpm_min / value_min) * raw`
//!
//! For the DPS460 the slope is `7200 / 0x28 = 180`.

/// Fan command scaling limits, as given by the PSU datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanScaling {
    /// Slowest commandable fan speed in RPM.
    pub rpm_min: u32,
    /// Fastest commandable fan speed in RPM.
    pub rpm_max: u32,
    /// Raw register value which corresponds to `rpm_min`.
    pub value_min: u16,
    /// Raw register value which corresponds to `rpm_max`.
    pub value_max: u16,
}

impl FanScaling {
    /// Data provided by DELL Inc.
    pub const DPS460: FanScaling = FanScaling::new(7200, 18000, 0x28, 0x64);

    pub const fn new(rpm_min: u32, rpm_max: u32, value_min: u16, value_max: u16) -> Self {
        Self {
            rpm_min,
            rpm_max,
            value_min,
            value_max,
        }
    }

    /// RPM per raw unit.
    #[inline]
    pub const fn slope(&self) -> u32 {
        self.rpm_min / self.value_min as u32
    }

    /// Convert a raw `FAN_COMMAND_1` value to RPM.
    ///
    /// The hardware is trusted here, so `raw` is not range checked.
    #[inline]
    pub const fn raw_to_rpm(&self, raw: u16) -> u32 {
        raw as u32 * self.slope()
    }

    /// Clamp a requested fan speed into the commandable range.
    #[inline]
    pub fn clamp_rpm(&self, rpm: i64) -> u32 {
        // Both bounds fit in u32, so the clamped value does too.
        rpm.clamp(self.rpm_min as i64, self.rpm_max as i64) as u32
    }

    /// Convert a requested fan speed to a raw `FAN_COMMAND_1` value.
    ///
    /// Out of range requests are clamped rather than rejected.
    #[inline]
    pub fn rpm_to_raw(&self, rpm: i64) -> u16 {
        let rpm = self.clamp_rpm(rpm);
        // At most value_min * rpm_max / rpm_min, which is value_max for a
        // consistent table.
        ((self.value_min as u32 * rpm) / self.rpm_min) as u16
    }
}

impl Default for FanScaling {
    fn default() -> Self {
        Self::DPS460
    }
}
