//! The SMBus client boundary.
//!
//! The bus transaction layer itself is provided by the host. All this crate
//! needs from a client is its adapter functionality and its PEC flag.

use core::fmt;

use modular_bitfield::prelude::*;

/// Adapter functionality, bit for bit as reported by the Linux `I2C_FUNCS` ioctl.
#[bitfield]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Functionality {
    pub i2c: bool,
    pub ten_bit_addr: bool,
    pub protocol_mangling: bool,
    pub smbus_pec: bool,
    pub nostart: bool,
    pub slave: bool,
    #[skip]
    __: B9,
    pub smbus_block_proc_call: bool,
    pub smbus_quick: bool,
    pub smbus_read_byte: bool,
    pub smbus_write_byte: bool,
    pub smbus_read_byte_data: bool,
    pub smbus_write_byte_data: bool,
    pub smbus_read_word_data: bool,
    pub smbus_write_word_data: bool,
    pub smbus_proc_call: bool,
    pub smbus_read_block_data: bool,
    pub smbus_write_block_data: bool,
    pub smbus_read_i2c_block: bool,
    pub smbus_write_i2c_block: bool,
    pub smbus_host_notify: bool,
    #[skip]
    __: B3,
}

impl Functionality {
    /// Read and write byte data transactions.
    pub fn has_byte_data(&self) -> bool {
        self.smbus_read_byte_data() && self.smbus_write_byte_data()
    }

    /// Read and write word data transactions.
    pub fn has_word_data(&self) -> bool {
        self.smbus_read_word_data() && self.smbus_write_word_data()
    }

    /// Everything a PEC-protected PMBus device needs from its adapter.
    pub fn supports_pmbus_pec(&self) -> bool {
        self.has_byte_data() && self.has_word_data() && self.smbus_pec()
    }
}

/// A client device on an SMBus adapter.
///
/// The PEC flag lives on the client rather than on any device state, so it
/// must be settable through a shared reference. Implementations are expected
/// to back it with an atomic.
pub trait SmbusClient {
    /// What the adapter this client sits on can do.
    fn functionality(&self) -> Functionality;

    /// Whether transactions currently carry a PEC byte.
    fn pec(&self) -> bool;

    /// Enable or disable PEC. Applies from the next transaction on.
    fn set_pec(&self, enabled: bool);
}

impl<T: SmbusClient + ?Sized> SmbusClient for &T {
    fn functionality(&self) -> Functionality {
        (**self).functionality()
    }

    fn pec(&self) -> bool {
        (**self).pec()
    }

    fn set_pec(&self, enabled: bool) {
        (**self).set_pec(enabled)
    }
}

impl fmt::Display for Functionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", u32::from(*self))
    }
}
