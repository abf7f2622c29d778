//! Our error types for the DPS460 control core.

use core::fmt;
use core::num::ParseIntError;
use std::collections::TryReserveError;

use thiserror::Error;

use crate::pmbus::PmbusData;

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Errors from attribute access. `E` is the engine's transport error.
#[derive(Error, Debug)]
pub enum Error<E: fmt::Debug> {
    #[error("Bus transaction failed: {0:?}")]
    Transport(E),
    #[error("Invalid integer input: {0}")]
    Parse(#[from] ParseIntError),
    #[error("No such attribute")]
    UnknownAttribute,
}

/// Errors from bringing a device up.
///
/// `E` is the engine's error, `A` the attribute host's error and `C` the
/// SMBus client type.
#[derive(Error)]
pub enum ProbeError<E: fmt::Debug, A: fmt::Debug, C> {
    #[error("Adapter lacks byte data, word data or PEC support")]
    UnsupportedTransport,
    #[error("Failed to allocate driver info: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("PMBus probe failed: {0:?}")]
    Probe(E),
    /// The engine probe succeeded and is left in place. `device` is still
    /// live under the engine, without its descriptor or custom attributes.
    #[error("Failed to create attribute group: {error:?}")]
    AttributeRegistration { error: A, device: PmbusData<C> },
}

// Written out so that `C` needs no `Debug` bound.
impl<E: fmt::Debug, A: fmt::Debug, C> fmt::Debug for ProbeError<E, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTransport => f.write_str("UnsupportedTransport"),
            Self::Allocation(e) => f.debug_tuple("Allocation").field(e).finish(),
            Self::Probe(e) => f.debug_tuple("Probe").field(e).finish(),
            Self::AttributeRegistration { error, device } => f
                .debug_struct("AttributeRegistration")
                .field("error", error)
                .field("device", device)
                .finish(),
        }
    }
}
