//! The boundary to the generic PMBus engine.
//!
//! The engine owns register polling, the sensor cache and its staleness
//! timer. Device drivers only ever talk to it through [`PmbusEngine`], and
//! share its per-device [`PmbusData`] handle.

use core::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::{commands::PmbusCommand, info::DriverInfo, smbus::SmbusClient};

/// Per-device state shared between the engine and the device driver.
pub struct PmbusData<C> {
    client: Arc<C>,
    info: Option<DriverInfo>,
    /// Serializes every register access and cache update for this device.
    update_lock: Mutex<()>,
}

impl<C> PmbusData<C> {
    /// Engines call this from [`PmbusEngine::probe`].
    pub fn new(client: Arc<C>, info: DriverInfo) -> Self {
        Self {
            client,
            info: Some(info),
            update_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The descriptor, unless the driver has already released it.
    pub fn info(&self) -> Option<&DriverInfo> {
        self.info.as_ref()
    }

    /// Hand the descriptor back to the driver. Yields it at most once.
    pub fn take_info(&mut self) -> Option<DriverInfo> {
        self.info.take()
    }

    /// Take the device's update lock.
    ///
    /// Any register read-then-clear or write-then-clear sequence must run
    /// under this guard.
    pub fn lock_update(&self) -> MutexGuard<'_, ()> {
        self.update_lock.lock()
    }
}

impl<C> fmt::Debug for PmbusData<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PmbusData")
            .field("info", &self.info)
            .field("locked", &self.update_lock.is_locked())
            .finish_non_exhaustive()
    }
}

/// Returned by a failed [`PmbusEngine::probe`], giving the descriptor back.
#[derive(Debug)]
pub struct ProbeRejected<E> {
    pub info: DriverInfo,
    pub error: E,
}

/// The generic PMBus engine.
pub trait PmbusEngine {
    type Client: SmbusClient;
    type Error: fmt::Debug;

    /// Bring up generic monitoring for `client` using the channels in `info`.
    fn probe(
        &self,
        client: Arc<Self::Client>,
        info: DriverInfo,
    ) -> Result<PmbusData<Self::Client>, ProbeRejected<Self::Error>>;

    /// Tear down generic monitoring. The handle is dropped afterwards.
    fn remove(&self, data: &mut PmbusData<Self::Client>);

    fn read_word_data(
        &self,
        data: &PmbusData<Self::Client>,
        page: u8,
        command: PmbusCommand,
    ) -> Result<u16, Self::Error>;

    fn write_word_data(
        &self,
        data: &PmbusData<Self::Client>,
        page: u8,
        command: PmbusCommand,
        word: u16,
    ) -> Result<(), Self::Error>;

    /// Send `CLEAR_FAULTS`. Best effort, failures are not reported.
    fn clear_faults(&self, data: &PmbusData<Self::Client>);
}
