use core::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    attrs::{self, AttrText, AttributeHost, DPS460_ATTR_GROUP, DpsAttribute},
    error::{Error, ProbeError, Result},
    info::DriverInfo,
    pmbus::{PmbusData, PmbusEngine, ProbeRejected},
    smbus::SmbusClient,
};

/// Name the host matches this driver against.
pub const DPS460_DEVICE_ID: &str = "dni_dps460";

/// Device names this driver binds to.
pub const DPS460_ID_TABLE: &[&str] = &[DPS460_DEVICE_ID];

/// Whether a device named `name` should be bound by this driver.
pub fn match_id(name: &str) -> bool {
    DPS460_ID_TABLE.contains(&name)
}

/// A bound DPS460.
///
/// You get one from [`Dps460::probe`]. While it exists the generic PMBus
/// engine is monitoring the device and the `fan1_target` and `pec` attributes
/// are exposed through the host. Dropping it (or calling [`Dps460::remove`])
/// tears both down again.
///
/// `show` and `store` take `&self`, so a `Dps460` can be shared between
/// threads. Register access is serialized by the device's update lock.
pub struct Dps460<'a, E: PmbusEngine, H: AttributeHost> {
    engine: &'a E,
    host: H,
    data: PmbusData<E::Client>,
}

impl<'a, E: PmbusEngine, H: AttributeHost> Dps460<'a, E, H> {
    /// Bring up a DPS460 on `client`.
    ///
    /// Fails without touching the client if its adapter can't do byte data,
    /// word data and PEC. If the attribute group can't be created the generic
    /// probe is left in place and the live handle is returned in the error.
    pub fn probe(
        engine: &'a E,
        client: Arc<E::Client>,
        host: H,
    ) -> core::result::Result<Self, ProbeError<E::Error, H::Error, E::Client>> {
        let funcs = client.functionality();
        if !funcs.supports_pmbus_pec() {
            debug!("Adapter functionality {} lacks PMBus PEC support", funcs);
            return Err(ProbeError::UnsupportedTransport);
        }

        // Writes won't work without PEC.
        client.set_pec(true);

        let info = DriverInfo::dps460()?;

        let mut data = match engine.probe(client, info) {
            Ok(data) => data,
            Err(ProbeRejected { info, error }) => {
                warn!("PMBus probe failed: {:?}", error);
                drop(info);
                return Err(ProbeError::Probe(error));
            }
        };

        if let Err(error) = host.create_group(&DPS460_ATTR_GROUP) {
            warn!(
                "Failed to create attribute group {}: {:?}",
                DPS460_ATTR_GROUP.name, error
            );
            drop(data.take_info());
            return Err(ProbeError::AttributeRegistration {
                error,
                device: data,
            });
        }

        debug!("{} bound", DPS460_DEVICE_ID);
        Ok(Self { engine, host, data })
    }

    /// Unbind the device. Same as dropping it.
    pub fn remove(self) {
        drop(self);
    }

    pub fn device(&self) -> &PmbusData<E::Client> {
        &self.data
    }

    /// Read an attribute as text.
    pub fn show(&self, attr: DpsAttribute) -> Result<AttrText, E::Error> {
        attrs::show(self.engine, &self.data, attr)
    }

    /// Write an attribute from text. Returns the number of bytes consumed.
    pub fn store(&self, attr: DpsAttribute, buf: &str) -> Result<usize, E::Error> {
        attrs::store(self.engine, &self.data, attr, buf)
    }

    pub fn show_named(&self, name: &str) -> Result<AttrText, E::Error> {
        self.show(Self::lookup(name)?)
    }

    pub fn store_named(&self, name: &str, buf: &str) -> Result<usize, E::Error> {
        self.store(Self::lookup(name)?, buf)
    }

    fn lookup(name: &str) -> Result<DpsAttribute, E::Error> {
        DpsAttribute::from_str(name).map_err(|_| Error::UnknownAttribute)
    }
}

impl<E: PmbusEngine, H: AttributeHost> Drop for Dps460<'_, E, H> {
    fn drop(&mut self) {
        // Attributes go first, they read through the handle.
        self.host.remove_group(&DPS460_ATTR_GROUP);
        drop(self.data.take_info());
        self.engine.remove(&mut self.data);
        debug!("{} removed", DPS460_DEVICE_ID);
    }
}
