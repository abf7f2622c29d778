//! We use this mocking module in unit tests to emulate the PMBus engine, the
//! SMBus client and the attribute host.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::{
    attrs::{AttributeGroup, AttributeHost},
    commands::PmbusCommand,
    info::DriverInfo,
    pmbus::{PmbusData, PmbusEngine, ProbeRejected},
    smbus::{Functionality, SmbusClient},
};

/// Everything the mocks observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Probe { pages: u8 },
    Remove { had_info: bool },
    Read(u8, PmbusCommand),
    Write(u8, PmbusCommand, u16),
    ClearFaults,
    CreateGroup(&'static str),
    RemoveGroup(&'static str),
}

/// Shared so the engine and host can record into one timeline.
pub type EventLog = Arc<Mutex<Vec<Event>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPmbusError {
    /// Simulated NACK from the device
    Nack,
    /// Simulated probe rejection
    NoDevice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockHostError {
    /// Simulated sysfs failure
    Exists,
}

/// Our mock type used to emulate an SMBus client.
#[derive(Debug)]
pub struct MockClient {
    funcs: Functionality,
    pec: AtomicBool,
}

impl MockClient {
    /// A client on an adapter with byte data, word data and PEC
    pub fn new() -> Self {
        Self::with_functionality(
            Functionality::new()
                .with_i2c(true)
                .with_smbus_pec(true)
                .with_smbus_read_byte_data(true)
                .with_smbus_write_byte_data(true)
                .with_smbus_read_word_data(true)
                .with_smbus_write_word_data(true),
        )
    }

    pub fn with_functionality(funcs: Functionality) -> Self {
        Self {
            funcs,
            pec: AtomicBool::new(false),
        }
    }
}

impl SmbusClient for MockClient {
    fn functionality(&self) -> Functionality {
        self.funcs
    }

    fn pec(&self) -> bool {
        self.pec.load(Ordering::SeqCst)
    }

    fn set_pec(&self, enabled: bool) {
        self.pec.store(enabled, Ordering::SeqCst);
    }
}

/// Our mock PMBus engine. Successful operations are recorded as [`Event`]s.
pub struct MockPmbus {
    log: EventLog,
    registers: Mutex<HashMap<(u8, u8), u16>>,
    /// Flag to simulate probe rejection
    should_reject_probe: AtomicBool,
    /// Flag to simulate read errors
    should_error_on_read: AtomicBool,
    /// Flag to simulate write errors
    should_error_on_write: AtomicBool,
    /// Set between a register access and the following fault clear
    in_transaction: AtomicBool,
    /// Register accesses which started inside another's transaction
    overlaps: AtomicUsize,
    /// How long each register access takes
    access_delay: Mutex<Option<Duration>>,
}

impl MockPmbus {
    pub fn new() -> Self {
        Self::with_log(EventLog::default())
    }

    pub fn with_log(log: EventLog) -> Self {
        Self {
            log,
            registers: Mutex::new(HashMap::new()),
            should_reject_probe: AtomicBool::new(false),
            should_error_on_read: AtomicBool::new(false),
            should_error_on_write: AtomicBool::new(false),
            in_transaction: AtomicBool::new(false),
            overlaps: AtomicUsize::new(0),
            access_delay: Mutex::new(None),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().clone()
    }

    pub fn set_register(&self, page: u8, command: PmbusCommand, word: u16) {
        self.registers.lock().insert((page, command.into()), word);
    }

    pub fn register(&self, page: u8, command: PmbusCommand) -> Option<u16> {
        self.registers.lock().get(&(page, command.into())).copied()
    }

    pub fn set_probe_error(&self, should_error: bool) {
        self.should_reject_probe.store(should_error, Ordering::SeqCst);
    }

    pub fn set_read_error(&self, should_error: bool) {
        self.should_error_on_read.store(should_error, Ordering::SeqCst);
    }

    pub fn set_write_error(&self, should_error: bool) {
        self.should_error_on_write.store(should_error, Ordering::SeqCst);
    }

    pub fn set_access_delay(&self, delay: Duration) {
        *self.access_delay.lock() = Some(delay);
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn begin_transaction(&self) {
        if self.in_transaction.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let delay = *self.access_delay.lock();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }

    fn record(&self, event: Event) {
        self.log.lock().push(event);
    }
}

impl PmbusEngine for MockPmbus {
    type Client = MockClient;
    type Error = MockPmbusError;

    fn probe(
        &self,
        client: Arc<MockClient>,
        info: DriverInfo,
    ) -> Result<PmbusData<MockClient>, ProbeRejected<MockPmbusError>> {
        if self.should_reject_probe.load(Ordering::SeqCst) {
            return Err(ProbeRejected {
                info,
                error: MockPmbusError::NoDevice,
            });
        }
        self.record(Event::Probe {
            pages: info.pages(),
        });
        Ok(PmbusData::new(client, info))
    }

    fn remove(&self, data: &mut PmbusData<MockClient>) {
        self.record(Event::Remove {
            had_info: data.info().is_some(),
        });
    }

    fn read_word_data(
        &self,
        _data: &PmbusData<MockClient>,
        page: u8,
        command: PmbusCommand,
    ) -> Result<u16, MockPmbusError> {
        if self.should_error_on_read.load(Ordering::SeqCst) {
            return Err(MockPmbusError::Nack);
        }
        self.begin_transaction();
        self.record(Event::Read(page, command));
        Ok(self.register(page, command).unwrap_or(0))
    }

    fn write_word_data(
        &self,
        _data: &PmbusData<MockClient>,
        page: u8,
        command: PmbusCommand,
        word: u16,
    ) -> Result<(), MockPmbusError> {
        if self.should_error_on_write.load(Ordering::SeqCst) {
            return Err(MockPmbusError::Nack);
        }
        self.begin_transaction();
        self.record(Event::Write(page, command, word));
        self.set_register(page, command, word);
        Ok(())
    }

    fn clear_faults(&self, _data: &PmbusData<MockClient>) {
        self.record(Event::ClearFaults);
        self.in_transaction.store(false, Ordering::SeqCst);
    }
}

/// Our mock attribute host, standing in for a device's sysfs directory.
pub struct MockHost {
    log: EventLog,
    should_error_on_create: bool,
    created: AtomicUsize,
}

impl MockHost {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            should_error_on_create: false,
            created: AtomicUsize::new(0),
        }
    }

    pub fn failing(log: EventLog) -> Self {
        Self {
            should_error_on_create: true,
            ..Self::new(log)
        }
    }

    /// Groups currently exposed.
    pub fn live_groups(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl AttributeHost for MockHost {
    type Error = MockHostError;

    fn create_group(&self, group: &'static AttributeGroup) -> Result<(), MockHostError> {
        if self.should_error_on_create {
            return Err(MockHostError::Exists);
        }
        self.log.lock().push(Event::CreateGroup(group.name));
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_group(&self, group: &'static AttributeGroup) {
        self.log.lock().push(Event::RemoveGroup(group.name));
        self.created.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_supports_pmbus_pec() {
        let client = MockClient::new();
        assert!(client.functionality().supports_pmbus_pec());
        assert!(!client.pec());
    }

    #[test]
    fn test_client_pec_flag() {
        let client = MockClient::new();
        client.set_pec(true);
        assert!(client.pec());
        client.set_pec(false);
        assert!(!client.pec());
    }

    #[test]
    fn test_registers_default_to_zero() {
        let engine = MockPmbus::new();
        let data = PmbusData::new(Arc::new(MockClient::new()), DriverInfo::dps460().unwrap());
        assert_eq!(engine.read_word_data(&data, 0, PmbusCommand::StatusWord), Ok(0));
    }

    #[test]
    fn test_write_then_read() {
        let engine = MockPmbus::new();
        let data = PmbusData::new(Arc::new(MockClient::new()), DriverInfo::dps460().unwrap());
        engine
            .write_word_data(&data, 0, PmbusCommand::FanCommand1, 0x40)
            .unwrap();
        assert_eq!(engine.read_word_data(&data, 0, PmbusCommand::FanCommand1), Ok(0x40));
    }

    #[test]
    fn test_overlap_detection() {
        let engine = MockPmbus::new();
        let data = PmbusData::new(Arc::new(MockClient::new()), DriverInfo::dps460().unwrap());

        engine.read_word_data(&data, 0, PmbusCommand::FanCommand1).unwrap();
        engine.clear_faults(&data);
        assert_eq!(engine.overlaps(), 0);

        engine.read_word_data(&data, 0, PmbusCommand::FanCommand1).unwrap();
        engine.read_word_data(&data, 0, PmbusCommand::FanCommand1).unwrap();
        assert_eq!(engine.overlaps(), 1);
    }

    #[test]
    fn test_error_flags_toggle() {
        let engine = MockPmbus::new();
        let data = PmbusData::new(Arc::new(MockClient::new()), DriverInfo::dps460().unwrap());

        engine.set_read_error(true);
        assert_eq!(
            engine.read_word_data(&data, 0, PmbusCommand::FanCommand1),
            Err(MockPmbusError::Nack)
        );
        engine.set_read_error(false);
        assert!(engine.read_word_data(&data, 0, PmbusCommand::FanCommand1).is_ok());

        engine.set_write_error(true);
        assert_eq!(
            engine.write_word_data(&data, 0, PmbusCommand::FanCommand1, 1),
            Err(MockPmbusError::Nack)
        );
    }

    #[test]
    fn test_probe_rejection_returns_info() {
        let engine = MockPmbus::new();
        engine.set_probe_error(true);

        let rejected = engine
            .probe(Arc::new(MockClient::new()), DriverInfo::dps460().unwrap())
            .unwrap_err();
        assert_eq!(rejected.error, MockPmbusError::NoDevice);
        assert_eq!(rejected.info, DriverInfo::dps460().unwrap());
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_host_tracks_groups() {
        let log = EventLog::default();
        let host = MockHost::new(log.clone());
        host.create_group(&crate::attrs::DPS460_ATTR_GROUP).unwrap();
        assert_eq!(host.live_groups(), 1);
        host.remove_group(&crate::attrs::DPS460_ATTR_GROUP);
        assert_eq!(host.live_groups(), 0);

        let failing = MockHost::failing(log.clone());
        assert_eq!(
            failing.create_group(&crate::attrs::DPS460_ATTR_GROUP),
            Err(MockHostError::Exists)
        );
        assert_eq!(
            *log.lock(),
            [
                Event::CreateGroup("dni_dps460"),
                Event::RemoveGroup("dni_dps460"),
            ]
        );
    }
}
