//! Watching the network for Chromecasts coming and going.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::*;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::{self, Instant};

use mdns::{RecordType, Subject};
use mdns_transport::{Network, QuerySession};

use crate::device::{DeviceID, DiscoveryUpdate, KnownDevice};
use crate::extract::devices_from_response;


/// The PTR name every Chromecast advertises itself under.
pub const SERVICE_NAME: &str = "_googlecast._tcp.local.";

/// How long the service waits between queries unless configured otherwise.
pub const DEFAULT_QUERY_INTERVAL: Duration = Duration::from_secs(20);

/// How many missed query intervals mark a device as gone, by default.
pub const DEFAULT_EXPIRE_RATE: u32 = 3;

/// How many updates may sit unread before the driver waits for the
/// consumer to catch up.
const CHANNEL_DEPTH: usize = 32;


/// The error returned when an expire rate below one is configured.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct InvalidExpireRate(pub u32);

impl fmt::Display for InvalidExpireRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an expire rate of {} missed queries is invalid", self.0)
    }
}


/// A handle on a running discovery service. Devices come and go on the
/// update stream returned alongside it by [`discover`]; the handle looks
/// devices up and reconfigures or stops the service.
pub struct Discoverer {
    shared: Arc<Shared>,
    stop: watch::Sender<bool>,
}

/// State shared between the handle and the driver task.
struct Shared {
    devices: RwLock<HashMap<DeviceID, DeviceEntry>>,
    query_interval: Mutex<Duration>,
    expire_rate: Mutex<u32>,
}

/// A device in the table. `last_seen` has its own lock so that refreshing
/// it needs only the table's shared lock. Lock order is always the table
/// first, then the entry, never the reverse.
struct DeviceEntry {
    device: KnownDevice,
    last_seen: Mutex<Instant>,
}


/// Starts the discovery service on the given network, returning a handle
/// and the stream of updates. The stream ends once [`Discoverer::stop`]
/// is called and the driver has halted.
pub fn discover(network: Network) -> (Discoverer, mpsc::Receiver<DiscoveryUpdate>) {
    let shared = Arc::new(Shared {
        devices: RwLock::new(HashMap::new()),
        query_interval: Mutex::new(DEFAULT_QUERY_INTERVAL),
        expire_rate: Mutex::new(DEFAULT_EXPIRE_RATE),
    });

    let (stop_tx, stop_rx) = watch::channel(false);
    let (update_tx, update_rx) = mpsc::channel(CHANNEL_DEPTH);

    tokio::spawn(querier(Arc::clone(&shared), network, update_tx, stop_rx));

    (Discoverer { shared, stop: stop_tx }, update_rx)
}

impl Discoverer {

    /// Retrieves a copy of a device by its ID.
    pub async fn get(&self, id: DeviceID) -> Option<KnownDevice> {
        let devices = self.shared.devices.read().await;
        devices.get(&id).map(|entry| entry.device.clone())
    }

    /// Changes the length of time between network queries for devices.
    /// Takes effect at the next tick; the sleep already in progress is not
    /// rescheduled.
    pub fn set_query_interval(&self, interval: Duration) {
        *self.shared.query_interval.lock() = interval;
    }

    /// Defines the length of time until a device is considered gone, as a
    /// multiple of the query interval. This must be at least 1, and
    /// defaults to 3.
    pub fn set_expire_rate(&self, rate: u32) -> Result<(), InvalidExpireRate> {
        if rate < 1 {
            return Err(InvalidExpireRate(rate));
        }

        *self.shared.expire_rate.lock() = rate;
        Ok(())
    }

    /// Stops the service. No further queries are scheduled, an in-flight
    /// query's late results are dropped, and the update stream closes.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}


/// The driver: one query straight away, then one per interval, with an
/// expiry sweep after each scheduled query. Every update send happens on
/// this task, so once it halts, nothing more can reach the stream.
async fn querier(shared: Arc<Shared>, network: Network, updates: mpsc::Sender<DiscoveryUpdate>, mut stop: watch::Receiver<bool>) {
    if run_query(&shared, network, &updates, &mut stop).await {
        return;
    }

    loop {
        let interval = *shared.query_interval.lock();

        tokio::select! {
            _ = stop.changed() => break,
            _ = time::sleep(interval) => {
                if run_query(&shared, network, &updates, &mut stop).await {
                    break;
                }
                sweep(&shared, &updates).await;
            }
        }
    }

    debug!("Discovery driver stopping");
}


/// Runs one query session for the Chromecast service and folds every
/// device it describes into the table. Returns true when the stop signal
/// fired while the session was draining; the session's remaining results
/// are dropped on the floor.
async fn run_query(shared: &Shared, network: Network, updates: &mpsc::Sender<DiscoveryUpdate>, stop: &mut watch::Receiver<bool>) -> bool {
    let service = match Subject::encode(SERVICE_NAME) {
        Ok(service)  => service,
        Err(e)       => {
            error!("Service name failed to encode -> {}", e);
            return false;
        }
    };

    let session = match QuerySession::new(SERVICE_NAME, RecordType::PTR) {
        Ok(mut session)  => {
            session.set_network(network);
            session
        }
        Err(e)  => {
            error!("Could not build the Chromecast question -> {}", e);
            return false;
        }
    };

    let mut responses = match session.run().await {
        Ok(responses)  => responses,
        Err(e)         => {
            // this tick is lost, but the next one may fare better
            warn!("Chromecast query failed -> {}", e);
            return false;
        }
    };

    loop {
        tokio::select! {
            _ = stop.changed() => {
                debug!("Stopped mid-session, dropping late results");
                return true;
            }
            response = responses.recv() => match response {
                Some(response) => {
                    for device in devices_from_response(&service, &response) {
                        observe(shared, updates, device).await;
                    }
                }
                None => return false,
            }
        }
    }
}


/// Folds one observation into the table. A device that is already known
/// with identical attributes only has its timestamp refreshed; anything
/// else is an insert or replace worth announcing.
async fn observe(shared: &Shared, updates: &mpsc::Sender<DiscoveryUpdate>, found: KnownDevice) {
    {
        let devices = shared.devices.read().await;
        if let Some(entry) = devices.get(&found.id) {
            if entry.device == found {
                *entry.last_seen.lock() = Instant::now();
                return;
            }
        }
    }

    let id = found.id;
    info!("Device {} is new or changed", id);
    {
        let mut devices = shared.devices.write().await;
        devices.insert(id, DeviceEntry { device: found, last_seen: Mutex::new(Instant::now()) });
    }

    let _ = updates.send(DiscoveryUpdate { id, active: true }).await;
}


/// Removes every device that has gone unseen for `expire_rate` query
/// intervals, announcing each removal.
async fn sweep(shared: &Shared, updates: &mpsc::Sender<DiscoveryUpdate>) {
    let horizon = *shared.query_interval.lock() * *shared.expire_rate.lock();
    let now = Instant::now();

    let mut expired = Vec::new();
    {
        let devices = shared.devices.read().await;
        for (id, entry) in devices.iter() {
            let last_seen = *entry.last_seen.lock();
            if now.duration_since(last_seen) > horizon {
                expired.push(*id);
            }
        }
    }

    if expired.is_empty() {
        return;
    }

    {
        let mut devices = shared.devices.write().await;
        for id in &expired {
            devices.remove(id);
        }
    }

    for id in expired {
        info!("Device {} has expired", id);
        let _ = updates.send(DiscoveryUpdate { id, active: false }).await;
    }
}
