//! Interfaces consumed from the simulation engine's radio medium.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use bytes::Bytes;
use log::trace;

use crate::{MoteId, RadioId, SimTime};

/// A radio attached to the medium, optionally installed on a mote.
pub trait Radio: Send + Sync {
    fn id(&self) -> RadioId;

    fn mote(&self) -> Option<MoteId>;

    /// Packet-level view of this radio, if it exposes one.
    fn as_packet_radio(&self) -> Option<&dyn PacketRadio> {
        None
    }
}

pub trait PacketRadio: Send + Sync {
    fn last_packet_transmitted(&self) -> Option<Bytes>;
}

/// A completed transmission from one source radio to its receivers.
#[derive(Clone)]
pub struct RadioConnection {
    source: Arc<dyn Radio>,
    destinations: Vec<Arc<dyn Radio>>,
}

impl RadioConnection {
    /// `destinations` must be non-empty; a connection always has at least
    /// one receiver.
    pub fn new(source: Arc<dyn Radio>, destinations: Vec<Arc<dyn Radio>>) -> Self {
        debug_assert!(!destinations.is_empty(), "connection without destinations");
        Self { source, destinations }
    }

    pub fn source(&self) -> &dyn Radio {
        self.source.as_ref()
    }

    pub fn destinations(&self) -> &[Arc<dyn Radio>] {
        &self.destinations
    }
}

impl fmt::Debug for RadioConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadioConnection")
            .field("source", &self.source.id())
            .field(
                "destinations",
                &self.destinations.iter().map(|r| r.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// What the medium reports once per simulated tick.
#[derive(Debug, Clone, Copy)]
pub struct TickReport<'a> {
    pub time: SimTime,
    pub connections: Option<&'a [RadioConnection]>,
}

pub type TickObserver = Box<dyn FnMut(&TickReport<'_>) + Send>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: Vec<(u64, Arc<Mutex<TickObserver>>)>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Observer registry for per-tick connection batches.
///
/// Observers run synchronously inside [`TickObservers::notify`] in
/// subscription order. The registry is not locked while they run, so an
/// observer may subscribe or drop a [`Subscription`] from its callback;
/// either change applies from the next notification. An observer must not
/// call `notify` from inside its own callback.
#[derive(Clone, Default)]
pub struct TickObservers {
    registry: Arc<Mutex<Registry>>,
}

impl TickObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(&TickReport<'_>) + Send + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        let observer: TickObserver = Box::new(observer);
        registry.observers.push((id, Arc::new(Mutex::new(observer))));
        trace!("Tick observer {} subscribed", id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn notify(&self, report: &TickReport<'_>) {
        let observers: Vec<Arc<Mutex<TickObserver>>> = lock(&self.registry)
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            let mut observer = observer.lock().unwrap_or_else(PoisonError::into_inner);
            (*observer)(report);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TickObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickObservers")
            .field("observers", &self.len())
            .finish()
    }
}

/// Owned registration handle; dropping it removes the observer.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).observers.retain(|(id, _)| *id != self.id);
            trace!("Tick observer {} unsubscribed", self.id);
        }
    }
}
