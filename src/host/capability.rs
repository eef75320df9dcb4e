use std::{cell::RefCell, rc::Rc};

use log::debug;

use super::loader::{AssetEvent, AssetLoader};

/// Minimal 5x5 PNG used to find out whether the host materializes data URLs.
pub const PROBE_ASSET: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAUAAAAFCAYAAACNbyblAAAAHElEQVQI12P4//8/w38GIAXDIBKE0DHxgljNBAAO9TXL0Y4OHwAAAABJRU5ErkJggg==";

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Capability {
    Unknown,
    Supported,
    Unsupported,
}

struct Waiter {
    on_success: Box<dyn FnOnce()>,
    on_failure: Box<dyn FnOnce()>,
}

impl Waiter {
    fn notify(self, supported: bool) {
        if supported {
            (self.on_success)()
        } else {
            (self.on_failure)()
        }
    }
}

enum GateState {
    Unknown,
    Probing(Vec<Waiter>),
    Resolved(bool),
}

// Capability gate
//------------------------------------------------------------------------------

/// Finds out, once, whether the host can turn a pixel surface into a data URL
/// image. The first [`probe`](Self::probe) issues a single asset load; callers
/// arriving while it is in flight are queued and all notified once it settles.
/// The outcome is kept for the lifetime of the gate and later callers are
/// answered synchronously.
#[derive(Clone)]
pub struct CapabilityGate {
    state: Rc<RefCell<GateState>>,
    loader: Rc<dyn AssetLoader>,
}

impl CapabilityGate {
    pub fn new(loader: Rc<dyn AssetLoader>) -> Self {
        Self { state: Rc::new(RefCell::new(GateState::Unknown)), loader }
    }

    pub fn capability(&self) -> Capability {
        match *self.state.borrow() {
            GateState::Resolved(true) => Capability::Supported,
            GateState::Resolved(false) => Capability::Unsupported,
            GateState::Unknown | GateState::Probing(_) => Capability::Unknown,
        }
    }

    pub fn probe(&self, on_success: impl FnOnce() + 'static, on_failure: impl FnOnce() + 'static) {
        let waiter = Waiter { on_success: Box::new(on_success), on_failure: Box::new(on_failure) };

        let resolved = match *self.state.borrow() {
            GateState::Resolved(supported) => Some(supported),
            _ => None,
        };
        if let Some(supported) = resolved {
            waiter.notify(supported);
            return;
        }

        let issue = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                GateState::Probing(waiters) => {
                    waiters.push(waiter);
                    false
                }
                _ => {
                    *state = GateState::Probing(vec![waiter]);
                    true
                }
            }
        };

        // State is already Probing, a loader reporting synchronously resolves
        // against it
        if issue {
            debug!("Probing data url image support");
            let gate = self.clone();
            self.loader.load(PROBE_ASSET, Box::new(move |ev| gate.resolve(ev)));
        }
    }

    fn resolve(&self, ev: AssetEvent) {
        let supported = ev == AssetEvent::Load;
        let waiters = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, GateState::Resolved(supported)) {
                GateState::Probing(waiters) => waiters,
                prev => {
                    *state = prev;
                    return;
                }
            }
        };

        debug!(
            "Data url image support resolved: {} ({} waiter(s))",
            if supported { "supported" } else { "unsupported" },
            waiters.len()
        );
        for waiter in waiters {
            waiter.notify(supported);
        }
    }
}
