//! Admission gate
//!
//! Caps the number of admitted operations of one kind at one. A gate is a
//! small monitor: a flag saying whether someone is admitted, plus the
//! bookkeeping for whichever [`WakeOrder`] it was built with.
//!
//! A thread that finds the gate busy reports it once through the observer
//! passed to [`AdmissionGate::enter_with`], then waits. Wakeups that do not
//! let it in (spurious, or another waiter's turn) re-wait silently.

use std::fmt;

use parking_lot::{Condvar, Mutex};

/// How a gate chooses the next waiter when the admitted operation leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WakeOrder {
    /// Waiters are admitted in arrival order (ticket queue)
    #[default]
    Fifo,

    /// One unspecified waiter is woken; no ordering among waiters
    Unordered,
}

#[derive(Debug, Default)]
struct GateState {
    active: bool,
    waiting: usize,
    admitted: u64,

    // Ticket queue, used by `WakeOrder::Fifo` only.
    next_ticket: u64,
    now_serving: u64,
}

/// Per-kind admission control in front of the table lock
pub struct AdmissionGate {
    name: String,
    order: WakeOrder,
    state: Mutex<GateState>,
    cv: Condvar,
}

impl AdmissionGate {
    /// Create an open gate
    pub fn new(name: impl Into<String>, order: WakeOrder) -> Self {
        Self {
            name: name.into(),
            order,
            state: Mutex::new(GateState::default()),
            cv: Condvar::new(),
        }
    }

    /// Block until admitted
    pub fn enter(&self) -> Admission<'_> {
        self.enter_with(|| {})
    }

    /// Block until admitted, calling `on_wait` once if the gate was busy
    pub fn enter_with<F>(&self, on_wait: F) -> Admission<'_>
    where
        F: FnOnce(),
    {
        let mut on_wait = Some(on_wait);
        let mut state = self.state.lock();

        match self.order {
            WakeOrder::Fifo => {
                let ticket = state.next_ticket;
                state.next_ticket += 1;
                while ticket != state.now_serving {
                    if let Some(f) = on_wait.take() {
                        f();
                    }
                    state.waiting += 1;
                    self.cv.wait(&mut state);
                    state.waiting -= 1;
                }
            }
            WakeOrder::Unordered => {
                while state.active {
                    if let Some(f) = on_wait.take() {
                        f();
                    }
                    state.waiting += 1;
                    self.cv.wait(&mut state);
                    state.waiting -= 1;
                }
            }
        }

        debug_assert!(!state.active, "gate {} admitted twice", self.name);
        state.active = true;
        state.admitted += 1;
        tracing::trace!(gate = %self.name, "admitted");
        Admission { gate: self }
    }

    /// Admit without blocking if the gate is free and nobody is queued
    pub fn try_enter(&self) -> Option<Admission<'_>> {
        let mut state = self.state.lock();
        if state.active || state.waiting > 0 {
            return None;
        }
        if self.order == WakeOrder::Fifo {
            state.next_ticket += 1;
        }
        state.active = true;
        state.admitted += 1;
        Some(Admission { gate: self })
    }

    fn leave(&self) {
        let mut state = self.state.lock();
        state.active = false;
        match self.order {
            WakeOrder::Fifo => {
                state.now_serving += 1;
                // Every waiter shares one condvar; only the next ticket proceeds.
                if state.waiting > 0 {
                    self.cv.notify_all();
                }
            }
            WakeOrder::Unordered => {
                self.cv.notify_one();
            }
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Gate name, used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured wake order
    pub fn wake_order(&self) -> WakeOrder {
        self.order
    }

    /// Whether an operation is currently admitted
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Threads currently blocked in `enter`
    pub fn waiting(&self) -> usize {
        self.state.lock().waiting
    }

    /// Total admissions granted so far
    pub fn admitted(&self) -> u64 {
        self.state.lock().admitted
    }
}

impl fmt::Debug for AdmissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AdmissionGate")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("active", &state.active)
            .field("waiting", &state.waiting)
            .finish()
    }
}

/// Proof of admission; leaves the gate on drop
#[must_use = "dropping the admission immediately leaves the gate"]
pub struct Admission<'a> {
    gate: &'a AdmissionGate,
}

impl Admission<'_> {
    /// The gate this admission belongs to
    pub fn gate(&self) -> &AdmissionGate {
        self.gate
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        self.gate.leave();
    }
}
