//! Writer-preferring reader-writer lock
//!
//! ## Policy
//! Writer preference: once a writer is waiting, newly arriving readers block
//! until the writer queue drains. Readers already inside finish normally.
//! On write release one waiting writer is woken if any exist, otherwise all
//! waiting readers are.
//!
//! ## State (guarded by `state`)
//! - `readers`: readers currently inside
//! - `writer`: a writer is inside
//! - `writers_waiting`: writers blocked in `write()`
//!
//! Invariant: `writer ⇒ readers == 0`.

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Cumulative lock counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockStats {
    /// Successful acquisitions in either mode
    pub acquisitions: u64,

    /// Releases in either mode
    pub releases: u64,
}

#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writer: bool,
    writers_waiting: usize,
    stats: LockStats,
}

impl LockState {
    fn reader_may_enter(&self) -> bool {
        !self.writer && self.writers_waiting == 0
    }

    fn writer_may_enter(&self) -> bool {
        !self.writer && self.readers == 0
    }
}

/// Reader-writer lock over a value of type `T`
///
/// ## Concurrency:
/// - `state`: every transition happens under this mutex
/// - `readers_cv`: readers blocked by an active or waiting writer
/// - `writers_cv`: writers blocked by readers or another writer
/// - `data`: only reachable through a [`ReadGuard`] or [`WriteGuard`]
pub struct RwLock<T> {
    state: Mutex<LockState>,
    readers_cv: Condvar,
    writers_cv: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is mediated by the monitor in `state`; shared
// access is handed out only while no writer is inside, exclusive access only
// while nobody else is.
unsafe impl<T: Send> Send for RwLock<T> {}
unsafe impl<T: Send + Sync> Sync for RwLock<T> {}

impl<T> RwLock<T> {
    /// Create a new unlocked lock around `value`
    pub fn new(value: T) -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            readers_cv: Condvar::new(),
            writers_cv: Condvar::new(),
            data: UnsafeCell::new(value),
        }
    }

    // =========================================================================
    // Reader Mode
    // =========================================================================

    /// Acquire in reader mode, blocking while a writer is active or waiting
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut state = self.state.lock();
        while !state.reader_may_enter() {
            self.readers_cv.wait(&mut state);
        }
        self.enter_read(&mut state)
    }

    /// Acquire in reader mode without blocking
    pub fn try_read(&self) -> Option<ReadGuard<'_, T>> {
        let mut state = self.state.lock();
        if !state.reader_may_enter() {
            return None;
        }
        Some(self.enter_read(&mut state))
    }

    /// Acquire in reader mode, giving up after `timeout`
    pub fn try_read_for(&self, timeout: Duration) -> Option<ReadGuard<'_, T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while !state.reader_may_enter() {
            if self.readers_cv.wait_until(&mut state, deadline).timed_out()
                && !state.reader_may_enter()
            {
                return None;
            }
        }
        Some(self.enter_read(&mut state))
    }

    fn enter_read(&self, state: &mut LockState) -> ReadGuard<'_, T> {
        state.readers += 1;
        state.stats.acquisitions += 1;
        ReadGuard { lock: self }
    }

    fn release_read(&self) {
        let mut state = self.state.lock();
        state.readers -= 1;
        state.stats.releases += 1;
        if state.readers == 0 && state.writers_waiting > 0 {
            self.writers_cv.notify_one();
        }
    }

    // =========================================================================
    // Writer Mode
    // =========================================================================

    /// Acquire in writer mode, blocking while anyone else is inside
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut state = self.state.lock();
        state.writers_waiting += 1;
        while !state.writer_may_enter() {
            self.writers_cv.wait(&mut state);
        }
        state.writers_waiting -= 1;
        self.enter_write(&mut state)
    }

    /// Acquire in writer mode without blocking
    pub fn try_write(&self) -> Option<WriteGuard<'_, T>> {
        let mut state = self.state.lock();
        if !state.writer_may_enter() {
            return None;
        }
        Some(self.enter_write(&mut state))
    }

    /// Acquire in writer mode, giving up after `timeout`
    ///
    /// A writer that gives up withdraws its claim and releases any readers it
    /// was holding back.
    pub fn try_write_for(&self, timeout: Duration) -> Option<WriteGuard<'_, T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        state.writers_waiting += 1;
        while !state.writer_may_enter() {
            if self.writers_cv.wait_until(&mut state, deadline).timed_out()
                && !state.writer_may_enter()
            {
                state.writers_waiting -= 1;
                if state.writers_waiting == 0 && !state.writer {
                    self.readers_cv.notify_all();
                }
                return None;
            }
        }
        state.writers_waiting -= 1;
        Some(self.enter_write(&mut state))
    }

    fn enter_write(&self, state: &mut LockState) -> WriteGuard<'_, T> {
        debug_assert_eq!(state.readers, 0);
        state.writer = true;
        state.stats.acquisitions += 1;
        WriteGuard { lock: self }
    }

    fn release_write(&self) {
        let mut state = self.state.lock();
        state.writer = false;
        state.stats.releases += 1;
        if state.writers_waiting > 0 {
            self.writers_cv.notify_one();
        } else {
            self.readers_cv.notify_all();
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Readers currently holding the lock
    pub fn readers_active(&self) -> usize {
        self.state.lock().readers
    }

    /// Whether a writer currently holds the lock
    pub fn is_write_locked(&self) -> bool {
        self.state.lock().writer
    }

    /// Writers blocked waiting for the lock
    pub fn writers_waiting(&self) -> usize {
        self.state.lock().writers_waiting
    }

    /// Acquisition and release counters
    pub fn stats(&self) -> LockStats {
        self.state.lock().stats
    }

    /// Mutable access without locking; the borrow proves exclusivity
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Consume the lock, returning the protected value
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for RwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for RwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RwLock")
            .field("readers", &state.readers)
            .field("writer", &state.writer)
            .field("writers_waiting", &state.writers_waiting)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Guards
// =============================================================================

/// Shared access; releases reader mode on drop
#[must_use = "dropping the guard immediately releases the lock"]
pub struct ReadGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: reader mode is held, so no writer can be inside.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release_read();
    }
}

/// Exclusive access; releases writer mode on drop
#[must_use = "dropping the guard immediately releases the lock"]
pub struct WriteGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: writer mode is held exclusively.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: writer mode is held exclusively.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release_write();
    }
}
