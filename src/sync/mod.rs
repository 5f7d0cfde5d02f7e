//! Synchronization Module
//!
//! The two-tier protocol every write passes through:
//!
//! ```text
//!   insert ──► AdmissionGate(inserts) ──┐
//!                                      ├──► RwLock<Table> (write) ──► table
//!   delete ──► AdmissionGate(deletes) ──┘
//!
//!   search / print ───────────────────────► RwLock<Table> (read)  ──► table
//! ```
//!
//! - [`AdmissionGate`] answers "may I *start* this kind of write". At most one
//!   operation per gate is admitted; inserts and deletes are gated
//!   independently.
//! - [`RwLock`] answers "may I *touch the table* right now". It is the only
//!   authority for mutual exclusion over the protected data.
//!
//! Both are monitors built from a `parking_lot::Mutex` and `parking_lot::Condvar`.
//! Every acquisition returns a guard and dropping the guard is the only way to
//! release, so an unmatched release cannot be written.

mod gate;
mod rwlock;

pub use gate::{Admission, AdmissionGate, WakeOrder};
pub use rwlock::{LockStats, ReadGuard, RwLock, WriteGuard};
