//! RwLock Tests
//!
//! Tests verify:
//! - Readers share, writers exclude
//! - Writer preference over newly arriving readers
//! - Timed acquisition gives up cleanly
//! - No lost wakeups under contention

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gatekv::sync::RwLock;

// =============================================================================
// Helper Functions
// =============================================================================

fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached within 5s");
        thread::sleep(Duration::from_millis(1));
    }
}

// =============================================================================
// Basic Mode Tests
// =============================================================================

#[test]
fn test_many_concurrent_readers() {
    let lock = Arc::new(RwLock::new(42u32));
    let inside = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            let inside = Arc::clone(&inside);
            thread::spawn(move || {
                let guard = lock.read();
                inside.fetch_add(1, Ordering::SeqCst);
                // Every reader waits for all four to be inside at once
                wait_until(|| inside.load(Ordering::SeqCst) == 4);
                *guard
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 42);
    }
    assert_eq!(lock.readers_active(), 0);
}

#[test]
fn test_writer_blocks_until_readers_leave() {
    let lock = Arc::new(RwLock::new(0u32));
    let reader = lock.read();

    let writer = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            *lock.write() = 9;
        })
    };

    wait_until(|| lock.writers_waiting() == 1);
    assert!(!lock.is_write_locked());
    assert_eq!(*reader, 0);

    drop(reader);
    writer.join().unwrap();
    assert_eq!(*lock.read(), 9);
}

// =============================================================================
// Writer Preference Tests
// =============================================================================

#[test]
fn test_waiting_writer_blocks_new_readers() {
    let lock = Arc::new(RwLock::new(0u32));
    let first_reader = lock.read();

    let writer = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            *lock.write() += 1;
        })
    };
    wait_until(|| lock.writers_waiting() == 1);

    // A reader arriving now must queue behind the writer
    assert!(lock.try_read().is_none());
    let late_reader = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            let value = *lock.read();
            value
        })
    };
    thread::sleep(Duration::from_millis(50));
    assert!(!late_reader.is_finished());

    drop(first_reader);
    writer.join().unwrap();

    // The late reader only got in after the write
    assert_eq!(late_reader.join().unwrap(), 1);
}

#[test]
fn test_write_release_prefers_waiting_writer() {
    let lock = Arc::new(RwLock::new(Vec::<&'static str>::new()));
    let holder = lock.write();

    let second_writer = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            lock.write().push("writer");
        })
    };
    wait_until(|| lock.writers_waiting() == 1);

    let reader = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            let seen = lock.read().clone();
            seen
        })
    };
    thread::sleep(Duration::from_millis(20));

    drop(holder);
    second_writer.join().unwrap();

    // The reader was queued behind the waiting writer, so it sees its write
    assert_eq!(reader.join().unwrap(), vec!["writer"]);
}

// =============================================================================
// Timed Acquisition Tests
// =============================================================================

#[test]
fn test_try_read_for_times_out_under_writer() {
    let lock = RwLock::new(());
    let _writer = lock.write();

    let start = Instant::now();
    assert!(lock.try_read_for(Duration::from_millis(30)).is_none());
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_try_write_for_succeeds_when_free() {
    let lock = RwLock::new(1);
    let mut guard = lock.try_write_for(Duration::from_millis(10)).unwrap();
    *guard = 2;
    drop(guard);
    assert_eq!(*lock.read(), 2);
}

#[test]
fn test_timed_out_writer_releases_held_back_readers() {
    let lock = Arc::new(RwLock::new(()));
    let reader = lock.read();

    let writer = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            let acquired = lock.try_write_for(Duration::from_millis(100)).is_some();
            acquired
        })
    };
    wait_until(|| lock.writers_waiting() == 1);

    let late_reader = {
        let lock = Arc::clone(&lock);
        thread::spawn(move || {
            let _guard = lock.read();
        })
    };

    // The writer gives up while the first reader is still inside
    assert!(!writer.join().unwrap());
    late_reader.join().unwrap();

    assert_eq!(lock.writers_waiting(), 0);
    drop(reader);
    assert!(lock.try_write().is_some());
}

// =============================================================================
// Contention Tests
// =============================================================================

#[test]
fn test_mutual_exclusion_under_contention() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 300;

    let lock = Arc::new(RwLock::new(0usize));
    let readers_inside = Arc::new(AtomicUsize::new(0));
    let writers_inside = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let lock = Arc::clone(&lock);
            let readers_inside = Arc::clone(&readers_inside);
            let writers_inside = Arc::clone(&writers_inside);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    if (t + round) % 3 == 0 {
                        let mut guard = lock.write();
                        assert_eq!(writers_inside.fetch_add(1, Ordering::SeqCst), 0);
                        assert_eq!(readers_inside.load(Ordering::SeqCst), 0);
                        *guard += 1;
                        writers_inside.fetch_sub(1, Ordering::SeqCst);
                    } else {
                        let guard = lock.read();
                        readers_inside.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(writers_inside.load(Ordering::SeqCst), 0);
                        let _ = *guard;
                        readers_inside.fetch_sub(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected_writes = (0..THREADS)
        .flat_map(|t| (0..ROUNDS).map(move |r| (t + r) % 3 == 0))
        .filter(|w| *w)
        .count();
    assert_eq!(*lock.read(), expected_writes);

    let stats = lock.stats();
    assert_eq!(stats.acquisitions, (THREADS * ROUNDS + 1) as u64);
    assert_eq!(stats.releases, (THREADS * ROUNDS + 1) as u64);
}

#[test]
fn test_all_blocked_writers_eventually_run() {
    let lock = Arc::new(RwLock::new(0u32));
    let holder = lock.write();

    let writers: Vec<_> = (0..16)
        .map(|_| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                *lock.write() += 1;
            })
        })
        .collect();
    wait_until(|| lock.writers_waiting() == 16);

    drop(holder);
    for writer in writers {
        writer.join().unwrap();
    }
    assert_eq!(*lock.read(), 16);
}
