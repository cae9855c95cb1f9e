//! Type aliases for commonly used shared-state types.
//!
//! Gives meaningful names to the wrapper types used at the engine's seams:
//! single-threaded shared state for the composition root, and
//! mutex-protected state for the decode-channel boundary.

use parking_lot::Mutex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Used when the composition root and the engine need to observe the same
/// state (e.g. a shape-change sink accumulating edits).
pub type Shared<T> = Rc<RefCell<T>>;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`. The decode workers hand results back across
/// this seam.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe vector for cross-thread collection management.
pub type ThreadSafeVec<T> = Arc<Mutex<Vec<T>>>;

/// Creates a new single-threaded shared value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Creates a new thread-safe shared value.
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
