/*!
 * Guarded Cell
 *
 * A value behind a mutex whose only access path is a scoped guard,
 * making the lock and the access syntactically inseparable.
 */

use crate::errors::{LockResult, TryLockError};
use parking_lot::{Mutex, MutexGuard};
use std::ops::{Deref, DerefMut};

/// A value that can only be touched while holding its lock.
///
/// [`lock`](Self::lock) hands out a [`CellGuard`] that dereferences to the
/// value and releases the lock when it goes out of scope, on every exit
/// path. There is no way to reach the value without a guard.
///
/// # Poisoning
///
/// parking_lot mutexes do not poison. If a thread panics while holding a
/// guard the lock is released during unwinding and later lockers observe
/// the value as the panicking section left it.
pub struct GuardedCell<T> {
    value: Mutex<T>,
}

impl<T> GuardedCell<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Block until the lock is acquired, then return the access guard.
    ///
    /// Never fails; blocks as long as another guard exists anywhere.
    pub fn lock(&self) -> CellGuard<'_, T> {
        CellGuard {
            inner: self.value.lock(),
        }
    }

    /// Acquire the lock only if it is free right now.
    pub fn try_lock(&self) -> LockResult<CellGuard<'_, T>> {
        match self.value.try_lock() {
            Some(inner) => Ok(CellGuard { inner }),
            None => Err(TryLockError::WouldBlock),
        }
    }

    /// Lock, run `f` on the value, and release on every exit path.
    ///
    /// The closure-scoped sibling of [`lock`](Self::lock) for callers that
    /// do not need to hold the guard across statements.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.lock())
    }

    /// Consume the cell and return the wrapped value. No locking needed.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// Access the value through an exclusive borrow of the cell itself.
    ///
    /// Statically race-free, so no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }
}

impl<T: Default> Default for GuardedCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Scoped access to a [`GuardedCell`]'s value.
///
/// Holds the cell's lock for its entire lifetime. Dereferences mutably to
/// the value; dropping the guard releases the lock exactly once.
///
/// Guards are neither copyable nor cloneable: duplicating a lock handle is
/// never meaningful.
pub struct CellGuard<'a, T> {
    inner: MutexGuard<'a, T>,
}

impl<T> CellGuard<'_, T> {
    /// Overwrite the entire wrapped value.
    pub fn set(&mut self, value: T) {
        *self.inner = value;
    }

    /// Overwrite the wrapped value, returning the previous one.
    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(&mut *self.inner, value)
    }

    /// Release the lock before the end of the guard's scope.
    ///
    /// Consumes the guard, so using it after unlocking is a compile-time
    /// error rather than a runtime contract violation.
    pub fn unlock(self) {}
}

impl<T> Deref for CellGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for CellGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
