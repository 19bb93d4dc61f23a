/*!
 * Error Types
 *
 * The error surface here is deliberately small: blocking operations never
 * fail, bounded waits report timeout as a plain boolean, and precondition
 * violations panic rather than returning an error.
 */

use thiserror::Error;

/// Result type for non-blocking lock acquisition.
pub type LockResult<T> = Result<T, TryLockError>;

/// Non-blocking acquisition errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLockError {
    #[error("lock is currently held by another thread")]
    WouldBlock,
}
