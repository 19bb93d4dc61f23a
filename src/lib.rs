/*!
 * syncbridge
 *
 * Thread-synchronization primitives for bridging a background thread with
 * a main loop:
 * - Blocking MPMC message queue with predicate-checked waits
 * - Mutex-guarded cell whose only access path is a scoped guard
 * - Atomic wrapper defaulting to relaxed ordering
 *
 * The three primitives are independent; none depends on another. All of
 * them may be constructed on one thread and used from any number of
 * others for the lifetime of the owning object.
 */

pub mod atomic;
pub mod cell;
pub mod errors;
pub mod queue;

// Re-exports
pub use atomic::{
    Arithmetic, Primitive, RelaxedAtomic, RelaxedBool, RelaxedI16, RelaxedI32, RelaxedI64,
    RelaxedI8, RelaxedIsize, RelaxedU16, RelaxedU32, RelaxedU64, RelaxedU8, RelaxedUsize,
};
pub use cell::{CellGuard, GuardedCell};
pub use errors::{LockResult, TryLockError};
pub use queue::MessageQueue;
