/*!
 * Relaxed Atomics
 *
 * Atomic wrapper with relaxed memory ordering as the default instead of
 * SeqCst, plus a load-then-store clone that plain atomics forbid.
 */

use std::fmt;
use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};

mod sealed {
    pub trait Sealed {}
}

/// Scalar types with a matching atomic representation.
///
/// Sealed: implemented for `bool` and the fixed-width integers via the
/// std atomics, nothing else.
pub trait Primitive: Copy + Default + sealed::Sealed {
    #[doc(hidden)]
    type Atomic;

    #[doc(hidden)]
    fn atomic_new(value: Self) -> Self::Atomic;
    #[doc(hidden)]
    fn atomic_load(atomic: &Self::Atomic, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_store(atomic: &Self::Atomic, value: Self, order: Ordering);
    #[doc(hidden)]
    fn atomic_swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
}

/// Integer primitives supporting atomic add/sub.
pub trait Arithmetic: Primitive {
    #[doc(hidden)]
    fn atomic_fetch_add(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_sub(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
}

macro_rules! impl_primitive {
    ($($ty:ty => $atomic:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            type Atomic = $atomic;

            #[inline]
            fn atomic_new(value: Self) -> Self::Atomic {
                <$atomic>::new(value)
            }

            #[inline]
            fn atomic_load(atomic: &Self::Atomic, order: Ordering) -> Self {
                atomic.load(order)
            }

            #[inline]
            fn atomic_store(atomic: &Self::Atomic, value: Self, order: Ordering) {
                atomic.store(value, order)
            }

            #[inline]
            fn atomic_swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.swap(value, order)
            }
        }
    )*};
}

macro_rules! impl_arithmetic {
    ($($ty:ty),* $(,)?) => {$(
        impl Arithmetic for $ty {
            #[inline]
            fn atomic_fetch_add(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_add(value, order)
            }

            #[inline]
            fn atomic_fetch_sub(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_sub(value, order)
            }
        }
    )*};
}

impl_primitive! {
    bool => AtomicBool,
    u8 => AtomicU8,
    i8 => AtomicI8,
    u16 => AtomicU16,
    i16 => AtomicI16,
    u32 => AtomicU32,
    i32 => AtomicI32,
    u64 => AtomicU64,
    i64 => AtomicI64,
    usize => AtomicUsize,
    isize => AtomicIsize,
}

impl_arithmetic!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize);

/// Atomic value defaulting to relaxed ordering.
///
/// For flags and counters that need atomicity but no cross-thread ordering,
/// SeqCst on every access is pure overhead. `load`/`store`/`swap` here are
/// relaxed; the `_with` variants take an explicit [`Ordering`] when a call
/// site does need stronger guarantees.
///
/// Relaxed means exactly that: each individual operation is atomic, and
/// nothing more. Compound read-modify-write sequences built from `load` +
/// `store` still race; use [`fetch_add`](Self::fetch_add) /
/// [`fetch_sub`](Self::fetch_sub) for those.
pub struct RelaxedAtomic<T: Primitive> {
    value: T::Atomic,
}

impl<T: Primitive> RelaxedAtomic<T> {
    /// Wrap an initial value.
    pub fn new(initial: T) -> Self {
        Self {
            value: T::atomic_new(initial),
        }
    }

    /// Read the current value with relaxed ordering.
    #[inline]
    pub fn load(&self) -> T {
        T::atomic_load(&self.value, Ordering::Relaxed)
    }

    /// Read the current value with an explicit ordering.
    #[inline]
    pub fn load_with(&self, order: Ordering) -> T {
        T::atomic_load(&self.value, order)
    }

    /// Set the value with relaxed ordering.
    #[inline]
    pub fn store(&self, value: T) {
        T::atomic_store(&self.value, value, Ordering::Relaxed)
    }

    /// Set the value with an explicit ordering.
    #[inline]
    pub fn store_with(&self, value: T, order: Ordering) {
        T::atomic_store(&self.value, value, order)
    }

    /// Set the value and return the previous one, relaxed ordering.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        T::atomic_swap(&self.value, value, Ordering::Relaxed)
    }

    /// Set the value and return the previous one with an explicit ordering.
    #[inline]
    pub fn swap_with(&self, value: T, order: Ordering) -> T {
        T::atomic_swap(&self.value, value, order)
    }
}

impl<T: Arithmetic> RelaxedAtomic<T> {
    /// Atomically add, returning the previous value. Relaxed ordering.
    ///
    /// Unlike a `load`/`store` pair this is a single race-free
    /// read-modify-write.
    #[inline]
    pub fn fetch_add(&self, value: T) -> T {
        T::atomic_fetch_add(&self.value, value, Ordering::Relaxed)
    }

    /// Atomically add with an explicit ordering.
    #[inline]
    pub fn fetch_add_with(&self, value: T, order: Ordering) -> T {
        T::atomic_fetch_add(&self.value, value, order)
    }

    /// Atomically subtract, returning the previous value. Relaxed ordering.
    #[inline]
    pub fn fetch_sub(&self, value: T) -> T {
        T::atomic_fetch_sub(&self.value, value, Ordering::Relaxed)
    }

    /// Atomically subtract with an explicit ordering.
    #[inline]
    pub fn fetch_sub_with(&self, value: T, order: Ordering) -> T {
        T::atomic_fetch_sub(&self.value, value, order)
    }
}

impl<T: Primitive> Default for RelaxedAtomic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Load-then-store copy. Each step is individually atomic; the pair is
/// deliberately not transactional, so the source may change between the
/// read and the write. Plain atomics forbid cloning altogether; callers
/// here are expected not to need cross-step consistency.
impl<T: Primitive> Clone for RelaxedAtomic<T> {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl<T: Primitive> From<T> for RelaxedAtomic<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Primitive + fmt::Debug> fmt::Debug for RelaxedAtomic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelaxedAtomic").field(&self.load()).finish()
    }
}

pub type RelaxedBool = RelaxedAtomic<bool>;
pub type RelaxedU8 = RelaxedAtomic<u8>;
pub type RelaxedI8 = RelaxedAtomic<i8>;
pub type RelaxedU16 = RelaxedAtomic<u16>;
pub type RelaxedI16 = RelaxedAtomic<i16>;
pub type RelaxedU32 = RelaxedAtomic<u32>;
pub type RelaxedI32 = RelaxedAtomic<i32>;
pub type RelaxedU64 = RelaxedAtomic<u64>;
pub type RelaxedI64 = RelaxedAtomic<i64>;
pub type RelaxedUsize = RelaxedAtomic<usize>;
pub type RelaxedIsize = RelaxedAtomic<isize>;
