//! Sharing a chain driver between its handle and the views borrowed from it.
//!
//! [`ButtonBoard`](crate::ButtonBoard) and [`Digits`](crate::Digits) own their driver inside a
//! [`ChainMutex`].  Button machines and digit groups only hold a `&M` and take the lock for a single
//! operation: a poll reads buttons and writes lamps under one lock, a group draws its digits and
//! sends the frame under one lock.  No lock is held between calls, so views can be polled in any
//! order.
//!
//! Locks do not nest.  Calling back into the board or a view from inside a `lock` closure
//! deadlocks a `Mutex` and panics a `RefCell`.

/// Common interface for mutex implementations.
///
/// A button board is shared between the board handle and every button state machine polling it,
/// and a digit chain is shared between all groups drawing on it.  `shift-chain` needs a mutex to
/// ensure only one of them touches the chain driver at a time.  It already implements this trait
/// for a number of existing mutex types:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
///
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
///
/// For other mutex types, a custom implementation is needed.  Due to the orphan rule, it might be
/// necessary to wrap it in a newtype:
///
/// ```
/// struct MyMutex<T>(std::sync::Mutex<T>);
///
/// impl<T> shift_chain::ChainMutex for MyMutex<T> {
///     type Chain = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::Mutex::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Chain) -> R>(&self, f: F) -> R {
///         let mut v = self.0.lock().unwrap();
///         f(&mut v)
///     }
/// }
/// ```
pub trait ChainMutex {
    /// The chain driver wrapped inside this mutex.
    type Chain;

    /// Create a new mutex of this type.
    fn create(v: Self::Chain) -> Self;

    /// Lock the mutex and give a closure access to the chain driver inside.
    fn lock<R, F: FnOnce(&mut Self::Chain) -> R>(&self, f: F) -> R;
}

impl<T> ChainMutex for core::cell::RefCell<T> {
    type Chain = T;

    fn create(v: Self::Chain) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Chain) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> ChainMutex for std::sync::Mutex<T> {
    type Chain = T;

    fn create(v: Self::Chain) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Chain) -> R>(&self, f: F) -> R {
        // buffers stay valid after a panic in another lock holder
        let mut v = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut v)
    }
}
