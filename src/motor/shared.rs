//! Sharing the engine across interrupt and polling contexts.
//!
//! The execution model is single-core with two preemptive event contexts
//! (step timer expiry, limit-switch level change) on top of a cooperative
//! command loop. [`SharedEngine`] serializes every engine access inside a
//! critical section, which both guards the multi-word ramp/position state
//! and keeps the step handler from nesting with itself.
//!
//! The switch-change event itself only records a [`SwitchTrigger`] flag;
//! the command loop drains it, applies the debounce delay, and then calls
//! [`poll_switch_update`](crate::MotionEngine::poll_switch_update). That
//! bounds the work done at elevated priority to a single atomic store.

use core::cell::RefCell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, Ordering};

use crate::error::Result;
use crate::hal::MotionHardware;

use super::engine::MotionEngine;

/// Pending limit-switch change notification.
///
/// `notify` is the only call safe from the switch-change interrupt.
#[derive(Debug, Default)]
pub struct SwitchTrigger {
    pending: AtomicBool,
}

impl SwitchTrigger {
    /// Create a cleared trigger. `const` so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record a switch level change.
    #[inline]
    pub fn notify(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }

    /// Consume the pending notification, if any.
    #[inline]
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Peek without consuming.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

/// Critical-section guarded handle to a [`MotionEngine`].
///
/// Construct one in a `static` with [`uninit`](SharedEngine::uninit) and
/// fill it with [`init`](SharedEngine::init) once the hardware exists, then
/// hand the same reference to the timer event handler, the switch poller
/// and the command loop.
pub struct SharedEngine<HW: MotionHardware> {
    inner: Mutex<RefCell<Option<MotionEngine<HW>>>>,
}

impl<HW: MotionHardware> SharedEngine<HW> {
    /// An empty handle; every access is a no-op until [`init`](Self::init).
    pub const fn uninit() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// A handle already holding an engine.
    pub fn new(engine: MotionEngine<HW>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Some(engine))),
        }
    }

    /// Install (or replace) the engine.
    pub fn init(&self, engine: MotionEngine<HW>) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).replace(engine);
        });
    }

    /// Run `f` on the engine inside a critical section.
    ///
    /// Returns `None` if the handle was never initialized.
    pub fn with<R>(&self, f: impl FnOnce(&mut MotionEngine<HW>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Step timer expiry entry point.
    pub fn on_step_event(&self) -> Result<()> {
        self.with(|engine| engine.on_step_event()).unwrap_or(Ok(()))
    }

    /// Debounced switch re-evaluation entry point.
    pub fn poll_switch_update(&self) -> Result<()> {
        self.with(|engine| engine.poll_switch_update())
            .unwrap_or(Ok(()))
    }
}
