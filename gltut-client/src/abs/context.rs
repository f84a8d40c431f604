//! Shared GL context handle.
//!
//! [`GlContext`] wraps the loaded [`glow::Context`] together with the
//! [`ResourceLedger`] every GPU wrapper reports to. It dereferences to the
//! glow context, so `gl.create_buffer()` and friends work as usual.

use std::{cell::RefCell, ops::Deref};

use gltut_core::resources::{LedgerError, ResourceId, ResourceKind, ResourceLedger, TeardownReport};

pub struct GlContext {
    gl: glow::Context,
    ledger: RefCell<ResourceLedger>,
}

impl GlContext {
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            ledger: RefCell::new(ResourceLedger::new()),
        }
    }

    /// Registers a freshly created GPU object.
    pub fn track(&self, kind: ResourceKind, label: &str) -> ResourceId {
        self.ledger.borrow_mut().acquire(kind, label)
    }

    /// Records the release of a GPU object. Called from `Drop`, so violations
    /// are logged rather than returned.
    pub fn release(&self, id: ResourceId) {
        if let Err(err) = self.ledger.borrow_mut().release(id) {
            log::warn!("teardown: {err}");
        }
    }

    /// Number of GPU objects still alive.
    pub fn live_resources(&self) -> usize {
        self.ledger.borrow().live_count()
    }

    /// Closes the ledger once every wrapper has been dropped.
    pub fn close_ledger(&self) -> Result<TeardownReport, LedgerError> {
        self.ledger.borrow().finish()
    }
}

/// Hands the items of `stack` to `release` last-in first-out, leaving it empty.
///
/// A `Vec` drops its elements front to back, so owners of several tracked
/// objects release them through this instead.
pub(crate) fn release_stack<T>(stack: &mut Vec<T>, mut release: impl FnMut(T)) {
    while let Some(item) = stack.pop() {
        release(item);
    }
}

impl Deref for GlContext {
    type Target = glow::Context;

    fn deref(&self) -> &Self::Target {
        &self.gl
    }
}
