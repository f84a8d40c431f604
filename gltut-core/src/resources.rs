//! Bookkeeping of GPU object lifetimes.
//!
//! Every GPU object is acquired before the render loop and released at exit
//! in the exact reverse order of acquisition. [`ResourceLedger`] records
//! both sides and reports any handle that leaks, is released twice, or is
//! released out of order.

use std::fmt;

/// Kind of GPU object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VertexArray,
    Buffer,
    Shader,
    Program,
    Texture,
    Framebuffer,
    Renderbuffer,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::VertexArray => "vertex array",
            ResourceKind::Buffer => "buffer",
            ResourceKind::Shader => "shader",
            ResourceKind::Program => "program",
            ResourceKind::Texture => "texture",
            ResourceKind::Framebuffer => "framebuffer",
            ResourceKind::Renderbuffer => "renderbuffer",
        };
        f.write_str(name)
    }
}

/// Ledger entry handed out on acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub label: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The handle was never acquired or has already been released.
    DoubleRelease(ResourceId),
    /// `released` was freed while `expected` (acquired later) was still live.
    OutOfOrder { released: Entry, expected: Entry },
    /// Handles still live when the ledger was closed.
    Leaked(Vec<Entry>),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::DoubleRelease(id) => {
                write!(f, "resource #{} released twice or never acquired", id.0)
            }
            LedgerError::OutOfOrder { released, expected } => {
                write!(f, "{released} released before {expected}")
            }
            LedgerError::Leaked(entries) => {
                write!(f, "{} resource(s) never released:", entries.len())?;
                for entry in entries {
                    write!(f, " {entry};")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Summary of a clean teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    /// Entries in the order they were released.
    pub released: Vec<Entry>,
}

/// Stack of live GPU objects.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    next_id: u32,
    live: Vec<Entry>,
    released: Vec<Entry>,
    violations: Vec<LedgerError>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly created object.
    pub fn acquire(&mut self, kind: ResourceKind, label: impl Into<String>) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        let entry = Entry {
            id,
            kind,
            label: label.into(),
        };
        log::trace!("acquire #{} {}", id.0, entry);
        self.live.push(entry);
        id
    }

    /// Records the release of `id`.
    ///
    /// Only the most recently acquired live object may be released. An out
    /// of order release still removes the entry, so later releases are
    /// judged against the remaining stack.
    pub fn release(&mut self, id: ResourceId) -> Result<(), LedgerError> {
        let Some(position) = self.live.iter().rposition(|e| e.id == id) else {
            let err = LedgerError::DoubleRelease(id);
            self.violations.push(err.clone());
            return Err(err);
        };

        let entry = self.live.remove(position);
        log::trace!("release #{} {}", id.0, entry);

        let result = match self.live.get(position) {
            Some(expected) => {
                let err = LedgerError::OutOfOrder {
                    released: entry.clone(),
                    expected: expected.clone(),
                };
                self.violations.push(err.clone());
                Err(err)
            }
            None => Ok(()),
        };
        self.released.push(entry);
        result
    }

    /// Number of objects still alive.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Entries still alive, oldest first.
    pub fn live(&self) -> &[Entry] {
        &self.live
    }

    /// Closes the ledger.
    ///
    /// Fails with [`LedgerError::Leaked`] if anything is still alive, and
    /// otherwise with the first violation recorded by [`release`](Self::release).
    pub fn finish(&self) -> Result<TeardownReport, LedgerError> {
        if !self.live.is_empty() {
            return Err(LedgerError::Leaked(self.live.clone()));
        }
        if let Some(err) = self.violations.first() {
            return Err(err.clone());
        }
        Ok(TeardownReport {
            released: self.released.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_reverse_release_is_clean() {
        let mut ledger = ResourceLedger::new();
        let vao = ledger.acquire(ResourceKind::VertexArray, "vao");
        let vbo = ledger.acquire(ResourceKind::Buffer, "vbo");
        let ebo = ledger.acquire(ResourceKind::Buffer, "ebo");
        let program = ledger.acquire(ResourceKind::Program, "program");

        for id in [program, ebo, vbo, vao] {
            assert_eq!(ledger.release(id), Ok(()));
        }

        let report = ledger.finish().unwrap();
        assert_eq!(labels(&report.released), vec!["program", "ebo", "vbo", "vao"]);
    }

    #[test]
    fn test_out_of_order_release_is_reported() {
        let mut ledger = ResourceLedger::new();
        let fbo = ledger.acquire(ResourceKind::Framebuffer, "fbo");
        let rbo = ledger.acquire(ResourceKind::Renderbuffer, "rbo");

        let err = ledger.release(fbo).unwrap_err();
        assert!(matches!(
            &err,
            LedgerError::OutOfOrder { released, expected }
                if released.label == "fbo" && expected.label == "rbo"
        ));
        assert_eq!(ledger.release(rbo), Ok(()));
        assert_eq!(ledger.finish(), Err(err));
    }

    #[test]
    fn test_double_release_is_reported() {
        let mut ledger = ResourceLedger::new();
        let tex = ledger.acquire(ResourceKind::Texture, "tex");
        assert_eq!(ledger.release(tex), Ok(()));
        assert_eq!(ledger.release(tex), Err(LedgerError::DoubleRelease(tex)));
        assert_eq!(ledger.finish(), Err(LedgerError::DoubleRelease(tex)));
    }

    #[test]
    fn test_leak_is_reported() {
        let mut ledger = ResourceLedger::new();
        let _vs = ledger.acquire(ResourceKind::Shader, "vertex");
        let fs = ledger.acquire(ResourceKind::Shader, "fragment");
        ledger.release(fs).unwrap();

        match ledger.finish() {
            Err(LedgerError::Leaked(entries)) => assert_eq!(labels(&entries), vec!["vertex"]),
            other => panic!("expected a leak, got {other:?}"),
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ledger = ResourceLedger::new();
        let a = ledger.acquire(ResourceKind::Buffer, "a");
        ledger.release(a).unwrap();
        let b = ledger.acquire(ResourceKind::Buffer, "a");
        assert_ne!(a, b);
        assert_eq!(ledger.release(a), Err(LedgerError::DoubleRelease(a)));
    }

    /// Owners that release in `Drop` and declare fields in reverse creation
    /// order tear down cleanly.
    #[test]
    fn test_drop_order_of_owning_struct() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Guard(Rc<RefCell<ResourceLedger>>, ResourceId);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.borrow_mut().release(self.1).unwrap();
            }
        }

        struct Owner {
            // reverse creation order
            _texture: Guard,
            _program: Guard,
            _buffer: Guard,
        }

        let ledger = Rc::new(RefCell::new(ResourceLedger::new()));
        let acquire = |kind, label: &str| {
            let id = ledger.borrow_mut().acquire(kind, label);
            Guard(Rc::clone(&ledger), id)
        };
        let buffer = acquire(ResourceKind::Buffer, "buffer");
        let program = acquire(ResourceKind::Program, "program");
        let texture = acquire(ResourceKind::Texture, "texture");

        drop(Owner {
            _texture: texture,
            _program: program,
            _buffer: buffer,
        });

        let report = ledger.borrow().finish().unwrap();
        assert_eq!(labels(&report.released), vec!["texture", "program", "buffer"]);
    }
}
