//! Output destinations for rendered frames.
//!
//! A [`DrawTarget`] receives the bytes of every frame: carriage returns, the gauge line, and
//! the escape sequences used on completion. Writes are best-effort. A failing terminal is
//! logged and otherwise ignored so a broken pipe never interrupts the caller's loop.

use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;

/// Where a progress bar writes its frames.
///
/// Cloning is cheap. Clones of a [`DrawTarget::memory`] target share one buffer, which is
/// how tests observe what a bar drew.
#[derive(Clone, Default)]
pub struct DrawTarget {
    kind: Kind,
}

#[derive(Clone, Default)]
enum Kind {
    #[default]
    Stdout,
    Hidden,
    Memory(Arc<Mutex<Vec<u8>>>),
}

impl fmt::Debug for DrawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            Kind::Stdout => "Stdout",
            Kind::Hidden => "Hidden",
            Kind::Memory(_) => "Memory",
        };
        f.debug_tuple("DrawTarget").field(&name).finish()
    }
}

impl DrawTarget {
    /// Writes to the process' standard output. This is the default.
    #[must_use]
    pub fn stdout() -> Self {
        Self { kind: Kind::Stdout }
    }

    /// Discards every frame.
    #[must_use]
    pub fn hidden() -> Self {
        Self { kind: Kind::Hidden }
    }

    /// Captures frames in a shared in-memory buffer.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            kind: Kind::Memory(Arc::default()),
        }
    }

    /// Returns `true` if frames are discarded.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.kind, Kind::Hidden)
    }

    /// Returns everything captured so far by a memory target.
    ///
    /// Returns `None` for the other targets.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        match &self.kind {
            Kind::Memory(buf) => Some(String::from_utf8_lossy(&buf.lock()).into_owned()),
            Kind::Stdout | Kind::Hidden => None,
        }
    }

    /// Writes one frame and flushes, logging instead of failing.
    pub(crate) fn write_frame(&self, frame: &str) {
        if let Err(err) = self.try_write(frame.as_bytes()) {
            tracing::warn!(error = %err, "failed to draw progress frame");
        }
    }

    /// Flushes pending output without drawing.
    pub(crate) fn flush(&self) {
        if let Kind::Stdout = self.kind {
            if let Err(err) = io::stdout().flush() {
                tracing::warn!(error = %err, "failed to flush progress output");
            }
        }
    }

    fn try_write(&self, bytes: &[u8]) -> io::Result<()> {
        match &self.kind {
            Kind::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Kind::Hidden => Ok(()),
            Kind::Memory(buf) => {
                buf.lock().extend_from_slice(bytes);
                Ok(())
            }
        }
    }
}
