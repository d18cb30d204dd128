/*
 * Exactly-once ownership for raw native handles.
 *
 * A handle is adopted once it exists (for windows, on WM_NCCREATE) and released
 * either explicitly, e.g. when the user closes the window, or when the owner is
 * dropped. Whichever comes first wins; the other is a no-op.
 */
use std::cell::Cell;
use std::fmt;

pub struct OwnedHandle<H: Copy> {
    raw: Cell<Option<H>>,
    release_fn: fn(H),
}

impl<H: Copy> OwnedHandle<H> {
    pub fn empty(release_fn: fn(H)) -> Self {
        Self {
            raw: Cell::new(None),
            release_fn,
        }
    }

    pub fn new(raw: H, release_fn: fn(H)) -> Self {
        Self {
            raw: Cell::new(Some(raw)),
            release_fn,
        }
    }

    /// Takes ownership of `raw`. Returns `false` (and leaves the current handle in
    /// place) if a handle is already owned.
    pub fn adopt(&self, raw: H) -> bool {
        if self.raw.get().is_some() {
            log::warn!("OwnedHandle: adopt called while a handle is already owned; ignoring.");
            return false;
        }
        self.raw.set(Some(raw));
        true
    }

    pub fn get(&self) -> Option<H> {
        self.raw.get()
    }

    /// Releases the handle if still owned. Returns whether a release happened.
    pub fn release(&self) -> bool {
        match self.raw.take() {
            Some(raw) => {
                (self.release_fn)(raw);
                true
            }
            None => false,
        }
    }

    /// Gives up ownership without releasing, for handles the system already freed.
    pub fn forget(&self) -> Option<H> {
        self.raw.take()
    }
}

impl<H: Copy> Drop for OwnedHandle<H> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: Copy + fmt::Debug> fmt::Debug for OwnedHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedHandle")
            .field("raw", &self.raw.get())
            .finish()
    }
}
