//! Thread affinity checks for UI-affine state.
//!
//! Visual mutations must happen on the UI context's thread. A
//! [`ThreadAffinity`] records that thread and lets code verify, cheaply in
//! release builds, that it is running where it should be.
//!
//! ```
//! use nativeui_bridge_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! affinity.debug_assert_same_thread();
//! ```

use std::thread::ThreadId;

/// The thread a UI context, and everything it mutates, belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self::of(std::thread::current().id())
    }

    /// Bind to `thread_id`.
    #[inline]
    pub fn of(thread_id: ThreadId) -> Self {
        Self { thread_id }
    }

    /// The bound thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// # Panics
    ///
    /// Panics when called from any thread but the bound one.
    #[inline]
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            self.wrong_thread();
        }
    }

    /// [`assert_same_thread`](Self::assert_same_thread) in debug builds, nothing in release.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[cold]
    #[inline(never)]
    fn wrong_thread(&self) -> ! {
        let current = std::thread::current();
        panic!(
            "UI state touched from thread {:?} ({:?}); it belongs to {:?}. \
             Use UiContext::run_sync to get onto the UI thread.",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
            self.thread_id
        )
    }
}
