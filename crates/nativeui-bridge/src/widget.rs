//! Widget identity and the composition traits screens rely on.
//!
//! The generic widget machinery (handle allocation, property dispatch) lives
//! in the host runtime. This module only names the pieces a screen needs to
//! talk to its children and to the container it is nested in.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use nativeui_bridge_core::Result;

use crate::screen::Screen;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// The runtime-assigned handle of a widget.
///
/// Handles are allocated by the host and never change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(i32);

impl WidgetHandle {
    /// Wrap a raw handle value.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw value written into event records.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a native view: the visual representation of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocate a process-unique view id.
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// A widget that can be placed inside a screen.
pub trait Widget: Send + Sync {
    /// The widget's handle.
    fn handle(&self) -> WidgetHandle;

    /// The native view that represents the widget on screen.
    fn view(&self) -> ViewId;
}

/// A widget that can act as a screen's parent.
///
/// Parents are held through weak references; a screen never keeps its parent
/// alive.
pub trait ParentWidget: Send + Sync {
    /// The parent's handle.
    fn handle(&self) -> WidgetHandle;

    /// The parent's screen-container capability, if it has one.
    ///
    /// Parents without it make their child screens report as not shown and
    /// receive no command bar notifications.
    fn as_screen_container(&self) -> Option<&dyn ScreenContainer> {
        None
    }
}

/// Capability of containers that compose screens, such as a navigation stack.
pub trait ScreenContainer: Send + Sync {
    /// Whether `child` is the screen currently on display within this container.
    fn is_child_shown(&self, child: &Screen) -> Result<bool>;

    /// Reconcile container-level command bar display after `child` toggled its bar.
    fn toggle_application_bar(&self, child: &Screen) -> Result<()>;
}
