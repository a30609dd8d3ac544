//! The application's root frame and its active page.
//!
//! The host owns a single frame whose active page displays exactly one
//! screen's content at a time, optionally with that screen's command bar.
//! [`HostFrame`] is the seam screens use to reach it. [`Frame`] is an
//! in-process implementation for hosts that keep the visual tree themselves,
//! and for tests.

use std::sync::Arc;

use parking_lot::Mutex;

use nativeui_bridge_core::{BridgeError, Result, Signal};

use crate::command_bar::CommandBar;
use crate::grid::ContentGrid;
use crate::orientation::DeviceOrientation;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The size with width and height swapped.
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// The host's root frame.
///
/// Page operations fail with `InvalidState` while no page is active.
pub trait HostFrame: Send + Sync {
    /// The host content area in its natural (portrait) orientation.
    fn content_size(&self) -> Size;

    /// Device orientation notifications.
    fn orientation_changed(&self) -> &Arc<Signal<DeviceOrientation>>;

    /// Size of the active page.
    fn page_size(&self) -> Result<Size>;

    /// Resize the active page.
    fn resize_page(&self, size: Size) -> Result<()>;

    /// Attach a command bar to the active page.
    fn set_page_command_bar(&self, bar: Arc<CommandBar>) -> Result<()>;

    /// The command bar attached to the active page.
    fn page_command_bar(&self) -> Result<Option<Arc<CommandBar>>>;

    /// Replace the active page's content.
    fn set_page_content(&self, content: Arc<ContentGrid>) -> Result<()>;

    /// The active page's content.
    fn page_content(&self) -> Result<Option<Arc<ContentGrid>>>;
}

/// A page as held by [`Frame`].
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Page size.
    pub size: Size,
    /// Displayed content.
    pub content: Option<Arc<ContentGrid>>,
    /// Attached command bar.
    pub command_bar: Option<Arc<CommandBar>>,
}

/// In-process [`HostFrame`].
#[derive(Debug)]
pub struct Frame {
    content_size: Mutex<Size>,
    page: Mutex<Option<Page>>,
    orientation_changed: Arc<Signal<DeviceOrientation>>,
}

impl Frame {
    /// A frame with no active page.
    pub fn new(content_size: Size) -> Self {
        Self {
            content_size: Mutex::new(content_size),
            page: Mutex::new(None),
            orientation_changed: Arc::new(Signal::new()),
        }
    }

    /// A frame with an empty page filling the content area.
    pub fn with_page(content_size: Size) -> Self {
        let frame = Self::new(content_size);
        frame.open_page();
        frame
    }

    /// Replace the active page with an empty one filling the content area.
    pub fn open_page(&self) {
        let size = *self.content_size.lock();
        *self.page.lock() = Some(Page {
            size,
            ..Page::default()
        });
    }

    /// Close the active page.
    pub fn close_page(&self) -> Option<Page> {
        self.page.lock().take()
    }

    /// A snapshot of the active page.
    pub fn page(&self) -> Option<Page> {
        self.page.lock().clone()
    }

    /// Update the host content size.
    pub fn set_content_size(&self, size: Size) {
        *self.content_size.lock() = size;
    }

    /// Deliver a device rotation to every listener.
    pub fn notify_orientation(&self, orientation: DeviceOrientation) {
        self.orientation_changed.emit(orientation);
    }

    fn map_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> Result<R> {
        self.page
            .lock()
            .as_mut()
            .map(f)
            .ok_or_else(|| BridgeError::invalid_state("no active page"))
    }
}

impl HostFrame for Frame {
    fn content_size(&self) -> Size {
        *self.content_size.lock()
    }

    fn orientation_changed(&self) -> &Arc<Signal<DeviceOrientation>> {
        &self.orientation_changed
    }

    fn page_size(&self) -> Result<Size> {
        self.map_page(|page| page.size)
    }

    fn resize_page(&self, size: Size) -> Result<()> {
        self.map_page(|page| page.size = size)
    }

    fn set_page_command_bar(&self, bar: Arc<CommandBar>) -> Result<()> {
        self.map_page(|page| page.command_bar = Some(bar))
    }

    fn page_command_bar(&self) -> Result<Option<Arc<CommandBar>>> {
        self.map_page(|page| page.command_bar.clone())
    }

    fn set_page_content(&self, content: Arc<ContentGrid>) -> Result<()> {
        self.map_page(|page| page.content = Some(content))
    }

    fn page_content(&self) -> Result<Option<Arc<ContentGrid>>> {
        self.map_page(|page| page.content.clone())
    }
}

static_assertions::assert_impl_all!(Frame: Send, Sync);
