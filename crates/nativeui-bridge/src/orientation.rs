//! Device orientation tracking.
//!
//! The host frame emits a [`DeviceOrientation`] whenever the device rotates.
//! An [`OrientationTracker`] reacts by reflowing the active page, mapping the
//! device value to a normalized [`ScreenOrientation`] code, and posting two
//! events: the application-wide orientation change, then the screen-scoped
//! one carrying the tracker's widget handle.

use std::sync::{Arc, Weak};

use nativeui_bridge_core::logging::targets;
use nativeui_bridge_core::{Result, Signal, Subscription, UiContext};

use crate::event::EventEncoder;
use crate::frame::{HostFrame, Size};
use crate::widget::WidgetHandle;

/// Orientation as reported by the device.
///
/// Raw values follow the platform's page orientation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    /// Portrait, direction unspecified.
    Portrait,
    /// Portrait with the top of the device up.
    PortraitUp,
    /// Portrait with the device upside down.
    PortraitDown,
    /// Landscape, direction unspecified.
    Landscape,
    /// Landscape rotated to the left.
    LandscapeLeft,
    /// Landscape rotated to the right.
    LandscapeRight,
    /// Any value the platform reports that the bridge does not recognize.
    Other(i32),
}

impl DeviceOrientation {
    /// Decode a raw platform orientation value.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Portrait,
            2 => Self::Landscape,
            5 => Self::PortraitUp,
            9 => Self::PortraitDown,
            18 => Self::LandscapeLeft,
            34 => Self::LandscapeRight,
            other => Self::Other(other),
        }
    }

    /// The raw platform value.
    pub fn raw(self) -> i32 {
        match self {
            Self::Portrait => 1,
            Self::Landscape => 2,
            Self::PortraitUp => 5,
            Self::PortraitDown => 9,
            Self::LandscapeLeft => 18,
            Self::LandscapeRight => 34,
            Self::Other(raw) => raw,
        }
    }

    /// Which of the two layout groups this orientation belongs to.
    pub fn group(self) -> Option<OrientationGroup> {
        match self {
            Self::Landscape | Self::LandscapeLeft | Self::LandscapeRight => {
                Some(OrientationGroup::Landscape)
            }
            Self::Portrait | Self::PortraitUp | Self::PortraitDown => {
                Some(OrientationGroup::Portrait)
            }
            Self::Other(_) => None,
        }
    }
}

/// The two layout groups the device orientations collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrientationGroup {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl OrientationGroup {
    /// The page size for this group, given the host's portrait content size.
    pub fn page_size(self, content: Size) -> Size {
        match self {
            Self::Portrait => content,
            Self::Landscape => content.transposed(),
        }
    }
}

/// Normalized orientation codes consumed by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ScreenOrientation {
    /// Portrait, top up. Also the fallback for unrecognized values.
    #[default]
    PortraitUp = 1,
    /// Portrait, upside down.
    PortraitUpsideDown = 2,
    /// Portrait, either direction.
    Portrait = 3,
    /// Landscape, rotated left.
    LandscapeLeft = 4,
    /// Landscape, rotated right.
    LandscapeRight = 8,
    /// Landscape, either direction.
    Landscape = 12,
}

impl ScreenOrientation {
    /// Map a device orientation to its code. Total: unknown values become
    /// [`ScreenOrientation::PortraitUp`].
    pub fn from_device(device: DeviceOrientation) -> Self {
        match device {
            DeviceOrientation::Landscape => Self::Landscape,
            DeviceOrientation::LandscapeLeft => Self::LandscapeLeft,
            DeviceOrientation::LandscapeRight => Self::LandscapeRight,
            DeviceOrientation::Portrait => Self::Portrait,
            DeviceOrientation::PortraitDown => Self::PortraitUpsideDown,
            DeviceOrientation::PortraitUp | DeviceOrientation::Other(_) => Self::PortraitUp,
        }
    }

    /// The code written into event records.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Reacts to device rotation on behalf of one screen.
pub struct OrientationTracker {
    handle: WidgetHandle,
    ui: Arc<UiContext>,
    frame: Arc<dyn HostFrame>,
    encoder: EventEncoder,
}

impl OrientationTracker {
    /// Create a tracker that reports under `handle`.
    pub fn new(
        handle: WidgetHandle,
        ui: Arc<UiContext>,
        frame: Arc<dyn HostFrame>,
        encoder: EventEncoder,
    ) -> Self {
        Self {
            handle,
            ui,
            frame,
            encoder,
        }
    }

    /// Listen to `notifications` until the returned subscription is released.
    ///
    /// The listener holds the tracker weakly; a dropped tracker stops
    /// reacting even if the subscription is still alive.
    pub fn attach(self: &Arc<Self>, notifications: &Arc<Signal<DeviceOrientation>>) -> Subscription {
        let tracker: Weak<Self> = Arc::downgrade(self);
        notifications.subscribe(move |&device| {
            let Some(tracker) = tracker.upgrade() else {
                return;
            };
            if let Err(err) = tracker.handle_orientation_changed(device) {
                tracing::warn!(
                    target: targets::ORIENTATION,
                    handle = %tracker.handle,
                    %err,
                    "orientation change not applied"
                );
            }
        })
    }

    /// Handle one device rotation.
    ///
    /// Fails with `InvalidState` when no page is active; nothing is resized
    /// or posted in that case.
    pub fn handle_orientation_changed(&self, device: DeviceOrientation) -> Result<ScreenOrientation> {
        self.frame.page_size()?;

        match device.group() {
            Some(group) => {
                let size = group.page_size(self.frame.content_size());
                let frame = self.frame.clone();
                self.ui.run_sync(move || frame.resize_page(size))??;
            }
            None => {
                tracing::warn!(
                    target: targets::ORIENTATION,
                    raw = device.raw(),
                    "unrecognized device orientation, page left as is"
                );
            }
        }

        let orientation = ScreenOrientation::from_device(device);
        tracing::debug!(
            target: targets::ORIENTATION,
            handle = %self.handle,
            ?device,
            ?orientation,
            "orientation changed"
        );

        self.encoder.emit_orientation_changed(orientation);
        self.encoder
            .emit_screen_orientation_changed(self.handle, orientation);
        Ok(orientation)
    }
}
