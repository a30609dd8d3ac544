//! Binary event records posted to the host runtime's event queue.
//!
//! The runtime reads events as fixed-layout records of little-endian `i32`
//! fields. Field offsets are part of the wire contract and never change:
//!
//! | Record                       | Size | Offset 0     | Offset 4      | Offset 8    |
//! |------------------------------|------|--------------|---------------|-------------|
//! | orientation changed          | 8    | event type   | orientation   |             |
//! | screen orientation changed   | 12   | widget event | widget handle | orientation |
//!
//! Screen orientation records are posted under the [`EVENT_TYPE_WIDGET`]
//! category so the runtime routes them to the widget's listener.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use nativeui_bridge_core::logging::targets;

use crate::orientation::ScreenOrientation;
use crate::widget::WidgetHandle;

/// Event category for widget-scoped events.
pub const EVENT_TYPE_WIDGET: i32 = 23;

/// Event type of the application-wide orientation change.
pub const EVENT_TYPE_ORIENTATION_DID_CHANGE: i32 = 45;

/// Widget event type of a screen's orientation change.
pub const WIDGET_EVENT_SCREEN_ORIENTATION_DID_CHANGE: i32 = 21;

/// Field offsets and record sizes.
pub mod layout {
    /// Size of an orientation-changed record.
    pub const ORIENTATION_EVENT_SIZE: usize = 8;
    /// Offset of the event type in every record.
    pub const EVENT_TYPE: usize = 0;
    /// Offset of the orientation code in an orientation-changed record.
    pub const ORIENTATION: usize = 4;

    /// Size of a screen-orientation-changed record.
    pub const WIDGET_EVENT_SIZE: usize = 12;
    /// Offset of the widget handle in a widget record.
    pub const WIDGET_HANDLE: usize = 4;
    /// Offset of the orientation code in a screen-orientation-changed record.
    pub const SCREEN_ORIENTATION: usize = 8;
}

/// A fixed-size, zero-initialised event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    bytes: Vec<u8>,
}

impl EventData {
    /// A zeroed record of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self { bytes: vec![0; len] }
    }

    /// Write `value` at `offset`. Offsets come from [`layout`] and always fit.
    fn write_i32(&mut self, offset: usize, value: i32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Read the `i32` at `offset`, or `None` past the end of the record.
    pub fn read_i32(&self, offset: usize) -> Option<i32> {
        let end = offset.checked_add(4)?;
        let field: [u8; 4] = self.bytes.get(offset..end)?.try_into().ok()?;
        Some(i32::from_le_bytes(field))
    }

    /// The record's raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Record length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The host runtime's event queue.
pub trait EventQueue: Send + Sync {
    /// Post a plain event record.
    fn post_event(&self, data: EventData);

    /// Post a record under an event category such as [`EVENT_TYPE_WIDGET`].
    fn post_custom_event(&self, category: i32, data: EventData);
}

/// An event as it was handed to a [`ChannelEventQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedEvent {
    /// The category for custom events, `None` for plain ones.
    pub category: Option<i32>,
    /// The record.
    pub data: EventData,
}

/// An [`EventQueue`] that forwards records into a channel.
///
/// Hosts that drain events on their own loop hold the receiving end.
#[derive(Debug, Clone)]
pub struct ChannelEventQueue {
    sender: Sender<PostedEvent>,
}

impl ChannelEventQueue {
    /// Create a queue and the receiver that drains it.
    pub fn channel() -> (Self, Receiver<PostedEvent>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    fn forward(&self, event: PostedEvent) {
        if self.sender.send(event).is_err() {
            tracing::warn!(target: targets::EVENT, "event receiver dropped, discarding event");
        }
    }
}

impl EventQueue for ChannelEventQueue {
    fn post_event(&self, data: EventData) {
        self.forward(PostedEvent { category: None, data });
    }

    fn post_custom_event(&self, category: i32, data: EventData) {
        self.forward(PostedEvent {
            category: Some(category),
            data,
        });
    }
}

/// Encodes orientation events and posts them to an [`EventQueue`].
#[derive(Clone)]
pub struct EventEncoder {
    queue: Arc<dyn EventQueue>,
}

impl EventEncoder {
    /// Create an encoder posting to `queue`.
    pub fn new(queue: Arc<dyn EventQueue>) -> Self {
        Self { queue }
    }

    /// Build the 8-byte orientation-changed record.
    pub fn encode_orientation_changed(orientation: ScreenOrientation) -> EventData {
        let mut data = EventData::zeroed(layout::ORIENTATION_EVENT_SIZE);
        data.write_i32(layout::EVENT_TYPE, EVENT_TYPE_ORIENTATION_DID_CHANGE);
        data.write_i32(layout::ORIENTATION, orientation.code());
        data
    }

    /// Build the 12-byte screen-orientation-changed record.
    pub fn encode_screen_orientation_changed(
        handle: WidgetHandle,
        orientation: ScreenOrientation,
    ) -> EventData {
        let mut data = EventData::zeroed(layout::WIDGET_EVENT_SIZE);
        data.write_i32(layout::EVENT_TYPE, WIDGET_EVENT_SCREEN_ORIENTATION_DID_CHANGE);
        data.write_i32(layout::WIDGET_HANDLE, handle.raw());
        data.write_i32(layout::SCREEN_ORIENTATION, orientation.code());
        data
    }

    /// Post the application-wide orientation change.
    pub fn emit_orientation_changed(&self, orientation: ScreenOrientation) {
        tracing::trace!(target: targets::EVENT, ?orientation, "posting orientation event");
        self.queue
            .post_event(Self::encode_orientation_changed(orientation));
    }

    /// Post the screen-scoped orientation change for `handle`.
    pub fn emit_screen_orientation_changed(
        &self,
        handle: WidgetHandle,
        orientation: ScreenOrientation,
    ) {
        tracing::trace!(target: targets::EVENT, %handle, ?orientation, "posting screen orientation event");
        self.queue.post_custom_event(
            EVENT_TYPE_WIDGET,
            Self::encode_screen_orientation_changed(handle, orientation),
        );
    }
}

impl std::fmt::Debug for EventEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEncoder").finish_non_exhaustive()
    }
}
