//! The screen's command bar and its item registry.
//!
//! Every screen owns one [`CommandBar`] at a time. Menu and button widgets
//! register themselves with the screen's [`CommandBarManager`] and receive a
//! sequential index, starting at zero. Indices are only handed out, never
//! reclaimed: the registry is cleared as a whole when the bar is removed,
//! after which numbering restarts at zero.
//!
//! The registry is not marshaled onto the UI context. Callers that register
//! items from several threads must serialise those calls themselves; the
//! screen does so by keeping its manager behind a mutex.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use nativeui_bridge_core::logging::targets;
use nativeui_bridge_core::{BridgeError, Result};

use crate::widget::WidgetHandle;

static NEXT_BAR_ID: AtomicU64 = AtomicU64::new(1);

/// The native command bar object.
#[derive(Debug)]
pub struct CommandBar {
    id: u64,
    visible: AtomicBool,
}

impl CommandBar {
    /// A fresh, invisible bar.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_BAR_ID.fetch_add(1, Ordering::Relaxed),
            visible: AtomicBool::new(false),
        })
    }

    /// Process-unique id of this bar instance.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the bar is displayed.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }
}

/// Visibility flag, bar object and item registry of one screen.
#[derive(Debug)]
pub struct CommandBarManager {
    bar: Arc<CommandBar>,
    visible: bool,
    items: Vec<(WidgetHandle, i32)>,
    seed: i32,
}

impl Default for CommandBarManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBarManager {
    /// An invisible bar with an empty registry.
    pub fn new() -> Self {
        Self {
            bar: CommandBar::new(),
            visible: false,
            items: Vec::new(),
            seed: 0,
        }
    }

    /// The current bar object.
    pub fn bar(&self) -> Arc<CommandBar> {
        self.bar.clone()
    }

    /// The visibility flag.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set the visibility flag and the bar's own visibility.
    ///
    /// Returns `false`, changing nothing, when `value` is already current.
    pub fn set_visible(&mut self, value: bool) -> bool {
        if value == self.visible {
            return false;
        }
        self.visible = value;
        self.bar.set_visible(value);
        tracing::debug!(target: targets::COMMAND_BAR, bar = self.bar.id(), visible = value, "command bar visibility changed");
        true
    }

    /// Register `item` and return its index.
    ///
    /// Registering the same item twice gives it a second index. Fails with
    /// `InvalidState` once `i32::MAX` indices were handed out since the last
    /// reset.
    pub fn register_item(&mut self, item: WidgetHandle) -> Result<i32> {
        let index = self.seed;
        self.seed = index
            .checked_add(1)
            .ok_or_else(|| BridgeError::invalid_state("command bar index space exhausted"))?;
        self.items.push((item, index));
        tracing::trace!(target: targets::COMMAND_BAR, %item, index, "command bar item registered");
        Ok(index)
    }

    /// The index of the first registration of `item`.
    pub fn index_of_item(&self, item: WidgetHandle) -> Option<i32> {
        self.items
            .iter()
            .find(|(registered, _)| *registered == item)
            .map(|&(_, index)| index)
    }

    /// Number of registrations.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The index the next registration will receive.
    pub fn next_index(&self) -> i32 {
        self.seed
    }

    /// Swap in a fresh, invisible bar and forget every registration.
    ///
    /// Returns the new bar. Indices handed out before the reset are void.
    pub fn reset(&mut self) -> Arc<CommandBar> {
        self.bar = CommandBar::new();
        self.visible = false;
        self.items.clear();
        self.seed = 0;
        tracing::debug!(target: targets::COMMAND_BAR, bar = self.bar.id(), "command bar reset");
        self.bar.clone()
    }
}
