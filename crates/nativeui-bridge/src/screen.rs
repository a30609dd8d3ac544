//! The screen widget.
//!
//! A [`Screen`] is a top-level presentable unit. It owns one content grid, one
//! command bar, and a subscription to device orientation changes, and it
//! answers the host's property reads and writes.
//!
//! # Threading
//!
//! Every method may be called from any thread. Visual mutations hop onto the
//! [`UiContext`] and block until they have been applied, so the screen's state
//! is up to date when a method returns. The command bar's item registry is
//! the exception: it is updated on the calling thread, under the screen's own
//! lock.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nativeui_bridge::{ChannelEventQueue, Frame, Screen, ScreenServices, Size, WidgetHandle};
//! use nativeui_bridge_core::UiContext;
//!
//! let frame = Arc::new(Frame::with_page(Size::new(480.0, 800.0)));
//! let (queue, _events) = ChannelEventQueue::channel();
//! let services = ScreenServices::new(Arc::new(UiContext::inline()), frame, Arc::new(queue));
//!
//! let screen = Screen::new(WidgetHandle::new(1), &services);
//! screen.set_property("title", "Inbox").unwrap();
//! screen.show().unwrap();
//! assert_eq!(screen.get_property("isShown").unwrap(), "true");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use nativeui_bridge_core::logging::targets;
use nativeui_bridge_core::{BridgeConfig, BridgeError, Result, Subscription, UiContext};

use crate::command_bar::{CommandBar, CommandBarManager};
use crate::event::{EventEncoder, EventQueue};
use crate::frame::HostFrame;
use crate::grid::ContentGrid;
use crate::orientation::{DeviceOrientation, OrientationTracker, ScreenOrientation};
use crate::presenter::{ImmediateTransition, ScreenPresenter, TransitionEngine, TransitionKind};
use crate::property::{bool_value, ScreenProperty};
use crate::screen_tree::ScreenWidgetTree;
use crate::widget::{ParentWidget, ScreenContainer, ViewId, Widget, WidgetHandle};

/// The host collaborators a screen works with.
#[derive(Clone)]
pub struct ScreenServices {
    /// The UI-affine context.
    pub ui: Arc<UiContext>,
    /// The application's root frame.
    pub frame: Arc<dyn HostFrame>,
    /// The host event queue.
    pub events: Arc<dyn EventQueue>,
    /// The transition animator.
    pub transitions: Arc<dyn TransitionEngine>,
    /// Bridge settings.
    pub config: BridgeConfig,
}

impl ScreenServices {
    /// Services with immediate transitions and the default configuration.
    pub fn new(ui: Arc<UiContext>, frame: Arc<dyn HostFrame>, events: Arc<dyn EventQueue>) -> Self {
        Self {
            ui,
            frame,
            events,
            transitions: Arc::new(ImmediateTransition),
            config: BridgeConfig::default(),
        }
    }

    /// Use `transitions` for animated presentation.
    pub fn with_transitions(mut self, transitions: Arc<dyn TransitionEngine>) -> Self {
        self.transitions = transitions;
        self
    }

    /// Use `config` instead of the defaults.
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for ScreenServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenServices")
            .field("ui", &self.ui)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A screen widget.
pub struct Screen {
    handle: WidgetHandle,
    title: RwLock<String>,
    parent: RwLock<Option<Weak<dyn ParentWidget>>>,
    ui: Arc<UiContext>,
    frame: Arc<dyn HostFrame>,
    command_bar_extent: f32,
    content: Arc<ContentGrid>,
    tree: ScreenWidgetTree,
    presenter: ScreenPresenter,
    tracker: Arc<OrientationTracker>,
    command_bar: Mutex<CommandBarManager>,
    orientation_subscription: Mutex<Option<Subscription>>,
    disposed: AtomicBool,
}

impl Screen {
    /// Create a screen and start tracking device orientation for it.
    pub fn new(handle: WidgetHandle, services: &ScreenServices) -> Self {
        let content = Arc::new(ContentGrid::new());
        let tracker = Arc::new(OrientationTracker::new(
            handle,
            services.ui.clone(),
            services.frame.clone(),
            EventEncoder::new(services.events.clone()),
        ));
        let subscription = tracker.attach(services.frame.orientation_changed());

        tracing::debug!(target: targets::SCREEN, screen = %handle, "screen created");

        Self {
            handle,
            title: RwLock::new(String::new()),
            parent: RwLock::new(None),
            ui: services.ui.clone(),
            frame: services.frame.clone(),
            command_bar_extent: services.config.command_bar_extent,
            tree: ScreenWidgetTree::new(handle, services.ui.clone(), content.clone()),
            presenter: ScreenPresenter::new(
                services.ui.clone(),
                services.frame.clone(),
                services.transitions.clone(),
                content.clone(),
            ),
            content,
            tracker,
            command_bar: Mutex::new(CommandBarManager::new()),
            orientation_subscription: Mutex::new(Some(subscription)),
            disposed: AtomicBool::new(false),
        }
    }

    /// The screen's handle.
    pub fn handle(&self) -> WidgetHandle {
        self.handle
    }

    /// The screen's content grid.
    pub fn content(&self) -> &Arc<ContentGrid> {
        &self.content
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The current title.
    pub fn title(&self) -> String {
        self.title.read().clone()
    }

    /// Replace the title.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write() = title.into();
    }

    /// Record the widget this screen is nested in. Held weakly.
    pub fn set_parent<P: ParentWidget + 'static>(&self, parent: &Arc<P>) {
        let weak: Weak<P> = Arc::downgrade(parent);
        *self.parent.write() = Some(weak as Weak<dyn ParentWidget>);
        tracing::trace!(target: targets::SCREEN, screen = %self.handle, parent = %parent.handle(), "parent set");
    }

    /// Forget the parent.
    pub fn clear_parent(&self) {
        *self.parent.write() = None;
    }

    /// The enclosing widget, if any.
    ///
    /// Fails with `InvalidState` when a parent was set but has since been
    /// dropped.
    pub fn parent(&self) -> Result<Option<Arc<dyn ParentWidget>>> {
        match self.parent.read().as_ref() {
            None => Ok(None),
            Some(weak) => weak
                .upgrade()
                .map(Some)
                .ok_or_else(|| BridgeError::invalid_state("parent widget was dropped")),
        }
    }

    /// A plain screen never consumes the back button.
    pub fn handle_back_button_pressed(&self) -> bool {
        false
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Add a child; it fills the whole content area.
    pub fn add_child(&self, child: Arc<dyn Widget>) -> Result<()> {
        self.tree.add_child(child)
    }

    /// Remove the child with `handle`. Returns `false` if there is none.
    pub fn remove_child(&self, handle: WidgetHandle) -> Result<bool> {
        self.tree.remove_child(handle)
    }

    /// Remove the child at `index`; out-of-range indices are ignored.
    pub fn remove_child_at(&self, index: i32) -> Result<Option<Arc<dyn Widget>>> {
        self.tree.remove_child_at(index)
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<Arc<dyn Widget>> {
        self.tree.children()
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    fn visible_bar(&self) -> Option<Arc<CommandBar>> {
        let manager = self.command_bar.lock();
        manager.is_visible().then(|| manager.bar())
    }

    /// Make this screen the active page's content.
    pub fn show(&self) -> Result<()> {
        self.presenter.present(self.visible_bar())?;
        tracing::debug!(target: targets::SCREEN, screen = %self.handle, "screen shown");
        Ok(())
    }

    /// Make this screen the active page's content through a `kind`
    /// transition.
    pub fn show_with_transition(&self, kind: TransitionKind) -> Result<()> {
        self.presenter
            .present_with_transition(self.visible_bar(), kind)?;
        tracing::debug!(target: targets::SCREEN, screen = %self.handle, ?kind, "screen transition requested");
        Ok(())
    }

    /// Whether this screen is the content on display.
    ///
    /// Without a parent the frame's active page decides. A parent that is a
    /// [`ScreenContainer`] is asked; any other parent means not shown.
    pub fn is_shown(&self) -> Result<bool> {
        match self.parent()? {
            None => self.presenter.is_current_content(),
            Some(parent) => match parent.as_screen_container() {
                Some(container) => container.is_child_shown(self),
                None => Ok(false),
            },
        }
    }

    // =========================================================================
    // Command bar
    // =========================================================================

    /// Reserve the command bar row, if not reserved yet, and show the bar.
    pub fn enable_command_bar(&self) -> Result<()> {
        self.parent()?;
        let content = self.content.clone();
        let extent = self.command_bar_extent;
        let reserved = self.ui.run_sync(move || content.reserve_row(extent))?;
        if reserved {
            tracing::debug!(target: targets::COMMAND_BAR, screen = %self.handle, extent, "command bar row reserved");
        }
        self.set_command_bar_visible(true)
    }

    /// Replace the command bar with a fresh, hidden one and forget every
    /// registered item.
    ///
    /// The fresh bar is attached to the active page. Local state is reset
    /// even when no page is active, in which case `InvalidState` is
    /// returned.
    pub fn remove_options_menu(&self) -> Result<()> {
        let bar = self.command_bar.lock().reset();
        let content = self.content.clone();
        let frame = self.frame.clone();

        self.ui.run_sync(move || {
            content.release_reserved_row();
            frame.set_page_command_bar(bar)
        })??;

        tracing::debug!(target: targets::COMMAND_BAR, screen = %self.handle, "options menu removed");
        Ok(())
    }

    /// Show or hide the command bar.
    ///
    /// Does nothing when `visible` is already current. Otherwise a parent
    /// screen container is told to reconcile its own bar. Fails without
    /// changing anything when the parent was dropped.
    pub fn set_command_bar_visible(&self, visible: bool) -> Result<()> {
        let parent = self.parent()?;
        let changed = self.command_bar.lock().set_visible(visible);
        if !changed {
            return Ok(());
        }

        if let Some(parent) = parent {
            if let Some(container) = parent.as_screen_container() {
                container.toggle_application_bar(self)?;
            }
        }
        Ok(())
    }

    /// Whether the command bar is shown.
    pub fn command_bar_visible(&self) -> bool {
        self.command_bar.lock().is_visible()
    }

    /// The current native bar object.
    pub fn command_bar(&self) -> Arc<CommandBar> {
        self.command_bar.lock().bar()
    }

    /// Register a menu or button item and return its index.
    pub fn register_command_bar_item(&self, item: WidgetHandle) -> Result<i32> {
        self.command_bar.lock().register_item(item)
    }

    /// The index `item` was first registered under.
    pub fn command_bar_item_index(&self, item: WidgetHandle) -> Option<i32> {
        self.command_bar.lock().index_of_item(item)
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Apply a device rotation as if the frame had reported it.
    pub fn handle_orientation_changed(&self, device: DeviceOrientation) -> Result<ScreenOrientation> {
        self.tracker.handle_orientation_changed(device)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Write a property by name.
    pub fn set_property(&self, name: &str, value: &str) -> Result<()> {
        match name.parse::<ScreenProperty>()? {
            ScreenProperty::Title => {
                self.set_title(value);
                Ok(())
            }
            ScreenProperty::RemoveOptionsMenu => self.remove_options_menu(),
            read_only @ ScreenProperty::IsShown => read_only.check_writable().map(drop),
        }
    }

    /// Read a property by name.
    pub fn get_property(&self, name: &str) -> Result<String> {
        match name.parse::<ScreenProperty>()? {
            ScreenProperty::IsShown => self.is_shown().map(bool_value),
            write_only @ (ScreenProperty::Title | ScreenProperty::RemoveOptionsMenu) => {
                write_only.check_readable().map(|_| String::new())
            }
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stop tracking device orientation.
    ///
    /// Idempotent. Dropping the screen has the same effect.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(mut subscription) = self.orientation_subscription.lock().take() {
            subscription.release();
        }
        tracing::debug!(target: targets::SCREEN, screen = %self.handle, "screen disposed");
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Widget for Screen {
    fn handle(&self) -> WidgetHandle {
        self.handle
    }

    fn view(&self) -> ViewId {
        self.content.view()
    }
}

impl ParentWidget for Screen {
    fn handle(&self) -> WidgetHandle {
        self.handle
    }

    fn as_screen_container(&self) -> Option<&dyn ScreenContainer> {
        Some(self)
    }
}

impl ScreenContainer for Screen {
    /// A plain screen never displays a child screen.
    fn is_child_shown(&self, _child: &Screen) -> Result<bool> {
        Ok(false)
    }

    fn toggle_application_bar(&self, _child: &Screen) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("handle", &self.handle)
            .field("title", &*self.title.read())
            .field("command_bar_visible", &self.command_bar_visible())
            .field("child_count", &self.tree.child_count())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Screen: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ChannelEventQueue;
    use crate::frame::{Frame, Size};

    fn screen(handle: i32) -> (Screen, Arc<Frame>) {
        let frame = Arc::new(Frame::with_page(Size::new(480.0, 800.0)));
        let (queue, _events) = ChannelEventQueue::channel();
        let services = ScreenServices::new(Arc::new(UiContext::inline()), frame.clone(), Arc::new(queue));
        (Screen::new(WidgetHandle::new(handle), &services), frame)
    }

    #[test]
    fn test_title_roundtrip() {
        let (screen, _) = screen(1);
        assert_eq!(screen.title(), "");
        screen.set_property("title", "Settings").unwrap();
        assert_eq!(screen.title(), "Settings");
        assert!(matches!(
            screen.get_property("title"),
            Err(BridgeError::PropertyNotReadable(_))
        ));
    }

    #[test]
    fn test_is_shown_property_is_read_only() {
        let (screen, _) = screen(1);
        assert!(matches!(
            screen.set_property("isShown", "true"),
            Err(BridgeError::PropertyNotWritable(_))
        ));
        assert!(matches!(
            screen.set_property("bogus", ""),
            Err(BridgeError::UnknownProperty(_))
        ));
    }

    #[test]
    fn test_back_button_not_consumed() {
        let (screen, _) = screen(1);
        assert!(!screen.handle_back_button_pressed());
    }

    #[test]
    fn test_enable_reserves_row_once() {
        let (screen, _) = screen(1);
        screen.enable_command_bar().unwrap();
        screen.enable_command_bar().unwrap();
        assert_eq!(screen.content().row_count(), 2);
        assert!(screen.command_bar_visible());
        assert!(screen.command_bar().is_visible());
    }

    #[test]
    fn test_show_attaches_visible_bar() {
        let (screen, frame) = screen(1);
        screen.show().unwrap();
        assert!(frame.page_command_bar().unwrap().is_none());

        screen.enable_command_bar().unwrap();
        screen.show().unwrap();
        let attached = frame.page_command_bar().unwrap().unwrap();
        assert_eq!(attached.id(), screen.command_bar().id());
    }

    #[test]
    fn test_remove_options_menu_resets_bar() {
        let (screen, frame) = screen(1);
        screen.enable_command_bar().unwrap();
        let old = screen.command_bar();
        screen.register_command_bar_item(WidgetHandle::new(5)).unwrap();

        screen.set_property("removeoptionsmenu", "").unwrap();
        let fresh = screen.command_bar();
        assert_ne!(fresh.id(), old.id());
        assert!(!fresh.is_visible());
        assert!(!screen.command_bar_visible());
        assert_eq!(screen.content().row_count(), 1);
        assert_eq!(screen.command_bar_item_index(WidgetHandle::new(5)), None);
        assert_eq!(frame.page_command_bar().unwrap().unwrap().id(), fresh.id());
    }

    #[test]
    fn test_remove_options_menu_without_page() {
        let (screen, frame) = screen(1);
        screen.register_command_bar_item(WidgetHandle::new(5)).unwrap();
        frame.close_page();

        assert!(matches!(
            screen.remove_options_menu(),
            Err(BridgeError::InvalidState(_))
        ));
        assert_eq!(screen.register_command_bar_item(WidgetHandle::new(6)).unwrap(), 0);
    }

    #[test]
    fn test_dropped_parent_is_invalid_state() {
        let (screen, _) = screen(1);
        let (parent, _) = screen_pair_parent();
        screen.set_parent(&parent);
        assert!(screen.parent().unwrap().is_some());

        drop(parent);
        assert!(matches!(screen.parent(), Err(BridgeError::InvalidState(_))));
        screen.clear_parent();
        assert!(screen.parent().unwrap().is_none());
    }

    fn screen_pair_parent() -> (Arc<Screen>, Arc<Frame>) {
        let (parent, frame) = screen(2);
        (Arc::new(parent), frame)
    }

    #[test]
    fn test_plain_screen_parent_reports_not_shown() {
        let (child, _) = screen(1);
        let (parent, _) = screen_pair_parent();
        child.set_parent(&parent);
        child.show().unwrap();
        assert_eq!(child.get_property("isShown").unwrap(), "false");
    }

    #[test]
    fn test_dispose_releases_subscription() {
        let (screen, frame) = screen(1);
        assert_eq!(frame.orientation_changed().connection_count(), 1);
        screen.dispose();
        screen.dispose();
        assert!(screen.is_disposed());
        assert_eq!(frame.orientation_changed().connection_count(), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let (screen, frame) = screen(1);
        drop(screen);
        assert_eq!(frame.orientation_changed().connection_count(), 0);
    }
}
