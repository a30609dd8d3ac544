//! Tests for the screen widget through its public API.

use std::sync::Arc;

use parking_lot::Mutex;

use nativeui_bridge::{
    BridgeConfig, BridgeError, ChannelEventQueue, ContentGrid, Frame, HostFrame, ParentWidget,
    PostedEvent, Screen, ScreenContainer, ScreenServices, Size, SwitchContent, TransitionEngine,
    TransitionKind, UiContext, ViewId, Widget, WidgetHandle,
};

const CONTENT_SIZE: Size = Size::new(480.0, 800.0);

struct Harness {
    frame: Arc<Frame>,
    services: ScreenServices,
    events: crossbeam_channel::Receiver<PostedEvent>,
}

impl Harness {
    fn new(ui: UiContext) -> Self {
        let frame = Arc::new(Frame::with_page(CONTENT_SIZE));
        let (queue, events) = ChannelEventQueue::channel();
        let services = ScreenServices::new(Arc::new(ui), frame.clone(), Arc::new(queue));
        Self {
            frame,
            services,
            events,
        }
    }

    fn inline() -> Self {
        Self::new(UiContext::inline())
    }

    fn screen(&self, handle: i32) -> Arc<Screen> {
        Arc::new(Screen::new(WidgetHandle::new(handle), &self.services))
    }
}

struct Label {
    handle: WidgetHandle,
    view: ViewId,
}

impl Label {
    fn new(handle: i32) -> Arc<Self> {
        Arc::new(Self {
            handle: WidgetHandle::new(handle),
            view: ViewId::next(),
        })
    }
}

impl Widget for Label {
    fn handle(&self) -> WidgetHandle {
        self.handle
    }

    fn view(&self) -> ViewId {
        self.view
    }
}

/// A navigation stack that records what its children ask of it.
#[derive(Default)]
struct RecordingStack {
    shown: Mutex<Option<WidgetHandle>>,
    toggles: Mutex<Vec<(WidgetHandle, bool)>>,
}

impl ParentWidget for RecordingStack {
    fn handle(&self) -> WidgetHandle {
        WidgetHandle::new(500)
    }

    fn as_screen_container(&self) -> Option<&dyn ScreenContainer> {
        Some(self)
    }
}

impl ScreenContainer for RecordingStack {
    fn is_child_shown(&self, child: &Screen) -> nativeui_bridge::Result<bool> {
        Ok(*self.shown.lock() == Some(child.handle()))
    }

    fn toggle_application_bar(&self, child: &Screen) -> nativeui_bridge::Result<()> {
        self.toggles
            .lock()
            .push((child.handle(), child.command_bar_visible()));
        Ok(())
    }
}

/// A parent without the screen-container capability.
struct PlainPanel;

impl ParentWidget for PlainPanel {
    fn handle(&self) -> WidgetHandle {
        WidgetHandle::new(600)
    }
}

#[derive(Default)]
struct DeferredTransition {
    pending: Mutex<Vec<SwitchContent>>,
}

impl TransitionEngine for DeferredTransition {
    fn run(&self, _kind: TransitionKind, switch: SwitchContent) {
        self.pending.lock().push(switch);
    }
}

fn page_content(frame: &Frame) -> Option<Arc<ContentGrid>> {
    frame.page_content().unwrap()
}

#[test]
fn test_register_disable_register_restarts_at_zero() {
    let harness = Harness::inline();
    let screen = harness.screen(1);

    screen.enable_command_bar().unwrap();
    let indices: Vec<i32> = (10..13)
        .map(|h| screen.register_command_bar_item(WidgetHandle::new(h)).unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);

    screen.set_property("removeoptionsmenu", "true").unwrap();
    assert_eq!(screen.register_command_bar_item(WidgetHandle::new(20)).unwrap(), 0);
}

#[test]
fn test_last_child_wins_and_is_repinned() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let a = Label::new(10);
    let b = Label::new(11);

    screen.add_child(a.clone()).unwrap();
    screen.add_child(b.clone()).unwrap();
    let grid = screen.content();
    assert_eq!(grid.visible_view(), Some(b.view));
    assert_eq!(grid.cell_of(b.view).map(|c| (c.row, c.column)), Some((0, 0)));

    assert!(screen.remove_child(b.handle).unwrap());
    assert_eq!(grid.visible_view(), Some(a.view));
    assert_eq!(grid.cell_of(a.view).map(|c| (c.row, c.column)), Some((0, 0)));
    assert_eq!(screen.children().len(), 1);
}

#[test]
fn test_remove_child_at_out_of_range_is_noop() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    screen.add_child(Label::new(10)).unwrap();

    assert!(screen.remove_child_at(3).unwrap().is_none());
    assert!(screen.remove_child_at(-1).unwrap().is_none());
    assert_eq!(screen.children().len(), 1);
    assert_eq!(screen.content().child_count(), 1);
}

#[test]
fn test_is_shown_without_parent_follows_frame() {
    let harness = Harness::inline();
    let first = harness.screen(1);
    let second = harness.screen(2);

    assert_eq!(first.get_property("isShown").unwrap(), "false");

    first.show().unwrap();
    assert_eq!(first.get_property("isShown").unwrap(), "true");
    assert_eq!(second.get_property("isShown").unwrap(), "false");

    second.show().unwrap();
    assert_eq!(first.get_property("isShown").unwrap(), "false");
    assert_eq!(second.get_property("isShown").unwrap(), "true");
}

#[test]
fn test_is_shown_delegates_to_container() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);

    // The frame is irrelevant once a container parent exists.
    screen.show().unwrap();
    assert!(!screen.is_shown().unwrap());

    *stack.shown.lock() = Some(screen.handle());
    assert!(screen.is_shown().unwrap());
}

#[test]
fn test_is_shown_with_other_parent_is_false() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let panel = Arc::new(PlainPanel);
    screen.set_parent(&panel);

    screen.show().unwrap();
    assert_eq!(screen.get_property("isShown").unwrap(), "false");
}

#[test]
fn test_set_visible_twice_notifies_container_once() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);

    screen.set_command_bar_visible(true).unwrap();
    screen.set_command_bar_visible(true).unwrap();
    assert_eq!(*stack.toggles.lock(), vec![(screen.handle(), true)]);

    screen.set_command_bar_visible(false).unwrap();
    screen.set_command_bar_visible(false).unwrap();
    assert_eq!(stack.toggles.lock().len(), 2);
    assert!(!screen.command_bar().is_visible());
}

#[test]
fn test_enable_notifies_container() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);

    screen.enable_command_bar().unwrap();
    screen.enable_command_bar().unwrap();
    assert_eq!(stack.toggles.lock().len(), 1);
    assert!(screen.content().has_reserved_row());
}

#[test]
fn test_dropped_parent_fails_visibility_query() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);
    drop(stack);

    assert!(matches!(screen.is_shown(), Err(BridgeError::InvalidState(_))));
}

#[test]
fn test_dropped_parent_leaves_bar_untouched() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);
    drop(stack);

    assert!(matches!(
        screen.set_command_bar_visible(true),
        Err(BridgeError::InvalidState(_))
    ));
    assert!(matches!(
        screen.enable_command_bar(),
        Err(BridgeError::InvalidState(_))
    ));
    assert!(!screen.command_bar_visible());
    assert!(!screen.command_bar().is_visible());
    assert!(!screen.content().has_reserved_row());

    // A live parent still hears about the change on retry.
    let stack = Arc::new(RecordingStack::default());
    screen.set_parent(&stack);
    screen.set_command_bar_visible(true).unwrap();
    assert_eq!(*stack.toggles.lock(), vec![(screen.handle(), true)]);
}

#[test]
fn test_missing_page_fails_show() {
    let harness = Harness::inline();
    let screen = harness.screen(1);
    harness.frame.close_page();

    assert!(matches!(screen.show(), Err(BridgeError::InvalidState(_))));
    assert!(matches!(
        screen.get_property("isShown"),
        Err(BridgeError::InvalidState(_))
    ));
}

#[test]
fn test_transitions_last_request_wins() {
    let engine = Arc::new(DeferredTransition::default());
    let frame = Arc::new(Frame::with_page(CONTENT_SIZE));
    let (queue, _events) = ChannelEventQueue::channel();
    let services = ScreenServices::new(Arc::new(UiContext::inline()), frame.clone(), Arc::new(queue))
        .with_transitions(engine.clone());
    let screen = Screen::new(WidgetHandle::new(1), &services);

    screen.show_with_transition(TransitionKind(1)).unwrap();
    screen.show_with_transition(TransitionKind(2)).unwrap();
    assert!(page_content(&frame).is_none());

    let mut pending = std::mem::take(&mut *engine.pending.lock());
    let latest = pending.pop().unwrap();
    let stale = pending.pop().unwrap();

    assert!(!stale.invoke().unwrap());
    assert!(page_content(&frame).is_none());

    assert!(latest.invoke().unwrap());
    assert!(screen.is_shown().unwrap());
}

#[test]
fn test_transition_attaches_bar_before_switch() {
    let engine = Arc::new(DeferredTransition::default());
    let frame = Arc::new(Frame::with_page(CONTENT_SIZE));
    let (queue, _events) = ChannelEventQueue::channel();
    let services = ScreenServices::new(Arc::new(UiContext::inline()), frame.clone(), Arc::new(queue))
        .with_transitions(engine.clone());
    let screen = Screen::new(WidgetHandle::new(1), &services);

    screen.enable_command_bar().unwrap();
    screen.show_with_transition(TransitionKind::NONE).unwrap();
    let attached = frame.page_command_bar().unwrap().unwrap();
    assert_eq!(attached.id(), screen.command_bar().id());
    assert!(page_content(&frame).is_none());
}

#[test]
fn test_dedicated_ui_thread_round_trip() {
    let ui = UiContext::spawn(&BridgeConfig::default()).unwrap();
    let harness = Harness::new(ui);
    let screen = harness.screen(1);
    let child = Label::new(10);

    screen.add_child(child.clone()).unwrap();
    screen.enable_command_bar().unwrap();
    screen.show().unwrap();

    assert!(screen.is_shown().unwrap());
    assert_eq!(screen.content().visible_view(), Some(child.view));
    assert!(harness.frame.page_command_bar().unwrap().is_some());

    harness.services.ui.shutdown();
    assert!(matches!(screen.show(), Err(BridgeError::Dispatch(_))));
}

#[test]
fn test_custom_command_bar_extent() {
    let config = BridgeConfig::from_toml_str("command_bar_extent = 64.0").unwrap();
    let frame = Arc::new(Frame::with_page(CONTENT_SIZE));
    let (queue, _events) = ChannelEventQueue::channel();
    let services =
        ScreenServices::new(Arc::new(UiContext::inline()), frame, Arc::new(queue)).with_config(config);
    let screen = Screen::new(WidgetHandle::new(1), &services);

    screen.enable_command_bar().unwrap();
    assert_eq!(
        screen.content().rows(),
        vec![
            nativeui_bridge::RowHeight::Star(1.0),
            nativeui_bridge::RowHeight::Pixels(64.0)
        ]
    );
}

#[test]
fn test_dispose_stops_orientation_events() {
    let harness = Harness::inline();
    let screen = harness.screen(1);

    harness
        .frame
        .notify_orientation(nativeui_bridge::DeviceOrientation::Landscape);
    assert_eq!(harness.events.len(), 2);

    screen.dispose();
    harness
        .frame
        .notify_orientation(nativeui_bridge::DeviceOrientation::Portrait);
    assert_eq!(harness.events.len(), 2);
}
