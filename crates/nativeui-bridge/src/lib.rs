//! Screen widget for the native UI bridge.
//!
//! A [`Screen`] is the top-level presentable unit of a bridged application.
//! This crate composes it from small parts:
//!
//! - [`EventEncoder`]: fixed-layout binary event records for the host queue
//! - [`OrientationTracker`]: device rotation to page reflow and events
//! - [`CommandBarManager`]: the command bar and its item registry
//! - [`ScreenPresenter`]: making the screen the active page's content
//! - [`ScreenWidgetTree`]: the screen's children and its content grid
//!
//! The host side is reached through traits: [`HostFrame`] for the root frame,
//! [`EventQueue`] for outgoing events, [`TransitionEngine`] for animated
//! presentation and [`ScreenContainer`] for containers that stack screens.
//! In-process implementations ([`Frame`], [`ChannelEventQueue`],
//! [`ImmediateTransition`]) are provided for hosts that need nothing more,
//! and for tests.

pub mod command_bar;
pub mod event;
pub mod frame;
pub mod grid;
pub mod orientation;
pub mod presenter;
pub mod property;
pub mod screen;
pub mod screen_tree;
pub mod widget;

pub use command_bar::{CommandBar, CommandBarManager};
pub use event::{ChannelEventQueue, EventData, EventEncoder, EventQueue, PostedEvent};
pub use frame::{Frame, HostFrame, Page, Size};
pub use grid::{ContentGrid, GridCell, RowHeight};
pub use orientation::{DeviceOrientation, OrientationGroup, OrientationTracker, ScreenOrientation};
pub use presenter::{ImmediateTransition, ScreenPresenter, SwitchContent, TransitionEngine, TransitionKind};
pub use property::ScreenProperty;
pub use screen::{Screen, ScreenServices};
pub use screen_tree::ScreenWidgetTree;
pub use widget::{ParentWidget, ScreenContainer, ViewId, Widget, WidgetHandle};

pub use nativeui_bridge_core::{BridgeConfig, BridgeError, DispatchError, Result, UiContext};
