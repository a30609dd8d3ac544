//! Drives a screen through a typical session on a dedicated UI thread.
//!
//! Run with `RUST_LOG=nativeui_bridge=debug` to watch the bridge at work.

use std::sync::Arc;

use nativeui_bridge::{
    BridgeConfig, ChannelEventQueue, DeviceOrientation, Frame, Screen, ScreenServices, Size,
    UiContext, WidgetHandle,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ui = Arc::new(UiContext::spawn(&BridgeConfig::default())?);
    let frame = Arc::new(Frame::with_page(Size::new(480.0, 800.0)));
    let (queue, events) = ChannelEventQueue::channel();
    let services = ScreenServices::new(ui.clone(), frame.clone(), Arc::new(queue));

    let screen = Screen::new(WidgetHandle::new(1), &services);
    screen.set_property("title", "Inbox")?;
    screen.enable_command_bar()?;
    let refresh = screen.register_command_bar_item(WidgetHandle::new(10))?;
    let compose = screen.register_command_bar_item(WidgetHandle::new(11))?;
    println!("command bar items: refresh={refresh} compose={compose}");

    screen.show()?;
    println!("isShown = {}", screen.get_property("isShown")?);

    frame.notify_orientation(DeviceOrientation::LandscapeLeft);
    for event in events.try_iter() {
        println!("event {:?}: {:?}", event.category, event.data.as_bytes());
    }

    screen.set_property("removeoptionsmenu", "")?;
    screen.dispose();
    ui.shutdown();
    Ok(())
}
