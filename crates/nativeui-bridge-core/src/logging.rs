//! Logging facilities for the native UI bridge.
//!
//! The bridge is instrumented with the `tracing` crate and never installs a
//! subscriber itself. Hosts pick their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("nativeui_bridge=debug,nativeui_bridge_core=info")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// UI context dispatch target.
    pub const DISPATCH: &str = "nativeui_bridge_core::dispatch";
    /// Signal/subscription target.
    pub const SIGNAL: &str = "nativeui_bridge_core::signal";
    /// Screen lifecycle target.
    pub const SCREEN: &str = "nativeui_bridge::screen";
    /// Orientation tracking target.
    pub const ORIENTATION: &str = "nativeui_bridge::orientation";
    /// Command bar target.
    pub const COMMAND_BAR: &str = "nativeui_bridge::command_bar";
    /// Screen presentation target.
    pub const PRESENTER: &str = "nativeui_bridge::presenter";
    /// Event encoding target.
    pub const EVENT: &str = "nativeui_bridge::event";
}
