//! Core plumbing for the native UI bridge.
//!
//! This crate provides the pieces every bridged widget relies on:
//!
//! - **UI context**: the single thread allowed to mutate visual state, with a
//!   blocking "run there and wait" dispatch ([`UiContext`])
//! - **Thread affinity**: cheap checks that code runs on the right thread
//! - **Signals**: synchronous notifications with RAII [`Subscription`]s
//! - **Errors**: [`BridgeError`] and [`DispatchError`]
//! - **Configuration**: [`BridgeConfig`], loadable from TOML
//! - **Logging**: `tracing` targets for each subsystem
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use nativeui_bridge_core::{BridgeConfig, Signal, UiContext};
//!
//! let ui = Arc::new(UiContext::spawn(&BridgeConfig::default()).unwrap());
//! let rotated = Arc::new(Signal::<i32>::new());
//!
//! let ui_for_slot = ui.clone();
//! let _subscription = rotated.subscribe(move |&angle| {
//!     let _ = ui_for_slot.run_sync(move || angle * 2);
//! });
//! rotated.emit(90);
//! ui.shutdown();
//! ```

pub mod config;
pub mod dispatch;
mod error;
pub mod logging;
pub mod signal;
pub mod thread_check;

pub use config::BridgeConfig;
pub use dispatch::UiContext;
pub use error::{BridgeError, DispatchError, Result};
pub use signal::{ConnectionId, Signal, Subscription};
pub use thread_check::ThreadAffinity;
