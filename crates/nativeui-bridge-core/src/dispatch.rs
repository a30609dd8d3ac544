//! The UI-affine execution context.
//!
//! Every visual mutation in the bridge runs on a single designated thread.
//! [`UiContext::run_sync`] is the only way onto that thread: it submits a
//! work item, blocks the caller until the item has run, and hands back its
//! result. Work items run in submission order.
//!
//! Two flavours exist:
//!
//! - [`UiContext::spawn`] starts a dedicated, named UI thread fed by a
//!   bounded queue.
//! - [`UiContext::inline`] adopts the constructing thread as the UI thread
//!   and runs all work directly. Single-threaded hosts and tests use this.
//!
//! Calls made from the UI thread itself run inline, so nested dispatch never
//! deadlocks. That includes [`UiContext::shutdown`]: called from a work item,
//! it only flags the context, and the UI thread stops once the item returns. A panic inside a work item is caught on the UI thread and
//! reported as [`DispatchError::WorkPanicked`]; the UI thread keeps serving.
//!
//! # Example
//!
//! ```
//! use nativeui_bridge_core::{BridgeConfig, UiContext};
//!
//! let ui = UiContext::spawn(&BridgeConfig::default()).unwrap();
//! let answer = ui.run_sync(|| 6 * 7).unwrap();
//! assert_eq!(answer, 42);
//! ui.shutdown();
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, DispatchError, Result};
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

type Work = Box<dyn FnOnce() + Send>;

enum UiTask {
    Run(Work),
    Shutdown,
}

enum Mode {
    Inline,
    Dedicated {
        sender: Sender<UiTask>,
        handle: Mutex<Option<JoinHandle<()>>>,
    },
}

/// The single execution context allowed to mutate visual state.
pub struct UiContext {
    mode: Mode,
    affinity: ThreadAffinity,
    running: Arc<AtomicBool>,
}

impl UiContext {
    /// Start a dedicated UI thread configured by `config`.
    pub fn spawn(config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        let (sender, receiver) = bounded(config.ui_queue_capacity);
        let running = Arc::new(AtomicBool::new(true));

        let loop_running = running.clone();
        let handle = thread::Builder::new()
            .name(config.ui_thread_name.clone())
            .spawn(move || ui_loop(receiver, loop_running))
            .map_err(|e| BridgeError::invalid_state(format!("failed to spawn UI thread: {e}")))?;

        let affinity = ThreadAffinity::of(handle.thread().id());
        tracing::debug!(
            target: targets::DISPATCH,
            thread = %config.ui_thread_name,
            capacity = config.ui_queue_capacity,
            "UI context started"
        );

        Ok(Self {
            mode: Mode::Dedicated {
                sender,
                handle: Mutex::new(Some(handle)),
            },
            affinity,
            running,
        })
    }

    /// Adopt the calling thread as the UI thread.
    ///
    /// Work submitted from other threads still runs, inline on the submitting
    /// thread; the host is then responsible for serialising those calls.
    pub fn inline() -> Self {
        Self {
            mode: Mode::Inline,
            affinity: ThreadAffinity::current(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the calling thread is this context's UI thread.
    #[inline]
    pub fn is_ui_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// The UI thread's affinity record.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Whether the context still accepts work.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run `work` on the UI thread and block until it completes.
    pub fn run_sync<F, R>(&self, work: F) -> std::result::Result<R, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if !self.is_running() {
            return Err(DispatchError::Stopped);
        }

        let sender = match &self.mode {
            Mode::Dedicated { sender, .. } if !self.is_ui_thread() => sender,
            _ => {
                tracing::trace!(target: targets::DISPATCH, "running UI work inline");
                return run_guarded(work);
            }
        };

        let (result_sender, result_receiver) = bounded(1);
        let affinity = self.affinity;
        let task = UiTask::Run(Box::new(move || {
            affinity.debug_assert_same_thread();
            let _ = result_sender.send(run_guarded(work));
        }));

        tracing::trace!(target: targets::DISPATCH, "queueing UI work");
        sender.send(task).map_err(|_| DispatchError::Stopped)?;
        // A closed result channel means the UI thread exited before running the item.
        result_receiver.recv().map_err(|_| DispatchError::Stopped)?
    }

    /// Stop accepting work and let the UI thread drain its queue.
    ///
    /// Blocks until the UI thread has exited, unless called from the UI
    /// thread itself, which never blocks. Calling it more than once is
    /// harmless; a later call from another thread still waits for the exit.
    pub fn shutdown(&self) {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        if was_running {
            tracing::debug!(target: targets::DISPATCH, "UI context shutting down");
        }

        let Mode::Dedicated { sender, handle } = &self.mode else {
            return;
        };

        if self.is_ui_thread() {
            // The loop checks the flag after the current item; the wake-up
            // message only matters when the queue has room for it.
            if was_running {
                let _ = sender.try_send(UiTask::Shutdown);
            }
            return;
        }

        if was_running {
            let _ = sender.send(UiTask::Shutdown);
        }
        if let Some(handle) = handle.lock().take() {
            if handle.join().is_err() {
                tracing::warn!(target: targets::DISPATCH, "UI thread exited abnormally");
            }
        }
    }
}

impl Drop for UiContext {
    fn drop(&mut self) {
        // Request shutdown without joining; drop must not block.
        if self.running.swap(false, Ordering::AcqRel) {
            if let Mode::Dedicated { sender, .. } = &self.mode {
                let _ = sender.try_send(UiTask::Shutdown);
            }
        }
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            Mode::Inline => "inline",
            Mode::Dedicated { .. } => "dedicated",
        };
        f.debug_struct("UiContext")
            .field("mode", &mode)
            .field("thread", &self.affinity.thread_id())
            .field("running", &self.is_running())
            .finish()
    }
}

static_assertions::assert_impl_all!(UiContext: Send, Sync);

fn run_guarded<F, R>(work: F) -> std::result::Result<R, DispatchError>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(work)).map_err(|_| {
        tracing::warn!(target: targets::DISPATCH, "UI work panicked");
        DispatchError::WorkPanicked
    })
}

fn ui_loop(receiver: Receiver<UiTask>, running: Arc<AtomicBool>) {
    while let Ok(task) = receiver.recv() {
        if let UiTask::Run(work) = task {
            work();
        }
        if !running.load(Ordering::Acquire) {
            // Drain what was accepted before the flag flipped. Anything sent
            // later is dropped with the receiver and its caller sees `Stopped`.
            for task in receiver.try_iter() {
                if let UiTask::Run(work) = task {
                    work();
                }
            }
            break;
        }
    }
    tracing::trace!(target: targets::DISPATCH, "UI loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dedicated() -> Arc<UiContext> {
        Arc::new(UiContext::spawn(&BridgeConfig::default()).unwrap())
    }

    #[test]
    fn test_run_sync_returns_value() {
        let ui = dedicated();
        assert_eq!(ui.run_sync(|| 40 + 2), Ok(42));
        ui.shutdown();
    }

    #[test]
    fn test_work_runs_on_ui_thread() {
        let ui = dedicated();
        let affinity = ui.affinity();
        let on_ui = ui.run_sync(move || affinity.is_same_thread()).unwrap();
        assert!(on_ui);
        assert!(!ui.is_ui_thread());
        ui.shutdown();
    }

    #[test]
    fn test_ui_thread_is_named() {
        let config = BridgeConfig {
            ui_thread_name: "test-ui".to_string(),
            ..BridgeConfig::default()
        };
        let ui = UiContext::spawn(&config).unwrap();
        let name = ui
            .run_sync(|| thread::current().name().map(str::to_string))
            .unwrap();
        assert_eq!(name.as_deref(), Some("test-ui"));
        ui.shutdown();
    }

    #[test]
    fn test_nested_dispatch_does_not_deadlock() {
        let ui = dedicated();
        let inner = ui.clone();
        let value = ui
            .run_sync(move || inner.run_sync(|| 7).unwrap_or_default())
            .unwrap();
        assert_eq!(value, 7);
        ui.shutdown();
    }

    #[test]
    fn test_submission_order_is_preserved() {
        let ui = dedicated();
        let log = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let log = log.clone();
            ui.run_sync(move || log.lock().push(i)).unwrap();
        }
        assert_eq!(*log.lock(), (0..10).collect::<Vec<_>>());
        ui.shutdown();
    }

    #[test]
    fn test_panicking_work_is_reported() {
        let ui = dedicated();
        let result = ui.run_sync(|| -> i32 { panic!("boom") });
        assert_eq!(result, Err(DispatchError::WorkPanicked));
        // The UI thread keeps serving.
        assert_eq!(ui.run_sync(|| 1), Ok(1));
        ui.shutdown();
    }

    #[test]
    fn test_run_after_shutdown_fails() {
        let ui = dedicated();
        ui.shutdown();
        ui.shutdown();
        assert_eq!(ui.run_sync(|| ()), Err(DispatchError::Stopped));
    }

    #[test]
    fn test_shutdown_from_ui_thread_with_full_queue() {
        let config = BridgeConfig {
            ui_queue_capacity: 1,
            ..BridgeConfig::default()
        };
        let ui = Arc::new(UiContext::spawn(&config).unwrap());
        let (started_tx, started_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded(1);

        let driver = {
            let ui = ui.clone();
            thread::spawn(move || {
                let inner = ui.clone();
                let result = ui.run_sync(move || {
                    started_tx.send(()).ok();
                    // Give the other caller time to fill the queue.
                    thread::sleep(Duration::from_millis(100));
                    inner.shutdown();
                    inner.is_running()
                });
                done_tx.send(result).ok();
            })
        };

        started_rx.recv().unwrap();
        let filler = {
            let ui = ui.clone();
            thread::spawn(move || ui.run_sync(|| 1))
        };

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(Ok(false)));
        let filled = filler.join().unwrap();
        assert!(matches!(filled, Ok(1) | Err(DispatchError::Stopped)));
        driver.join().unwrap();

        // Joins the UI thread even though the flag is already down.
        ui.shutdown();
        assert_eq!(ui.run_sync(|| ()), Err(DispatchError::Stopped));
    }

    #[test]
    fn test_inline_context_runs_on_caller() {
        let ui = UiContext::inline();
        assert!(ui.is_ui_thread());
        let caller = thread::current().id();
        let ran_on = ui.run_sync(|| thread::current().id()).unwrap();
        assert_eq!(ran_on, caller);
    }

    #[test]
    fn test_inline_context_shutdown() {
        let ui = UiContext::inline();
        ui.shutdown();
        assert!(!ui.is_running());
        assert_eq!(ui.run_sync(|| ()), Err(DispatchError::Stopped));
    }

    #[test]
    fn test_calls_from_many_threads() {
        let ui = dedicated();
        let counter = Arc::new(Mutex::new(0));
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let ui = ui.clone();
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        let counter = counter.clone();
                        ui.run_sync(move || *counter.lock() += 1).unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(*counter.lock(), 100);
        ui.shutdown();
    }
}
