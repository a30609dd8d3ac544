//! Putting a screen on display.
//!
//! A [`ScreenPresenter`] makes its screen's content the active page's
//! content, either directly or through a [`TransitionEngine`] that decides
//! when, during an animation, the content actually switches.
//!
//! Only the latest request counts. Every presentation takes a new generation
//! number; a [`SwitchContent`] carrying an older generation does nothing
//! when invoked, so an animation that finishes late cannot overwrite a newer
//! screen change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nativeui_bridge_core::logging::targets;
use nativeui_bridge_core::{Result, UiContext};

use crate::command_bar::CommandBar;
use crate::frame::HostFrame;
use crate::grid::ContentGrid;

/// Host-defined transition identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransitionKind(pub i32);

impl TransitionKind {
    /// No animation.
    pub const NONE: Self = Self(0);
}

/// The single-use "switch the page content now" step of a transition.
pub struct SwitchContent {
    generation: u64,
    latest: Arc<AtomicU64>,
    apply: Box<dyn FnOnce() -> Result<bool> + Send>,
}

impl SwitchContent {
    /// The presentation generation this switch belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer presentation has been requested since.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// Switch the content.
    ///
    /// Returns `Ok(false)` without touching the page when a newer
    /// presentation superseded this one. The generation is checked on the UI
    /// thread, together with the switch.
    pub fn invoke(self) -> Result<bool> {
        let generation = self.generation;
        let switched = (self.apply)()?;
        if !switched {
            tracing::warn!(target: targets::PRESENTER, generation, "stale content switch ignored");
        }
        Ok(switched)
    }
}

impl std::fmt::Debug for SwitchContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchContent")
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish_non_exhaustive()
    }
}

/// The host's screen transition animator.
pub trait TransitionEngine: Send + Sync {
    /// Start a `kind` transition and invoke `switch` at the point where the
    /// new content should appear.
    ///
    /// Called on the UI thread. `switch` may be invoked later, from any
    /// thread.
    fn run(&self, kind: TransitionKind, switch: SwitchContent);
}

/// A [`TransitionEngine`] that switches content at once, without animating.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateTransition;

impl TransitionEngine for ImmediateTransition {
    fn run(&self, kind: TransitionKind, switch: SwitchContent) {
        if let Err(err) = switch.invoke() {
            tracing::warn!(target: targets::PRESENTER, ?kind, %err, "content switch failed");
        }
    }
}

/// Presents one screen's content on the host frame.
pub struct ScreenPresenter {
    ui: Arc<UiContext>,
    frame: Arc<dyn HostFrame>,
    transitions: Arc<dyn TransitionEngine>,
    content: Arc<ContentGrid>,
    generation: Arc<AtomicU64>,
}

impl ScreenPresenter {
    /// Create a presenter for `content`.
    pub fn new(
        ui: Arc<UiContext>,
        frame: Arc<dyn HostFrame>,
        transitions: Arc<dyn TransitionEngine>,
        content: Arc<ContentGrid>,
    ) -> Self {
        Self {
            ui,
            frame,
            transitions,
            content,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The presented content.
    pub fn content(&self) -> &Arc<ContentGrid> {
        &self.content
    }

    /// The generation of the most recent presentation request.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Make the content the active page's content, attaching `bar` first
    /// when given.
    pub fn present(&self, bar: Option<Arc<CommandBar>>) -> Result<()> {
        let generation = self.next_generation();
        let frame = self.frame.clone();
        let content = self.content.clone();

        self.ui.run_sync(move || {
            if let Some(bar) = bar {
                frame.set_page_command_bar(bar)?;
            }
            frame.set_page_content(content)
        })??;

        tracing::debug!(target: targets::PRESENTER, generation, "screen presented");
        Ok(())
    }

    /// Like [`present`](Self::present), but the content switch is handed to
    /// the transition engine.
    pub fn present_with_transition(
        &self,
        bar: Option<Arc<CommandBar>>,
        kind: TransitionKind,
    ) -> Result<()> {
        let generation = self.next_generation();
        let switch = self.switch_content(generation);
        let frame = self.frame.clone();
        let transitions = self.transitions.clone();

        self.ui.run_sync(move || -> Result<()> {
            if let Some(bar) = bar {
                frame.set_page_command_bar(bar)?;
            }
            transitions.run(kind, switch);
            Ok(())
        })??;

        tracing::debug!(target: targets::PRESENTER, generation, ?kind, "screen transition started");
        Ok(())
    }

    /// Whether the content is the active page's content.
    pub fn is_current_content(&self) -> Result<bool> {
        Ok(self
            .frame
            .page_content()?
            .is_some_and(|shown| Arc::ptr_eq(&shown, &self.content)))
    }

    fn switch_content(&self, generation: u64) -> SwitchContent {
        let ui = self.ui.clone();
        let frame = self.frame.clone();
        let content = self.content.clone();
        let latest = self.generation.clone();

        SwitchContent {
            generation,
            latest: self.generation.clone(),
            apply: Box::new(move || {
                ui.run_sync(move || -> Result<bool> {
                    if latest.load(Ordering::Acquire) != generation {
                        return Ok(false);
                    }
                    frame.set_page_content(content)?;
                    Ok(true)
                })?
            }),
        }
    }
}
