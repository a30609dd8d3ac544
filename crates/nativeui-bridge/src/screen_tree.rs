//! A screen's child widgets.
//!
//! Children share the single content cell at row 0, column 0, so only the
//! most recently added child is on display. A screen is meant to hold one
//! child; adding more is tolerated and logged.

use std::sync::Arc;

use parking_lot::Mutex;

use nativeui_bridge_core::logging::targets;
use nativeui_bridge_core::{Result, UiContext};

use crate::grid::ContentGrid;
use crate::widget::{Widget, WidgetHandle};

/// Keeps a screen's child list and its content grid in step.
pub struct ScreenWidgetTree {
    owner: WidgetHandle,
    ui: Arc<UiContext>,
    grid: Arc<ContentGrid>,
    children: Mutex<Vec<Arc<dyn Widget>>>,
}

impl ScreenWidgetTree {
    /// An empty tree whose children are shown in `grid`.
    pub fn new(owner: WidgetHandle, ui: Arc<UiContext>, grid: Arc<ContentGrid>) -> Self {
        Self {
            owner,
            ui,
            grid,
            children: Mutex::new(Vec::new()),
        }
    }

    /// Append `child` and put its view in the content cell.
    pub fn add_child(&self, child: Arc<dyn Widget>) -> Result<()> {
        let view = child.view();
        let grid = self.grid.clone();
        self.ui.run_sync(move || grid.add_view(view))?;

        let count = {
            let mut children = self.children.lock();
            children.push(child.clone());
            children.len()
        };

        if count > 1 {
            tracing::warn!(
                target: targets::SCREEN,
                screen = %self.owner,
                child = %child.handle(),
                count,
                "screen has more than one child, only the last is visible"
            );
        } else {
            tracing::trace!(target: targets::SCREEN, screen = %self.owner, child = %child.handle(), "child added");
        }
        Ok(())
    }

    /// Remove the child with `handle`.
    ///
    /// Returns `false` if no such child exists. When the grid cannot be
    /// updated the child stays in the list.
    pub fn remove_child(&self, handle: WidgetHandle) -> Result<bool> {
        let found = self
            .children
            .lock()
            .iter()
            .find(|c| c.handle() == handle)
            .cloned();

        match found {
            Some(child) => {
                self.detach_view(&child)?;
                self.forget(&child);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the child at `index`.
    ///
    /// Out-of-range indices, negative ones included, change nothing and
    /// return `None`. When the grid cannot be updated the child stays in the
    /// list.
    pub fn remove_child_at(&self, index: i32) -> Result<Option<Arc<dyn Widget>>> {
        let found = {
            let children = self.children.lock();
            usize::try_from(index)
                .ok()
                .and_then(|i| children.get(i))
                .cloned()
        };

        let Some(child) = found else {
            tracing::trace!(target: targets::SCREEN, screen = %self.owner, index, "child index out of range");
            return Ok(None);
        };
        self.detach_view(&child)?;
        self.forget(&child);
        Ok(Some(child))
    }

    fn forget(&self, child: &Arc<dyn Widget>) {
        let mut children = self.children.lock();
        if let Some(index) = children.iter().position(|c| Arc::ptr_eq(c, child)) {
            children.remove(index);
        }
    }

    fn detach_view(&self, child: &Arc<dyn Widget>) -> Result<()> {
        let view = child.view();
        let grid = self.grid.clone();
        self.ui.run_sync(move || {
            grid.remove_view(view);
            if grid.child_count() > 0 {
                grid.pin_last();
            }
        })?;
        tracing::trace!(target: targets::SCREEN, screen = %self.owner, child = %child.handle(), "child removed");
        Ok(())
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<Arc<dyn Widget>> {
        self.children.lock().clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.lock().len()
    }
}

impl std::fmt::Debug for ScreenWidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenWidgetTree")
            .field("owner", &self.owner)
            .field("child_count", &self.child_count())
            .finish_non_exhaustive()
    }
}
