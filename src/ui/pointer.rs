//! Outside-click detection.
//!
//! Widgets that close on a click elsewhere acquire a [`ClickAwayListener`]
//! from the app's [`PointerRouter`] when they are built. Each render
//! publishes the regions the widget considers "inside"; every pointer press
//! is dispatched to the router, which names the listeners it landed outside
//! of. Dropping the listener unregisters it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use ratatui::layout::{Position, Rect};
use tracing::trace;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    regions: BTreeMap<ListenerId, Vec<Rect>>,
}

/// Hands out click-away listeners and routes pointer presses to them.
///
/// Single-threaded: the router and its listeners live on the UI thread.
#[derive(Debug, Clone, Default)]
pub struct PointerRouter {
    registry: Rc<RefCell<Registry>>,
}

impl PointerRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener with no regions yet.
    pub fn install(&self) -> ClickAwayListener {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.regions.insert(id, Vec::new());
        trace!(?id, "Click-away listener installed");

        ClickAwayListener {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().regions.len()
    }

    /// Listeners for which a press at (`column`, `row`) is outside every region.
    ///
    /// A listener that has not published any region yet is never reported;
    /// it has not been drawn, so nothing of it can be clicked away from.
    pub fn dispatch_press(&self, column: u16, row: u16) -> Vec<ListenerId> {
        let position = Position::new(column, row);
        self.registry
            .borrow()
            .regions
            .iter()
            .filter(|(_, regions)| {
                !regions.is_empty() && !regions.iter().any(|r| r.contains(position))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

/// A registration with a [`PointerRouter`], released on drop.
#[derive(Debug)]
pub struct ClickAwayListener {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl ClickAwayListener {
    /// This listener's id, as reported by `dispatch_press`.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Replace the regions that count as inside. Empty rects are skipped.
    pub fn set_regions(&self, regions: &[Rect]) {
        if let Some(registry) = self.registry.upgrade() {
            if let Some(slot) = registry.borrow_mut().regions.get_mut(&self.id) {
                slot.clear();
                slot.extend(regions.iter().copied().filter(|r| !r.is_empty()));
            }
        }
    }
}

impl Drop for ClickAwayListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().regions.remove(&self.id);
            trace!(id = ?self.id, "Click-away listener removed");
        }
    }
}
