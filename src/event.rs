use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::tools::ToolKind;

/// Notifications the editor emits so the surrounding UI can react.
///
/// The core never talks to the user itself; handlers decide what to show.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A completed edit was appended to the undo history
    Committed { undo_depth: usize },
    /// An edit finished without changing anything; no history entry was pushed
    Unchanged { tool: ToolKind },
    Undone { undo_depth: usize, redo_depth: usize },
    Redone { undo_depth: usize, redo_depth: usize },
    ToolChanged { old: ToolKind, new: ToolKind },
    Resized { width: u32, height: u32 },
    Cleared,
    /// A recoverable error, already returned to the caller as well
    Failed { message: String },
}

pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent),
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Broadcasts editor events to registered handlers.
///
/// Handlers may subscribe, unsubscribe or emit while an event is being
/// delivered. Events emitted from inside a handler are queued and delivered
/// after the current one, in order.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
    next_id: Cell<u64>,
    queued: RefCell<VecDeque<EditorEvent>>,
    /// Unsubscribed while their handler was checked out for delivery
    removed: RefCell<Vec<SubscriptionId>>,
    dispatching: Cell<bool>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .field("queued", &self.queued.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        if handlers.len() != before {
            return true;
        }
        if self.dispatching.get() && id.0 < self.next_id.get() {
            self.removed.borrow_mut().push(id);
            return true;
        }
        false
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn emit(&self, event: EditorEvent) {
        self.queued.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            return;
        }
        loop {
            let Some(event) = self.queued.borrow_mut().pop_front() else {
                break;
            };
            // Check the handlers out so they can reach the bus without a double borrow
            let mut active = std::mem::take(&mut *self.handlers.borrow_mut());
            for (_, handler) in &mut active {
                handler.handle_event(&event);
            }
            let removed = std::mem::take(&mut *self.removed.borrow_mut());
            active.retain(|(id, _)| !removed.contains(id));
            let mut handlers = self.handlers.borrow_mut();
            let added = std::mem::replace(&mut *handlers, active);
            handlers.extend(added);
        }
        self.dispatching.set(false);
    }
}
