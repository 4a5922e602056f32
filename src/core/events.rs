use crate::utils::error::Result;
use std::collections::VecDeque;
use std::fmt::Debug;

/// The time slider moved. `minutes` is minutes since midnight or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSelection {
    pub minutes: i32,
}

pub type Handler<C, E> = Box<dyn FnMut(&mut C, &E) -> Result<()> + Send>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub processed: usize,
    pub failed: usize,
}

/// Queues events and runs them one at a time against a context `C`.
///
/// Dispatch takes `&mut self`, so nothing can publish while a handler runs:
/// every event passes through all handlers before the next one is popped.
pub struct EventBus<C, E> {
    handlers: Vec<Handler<C, E>>,
    pending: VecDeque<E>,
}

impl<C, E: Debug> EventBus<C, E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&mut C, &E) -> Result<()> + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn publish(&mut self, event: E) {
        self.pending.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drains the queue in publish order. A failing handler is logged and
    /// counted; the remaining handlers and events still run.
    pub fn dispatch(&mut self, ctx: &mut C) -> DispatchReport {
        let mut report = DispatchReport::default();

        while let Some(event) = self.pending.pop_front() {
            let mut ok = true;
            for handler in self.handlers.iter_mut() {
                if let Err(e) = handler(&mut *ctx, &event) {
                    tracing::error!("❌ Handler failed for {:?}: {}", event, e);
                    ok = false;
                }
            }
            report.processed += 1;
            if !ok {
                report.failed += 1;
            }
        }

        report
    }
}

impl<C, E: Debug> Default for EventBus<C, E> {
    fn default() -> Self {
        Self::new()
    }
}
