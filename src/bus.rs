//! The event dispatch bus.
//!
//! Subscribers are plain closures kept in per-kind ordered lists. Dispatch
//! walks the list until someone returns [`Outcome::Handled`]; a failing
//! subscriber is logged and aborts only the remainder of that one dispatch.
//! A `LINE` dispatch nobody suppressed falls through to `RAWLINE` so
//! modules can watch traffic the parsers do not understand.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::control::Controller;
use crate::event::{Event, EventKind, Outcome};
use crate::state::Session;

/// A bus subscriber.
///
/// Subscribers receive the session, the module controller, and the bus
/// itself so they can send lines, manage modules, and dispatch derived
/// events from inside a handler.
pub type Hook =
    Box<dyn FnMut(&mut Session, &mut Controller, &mut Bus, &Event) -> anyhow::Result<Outcome>>;

/// Per-kind ordered subscriber lists.
#[derive(Default)]
pub struct Bus {
    subscribers: HashMap<EventKind, Vec<Hook>>,
}

impl Bus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an event kind so dispatching it without subscribers is not
    /// treated as a mistake.
    pub fn declare(&mut self, kind: EventKind) {
        self.subscribers.entry(kind).or_default();
    }

    /// Append a subscriber for `kind`. Earlier registrations run first.
    ///
    /// A subscriber registered while a dispatch of the same kind is in
    /// flight does not see the in-flight event; it is appended after the
    /// existing subscribers and sees subsequent dispatches.
    pub fn on(&mut self, kind: EventKind, hook: Hook) {
        self.subscribers.entry(kind).or_default().push(hook);
    }

    /// Dispatch `event` to its subscribers in registration order.
    ///
    /// Returns `true` if a subscriber suppressed further handling. An
    /// undeclared kind is logged and returns `false`.
    pub fn dispatch(
        &mut self,
        session: &mut Session,
        controller: &mut Controller,
        event: &Event,
    ) -> bool {
        let kind = event.kind();
        let mut suppressed = false;
        // The subscriber list is taken out of the map for the duration of
        // the walk so hooks can re-enter the bus (and register new hooks)
        // without holding a borrow on it.
        match self.subscribers.remove(&kind) {
            None => {
                warn!(event = %kind, "dispatch requested for undeclared event");
            }
            Some(mut hooks) => {
                if kind != EventKind::Line {
                    debug!(event = %kind, subscribers = hooks.len(), "dispatching");
                }
                for hook in hooks.iter_mut() {
                    match hook(session, controller, self, event) {
                        Ok(Outcome::Handled) => {
                            suppressed = true;
                            break;
                        }
                        Ok(Outcome::Pass) => {}
                        Err(err) => {
                            error!(
                                event = %kind,
                                error = %err,
                                "subscriber failed, skipping remaining subscribers"
                            );
                            break;
                        }
                    }
                }
                match self.subscribers.entry(kind) {
                    Entry::Occupied(mut slot) => {
                        // Hooks registered mid-dispatch land after the
                        // original subscribers.
                        let added = std::mem::replace(slot.get_mut(), hooks);
                        slot.get_mut().extend(added);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(hooks);
                    }
                }
            }
        }
        if !suppressed && kind == EventKind::Line {
            if let Event::Line(line) = event {
                return self.dispatch(session, controller, &Event::RawLine(line.clone()));
            }
        }
        suppressed
    }
}
