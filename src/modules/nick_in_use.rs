//! Falls back to a randomized nick when the requested one is taken.

use rand::Rng;
use tracing::info;

use crate::control::{Module, ModuleCtx};
use crate::event::{Event, EventKind, Outcome};

/// The nick fallback module: appends a random digit and retries.
pub struct NickInUse;

/// Factory for the controller registry.
pub fn factory() -> anyhow::Result<Box<dyn Module>> {
    Ok(Box::new(NickInUse))
}

impl Module for NickInUse {
    fn subscriptions(&self) -> Vec<EventKind> {
        vec![EventKind::NickInUse]
    }

    fn handle(&mut self, ctx: &mut ModuleCtx<'_>, event: &Event) -> anyhow::Result<Outcome> {
        let Event::NickInUse { nick } = event else {
            return Ok(Outcome::Pass);
        };
        let digit: u8 = rand::thread_rng().gen_range(0..10);
        let fallback = format!("{nick}{digit}");
        info!(taken = %nick, fallback = %fallback, "nick in use, trying fallback");
        ctx.session.change_nick(&fallback);
        Ok(Outcome::Pass)
    }
}
