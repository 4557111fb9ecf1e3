//! Joins the configured channels once the server has welcomed us.

use tracing::{info, warn};

use crate::control::{Module, ModuleCtx};
use crate::event::{Event, EventKind, Outcome};

/// The autojoin module. Reads the `[channels]` config section.
pub struct AutoJoin;

/// Factory for the controller registry.
pub fn factory() -> anyhow::Result<Box<dyn Module>> {
    Ok(Box::new(AutoJoin))
}

impl Module for AutoJoin {
    fn subscriptions(&self) -> Vec<EventKind> {
        vec![EventKind::Welcome]
    }

    fn handle(&mut self, ctx: &mut ModuleCtx<'_>, _event: &Event) -> anyhow::Result<Outcome> {
        let channels: Vec<(String, String)> = ctx
            .config()
            .channels
            .iter()
            .map(|(name, key)| (name.clone(), key.clone()))
            .collect();
        if channels.is_empty() {
            warn!("no [channels] configured, nothing to autojoin");
            return Ok(Outcome::Pass);
        }
        let chantypes = ctx.session.server.chantypes();
        info!(count = channels.len(), "autojoining configured channels");
        for (mut name, key) in channels {
            let prefixed = name
                .chars()
                .next()
                .is_some_and(|c| chantypes.contains(c));
            if !prefixed {
                name.insert(0, '#');
            }
            let key = if key.is_empty() {
                None
            } else {
                Some(key.as_str())
            };
            ctx.session.join(&name, key);
        }
        Ok(Outcome::Pass)
    }
}
