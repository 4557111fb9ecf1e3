//! The module (plugin) contract.

use crate::bus::Bus;
use crate::config::Config;
use crate::control::Controller;
use crate::event::{Event, EventKind, Outcome};
use crate::state::Session;

/// Constructor for a named module.
///
/// Factories stay registered after their module is unloaded, which is what
/// lets `reload` tear an instance down and build a fresh one into the same
/// order slot.
pub type ModuleFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn Module>>>;

/// What a module sees while handling an event or lifecycle hook.
pub struct ModuleCtx<'a> {
    /// The live session, for sending and inspecting state.
    pub session: &'a mut Session,
    /// The dispatch bus, for raising bus-level events.
    pub bus: &'a mut Bus,
    /// The controller, for loading and unloading other modules.
    pub controller: &'a mut Controller,
}

impl ModuleCtx<'_> {
    /// Push a nested event through the module population.
    ///
    /// With `force` the loaded-during-this-event skip rule is bypassed, so
    /// even freshly loaded modules see the event. Returns whether a module
    /// suppressed it.
    pub fn trigger(&mut self, event: &Event, force: bool) -> bool {
        self.controller
            .process_event(&mut *self.session, &mut *self.bus, event, force)
    }

    /// The configuration the controller was built with.
    pub fn config(&self) -> &Config {
        self.controller.config()
    }
}

/// A pluggable event consumer managed by the [`Controller`].
///
/// Modules declare the event kinds they care about up front; `handle`
/// receives every event of a subscribed kind, in module load order, and
/// can consume it by returning [`Outcome::Handled`].
pub trait Module {
    /// The event kinds this module wants to see.
    fn subscriptions(&self) -> Vec<EventKind>;

    /// Handle one subscribed event.
    fn handle(&mut self, ctx: &mut ModuleCtx<'_>, event: &Event) -> anyhow::Result<Outcome>;

    /// Called once the module is in place. `reloading` distinguishes a hot
    /// reload from a cold start.
    fn start(&mut self, _ctx: &mut ModuleCtx<'_>, _reloading: bool) {}

    /// Called before the module is removed. `reloading` distinguishes a
    /// hot reload from a permanent unload.
    fn stop(&mut self, _ctx: &mut ModuleCtx<'_>, _reloading: bool) {}
}
