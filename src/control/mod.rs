//! Module lifecycle control.
//!
//! The controller owns the loaded module instances and a stable ordering
//! amongst them. It subscribes itself to the bus for every event kind its
//! modules want and offers each event to the modules in order, honoring
//! suppression. Loading, unloading, and hot reloading keep that ordering
//! intact, and a couple of guards keep reload-from-inside-a-module from
//! looping.

mod module;

use std::collections::{HashMap, HashSet};

use tracing::{debug, error, info, warn};

use crate::bus::Bus;
use crate::config::Config;
use crate::error::LoadError;
use crate::event::{Event, EventKind, Outcome};
use crate::state::Session;

pub use module::{Module, ModuleCtx, ModuleFactory};

/// The module controller.
pub struct Controller {
    config: Config,
    factories: HashMap<String, ModuleFactory>,
    instances: HashMap<String, Box<dyn Module>>,
    ordering: Vec<String>,
    listening: HashSet<EventKind>,
    running: bool,
    currently_loading: HashSet<String>,
    loaded_on_this_event: Option<HashSet<String>>,
}

impl Controller {
    /// Create a controller around a configuration.
    pub fn new(config: Config) -> Self {
        Controller {
            config,
            factories: HashMap::new(),
            instances: HashMap::new(),
            ordering: Vec::new(),
            listening: HashSet::new(),
            running: false,
            currently_loading: HashSet::new(),
            loaded_on_this_event: None,
        }
    }

    /// The configuration this controller was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a named module factory. Registration alone loads nothing.
    pub fn register(&mut self, name: impl Into<String>, factory: ModuleFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Whether a module instance is currently loaded under `name`.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// The current module ordering (the event offer order).
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Begin acting on events, and dispatch `STARTUP` to the modules.
    pub fn start(&mut self, session: &mut Session, bus: &mut Bus) {
        // Wire up subscriptions for anything loaded before start.
        let kinds: Vec<EventKind> = self
            .instances
            .values()
            .flat_map(|m| m.subscriptions())
            .collect();
        for kind in kinds {
            self.listen(bus, kind);
        }
        self.running = true;
        self.process_event(session, bus, &Event::Startup, false);
    }

    /// Subscribe the controller itself to `kind` on the bus. Idempotent.
    ///
    /// The subscription is never removed: once the controller listens for
    /// an event it keeps forwarding it even if every interested module is
    /// later unloaded. There just might be nobody who cares.
    fn listen(&mut self, bus: &mut Bus, kind: EventKind) {
        if !self.listening.insert(kind) {
            return;
        }
        bus.on(
            kind,
            Box::new(|session, controller, bus, event| {
                Ok(if controller.process_event(session, bus, event, false) {
                    Outcome::Handled
                } else {
                    Outcome::Pass
                })
            }),
        );
        debug!(event = %kind, "controller now listening");
    }

    /// Offer `event` to each loaded module in order.
    ///
    /// Propagation stops when a module returns [`Outcome::Handled`] or
    /// fails. Modules loaded while this event was being handled are
    /// skipped unless `force` is set; the skip set is copied on entry and
    /// restored on exit so nested triggers behave. Returns whether a
    /// module suppressed the event.
    pub fn process_event(
        &mut self,
        session: &mut Session,
        bus: &mut Bus,
        event: &Event,
        force: bool,
    ) -> bool {
        let kind = event.kind();
        if !self.running {
            debug!(event = %kind, "ignoring event, controller not running");
            return false;
        }

        let saved = self.loaded_on_this_event.take();
        self.loaded_on_this_event = Some(if force {
            HashSet::new()
        } else {
            saved.clone().unwrap_or_default()
        });

        let mut suppressed = false;
        for name in self.ordering.clone() {
            if !force
                && self
                    .loaded_on_this_event
                    .as_ref()
                    .is_some_and(|set| set.contains(&name))
            {
                debug!(module = %name, event = %kind, "skipping module loaded during this event");
                continue;
            }
            let Some(mut module) = self.instances.remove(&name) else {
                continue;
            };
            let mut outcome = Ok(Outcome::Pass);
            if module.subscriptions().contains(&kind) {
                let mut ctx = ModuleCtx {
                    session: &mut *session,
                    bus: &mut *bus,
                    controller: &mut *self,
                };
                outcome = module.handle(&mut ctx, event);
            }
            // If the handler reloaded its own slot, keep the replacement.
            self.instances.entry(name.clone()).or_insert(module);
            match outcome {
                Ok(Outcome::Handled) => {
                    suppressed = true;
                    break;
                }
                Ok(Outcome::Pass) => {}
                Err(err) => {
                    error!(
                        module = %name,
                        event = %kind,
                        error = %err,
                        "module handler failed, stopping propagation"
                    );
                    break;
                }
            }
        }

        self.loaded_on_this_event = saved;
        suppressed
    }

    /// Construct and install the module registered under `name`.
    ///
    /// The new instance goes into its existing order slot, or is appended
    /// if it never had one. Does not call `start`; use [`reload`] unless
    /// you are managing lifecycle hooks yourself.
    ///
    /// [`reload`]: Self::reload
    pub fn load(&mut self, name: &str) -> Result<(), LoadError> {
        if self.currently_loading.contains(name) {
            warn!(module = %name, "ignoring load request for module already being loaded");
            return Err(LoadError::LoadInProgress(name.to_string()));
        }
        self.currently_loading.insert(name.to_string());
        let result = self.load_inner(name);
        self.currently_loading.remove(name);
        result
    }

    fn load_inner(&mut self, name: &str) -> Result<(), LoadError> {
        if let Some(set) = self.loaded_on_this_event.as_mut() {
            set.insert(name.to_string());
        }
        let factory = self.factories.get(name).ok_or_else(|| {
            error!(module = %name, "no factory registered under this name");
            LoadError::NotFound(name.to_string())
        })?;
        let module = factory().map_err(|err| {
            error!(module = %name, error = %err, "module constructor failed");
            LoadError::Construct(name.to_string(), err)
        })?;
        self.instances.insert(name.to_string(), module);
        if !self.ordering.iter().any(|n| n == name) {
            self.ordering.push(name.to_string());
        }
        Ok(())
    }

    /// Unload a module, calling its `stop` hook. Unloading something that
    /// is not loaded is a warned no-op returning `false`.
    pub fn unload(&mut self, session: &mut Session, bus: &mut Bus, name: &str) -> bool {
        let Some(mut module) = self.instances.remove(name) else {
            warn!(module = %name, "ignoring unload of module that is not loaded");
            return false;
        };
        let mut ctx = ModuleCtx {
            session: &mut *session,
            bus: &mut *bus,
            controller: &mut *self,
        };
        module.stop(&mut ctx, false);
        self.ordering.retain(|n| n != name);
        info!(module = %name, "module unloaded");
        true
    }

    /// Hot-reload one module without changing its ordering.
    ///
    /// The old instance is stopped with `reloading` set and replaced by a
    /// fresh one from the factory. If the fresh construction fails, the
    /// old instance is kept and restarted. A name that was never loaded is
    /// simply loaded. Returns whether the (re)load succeeded.
    ///
    /// The loading guard is held across the whole reload, lifecycle hooks
    /// included, so a module that tries to reload itself from one of its
    /// own hooks is refused instead of looping.
    pub fn reload(&mut self, session: &mut Session, bus: &mut Bus, name: &str) -> bool {
        if !self.currently_loading.insert(name.to_string()) {
            warn!(module = %name, "ignoring reentrant reload request");
            return false;
        }
        let result = self.reload_inner(session, bus, name);
        self.currently_loading.remove(name);
        result
    }

    fn reload_inner(&mut self, session: &mut Session, bus: &mut Bus, name: &str) -> bool {
        let had_existing = self.instances.contains_key(name);
        if let Some(mut module) = self.instances.remove(name) {
            let mut ctx = ModuleCtx {
                session: &mut *session,
                bus: &mut *bus,
                controller: &mut *self,
            };
            module.stop(&mut ctx, true);
            // Keep the old instance around until the replacement exists.
            self.instances.insert(name.to_string(), module);
        } else {
            info!(module = %name, "reload is loading a module that was not loaded");
        }

        match self.load_inner(name) {
            Ok(()) => {
                self.start_module(session, bus, name, true);
                info!(module = %name, "module (re)loaded");
                true
            }
            Err(err) => {
                if had_existing {
                    error!(module = %name, error = %err, "reload failed, reusing existing instance");
                    self.start_module(session, bus, name, true);
                } else {
                    error!(module = %name, error = %err, "module failed to load");
                }
                false
            }
        }
    }

    /// (Re)load every configured module.
    ///
    /// Stops all loaded modules with `reloading` set, clears the ordering,
    /// loads the configured modules in priority order, starts them
    /// (`reloading` set for ones that were loaded before), and dispatches
    /// a forced `STARTUP` since the whole population rebooted. A single
    /// malformed priority aborts the reload before anything is loaded.
    /// Returns whether every configured module loaded.
    pub fn reload_all(&mut self, session: &mut Session, bus: &mut Bus) -> bool {
        let previously: HashSet<String> = self.instances.keys().cloned().collect();
        for name in self.ordering.clone() {
            if let Some(mut module) = self.instances.remove(&name) {
                let mut ctx = ModuleCtx {
                    session: &mut *session,
                    bus: &mut *bus,
                    controller: &mut *self,
                };
                module.stop(&mut ctx, true);
            }
        }
        self.instances.clear();
        self.ordering.clear();

        let configured = match self.config.module_priorities() {
            Ok(configured) => configured,
            Err(err) => {
                error!(error = %err, "unable to reload modules due to invalid priority");
                return false;
            }
        };

        let mut failed = Vec::new();
        for (name, _) in &configured {
            if self.load(name).is_err() {
                failed.push(name.clone());
            }
        }
        if !self.ordering.is_empty() {
            info!(modules = ?self.ordering, "loaded modules");
        }
        if !failed.is_empty() {
            error!(modules = ?failed, "these modules failed to load");
        }

        for name in self.ordering.clone() {
            self.start_module(session, bus, &name, previously.contains(&name));
        }

        self.process_event(session, bus, &Event::Startup, true);
        failed.is_empty()
    }

    fn start_module(&mut self, session: &mut Session, bus: &mut Bus, name: &str, reloading: bool) {
        let Some(mut module) = self.instances.remove(name) else {
            return;
        };
        let kinds = module.subscriptions();
        {
            let mut ctx = ModuleCtx {
                session: &mut *session,
                bus: &mut *bus,
                controller: &mut *self,
            };
            module.start(&mut ctx, reloading);
        }
        self.instances.entry(name.to_string()).or_insert(module);
        for kind in kinds {
            self.listen(bus, kind);
        }
    }
}
