//! Built-in modules.

pub mod autojoin;
pub mod nick_in_use;

use crate::control::Controller;

/// Register the built-in module factories with a controller.
///
/// Registration only makes the names available; the `[modules]` config
/// section decides what actually loads.
pub fn register_builtins(controller: &mut Controller) {
    controller.register("autojoin", Box::new(autojoin::factory));
    controller.register("nick_in_use", Box::new(nick_in_use::factory));
}
