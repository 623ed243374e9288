use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::Motion;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Page Exit", inline)]
#[serde(default)]
/// Timing of the uniform page-exit animation.
pub struct PageExitOptions {
    /// Exit animation; the route is pushed when it completes.
    #[schemars(title = "Exit")]
    pub exit: Motion,
    /// Per-element delay for staggered exit variants, in milliseconds.
    #[schemars(title = "Stagger Step", range(min = 0, max = 200))]
    pub stagger_step_ms: u64,
    /// Abandon an exit whose route change is never observed after this
    /// many milliseconds. `None` waits for the route observer forever.
    #[schemars(skip)]
    pub watchdog_ms: Option<u64>,
}

impl Default for PageExitOptions {
    fn default() -> Self {
        Self {
            exit: Motion::page_exit(),
            stagger_step_ms: 30,
            watchdog_ms: None,
        }
    }
}
