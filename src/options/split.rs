use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::Motion;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Split Reveal", inline)]
#[serde(default)]
/// Timing and geometry of the two-panel split-reveal cover.
pub struct SplitOptions {
    /// Panels closing in over the current page.
    #[schemars(title = "Cover")]
    pub cover: Motion,
    /// Milliseconds from the start of covering until the panels part.
    #[schemars(title = "Reveal At", range(min = 400, max = 5000))]
    pub reveal_at_ms: u64,
    /// Panels parting to reveal the new page.
    #[schemars(title = "Split")]
    pub split: Motion,
    /// Pause between the reveal finishing and the state clearing.
    #[schemars(skip)]
    pub settle_ms: u64,
    /// Period of the scroll-to-top enforcement while the route mounts.
    #[schemars(skip)]
    pub scroll_pin_interval_ms: u64,
    /// Extra travel, in pixels, that pushes panels fully off-screen.
    #[schemars(skip)]
    pub panel_overshoot: f32,
}

impl SplitOptions {
    /// Reveal offset in milliseconds, never earlier than the end of the
    /// cover motion.
    #[must_use]
    pub fn reveal_at_ms(&self) -> u64 {
        self.reveal_at_ms.max(self.cover.duration_ms)
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            cover: Motion::cover(),
            reveal_at_ms: 1600,
            split: Motion::split(),
            settle_ms: 100,
            scroll_pin_interval_ms: 30,
            panel_overshoot: 50.0,
        }
    }
}
