use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::Motion;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Shared Element", inline)]
#[serde(default)]
/// Thumbnail ↔ hero morph used by both the detail route and the modal.
pub struct RevealOptions {
    /// The morph itself.
    #[schemars(title = "Morph")]
    pub morph: Motion,
    /// Hero height as a fraction of the viewport height.
    #[schemars(title = "Hero Height", range(min = 0.2, max = 1.0), extend("step" = 0.05))]
    pub hero_fraction: f32,
    /// Delay between the morph landing and content starting to fade in.
    #[schemars(skip)]
    pub content_delay_ms: u64,
    /// Content fade-in.
    #[schemars(title = "Content")]
    pub content: Motion,
    /// Delay of the first staggered content block.
    #[schemars(skip)]
    pub stagger_base_ms: u64,
    /// Added delay per subsequent content block.
    #[schemars(title = "Stagger Step", range(min = 0, max = 300))]
    pub stagger_step_ms: u64,
    /// Content fade-out before a closing morph starts.
    #[schemars(skip)]
    pub close_fade_ms: u64,
    /// Delay between recording a backward request and pushing the route.
    #[schemars(skip)]
    pub back_push_delay_ms: u64,
    /// Age after which an unconsumed transition request is abandoned.
    #[schemars(skip)]
    pub request_ttl_ms: u64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            morph: Motion::morph(),
            hero_fraction: 0.6,
            content_delay_ms: 50,
            content: Motion::content(),
            stagger_base_ms: 250,
            stagger_step_ms: 100,
            close_fade_ms: 100,
            back_push_delay_ms: 10,
            request_ttl_ms: 5000,
        }
    }
}
