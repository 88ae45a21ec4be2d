use rand::seq::SliceRandom;
use rand::Rng;

use crate::vocabulary::{SeaArea, PHANTOM_AREAS, STANDARD_AREAS};

/// Hands out the next area for a report. Standard areas are visited exactly
/// once per lap in a shuffled order; phantom areas interrupt with a small
/// fixed probability and never touch the lap cursor.
pub struct AreaCycler {
    order: Vec<SeaArea>,
    cursor: usize,
    phantom_probability: f64,
}

impl AreaCycler {
    pub fn new(phantom_probability: f64, rng: &mut impl Rng) -> Self {
        let mut order: Vec<SeaArea> = STANDARD_AREAS.to_vec();
        order.shuffle(rng);
        Self {
            order,
            cursor: 0,
            phantom_probability: phantom_probability.clamp(0.0, 1.0),
        }
    }

    /// Next area. Phantom draws return early; a repeat across a reshuffle
    /// boundary is allowed (the same area may close one lap and open the next).
    pub fn next(&mut self, rng: &mut impl Rng) -> SeaArea {
        if rng.gen_bool(self.phantom_probability) {
            return PHANTOM_AREAS[rng.gen_range(0..PHANTOM_AREAS.len())];
        }

        if self.cursor >= self.order.len() {
            self.order.shuffle(rng);
            self.cursor = 0;
        }

        let area = self.order[self.cursor];
        self.cursor += 1;
        area
    }
}
