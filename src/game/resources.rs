use crate::game::random::SeededRandom;
use serde::{Deserialize, Serialize};

pub const RESOURCE_MAX: u8 = 10;

/// Four resource scores, each kept within `[0, 10]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resources {
    #[serde(deserialize_with = "crate::game::save::lenient::score")]
    pub minerals: u8,
    #[serde(deserialize_with = "crate::game::save::lenient::score")]
    pub gases: u8,
    #[serde(deserialize_with = "crate::game::save::lenient::score")]
    pub organics: u8,
    #[serde(deserialize_with = "crate::game::save::lenient::score")]
    pub rare_elements: u8,
}

/// Additive adjustment applied on top of a baseline roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceShift {
    pub minerals: i32,
    pub gases: i32,
    pub organics: i32,
    pub rare_elements: i32,
}

impl ResourceShift {
    pub const NONE: ResourceShift = ResourceShift::new(0, 0, 0, 0);

    pub const fn new(minerals: i32, gases: i32, organics: i32, rare_elements: i32) -> Self {
        Self {
            minerals,
            gases,
            organics,
            rare_elements,
        }
    }
}

fn clamp_score(value: i32) -> u8 {
    value.clamp(0, RESOURCE_MAX as i32) as u8
}

impl Resources {
    pub fn new(minerals: u8, gases: u8, organics: u8, rare_elements: u8) -> Self {
        Self {
            minerals,
            gases,
            organics,
            rare_elements,
        }
        .clamped()
    }

    /// Uniform 1..=10 per field, drawn in field order.
    pub fn roll(rng: &mut SeededRandom) -> Self {
        Self {
            minerals: rng.next_int_inclusive(1, 10) as u8,
            gases: rng.next_int_inclusive(1, 10) as u8,
            organics: rng.next_int_inclusive(1, 10) as u8,
            rare_elements: rng.next_int_inclusive(1, 10) as u8,
        }
    }

    pub fn shifted(self, shift: ResourceShift) -> Self {
        Self {
            minerals: clamp_score(self.minerals as i32 + shift.minerals),
            gases: clamp_score(self.gases as i32 + shift.gases),
            organics: clamp_score(self.organics as i32 + shift.organics),
            rare_elements: clamp_score(self.rare_elements as i32 + shift.rare_elements),
        }
    }

    /// Save data can carry anything; scores above the cap are pulled back.
    pub fn clamped(self) -> Self {
        self.shifted(ResourceShift::NONE)
    }

    /// `(minerals + gases + organics + 2 * rare_elements) / 4`.
    ///
    /// Rare elements count double while the divisor stays at four.
    pub fn richness(&self) -> f64 {
        let total = self.minerals as f64
            + self.gases as f64
            + self.organics as f64
            + self.rare_elements as f64 * 2.0;
        total / 4.0
    }

    pub fn in_bounds(&self) -> bool {
        [self.minerals, self.gases, self.organics, self.rare_elements]
            .iter()
            .all(|v| *v <= RESOURCE_MAX)
    }
}
