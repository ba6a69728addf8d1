use crate::game::error::SimulationError;
use crate::game::naming::system_name;
use crate::game::planet::{Planet, PlanetParams};
use crate::game::random::SeededRandom;
use crate::game::resources::{ResourceShift, Resources};
use crate::game::Lifecycle;
use crate::space::Vec3;
use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StarType {
    Blue,
    White,
    #[default]
    Yellow,
    Orange,
    Red,
    Binary,
}

/// Weighted roll, in threshold order.
const STAR_WEIGHTS: &[(StarType, f64)] = &[
    (StarType::Blue, 0.10),
    (StarType::White, 0.15),
    (StarType::Yellow, 0.35),
    (StarType::Orange, 0.25),
    (StarType::Red, 0.10),
    (StarType::Binary, 0.05),
];

impl StarType {
    pub const ALL: [StarType; 6] = [
        StarType::Blue,
        StarType::White,
        StarType::Yellow,
        StarType::Orange,
        StarType::Red,
        StarType::Binary,
    ];

    pub fn roll(roll: f64) -> StarType {
        let mut acc = 0.0;
        for (kind, weight) in STAR_WEIGHTS {
            acc += weight;
            if roll < acc {
                return *kind;
            }
        }
        StarType::Binary
    }

    pub fn label(self) -> &'static str {
        match self {
            StarType::Blue => "blue",
            StarType::White => "white",
            StarType::Yellow => "yellow",
            StarType::Orange => "orange",
            StarType::Red => "red",
            StarType::Binary => "binary",
        }
    }

    pub fn from_label(label: &str) -> Option<StarType> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn size_range(self) -> (f64, f64) {
        match self {
            StarType::Blue => (1.5, 2.5),
            StarType::White => (1.0, 1.5),
            StarType::Yellow => (0.8, 1.2),
            StarType::Orange => (0.6, 0.9),
            StarType::Red => (0.3, 0.6),
            StarType::Binary => (1.0, 2.0),
        }
    }

    pub fn planet_count(self) -> RangeInclusive<u32> {
        match self {
            StarType::Blue => 1..=4,
            StarType::White => 2..=5,
            StarType::Yellow => 3..=7,
            StarType::Orange => 2..=6,
            StarType::Red => 1..=4,
            StarType::Binary => 2..=8,
        }
    }

    pub fn resource_shift(self) -> ResourceShift {
        match self {
            StarType::Blue => ResourceShift::new(2, 0, -2, 3),
            StarType::White => ResourceShift::new(1, 0, 0, 1),
            StarType::Yellow => ResourceShift::new(0, 0, 2, 0),
            StarType::Orange => ResourceShift::new(1, 1, 0, 0),
            StarType::Red => ResourceShift::new(2, 0, -1, -1),
            StarType::Binary => ResourceShift::new(0, 3, 0, 2),
        }
    }
}

pub const FIRST_ORBIT: f64 = 2.0;
pub const ORBIT_SPACING: f64 = 1.5;
pub const HABITABLE_THRESHOLD: u8 = 5;

/// Planet seeds are `system_seed * 100 + orbit_index`, wrapping.
pub fn planet_seed(system_seed: u32, orbit_index: u32) -> u32 {
    system_seed.wrapping_mul(100).wrapping_add(orbit_index)
}

#[derive(Clone, Copy, Debug)]
pub struct StarSystemParams<'a> {
    pub id: &'a str,
    pub position: Vec3,
    pub seed: u32,
    pub galaxy_id: &'a str,
}

#[derive(Clone, Debug, Default)]
pub struct StarSystem {
    pub id: String,
    pub name: String,
    pub position: Vec3,
    /// Lookup only; the galaxy owns the system, not the other way round.
    pub galaxy_id: String,
    pub star_type: StarType,
    pub star_size: f64,
    pub planets: Vec<Planet>,
    pub resources: Resources,
    pub explored: bool,
    pub hostile_level: u8,
    pub seed: u32,
    rng: SeededRandom,
    lifecycle: Lifecycle,
}

impl StarSystem {
    pub fn generate(params: StarSystemParams<'_>) -> Self {
        let mut system = StarSystem::default();
        system.initialize(params);
        system
    }

    pub fn initialize(&mut self, params: StarSystemParams<'_>) -> &mut Self {
        if self.lifecycle != Lifecycle::Uninitialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "star system already initialized");
            return self;
        }

        self.rng = SeededRandom::new(params.seed);
        self.seed = params.seed;
        self.id = params.id.to_string();
        self.galaxy_id = params.galaxy_id.to_string();
        self.position = params.position;

        self.star_type = StarType::roll(self.rng.next());
        let (min_size, max_size) = self.star_type.size_range();
        self.star_size = self.rng.next_range(min_size, max_size);
        self.name = system_name(&mut self.rng);

        let counts = self.star_type.planet_count();
        let planet_count = self.rng.next_int_inclusive(*counts.start(), *counts.end());
        self.resources = Resources::roll(&mut self.rng).shifted(self.star_type.resource_shift());
        self.hostile_level = self.rng.next_int_inclusive(0, 10) as u8;
        self.explored = false;

        self.planets = (0..planet_count)
            .map(|i| {
                Planet::generate(PlanetParams {
                    orbital_distance: FIRST_ORBIT + i as f64 * ORBIT_SPACING,
                    orbit_index: i,
                    system_id: &self.id,
                    star_type: self.star_type,
                    seed: planet_seed(self.seed, i),
                })
            })
            .collect();
        self.sort_planets();

        self.lifecycle = Lifecycle::Initialized;
        self
    }

    fn sort_planets(&mut self) {
        self.planets
            .sort_by(|a, b| a.orbital_distance.total_cmp(&b.orbital_distance));
    }

    pub(crate) fn restore(mut self) -> Self {
        self.rng = SeededRandom::new(self.seed);
        if !self.position.is_finite() {
            tracing::warn!(id = %self.id, "non-finite system position, moved to origin");
            self.position = Vec3::ZERO;
        }
        self.resources = self.resources.clamped();
        self.hostile_level = self.hostile_level.min(10);
        self.planets = std::mem::take(&mut self.planets)
            .into_iter()
            .map(Planet::restore)
            .collect();
        self.sort_planets();
        self.lifecycle = Lifecycle::Initialized;
        self
    }

    pub fn planet_by_id(&self, id: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    pub fn planet_by_id_mut(&mut self, id: &str) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|p| p.id == id)
    }

    /// Updates every planet; a failing planet is logged and skipped.
    pub fn update(&mut self, dt: f64) -> Result<(), SimulationError> {
        if self.lifecycle != Lifecycle::Initialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "update on inactive star system");
            return Ok(());
        }

        let mut failed = 0;
        for planet in &mut self.planets {
            if let Err(err) = planet.update(dt) {
                failed += 1;
                tracing::warn!(system = %self.id, error = %err, "skipping planet update");
            }
        }

        if failed > 0 && failed == self.planets.len() {
            return Err(SimulationError::SystemStalled {
                system_id: self.id.clone(),
                failed,
            });
        }
        Ok(())
    }

    pub fn planet_world_position(&self, id: &str) -> Option<Vec3> {
        self.planet_by_id(id)
            .map(|planet| planet.world_position(self.position))
    }

    pub fn habitable_planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets
            .iter()
            .filter(|p| p.habitability >= HABITABLE_THRESHOLD)
    }

    /// `(minerals + gases + organics + 2 * rare_elements) / 4`.
    pub fn resource_richness(&self) -> f64 {
        self.resources.richness()
    }

    pub fn mark_explored(&mut self) -> bool {
        let changed = !self.explored;
        self.explored = true;
        changed
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn rng_mut(&mut self) -> &mut SeededRandom {
        &mut self.rng
    }

    pub fn dispose(&mut self) {
        for planet in &mut self.planets {
            planet.dispose();
        }
        self.planets.clear();
        self.lifecycle = Lifecycle::Disposed;
    }
}
