use crate::game::error::SimulationError;
use crate::game::naming::{landmark_name, planet_name};
use crate::game::random::SeededRandom;
use crate::game::resources::{ResourceShift, Resources};
use crate::game::system::{StarType, FIRST_ORBIT, ORBIT_SPACING};
use crate::game::Lifecycle;
use crate::space::{wrap_angle, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlanetType {
    #[default]
    Rocky,
    Terrestrial,
    Oceanic,
    GasGiant,
    Ice,
    Desert,
    Lava,
    Barren,
}

impl PlanetType {
    pub const ALL: [PlanetType; 8] = [
        PlanetType::Rocky,
        PlanetType::Terrestrial,
        PlanetType::Oceanic,
        PlanetType::GasGiant,
        PlanetType::Ice,
        PlanetType::Desert,
        PlanetType::Lava,
        PlanetType::Barren,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlanetType::Rocky => "rocky",
            PlanetType::Terrestrial => "terrestrial",
            PlanetType::Oceanic => "oceanic",
            PlanetType::GasGiant => "gas giant",
            PlanetType::Ice => "ice",
            PlanetType::Desert => "desert",
            PlanetType::Lava => "lava",
            PlanetType::Barren => "barren",
        }
    }

    pub fn from_label(label: &str) -> Option<PlanetType> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    pub fn size_range(self) -> (f64, f64) {
        match self {
            PlanetType::Rocky => (0.3, 1.2),
            PlanetType::Terrestrial => (0.5, 2.0),
            PlanetType::Oceanic => (0.8, 2.5),
            PlanetType::GasGiant => (5.0, 12.0),
            PlanetType::Ice => (0.4, 3.0),
            PlanetType::Desert => (0.4, 1.8),
            PlanetType::Lava => (0.3, 1.5),
            PlanetType::Barren => (0.1, 1.0),
        }
    }

    /// Hours per revolution.
    pub fn rotation_range(self) -> (f64, f64) {
        match self {
            PlanetType::Rocky => (10.0, 50.0),
            PlanetType::Terrestrial => (18.0, 36.0),
            PlanetType::Oceanic => (15.0, 40.0),
            PlanetType::GasGiant => (8.0, 20.0),
            PlanetType::Ice => (20.0, 80.0),
            PlanetType::Desert => (20.0, 60.0),
            PlanetType::Lava => (5.0, 30.0),
            PlanetType::Barren => (30.0, 120.0),
        }
    }

    pub fn resource_shift(self) -> ResourceShift {
        match self {
            PlanetType::Rocky => ResourceShift::new(3, 0, -3, 1),
            PlanetType::Terrestrial => ResourceShift::new(1, 0, 3, 0),
            PlanetType::Oceanic => ResourceShift::new(-2, 1, 4, 0),
            PlanetType::GasGiant => ResourceShift::new(-5, 5, -5, 1),
            PlanetType::Ice => ResourceShift::new(0, 2, -3, 1),
            PlanetType::Desert => ResourceShift::new(2, -1, -2, 2),
            PlanetType::Lava => ResourceShift::new(4, 2, -5, 3),
            PlanetType::Barren => ResourceShift::new(2, -3, -5, 1),
        }
    }

    pub fn has_surface(self) -> bool {
        !matches!(self, PlanetType::GasGiant | PlanetType::Lava)
    }
}

/// Cumulative-weight rows keyed by orbit tier.
const INNER_TYPES: &[(PlanetType, f64)] = &[
    (PlanetType::Lava, 0.25),
    (PlanetType::Rocky, 0.30),
    (PlanetType::Desert, 0.20),
    (PlanetType::Barren, 0.15),
    (PlanetType::Terrestrial, 0.10),
];
const HABITABLE_TYPES: &[(PlanetType, f64)] = &[
    (PlanetType::Terrestrial, 0.30),
    (PlanetType::Oceanic, 0.20),
    (PlanetType::Rocky, 0.15),
    (PlanetType::Desert, 0.15),
    (PlanetType::Barren, 0.10),
    (PlanetType::GasGiant, 0.10),
];
const YELLOW_HABITABLE_TYPES: &[(PlanetType, f64)] = &[
    (PlanetType::Terrestrial, 0.40),
    (PlanetType::Oceanic, 0.30),
    (PlanetType::Rocky, 0.10),
    (PlanetType::Desert, 0.10),
    (PlanetType::Barren, 0.05),
    (PlanetType::GasGiant, 0.05),
];
const OUTER_TYPES: &[(PlanetType, f64)] = &[
    (PlanetType::GasGiant, 0.40),
    (PlanetType::Ice, 0.30),
    (PlanetType::Barren, 0.15),
    (PlanetType::Rocky, 0.15),
];

fn type_table(orbit_index: u32, star_type: StarType) -> &'static [(PlanetType, f64)] {
    match orbit_index {
        0..=2 => INNER_TYPES,
        3..=4 if star_type == StarType::Yellow => YELLOW_HABITABLE_TYPES,
        3..=4 => HABITABLE_TYPES,
        _ => OUTER_TYPES,
    }
}

fn roll_type(roll: f64, table: &[(PlanetType, f64)]) -> PlanetType {
    let mut acc = 0.0;
    for (kind, weight) in table {
        acc += weight;
        if roll < acc {
            return *kind;
        }
    }
    // Float accumulation can leave the sum a hair under 1.0.
    table.last().map(|(kind, _)| *kind).unwrap_or_default()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmark {
    pub name: String,
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Inputs handed down by the owning star system.
#[derive(Clone, Copy, Debug)]
pub struct PlanetParams<'a> {
    pub orbital_distance: f64,
    pub orbit_index: u32,
    pub system_id: &'a str,
    pub star_type: StarType,
    pub seed: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Planet {
    pub id: String,
    pub name: String,
    pub system_id: String,
    pub kind: PlanetType,
    pub size: f64,
    pub orbital_distance: f64,
    /// Days per orbit.
    pub orbital_period: f64,
    /// Hours per revolution.
    pub rotation_period: f64,
    pub orbit_angle: f64,
    pub orbit_incline: f64,
    pub orbit_index: u32,
    pub rotation_angle: f64,
    pub has_atmosphere: bool,
    pub has_water: bool,
    pub habitability: u8,
    pub danger_level: u8,
    pub resources: Resources,
    pub explored: bool,
    pub can_land: bool,
    pub landmarks: Vec<Landmark>,
    pub seed: u32,
    rng: SeededRandom,
    lifecycle: Lifecycle,
}

impl Planet {
    pub fn generate(params: PlanetParams<'_>) -> Self {
        let mut planet = Planet::default();
        planet.initialize(params);
        planet
    }

    pub fn initialize(&mut self, params: PlanetParams<'_>) -> &mut Self {
        if self.lifecycle != Lifecycle::Uninitialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "planet already initialized");
            return self;
        }

        self.rng = SeededRandom::new(params.seed);
        self.seed = params.seed;
        self.id = format!("{}-p{}", params.system_id, params.orbit_index);
        self.system_id = params.system_id.to_string();
        self.orbit_index = params.orbit_index;
        self.orbital_distance = params.orbital_distance;

        let roll = self.rng.next();
        self.kind = roll_type(roll, type_table(params.orbit_index, params.star_type));

        let (min_size, max_size) = self.kind.size_range();
        self.size = self.rng.next_range(min_size, max_size);
        self.name = planet_name(&mut self.rng, params.orbit_index);

        let d = params.orbital_distance;
        self.orbital_period = (d * d * (20.0 + self.rng.next() * 10.0)).floor();
        let (min_rot, max_rot) = self.kind.rotation_range();
        self.rotation_period = self.rng.next_range(min_rot, max_rot);
        self.orbit_angle = wrap_angle(self.rng.next() * TAU);
        self.orbit_incline = self.rng.next_range(-0.1 * PI, 0.1 * PI);
        self.rotation_angle = 0.0;

        self.roll_surface();

        self.resources = Resources::roll(&mut self.rng).shifted(self.kind.resource_shift());
        self.explored = false;
        self.landmarks = if self.can_land {
            self.roll_landmarks()
        } else {
            Vec::new()
        };

        self.lifecycle = Lifecycle::Initialized;
        self
    }

    fn roll_surface(&mut self) {
        let rng = &mut self.rng;
        self.has_atmosphere = match self.kind {
            PlanetType::Terrestrial | PlanetType::Oceanic | PlanetType::GasGiant => true,
            PlanetType::Lava => rng.next_bool(0.6),
            PlanetType::Desert => rng.next_bool(0.5),
            PlanetType::Ice => rng.next_bool(0.3),
            PlanetType::Rocky => rng.next_bool(0.2),
            PlanetType::Barren => false,
        };
        self.has_water = match self.kind {
            PlanetType::Oceanic => true,
            PlanetType::Terrestrial => rng.next_bool(0.8),
            PlanetType::Ice => rng.next_bool(0.7),
            PlanetType::Desert => rng.next_bool(0.1),
            _ => false,
        };

        let habitable = self.has_atmosphere && self.has_water;
        self.habitability = match self.kind {
            PlanetType::Terrestrial if habitable => rng.next_int_inclusive(5, 10),
            PlanetType::Oceanic if habitable => rng.next_int_inclusive(4, 8),
            PlanetType::Desert if self.has_atmosphere => rng.next_int_inclusive(2, 5),
            _ => rng.next_int_inclusive(0, 2),
        } as u8;

        self.danger_level = rng.next_int_inclusive(1, 10) as u8;
        self.can_land = self.kind.has_surface() && self.danger_level < 9;
    }

    fn roll_landmarks(&mut self) -> Vec<Landmark> {
        let count = self.rng.next_int_inclusive(0, 3);
        (0..count)
            .map(|_| {
                let (name, kind) = landmark_name(&mut self.rng);
                Landmark {
                    name,
                    kind: kind.to_string(),
                    latitude: self.rng.next_range(-90.0, 90.0),
                    longitude: self.rng.next_range(-180.0, 180.0),
                }
            })
            .collect()
    }

    /// Rebuilds an initialized planet from stored fields with a fresh generator.
    pub(crate) fn restore(mut self) -> Self {
        self.rng = SeededRandom::new(self.seed);
        self.repair_orbit();
        self.resources = self.resources.clamped();
        self.habitability = self.habitability.min(10);
        self.danger_level = self.danger_level.min(10);
        self.orbit_angle = wrap_angle(self.orbit_angle);
        self.rotation_angle = wrap_angle(self.rotation_angle);
        self.lifecycle = Lifecycle::Initialized;
        self
    }

    /// Orbits that could never advance are rebuilt from the orbit slot and type.
    fn repair_orbit(&mut self) {
        if !(self.orbital_distance.is_finite() && self.orbital_distance > 0.0) {
            self.orbital_distance = FIRST_ORBIT + self.orbit_index as f64 * ORBIT_SPACING;
        }
        if !(self.orbital_period.is_finite() && self.orbital_period > 0.0) {
            let d = self.orbital_distance;
            self.orbital_period = (d * d * 25.0).floor().max(1.0);
        }
        if !(self.rotation_period.is_finite() && self.rotation_period > 0.0) {
            let (min_rot, max_rot) = self.kind.rotation_range();
            self.rotation_period = (min_rot + max_rot) / 2.0;
        }
    }

    /// Advances orbit and spin by `dt` hours.
    pub fn update(&mut self, dt: f64) -> Result<(), SimulationError> {
        if self.lifecycle != Lifecycle::Initialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "update on inactive planet");
            return Ok(());
        }
        if !(self.orbital_period.is_finite() && self.orbital_period > 0.0) {
            return Err(SimulationError::DegenerateOrbit {
                planet_id: self.id.clone(),
                period: self.orbital_period,
            });
        }
        if !(self.rotation_period.is_finite() && self.rotation_period > 0.0) {
            return Err(SimulationError::DegenerateRotation {
                planet_id: self.id.clone(),
                period: self.rotation_period,
            });
        }

        let orbit_speed = TAU / (self.orbital_period * 24.0);
        self.orbit_angle = wrap_angle(self.orbit_angle + orbit_speed * dt);
        self.rotation_angle = wrap_angle(self.rotation_angle + TAU / self.rotation_period * dt);
        Ok(())
    }

    pub fn world_position(&self, center: Vec3) -> Vec3 {
        let (sin, cos) = self.orbit_angle.sin_cos();
        let d = self.orbital_distance;
        center + Vec3::new(cos * d, sin * self.orbit_incline.sin() * d, sin * d)
    }

    /// Returns true only on the unexplored -> explored transition.
    pub fn mark_explored(&mut self) -> bool {
        let changed = !self.explored;
        self.explored = true;
        changed
    }

    pub fn resource_richness(&self) -> f64 {
        self.resources.richness()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The planet's own stream, reserved for procedural extensions after generation.
    pub fn rng_mut(&mut self) -> &mut SeededRandom {
        &mut self.rng
    }

    pub fn dispose(&mut self) {
        self.landmarks.clear();
        self.lifecycle = Lifecycle::Disposed;
    }
}
