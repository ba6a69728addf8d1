use crate::game::error::UniverseError;
use crate::game::naming::galaxy_name;
use crate::game::planet::Planet;
use crate::game::random::SeededRandom;
use crate::game::system::{StarSystem, StarSystemParams};
use crate::game::Lifecycle;
use crate::space::{unit_sphere, Vec3};
use std::f64::consts::{PI, TAU};

/// Systems closer than `size * MIN_SEPARATION` are rejected while retries last.
pub const MIN_SEPARATION: f64 = 0.05;
/// Placement retries per galaxy, as a multiple of the system count.
pub const RETRY_FACTOR: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GalaxyType {
    #[default]
    Spiral,
    Elliptical,
    Irregular,
}

impl GalaxyType {
    pub const ALL: [GalaxyType; 3] = [
        GalaxyType::Spiral,
        GalaxyType::Elliptical,
        GalaxyType::Irregular,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GalaxyType::Spiral => "spiral",
            GalaxyType::Elliptical => "elliptical",
            GalaxyType::Irregular => "irregular",
        }
    }

    pub fn from_label(label: &str) -> Option<GalaxyType> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clump {
    pub center: Vec3,
    pub radius: f64,
}

/// Per-galaxy shape parameters, drawn once before any system is placed.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    Spiral { arms: u32 },
    Elliptical { y_scale: f64, z_scale: f64 },
    Irregular { clumps: Vec<Clump> },
}

impl Distribution {
    fn roll(kind: GalaxyType, size: f64, rng: &mut SeededRandom) -> Self {
        match kind {
            GalaxyType::Spiral => Distribution::Spiral {
                arms: rng.next_int_inclusive(2, 5),
            },
            GalaxyType::Elliptical => Distribution::Elliptical {
                y_scale: rng.next_range(0.6, 1.0),
                z_scale: rng.next_range(0.8, 1.0),
            },
            GalaxyType::Irregular => {
                let count = rng.next_int_inclusive(2, 5);
                let clumps = (0..count)
                    .map(|_| Clump {
                        center: Vec3::new(
                            (rng.next() * 2.0 - 1.0) * 0.5 * size,
                            (rng.next() * 2.0 - 1.0) * 0.5 * size,
                            (rng.next() * 2.0 - 1.0) * 0.5 * size,
                        ),
                        radius: rng.next_range(0.1, 0.3) * size,
                    })
                    .collect();
                Distribution::Irregular { clumps }
            }
        }
    }

    /// Offset from the galaxy center for one candidate system.
    pub fn sample(&self, rng: &mut SeededRandom, size: f64) -> Vec3 {
        match self {
            Distribution::Spiral { arms } => {
                let arms = (*arms).max(1);
                let arm = rng.next_int_inclusive(0, arms - 1);
                // Three full winds stack systems along each arm.
                let mut angle = rng.next() * 3.0 * TAU + TAU * arm as f64 / arms as f64;
                angle += (rng.next() - 0.5) * 0.2;
                let mut radius = rng.next() * 0.8 * size + 0.1 * size;
                radius += (rng.next() - 0.5) * 0.05 * size;
                let y = (rng.next() - 0.5) * 0.1 * size;
                Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
            }
            Distribution::Elliptical { y_scale, z_scale } => {
                let dir = unit_sphere(rng.next(), rng.next());
                let radius = rng.next() * 0.9 * size;
                Vec3::new(
                    dir.x * radius,
                    dir.y * radius * y_scale,
                    dir.z * radius * z_scale,
                )
            }
            Distribution::Irregular { clumps } => match rng.pick(clumps) {
                Some(clump) => {
                    let clump = *clump;
                    let dir = unit_sphere(rng.next(), rng.next());
                    clump.center + dir * (rng.next() * clump.radius)
                }
                None => Vec3::ZERO,
            },
        }
    }
}

/// System seeds are `galaxy_seed * 1000 + index`, wrapping.
pub fn system_seed(galaxy_seed: u32, index: u32) -> u32 {
    galaxy_seed.wrapping_mul(1000).wrapping_add(index)
}

#[derive(Clone, Copy, Debug)]
pub struct GalaxyParams<'a> {
    pub id: &'a str,
    pub position: Vec3,
    pub size: f64,
    pub seed: u32,
    pub num_star_systems: u32,
    pub kind: GalaxyType,
}

#[derive(Clone, Debug, Default)]
pub struct Galaxy {
    pub id: String,
    pub name: String,
    pub kind: GalaxyType,
    pub position: Vec3,
    /// Euler angles; applied by the renderer, not to system positions.
    pub rotation: Vec3,
    pub size: f64,
    pub star_systems: Vec<StarSystem>,
    pub seed: u32,
    distribution: Option<Distribution>,
    rng: SeededRandom,
    lifecycle: Lifecycle,
}

impl Galaxy {
    pub fn generate(params: GalaxyParams<'_>) -> Result<Self, UniverseError> {
        let mut galaxy = Galaxy::default();
        galaxy.initialize(params)?;
        Ok(galaxy)
    }

    pub fn initialize(&mut self, params: GalaxyParams<'_>) -> Result<&mut Self, UniverseError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "galaxy already initialized");
            return Ok(self);
        }
        if !(params.size.is_finite() && params.size > 0.0) {
            return Err(UniverseError::InvalidConfig(format!(
                "galaxy size must be positive, got {}",
                params.size
            )));
        }
        if params.num_star_systems == 0 {
            return Err(UniverseError::InvalidConfig(
                "a galaxy needs at least one star system".to_string(),
            ));
        }

        self.rng = SeededRandom::new(params.seed);
        self.seed = params.seed;
        self.id = params.id.to_string();
        self.kind = params.kind;
        self.position = params.position;
        self.size = params.size;

        self.name = galaxy_name(&mut self.rng);
        self.rotation = Vec3::new(
            self.rng.next_range(-0.1 * PI, 0.1 * PI),
            self.rng.next() * TAU,
            self.rng.next_range(-0.1 * PI, 0.1 * PI),
        );
        let distribution = Distribution::roll(self.kind, self.size, &mut self.rng);

        let positions = self.place_systems(&distribution, params.num_star_systems as usize);
        self.star_systems = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let id = format!("{}-s{}", self.id, i);
                StarSystem::generate(StarSystemParams {
                    id: &id,
                    position,
                    seed: system_seed(self.seed, i as u32),
                    galaxy_id: &self.id,
                })
            })
            .collect();
        self.distribution = Some(distribution);

        tracing::info!(
            id = %self.id,
            name = %self.name,
            kind = self.kind.label(),
            systems = self.star_systems.len(),
            "galaxy generated"
        );
        self.lifecycle = Lifecycle::Initialized;
        Ok(self)
    }

    /// Rejection sampling against the minimum separation. Once the shared
    /// retry budget is spent, candidates are accepted wherever they land.
    fn place_systems(&mut self, distribution: &Distribution, count: usize) -> Vec<Vec3> {
        let min_separation = self.size * MIN_SEPARATION;
        let budget = RETRY_FACTOR * count;
        let mut retries = 0;
        let mut placed: Vec<Vec3> = Vec::with_capacity(count);

        while placed.len() < count {
            let candidate = self.position + distribution.sample(&mut self.rng, self.size);
            let crowded = placed
                .iter()
                .any(|p| p.distance(candidate) < min_separation);
            if crowded {
                // Past the budget the candidate is kept as drawn, not swapped for the closest retry.
                if retries < budget {
                    retries += 1;
                    continue;
                }
                tracing::debug!(
                    galaxy = %self.id,
                    index = placed.len(),
                    "placement retries exhausted, accepting close system"
                );
            }
            placed.push(candidate);
        }
        placed
    }

    pub(crate) fn restore(mut self) -> Self {
        self.rng = SeededRandom::new(self.seed);
        if !self.position.is_finite() {
            tracing::warn!(id = %self.id, "non-finite galaxy position, moved to origin");
            self.position = Vec3::ZERO;
        }
        if !self.rotation.is_finite() {
            self.rotation = Vec3::ZERO;
        }
        self.distribution = None;
        self.star_systems = std::mem::take(&mut self.star_systems)
            .into_iter()
            .map(StarSystem::restore)
            .collect();
        self.lifecycle = Lifecycle::Initialized;
        self
    }

    pub fn star_system_by_id(&self, id: &str) -> Option<&StarSystem> {
        self.star_systems.iter().find(|s| s.id == id)
    }

    pub fn star_system_by_id_mut(&mut self, id: &str) -> Option<&mut StarSystem> {
        self.star_systems.iter_mut().find(|s| s.id == id)
    }

    pub fn planet_by_id(&self, id: &str) -> Option<&Planet> {
        self.star_systems.iter().find_map(|s| s.planet_by_id(id))
    }

    pub fn planet_by_id_mut(&mut self, id: &str) -> Option<&mut Planet> {
        self.star_systems
            .iter_mut()
            .find_map(|s| s.planet_by_id_mut(id))
    }

    /// System that owns the planet with `planet_id`.
    pub fn system_of_planet(&self, planet_id: &str) -> Option<&StarSystem> {
        self.star_systems
            .iter()
            .find(|s| s.planet_by_id(planet_id).is_some())
    }

    /// Failing systems are logged and skipped; the rest keep moving.
    pub fn update(&mut self, dt: f64) {
        if self.lifecycle != Lifecycle::Initialized {
            tracing::warn!(id = %self.id, state = ?self.lifecycle, "update on inactive galaxy");
            return;
        }
        for system in &mut self.star_systems {
            if let Err(err) = system.update(dt) {
                tracing::warn!(galaxy = %self.id, error = %err, "skipping star system update");
            }
        }
    }

    /// Shape parameters used at generation; `None` once loaded from save data.
    pub fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn rng_mut(&mut self) -> &mut SeededRandom {
        &mut self.rng
    }

    pub fn dispose(&mut self) {
        for system in &mut self.star_systems {
            system.dispose();
        }
        self.star_systems.clear();
        self.distribution = None;
        self.lifecycle = Lifecycle::Disposed;
    }
}
