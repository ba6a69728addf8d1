use crate::game::error::UniverseError;
use crate::game::galaxy::{Galaxy, GalaxyParams, GalaxyType};
use crate::game::hooks::{ExplorationSink, Explored, MeshBuilder};
use crate::game::planet::Planet;
use crate::game::random::SeededRandom;
use crate::game::system::StarSystem;
use crate::game::Lifecycle;
use crate::space::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Generation parameters. Partial JSON is accepted; missing keys use the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniverseConfig {
    pub seed: u32,
    pub universe_size: f64,
    pub num_galaxies: u32,
    pub galaxy_size: f64,
    /// Star systems per galaxy, drawn uniformly from this half-open range.
    pub star_systems: Range<u32>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            universe_size: 10_000.0,
            num_galaxies: 5,
            galaxy_size: 1_000.0,
            star_systems: 50..100,
        }
    }
}

impl UniverseConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), UniverseError> {
        fn invalid(msg: String) -> Result<(), UniverseError> {
            Err(UniverseError::InvalidConfig(msg))
        }

        if self.num_galaxies == 0 {
            return invalid("num_galaxies must be at least 1".to_string());
        }
        if !(self.universe_size.is_finite() && self.universe_size > 0.0) {
            return invalid(format!("universe_size must be positive, got {}", self.universe_size));
        }
        if !(self.galaxy_size.is_finite() && self.galaxy_size > 0.0) {
            return invalid(format!("galaxy_size must be positive, got {}", self.galaxy_size));
        }
        if self.star_systems.start == 0 || self.star_systems.is_empty() {
            return invalid(format!(
                "star_systems range {}..{} must be non-empty and start at 1 or more",
                self.star_systems.start, self.star_systems.end
            ));
        }
        Ok(())
    }
}

fn galaxy_type_for(roll: f64) -> GalaxyType {
    if roll < 0.5 {
        GalaxyType::Spiral
    } else if roll < 0.8 {
        GalaxyType::Elliptical
    } else {
        GalaxyType::Irregular
    }
}

/// Galaxy seeds are `universe_seed + index`, wrapping.
pub fn galaxy_seed(universe_seed: u32, index: u32) -> u32 {
    universe_seed.wrapping_add(index)
}

/// A fresh universe seed from the platform entropy source.
pub fn random_seed() -> Result<u32, UniverseError> {
    let mut bytes = [0u8; 4];
    getrandom::getrandom(&mut bytes).map_err(UniverseError::Entropy)?;
    Ok(u32::from_le_bytes(bytes))
}

#[derive(Clone, Debug, Default)]
pub struct Universe {
    pub seed: u32,
    pub universe_size: f64,
    pub galaxies: Vec<Galaxy>,
    rng: SeededRandom,
    lifecycle: Lifecycle,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(config: &UniverseConfig) -> Result<Self, UniverseError> {
        let mut universe = Universe::new();
        universe.initialize(config)?;
        Ok(universe)
    }

    pub fn initialize(&mut self, config: &UniverseConfig) -> Result<&mut Self, UniverseError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            tracing::warn!(seed = self.seed, state = ?self.lifecycle, "universe already initialized");
            return Ok(self);
        }
        config.validate()?;

        self.seed = config.seed;
        self.universe_size = config.universe_size;
        self.rng = SeededRandom::new(config.seed);

        let size = config.universe_size;
        let span = (config.star_systems.end - config.star_systems.start) as f64;
        let mut galaxies = Vec::with_capacity(config.num_galaxies as usize);
        for i in 0..config.num_galaxies {
            // Flattened on y to keep galaxies near a common plane.
            let position = Vec3::new(
                (self.rng.next() - 0.5) * size,
                (self.rng.next() - 0.5) * size * 0.2,
                (self.rng.next() - 0.5) * size,
            );
            let num_star_systems = config.star_systems.start + (self.rng.next() * span).floor() as u32;
            let kind = galaxy_type_for(self.rng.next());
            let id = format!("galaxy-{}", i);

            galaxies.push(Galaxy::generate(GalaxyParams {
                id: &id,
                position,
                size: config.galaxy_size,
                seed: galaxy_seed(self.seed, i),
                num_star_systems,
                kind,
            })?);
        }
        self.galaxies = galaxies;

        tracing::info!(
            seed = self.seed,
            galaxies = self.galaxies.len(),
            systems = self.star_systems().count(),
            "universe generated"
        );
        self.lifecycle = Lifecycle::Initialized;
        Ok(self)
    }

    /// Wraps galaxies that were already restored from save data.
    pub(crate) fn from_parts(seed: u32, universe_size: f64, galaxies: Vec<Galaxy>) -> Self {
        Self {
            seed,
            universe_size,
            galaxies,
            rng: SeededRandom::new(seed),
            lifecycle: Lifecycle::Initialized,
        }
    }

    /// Advances every galaxy by `dt` hours. Never fails; broken children are skipped.
    pub fn update(&mut self, dt: f64) {
        if self.lifecycle != Lifecycle::Initialized {
            tracing::warn!(state = ?self.lifecycle, "update on inactive universe");
            return;
        }
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!(dt, "ignoring invalid time step");
            return;
        }
        for galaxy in &mut self.galaxies {
            galaxy.update(dt);
        }
    }

    pub fn galaxy_by_id(&self, id: &str) -> Option<&Galaxy> {
        self.galaxies.iter().find(|g| g.id == id)
    }

    pub fn star_system_by_id(&self, id: &str) -> Option<&StarSystem> {
        self.galaxies.iter().find_map(|g| g.star_system_by_id(id))
    }

    pub fn star_system_by_id_mut(&mut self, id: &str) -> Option<&mut StarSystem> {
        self.galaxies
            .iter_mut()
            .find_map(|g| g.star_system_by_id_mut(id))
    }

    pub fn planet_by_id(&self, id: &str) -> Option<&Planet> {
        self.galaxies.iter().find_map(|g| g.planet_by_id(id))
    }

    pub fn planet_by_id_mut(&mut self, id: &str) -> Option<&mut Planet> {
        self.galaxies.iter_mut().find_map(|g| g.planet_by_id_mut(id))
    }

    pub fn star_systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.galaxies.iter().flat_map(|g| g.star_systems.iter())
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.star_systems().flat_map(|s| s.planets.iter())
    }

    /// Closest system to `position` and its distance, for travel targeting.
    pub fn nearest_star_system(&self, position: Vec3) -> Option<(&StarSystem, f64)> {
        self.star_systems()
            .map(|s| (s, s.position.distance(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn planet_world_position(&self, planet_id: &str) -> Option<Vec3> {
        self.galaxies.iter().find_map(|g| {
            g.system_of_planet(planet_id)
                .and_then(|s| s.planet_world_position(planet_id))
        })
    }

    /// Marks a planet explored. Returns `None` if no such planet exists,
    /// otherwise whether this call flipped it; the sink only hears about flips.
    pub fn explore_planet(&mut self, id: &str, sink: &mut impl ExplorationSink) -> Option<bool> {
        let planet = self.planet_by_id_mut(id)?;
        let changed = planet.mark_explored();
        if changed {
            sink.on_explored(Explored::Planet(planet));
        }
        Some(changed)
    }

    pub fn explore_star_system(
        &mut self,
        id: &str,
        sink: &mut impl ExplorationSink,
    ) -> Option<bool> {
        let system = self.star_system_by_id_mut(id)?;
        let changed = system.mark_explored();
        if changed {
            sink.on_explored(Explored::StarSystem(system));
        }
        Some(changed)
    }

    /// Hands every entity to the builder, parents before children.
    pub fn build_visuals<B: MeshBuilder>(&self, builder: &mut B) -> Vec<B::Mesh> {
        let mut meshes = Vec::new();
        for galaxy in &self.galaxies {
            meshes.push(builder.galaxy(galaxy));
            for system in &galaxy.star_systems {
                meshes.push(builder.star_system(system));
                for planet in &system.planets {
                    meshes.push(builder.planet(planet, planet.world_position(system.position)));
                }
            }
        }
        meshes
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn rng_mut(&mut self) -> &mut SeededRandom {
        &mut self.rng
    }

    pub fn dispose(&mut self) {
        for galaxy in &mut self.galaxies {
            galaxy.dispose();
        }
        self.galaxies.clear();
        self.lifecycle = Lifecycle::Disposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::system::StarType;

    fn small_config(seed: u32) -> UniverseConfig {
        UniverseConfig {
            seed,
            universe_size: 20_000.0,
            num_galaxies: 3,
            galaxy_size: 800.0,
            star_systems: 8..16,
        }
    }

    #[test]
    fn default_config_matches_documented_ranges() {
        let config = UniverseConfig::default();
        assert_eq!(config.star_systems, 50..100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config: UniverseConfig = serde_json::from_str(r#"{"seed": 9, "numGalaxies": 2}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.num_galaxies, 2);
        assert_eq!(config.galaxy_size, 1_000.0);
        assert_eq!(config.star_systems, 50..100);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = [
            UniverseConfig {
                num_galaxies: 0,
                ..small_config(1)
            },
            UniverseConfig {
                universe_size: f64::INFINITY,
                ..small_config(1)
            },
            UniverseConfig {
                galaxy_size: -4.0,
                ..small_config(1)
            },
            UniverseConfig {
                star_systems: 10..10,
                ..small_config(1)
            },
            UniverseConfig {
                star_systems: 0..10,
                ..small_config(1)
            },
        ];
        for config in bad {
            let err = Universe::generate(&config).unwrap_err();
            assert!(matches!(err, UniverseError::InvalidConfig(_)), "{config:?}");
        }
    }

    #[test]
    fn galaxies_sit_in_a_flattened_box() {
        let config = small_config(17);
        let universe = Universe::generate(&config).unwrap();
        assert_eq!(universe.galaxies.len(), 3);
        for (i, galaxy) in universe.galaxies.iter().enumerate() {
            let half = config.universe_size / 2.0;
            assert!(galaxy.position.x.abs() <= half);
            assert!(galaxy.position.y.abs() <= half * 0.2);
            assert!(galaxy.position.z.abs() <= half);
            assert_eq!(galaxy.seed, galaxy_seed(17, i as u32));
            assert_eq!(galaxy.id, format!("galaxy-{}", i));
            assert!(config.star_systems.contains(&(galaxy.star_systems.len() as u32)));
        }
    }

    #[test]
    fn configured_galaxy_type_thresholds() {
        assert_eq!(galaxy_type_for(0.1), GalaxyType::Spiral);
        assert_eq!(galaxy_type_for(0.5), GalaxyType::Elliptical);
        assert_eq!(galaxy_type_for(0.79), GalaxyType::Elliptical);
        assert_eq!(galaxy_type_for(0.8), GalaxyType::Irregular);
    }

    #[test]
    fn lookups_cascade_through_the_tree() {
        let universe = Universe::generate(&small_config(23)).unwrap();
        let galaxy = &universe.galaxies[2];
        let system = &galaxy.star_systems[3];
        let planet = system.planets.last().unwrap();

        assert_eq!(universe.galaxy_by_id(&galaxy.id).unwrap().seed, galaxy.seed);
        assert_eq!(universe.star_system_by_id(&system.id).unwrap().name, system.name);
        assert_eq!(universe.planet_by_id(&planet.id).unwrap().name, planet.name);
        assert!(universe.planet_by_id("galaxy-7-s0-p0").is_none());
        assert_eq!(
            universe.planet_world_position(&planet.id),
            Some(planet.world_position(system.position))
        );
    }

    #[test]
    fn ids_are_unique_per_level() {
        let universe = Universe::generate(&small_config(4)).unwrap();
        let mut systems = std::collections::HashSet::new();
        let mut planets = std::collections::HashSet::new();
        for system in universe.star_systems() {
            assert!(systems.insert(system.id.clone()));
        }
        for planet in universe.planets() {
            assert!(planets.insert(planet.id.clone()));
        }
    }

    #[test]
    fn nearest_system_is_minimal() {
        let universe = Universe::generate(&small_config(12)).unwrap();
        let target = universe.galaxies[1].star_systems[2].position + Vec3::new(0.5, 0.0, 0.0);
        let (nearest, dist) = universe.nearest_star_system(target).unwrap();
        for system in universe.star_systems() {
            assert!(system.position.distance(target) >= dist);
        }
        assert!(dist <= 0.5 + 1e-9);
        assert!(nearest.id.starts_with("galaxy-1-"));
    }

    #[test]
    fn exploring_notifies_once() {
        let mut universe = Universe::generate(&small_config(8)).unwrap();
        let planet_id = universe.planets().next().unwrap().id.clone();
        let system_id = universe.star_systems().next().unwrap().id.clone();
        let mut sink: Vec<String> = Vec::new();

        assert_eq!(universe.explore_planet(&planet_id, &mut sink), Some(true));
        assert_eq!(universe.explore_planet(&planet_id, &mut sink), Some(false));
        assert_eq!(universe.explore_planet("missing", &mut sink), None);
        assert_eq!(universe.explore_star_system(&system_id, &mut sink), Some(true));
        assert_eq!(universe.explore_star_system(&system_id, &mut sink), Some(false));

        assert_eq!(sink, vec![planet_id.clone(), system_id]);
        assert!(universe.planet_by_id(&planet_id).unwrap().explored);
    }

    struct CountingBuilder {
        galaxies: usize,
        systems: usize,
        planets: usize,
    }

    impl MeshBuilder for CountingBuilder {
        type Mesh = String;

        fn galaxy(&mut self, galaxy: &Galaxy) -> String {
            self.galaxies += 1;
            galaxy.id.clone()
        }

        fn star_system(&mut self, system: &StarSystem) -> String {
            self.systems += 1;
            system.id.clone()
        }

        fn planet(&mut self, planet: &Planet, _world_position: Vec3) -> String {
            self.planets += 1;
            planet.id.clone()
        }
    }

    #[test]
    fn visuals_walk_the_whole_tree_in_order() {
        let universe = Universe::generate(&small_config(2)).unwrap();
        let mut builder = CountingBuilder {
            galaxies: 0,
            systems: 0,
            planets: 0,
        };
        let meshes = universe.build_visuals(&mut builder);
        assert_eq!(builder.galaxies, universe.galaxies.len());
        assert_eq!(builder.systems, universe.star_systems().count());
        assert_eq!(builder.planets, universe.planets().count());
        assert_eq!(meshes.len(), builder.galaxies + builder.systems + builder.planets);
        assert_eq!(meshes[0], "galaxy-0");
        assert_eq!(meshes[1], "galaxy-0-s0");
        assert_eq!(meshes[2], "galaxy-0-s0-p0");
    }

    #[test]
    fn invalid_time_steps_are_ignored() {
        let mut universe = Universe::generate(&small_config(6)).unwrap();
        let before: Vec<f64> = universe.planets().map(|p| p.orbit_angle).collect();
        universe.update(f64::NAN);
        universe.update(-1.0);
        let after: Vec<f64> = universe.planets().map(|p| p.orbit_angle).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn lifecycle_transitions() {
        let mut universe = Universe::new();
        assert_eq!(universe.lifecycle(), Lifecycle::Uninitialized);
        universe.update(1.0);

        universe.initialize(&small_config(3)).unwrap();
        assert_eq!(universe.lifecycle(), Lifecycle::Initialized);
        let names: Vec<String> = universe.galaxies.iter().map(|g| g.name.clone()).collect();

        universe.initialize(&small_config(300)).unwrap();
        assert_eq!(universe.seed, 3);
        let again: Vec<String> = universe.galaxies.iter().map(|g| g.name.clone()).collect();
        assert_eq!(names, again);

        universe.dispose();
        assert_eq!(universe.lifecycle(), Lifecycle::Disposed);
        assert!(universe.galaxies.is_empty());
        assert!(universe.planet_by_id("galaxy-0-s0-p0").is_none());
    }

    #[test]
    fn star_types_are_all_reachable() {
        let universe = Universe::generate(&UniverseConfig::with_seed(77)).unwrap();
        for kind in StarType::ALL {
            assert!(
                universe.star_systems().any(|s| s.star_type == kind),
                "no {:?} star generated",
                kind
            );
        }
    }

    #[test]
    fn random_seed_draws_from_entropy() {
        let seeds: Vec<u32> = (0..4).map(|_| random_seed().unwrap()).collect();
        assert!(seeds.windows(2).any(|w| w[0] != w[1]));
    }
}
