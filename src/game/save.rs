//! Plain-data save format. Every level is a serde struct with camelCase keys;
//! missing keys fall back to defaults and unknown type labels to the default
//! variant, so partial or older saves still load.

use crate::game::error::UniverseError;
use crate::game::galaxy::{Galaxy, GalaxyType};
use crate::game::planet::{Landmark, Planet, PlanetType};
use crate::game::resources::Resources;
use crate::game::system::{StarSystem, StarType};
use crate::game::universe::Universe;
use crate::space::Vec3;
use serde::{Deserialize, Serialize};

/// Numeric readers that take any JSON number and fold it into the field's
/// range, so one out-of-range value never rejects a whole save.
pub(crate) mod lenient {
    use crate::game::resources::RESOURCE_MAX;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    enum Number {
        Int(i128),
        Float(f64),
    }

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = Number;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
            Ok(Number::Int(v.into()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
            Ok(Number::Int(v.into()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
            Ok(Number::Float(v))
        }
    }

    /// Scores clamp into `[0, RESOURCE_MAX]`; fractions round.
    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let max = RESOURCE_MAX as i128;
        Ok(match deserializer.deserialize_any(NumberVisitor)? {
            Number::Int(v) => v.clamp(0, max) as u8,
            Number::Float(v) => (v.round() as i128).clamp(0, max) as u8,
        })
    }

    /// Seeds wrap into `u32`, matching the wrapping seed derivation.
    pub fn seed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(match deserializer.deserialize_any(NumberVisitor)? {
            Number::Int(v) => v as u32,
            Number::Float(v) => (v.trunc() as i128) as u32,
        })
    }

    /// Indices saturate into `u32`.
    pub fn index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(match deserializer.deserialize_any(NumberVisitor)? {
            Number::Int(v) => v.clamp(0, u32::MAX.into()) as u32,
            Number::Float(v) => v.round() as u32,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniverseData {
    #[serde(deserialize_with = "lenient::seed")]
    pub seed: u32,
    pub universe_size: f64,
    pub galaxies: Vec<GalaxyData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalaxyData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub size: f64,
    #[serde(deserialize_with = "lenient::seed")]
    pub seed: u32,
    pub star_systems: Vec<StarSystemData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StarSystemData {
    pub id: String,
    pub name: String,
    pub galaxy_id: String,
    pub position: Vec3,
    pub star_type: String,
    pub star_size: f64,
    pub resources: Resources,
    pub explored: bool,
    #[serde(deserialize_with = "lenient::score")]
    pub hostile_level: u8,
    #[serde(deserialize_with = "lenient::seed")]
    pub seed: u32,
    pub planets: Vec<PlanetData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanetData {
    pub id: String,
    pub name: String,
    pub system_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: f64,
    pub orbital_distance: f64,
    pub orbital_period: f64,
    pub rotation_period: f64,
    pub orbit_angle: f64,
    pub orbit_incline: f64,
    #[serde(deserialize_with = "lenient::index")]
    pub orbit_index: u32,
    pub rotation_angle: f64,
    pub has_atmosphere: bool,
    pub has_water: bool,
    #[serde(deserialize_with = "lenient::score")]
    pub habitability: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub danger_level: u8,
    pub resources: Resources,
    pub explored: bool,
    pub can_land: bool,
    pub landmarks: Vec<Landmark>,
    #[serde(deserialize_with = "lenient::seed")]
    pub seed: u32,
}

impl From<&Planet> for PlanetData {
    fn from(p: &Planet) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            system_id: p.system_id.clone(),
            kind: p.kind.label().to_string(),
            size: p.size,
            orbital_distance: p.orbital_distance,
            orbital_period: p.orbital_period,
            rotation_period: p.rotation_period,
            orbit_angle: p.orbit_angle,
            orbit_incline: p.orbit_incline,
            orbit_index: p.orbit_index,
            rotation_angle: p.rotation_angle,
            has_atmosphere: p.has_atmosphere,
            has_water: p.has_water,
            habitability: p.habitability,
            danger_level: p.danger_level,
            resources: p.resources,
            explored: p.explored,
            can_land: p.can_land,
            landmarks: p.landmarks.clone(),
            seed: p.seed,
        }
    }
}

impl From<PlanetData> for Planet {
    fn from(data: PlanetData) -> Self {
        let mut p = Planet::default();
        p.id = data.id;
        p.name = data.name;
        p.system_id = data.system_id;
        p.kind = PlanetType::from_label(&data.kind).unwrap_or_default();
        p.size = data.size;
        p.orbital_distance = data.orbital_distance;
        p.orbital_period = data.orbital_period;
        p.rotation_period = data.rotation_period;
        p.orbit_angle = data.orbit_angle;
        p.orbit_incline = data.orbit_incline;
        p.orbit_index = data.orbit_index;
        p.rotation_angle = data.rotation_angle;
        p.has_atmosphere = data.has_atmosphere;
        p.has_water = data.has_water;
        p.habitability = data.habitability;
        p.danger_level = data.danger_level;
        p.resources = data.resources;
        p.explored = data.explored;
        p.can_land = data.can_land;
        p.landmarks = data.landmarks;
        p.seed = data.seed;
        p.restore()
    }
}

impl From<&StarSystem> for StarSystemData {
    fn from(s: &StarSystem) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            galaxy_id: s.galaxy_id.clone(),
            position: s.position,
            star_type: s.star_type.label().to_string(),
            star_size: s.star_size,
            resources: s.resources,
            explored: s.explored,
            hostile_level: s.hostile_level,
            seed: s.seed,
            planets: s.planets.iter().map(PlanetData::from).collect(),
        }
    }
}

impl From<StarSystemData> for StarSystem {
    fn from(data: StarSystemData) -> Self {
        let mut s = StarSystem::default();
        s.id = data.id;
        s.name = data.name;
        s.galaxy_id = data.galaxy_id;
        s.position = data.position;
        s.star_type = StarType::from_label(&data.star_type).unwrap_or_default();
        s.star_size = data.star_size;
        s.resources = data.resources;
        s.explored = data.explored;
        s.hostile_level = data.hostile_level;
        s.seed = data.seed;
        s.planets = data.planets.into_iter().map(Planet::from).collect();
        s.restore()
    }
}

impl From<&Galaxy> for GalaxyData {
    fn from(g: &Galaxy) -> Self {
        Self {
            id: g.id.clone(),
            name: g.name.clone(),
            kind: g.kind.label().to_string(),
            position: g.position,
            rotation: g.rotation,
            size: g.size,
            seed: g.seed,
            star_systems: g.star_systems.iter().map(StarSystemData::from).collect(),
        }
    }
}

impl From<GalaxyData> for Galaxy {
    fn from(data: GalaxyData) -> Self {
        let mut g = Galaxy::default();
        g.id = data.id;
        g.name = data.name;
        g.kind = GalaxyType::from_label(&data.kind).unwrap_or_default();
        g.position = data.position;
        g.rotation = data.rotation;
        g.size = data.size;
        g.seed = data.seed;
        g.star_systems = data.star_systems.into_iter().map(StarSystem::from).collect();
        g.restore()
    }
}

impl From<&Universe> for UniverseData {
    fn from(u: &Universe) -> Self {
        Self {
            seed: u.seed,
            universe_size: u.universe_size,
            galaxies: u.galaxies.iter().map(GalaxyData::from).collect(),
        }
    }
}

impl From<UniverseData> for Universe {
    fn from(data: UniverseData) -> Self {
        let galaxies = data.galaxies.into_iter().map(Galaxy::from).collect();
        Universe::from_parts(data.seed, data.universe_size, galaxies)
    }
}

impl Universe {
    pub fn to_data(&self) -> UniverseData {
        UniverseData::from(self)
    }

    pub fn from_data(data: UniverseData) -> Self {
        Universe::from(data)
    }

    pub fn to_json(&self) -> Result<String, UniverseError> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    pub fn from_json(json: &str) -> Result<Self, UniverseError> {
        let data: UniverseData = serde_json::from_str(json)?;
        Ok(Universe::from_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::universe::UniverseConfig;
    use crate::game::Lifecycle;

    fn config() -> UniverseConfig {
        UniverseConfig {
            seed: 31337,
            universe_size: 5_000.0,
            num_galaxies: 2,
            galaxy_size: 600.0,
            star_systems: 5..12,
        }
    }

    #[test]
    fn uses_documented_key_names() {
        let universe = Universe::generate(&config()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&universe.to_json().unwrap()).unwrap();
        assert!(value["universeSize"].is_number());
        let galaxy = &value["galaxies"][0];
        assert!(galaxy["type"].is_string());
        assert!(galaxy["starSystems"].is_array());
        let system = &galaxy["starSystems"][0];
        for key in ["galaxyId", "starType", "starSize", "hostileLevel", "resources"] {
            assert!(!system[key].is_null(), "missing {key}");
        }
        assert!(system["resources"]["rareElements"].is_number());
        let planet = &system["planets"][0];
        for key in [
            "systemId",
            "type",
            "orbitalDistance",
            "orbitalPeriod",
            "rotationPeriod",
            "orbitAngle",
            "orbitIncline",
            "orbitIndex",
            "hasAtmosphere",
            "hasWater",
            "habitability",
            "dangerLevel",
            "canLand",
            "landmarks",
            "seed",
        ] {
            assert!(!planet[key].is_null(), "missing {key}");
        }
    }

    #[test]
    fn in_memory_round_trip_is_exact() {
        let universe = Universe::generate(&config()).unwrap();
        let data = universe.to_data();
        let restored = Universe::from_data(data.clone());
        assert_eq!(restored.to_data(), data);
        assert_eq!(restored.lifecycle(), Lifecycle::Initialized);
    }

    #[test]
    fn json_round_trip_is_exact() {
        let mut universe = Universe::generate(&config()).unwrap();
        universe.update(123.456);
        let json = universe.to_json().unwrap();
        let restored = Universe::from_json(&json).unwrap();
        assert_eq!(restored.to_data(), universe.to_data());
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn missing_fields_load_as_defaults() {
        let json = r#"{
            "seed": 5,
            "galaxies": [
                { "id": "galaxy-0", "type": "spiral" },
                { "id": "galaxy-1", "starSystems": [
                    { "id": "galaxy-1-s0", "planets": [ { "id": "galaxy-1-s0-p0", "type": "lava" } ] },
                    { "id": "galaxy-1-s1" }
                ] }
            ]
        }"#;
        let universe = Universe::from_json(json).unwrap();
        assert_eq!(universe.seed, 5);
        assert_eq!(universe.universe_size, 0.0);
        assert!(universe.galaxies[0].star_systems.is_empty());
        let system = universe.star_system_by_id("galaxy-1-s1").unwrap();
        assert!(system.planets.is_empty());
        assert_eq!(system.star_type, StarType::Yellow);
        let planet = universe.planet_by_id("galaxy-1-s0-p0").unwrap();
        assert_eq!(planet.kind, PlanetType::Lava);
        assert!(planet.landmarks.is_empty());
        assert_eq!(planet.orbital_distance, 2.0);
        assert!(planet.orbital_period > 0.0);
        assert!(planet.rotation_period > 0.0);

        let start = planet.orbit_angle;
        let mut universe = universe;
        universe.update(24.0);
        let planet = universe.planet_by_id("galaxy-1-s0-p0").unwrap();
        assert_ne!(planet.orbit_angle, start);
    }

    #[test]
    fn out_of_range_numbers_are_folded_into_range() {
        let json = r#"{
            "seed": 1700000000000,
            "galaxies": [ { "id": "galaxy-0", "seed": -1, "starSystems": [
                { "id": "galaxy-0-s0", "hostileLevel": 300,
                  "resources": { "minerals": -1, "gases": 12.0, "organics": 7.6, "rareElements": 1e9 },
                  "planets": [ { "id": "galaxy-0-s0-p0", "orbitIndex": -4, "habitability": 2.4,
                                 "dangerLevel": 256, "resources": { "minerals": 300 } } ] }
            ] } ]
        }"#;
        let universe = Universe::from_json(json).unwrap();
        assert_eq!(universe.seed, 1_700_000_000_000u64 as u32);
        assert_eq!(universe.galaxies[0].seed, u32::MAX);

        let system = universe.star_system_by_id("galaxy-0-s0").unwrap();
        assert_eq!(system.hostile_level, 10);
        assert_eq!(system.resources, Resources::new(0, 10, 8, 10));

        let planet = &system.planets[0];
        assert_eq!(planet.orbit_index, 0);
        assert_eq!(planet.habitability, 2);
        assert_eq!(planet.danger_level, 10);
        assert_eq!(planet.resources.minerals, 10);
    }

    #[test]
    fn numbers_of_the_wrong_type_are_still_errors() {
        let json = r#"{ "galaxies": [ { "starSystems": [ { "hostileLevel": "high" } ] } ] }"#;
        assert!(matches!(
            Universe::from_json(json),
            Err(UniverseError::Save(_))
        ));
    }

    #[test]
    fn degenerate_loaded_values_are_repaired() {
        let mut data = Universe::generate(&config()).unwrap().to_data();
        let system = &mut data.galaxies[0].star_systems[0];
        system.position = Vec3::new(f64::NAN, 0.0, 0.0);
        system.planets[0].orbital_period = 0.0;
        system.planets[0].rotation_period = -2.0;
        data.galaxies[1].position = Vec3::new(0.0, f64::INFINITY, 0.0);

        let mut universe = Universe::from_data(data);
        assert_eq!(universe.galaxies[0].star_systems[0].position, Vec3::ZERO);
        assert_eq!(universe.galaxies[1].position, Vec3::ZERO);

        let before = universe.galaxies[0].star_systems[0].planets[0].orbit_angle;
        universe.update(10.0);
        let planet = &universe.galaxies[0].star_systems[0].planets[0];
        assert!(planet.orbital_period > 0.0 && planet.rotation_period > 0.0);
        assert_ne!(planet.orbit_angle, before);
    }

    #[test]
    fn unknown_labels_fall_back_to_defaults() {
        let data = PlanetData {
            kind: "plasma".to_string(),
            ..PlanetData::default()
        };
        assert_eq!(Planet::from(data).kind, PlanetType::Rocky);
        let data = GalaxyData {
            kind: "ring".to_string(),
            ..GalaxyData::default()
        };
        assert_eq!(Galaxy::from(data).kind, GalaxyType::Spiral);
    }

    #[test]
    fn loading_clamps_and_sorts() {
        let mut data = Universe::generate(&config()).unwrap().to_data();
        let planets = &mut data.galaxies[0].star_systems[0].planets;
        planets.reverse();
        planets[0].resources.minerals = 42;
        planets[0].habitability = 200;
        let universe = Universe::from_data(data);
        let system = &universe.galaxies[0].star_systems[0];
        assert!(system
            .planets
            .windows(2)
            .all(|w| w[0].orbital_distance <= w[1].orbital_distance));
        for planet in &system.planets {
            assert!(planet.resources.in_bounds());
            assert!(planet.habitability <= 10);
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Universe::from_json("{ not json"),
            Err(UniverseError::Save(_))
        ));
    }
}
