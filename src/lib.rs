use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub mod game;
pub mod space;

use game::error::UniverseError;
use game::hooks::TracingSink;
use game::save::{PlanetData, StarSystemData};
use game::universe::{Universe, UniverseConfig};

thread_local! {
    static UNIVERSE: RefCell<Option<Universe>> = RefCell::new(None);
}

fn with_universe<R>(f: impl FnOnce(&Universe) -> R) -> Result<R, &'static str> {
    UNIVERSE.with(|cell| match cell.borrow().as_ref() {
        Some(universe) => Ok(f(universe)),
        None => Err("universe not initialized"),
    })
}

fn with_universe_mut<R>(f: impl FnOnce(&mut Universe) -> R) -> Result<R, &'static str> {
    UNIVERSE.with(|cell| {
        let mut opt = cell.borrow_mut();
        match opt.as_mut() {
            Some(universe) => Ok(f(universe)),
            None => Err("universe not initialized"),
        }
    })
}

fn install(universe: Universe) {
    UNIVERSE.with(|slot| {
        if let Some(mut old) = slot.borrow_mut().replace(universe) {
            old.dispose();
        }
    });
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| UniverseError::from(e).to_string())
}

fn generate_and_install(config: &UniverseConfig) -> String {
    match Universe::generate(config) {
        Ok(universe) => {
            let json = universe.to_json().unwrap_or_else(|e| e.to_string());
            install(universe);
            json
        }
        Err(e) => e.to_string(),
    }
}

/// Routes `tracing` output to the browser console. Safe to call repeatedly.
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(tracing_wasm::set_as_global_default);
    }
}

#[wasm_bindgen]
pub fn random_seed() -> Result<u32, JsValue> {
    game::universe::random_seed().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Generates a universe with default parameters and makes it current.
#[wasm_bindgen]
pub fn init_universe(seed: u32) -> String {
    generate_and_install(&UniverseConfig::with_seed(seed))
}

/// `config_json` may omit any key; omitted keys take their defaults.
#[wasm_bindgen]
pub fn init_universe_with_config(config_json: &str) -> String {
    let config: UniverseConfig = match serde_json::from_str(config_json) {
        Ok(config) => config,
        Err(e) => return format!("invalid config: {}", e),
    };
    generate_and_install(&config)
}

/// Advances the current universe by `dt` hours of game time.
#[wasm_bindgen]
pub fn tick(dt: f64) -> String {
    match with_universe_mut(|universe| universe.update(dt)) {
        Ok(()) => "ok".to_string(),
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn universe_json() -> String {
    match with_universe(|universe| universe.to_json()) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn load_universe(json: &str) -> String {
    match Universe::from_json(json) {
        Ok(universe) => {
            install(universe);
            "ok".to_string()
        }
        Err(e) => e.to_string(),
    }
}

#[wasm_bindgen]
pub fn star_system_json(id: &str) -> String {
    with_universe(|universe| {
        universe
            .star_system_by_id(id)
            .map(|s| to_json(&StarSystemData::from(s)))
            .unwrap_or_else(|| "null".to_string())
    })
    .unwrap_or_else(|e| e.to_string())
}

#[wasm_bindgen]
pub fn planet_json(id: &str) -> String {
    with_universe(|universe| {
        universe
            .planet_by_id(id)
            .map(|p| to_json(&PlanetData::from(p)))
            .unwrap_or_else(|| "null".to_string())
    })
    .unwrap_or_else(|e| e.to_string())
}

/// `[x, y, z]` of a planet at its current orbit angle, or empty when unknown.
#[wasm_bindgen]
pub fn planet_position(id: &str) -> Vec<f64> {
    with_universe(|universe| universe.planet_world_position(id))
        .ok()
        .flatten()
        .map(|p| vec![p.x, p.y, p.z])
        .unwrap_or_default()
}

/// True only when the planet was unexplored before this call.
#[wasm_bindgen]
pub fn mark_planet_explored(id: &str) -> bool {
    with_universe_mut(|universe| universe.explore_planet(id, &mut TracingSink))
        .ok()
        .flatten()
        .unwrap_or(false)
}

#[wasm_bindgen]
pub fn mark_star_system_explored(id: &str) -> bool {
    with_universe_mut(|universe| universe.explore_star_system(id, &mut TracingSink))
        .ok()
        .flatten()
        .unwrap_or(false)
}
