//! Seams to the collaborators that live outside the simulation core.

use crate::game::galaxy::Galaxy;
use crate::game::planet::Planet;
use crate::game::system::StarSystem;
use crate::space::Vec3;

/// Something that just transitioned from unexplored to explored.
#[derive(Clone, Copy, Debug)]
pub enum Explored<'a> {
    Planet(&'a Planet),
    StarSystem(&'a StarSystem),
}

impl Explored<'_> {
    pub fn id(&self) -> &str {
        match self {
            Explored::Planet(p) => &p.id,
            Explored::StarSystem(s) => &s.id,
        }
    }
}

/// Receives `on_explored` exactly once per entity, on the false -> true edge.
pub trait ExplorationSink {
    fn on_explored(&mut self, entity: Explored<'_>);
}

/// Discards notifications.
impl ExplorationSink for () {
    fn on_explored(&mut self, _entity: Explored<'_>) {}
}

/// Collects the ids of explored entities in notification order.
impl ExplorationSink for Vec<String> {
    fn on_explored(&mut self, entity: Explored<'_>) {
        self.push(entity.id().to_string());
    }
}

/// Emits a tracing event per discovery.
pub struct TracingSink;

impl ExplorationSink for TracingSink {
    fn on_explored(&mut self, entity: Explored<'_>) {
        match entity {
            Explored::Planet(p) => tracing::info!(id = %p.id, name = %p.name, "planet explored"),
            Explored::StarSystem(s) => {
                tracing::info!(id = %s.id, name = %s.name, "star system explored")
            }
        }
    }
}

/// Turns initialized entities into renderable handles. The core only hands
/// over numeric transforms; meshes and materials are the builder's business.
pub trait MeshBuilder {
    type Mesh;

    fn galaxy(&mut self, galaxy: &Galaxy) -> Self::Mesh;
    fn star_system(&mut self, system: &StarSystem) -> Self::Mesh;
    /// `world_position` is the planet's current position around its star.
    fn planet(&mut self, planet: &Planet, world_position: Vec3) -> Self::Mesh;
}
