use thiserror::Error;

/// Errors raised at controlled call sites: generation, loading, seeding.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("invalid universe configuration: {0}")]
    InvalidConfig(String),

    #[error("save data error: {0}")]
    Save(#[from] serde_json::Error),

    #[error("entropy source unavailable: {0}")]
    Entropy(getrandom::Error),
}

/// Per-entity failures during a simulation tick. Parents log and skip these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("planet {planet_id} has a degenerate orbital period {period}")]
    DegenerateOrbit { planet_id: String, period: f64 },

    #[error("planet {planet_id} has a degenerate rotation period {period}")]
    DegenerateRotation { planet_id: String, period: f64 },

    #[error("all {failed} planets of star system {system_id} failed to update")]
    SystemStalled { system_id: String, failed: usize },
}
