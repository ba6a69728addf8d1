pub mod error;
pub mod galaxy;
pub mod hooks;
pub mod naming;
pub mod planet;
pub mod random;
pub mod resources;
pub mod save;
pub mod system;
pub mod universe;

/// Every entity starts uninitialized, becomes initialized once generated or
/// loaded, and ends disposed. Only initialized entities update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    Disposed,
}
