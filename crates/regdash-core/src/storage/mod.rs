pub mod repository;
pub mod rows;
pub mod schema;
pub mod store;

pub use repository::{RunFilter, RunRepository, UpsertOutcome};
pub use store::Store;
