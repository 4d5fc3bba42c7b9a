// Service exports
pub mod cache;
pub mod directory;
pub mod postgres;
pub mod store;
pub mod weights;

pub use cache::{CacheStats, CachedResultStore};
pub use directory::{CoachDirectory, DirectoryError, HttpCoachDirectory};
pub use postgres::PostgresResultStore;
pub use store::{InMemoryResultStore, MatchResultStore, RequestStatus, StoreError, StoredMatching};
pub use weights::{load_weights, HttpWeightsProvider, StaticWeightsProvider, WeightsProvider, WeightsSourceError};
