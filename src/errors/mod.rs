pub mod types;

pub use types::{AppError, DeliveryError, PersistenceError, QueryError, SamplingError};
