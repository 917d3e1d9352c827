pub mod counter;
pub mod problem;
pub mod route_factory;

pub use self::problem::{from_anyhow, unpack_problem, ApiError};

/// Largest PUT body we are willing to read.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;
