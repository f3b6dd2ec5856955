pub mod rate_api;
pub mod util;

pub use rate_api::RateApiProvider;
