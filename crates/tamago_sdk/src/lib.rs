pub mod constants;
pub mod contract_interfaces;
mod error;

pub use error::Error;
