pub mod collect;
pub mod error;
pub mod geo_core;
pub mod geometric;
#[cfg(feature = "plot")]
pub mod plot;

pub use error::{Error, Result};
