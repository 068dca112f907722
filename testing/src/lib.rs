#[cfg(feature = "chrono")]
pub mod chrono;
pub mod core;
#[cfg(feature = "platform")]
pub mod ctrl;
#[cfg(feature = "rand")]
pub mod rand;

mod utils;
pub use utils::*;
