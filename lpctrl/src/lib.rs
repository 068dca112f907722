pub mod error;
pub mod platform;
pub mod storage;
pub mod validation;

pub use platform::Platform;
