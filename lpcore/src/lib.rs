pub mod ac;
pub mod catalog;
pub mod error;
pub mod linguist;
pub mod platform;
pub mod profile;
pub mod rate;
pub mod sync;
pub mod update;
