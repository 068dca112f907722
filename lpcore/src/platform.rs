mod connector;
mod profile_management;
pub use connector::{ConnectorOption, PlatformConnector};
pub use profile_management::{DefaultLPPlatform, LPPlatform};

pub trait PlatformUrl {
    fn url(&self) -> &str;
}
