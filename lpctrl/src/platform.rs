use lpcore::platform::LPPlatform;
use std::sync::Arc;

use crate::{
    storage::FileStorage,
    validation::Validator,
};

mod builder;
mod impls;

pub use builder::{
    Builder,
    Config,
};

/// Images accepted as avatars, by extension.
pub const AVATAR_EXTENSIONS: [&str; 4] = ["jpeg", "png", "jpg", "gif"];
/// In kilobytes.
pub const DEFAULT_AVATAR_MAX_SIZE: usize = 2048;
pub const AVATAR_DIR: &str = "avatars";

#[derive(Clone)]
pub struct Platform(Arc<PlatformInner>);

struct PlatformInner {
    lp_platform: Arc<dyn LPPlatform>,
    storage: Arc<dyn FileStorage>,
    validator: Validator,
    avatar_max_size: usize,
}
