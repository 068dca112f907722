use clap::{
    ArgAction,
    Args,
};
use lpcore::platform::LPPlatform;
use lpdb::{
    Backend,
    ConnectorOption,
};
use std::{
    error::Error as StdError,
    fs,
    sync::Arc,
};

use crate::{
    error::Error,
    storage::{
        FileStorage,
        LocalFileStorage,
    },
    validation::{
        DEFAULT_MAX_NATIVE_LANGUAGES,
        Validator,
    },
};
use super::{
    DEFAULT_AVATAR_MAX_SIZE,
    Platform,
    PlatformInner,
};

#[derive(Default)]
pub struct Builder {
    lp_platform: Option<Arc<dyn LPPlatform>>,
    storage: Option<Arc<dyn FileStorage>>,
    max_native_languages: Option<usize>,
    avatar_max_size: Option<usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lp_platform(mut self, val: Arc<dyn LPPlatform>) -> Self {
        self.lp_platform = Some(val);
        self
    }

    pub fn storage(mut self, val: impl FileStorage + 'static) -> Self {
        self.storage = Some(Arc::new(val));
        self
    }

    pub fn max_native_languages(mut self, val: usize) -> Self {
        self.max_native_languages = Some(val);
        self
    }

    /// In kilobytes.
    pub fn avatar_max_size(mut self, val: usize) -> Self {
        self.avatar_max_size = Some(val);
        self
    }

    pub fn build(self) -> Result<Platform, Error> {
        Ok(Platform(Arc::new(PlatformInner {
            lp_platform: self.lp_platform
                .ok_or(Error::Misconfiguration("missing required argument lp_platform"))?,
            storage: self.storage
                .ok_or(Error::Misconfiguration("missing required argument storage"))?,
            validator: Validator::new(
                self.max_native_languages.unwrap_or(DEFAULT_MAX_NATIVE_LANGUAGES)
            ),
            avatar_max_size: self.avatar_max_size.unwrap_or(DEFAULT_AVATAR_MAX_SIZE),
        })))
    }
}

/// Configuration sourced from the command line or the environment.
#[derive(Clone, Debug, Args)]
pub struct Config {
    #[clap(long, value_name = "LPCTRL_DB_URL", env = "LPCTRL_DB_URL")]
    pub lpctrl_db_url: String,
    #[clap(long, value_name = "LPCTRL_STORAGE_ROOT", env = "LPCTRL_STORAGE_ROOT")]
    pub lpctrl_storage_root: String,
    #[clap(
        long,
        value_name = "LPCTRL_AUTO_CREATE_DB",
        env = "LPCTRL_AUTO_CREATE_DB",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub lpctrl_auto_create_db: bool,
    #[clap(
        long,
        value_name = "LPCTRL_MAX_NATIVE_LANGUAGES",
        env = "LPCTRL_MAX_NATIVE_LANGUAGES",
        default_value_t = DEFAULT_MAX_NATIVE_LANGUAGES,
    )]
    pub lpctrl_max_native_languages: usize,
    #[clap(
        long,
        value_name = "LPCTRL_AVATAR_MAX_SIZE",
        env = "LPCTRL_AVATAR_MAX_SIZE",
        default_value_t = DEFAULT_AVATAR_MAX_SIZE,
    )]
    pub lpctrl_avatar_max_size: usize,
}

impl Config {
    pub async fn build(self) -> Result<Platform, Box<dyn StdError + Send + Sync>> {
        fs::create_dir_all(&self.lpctrl_storage_root)?;
        Ok(Builder::new()
            .lp_platform(
                Backend::lp(
                    ConnectorOption::from(&self.lpctrl_db_url)
                        .auto_create_db(self.lpctrl_auto_create_db)
                )
                    .await?
            )
            .storage(LocalFileStorage::new(fs::canonicalize(&self.lpctrl_storage_root)?))
            .max_native_languages(self.lpctrl_max_native_languages)
            .avatar_max_size(self.lpctrl_avatar_max_size)
            .build()?)
    }
}
