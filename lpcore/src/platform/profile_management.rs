use async_trait::async_trait;
use crate::{
    ac::traits::UserBackend,
    catalog::traits::CatalogBackend,
    linguist::traits::LinguistBackend,
    platform::PlatformUrl,
    profile::traits::{
        ProfileAggregateBackend,
        ProfileBackend,
    },
    rate::traits::LanguagePairRateBackend,
};

/// LPPlatform - Linguist Profile Platform
///
/// This platform is used to persist linguist profiles, their child
/// collections and the approval history of their rates.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
#[async_trait]
pub trait LPPlatform: UserBackend
    + CatalogBackend
    + ProfileBackend
    + ProfileAggregateBackend
    + LinguistBackend
    + LanguagePairRateBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn LPPlatform;
}

pub trait DefaultLPPlatform: LPPlatform {}

impl<P: UserBackend
    + CatalogBackend
    + ProfileBackend
    + ProfileAggregateBackend
    + LinguistBackend
    + LanguagePairRateBackend

    + PlatformUrl

    + DefaultLPPlatform

    + Send
    + Sync
> LPPlatform for P {
    fn as_dyn(&self) -> &(dyn LPPlatform) {
        self
    }
}
