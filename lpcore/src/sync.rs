use serde::{Deserialize, Serialize};

/// How a child collection is reconciled against the submitted items.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Policy {
    /// Update the children matched by id, create the rest, then remove
    /// every existing child that was not submitted.
    Sync,
    /// Remove every existing child, then create one per submitted item.
    Overwrite,
    /// The association becomes exactly the submitted set of foreign
    /// keys.
    ReplaceSet,
}

/// The child collections of a profile that may be carried by an update.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    NativeLanguages,
    Expertises,
    TranslationTools,
    LanguagePairsRates,
    Qualifications,
    References,
    Documents,
}

/// Items that may reference an existing child by its id.
pub trait Identified {
    fn id(&self) -> Option<i64>;
}

/// The operations required to bring an existing collection in line with
/// the submitted items under the `Sync` policy.
#[derive(Debug, PartialEq)]
pub struct SyncPlan<'a, T> {
    /// Existing ids that were not submitted.
    pub prune: Vec<i64>,
    /// Submitted items matched to an existing child.
    pub update: Vec<(i64, &'a T)>,
    /// Submitted items without an id, or with an id that did not match
    /// any of the existing children.
    pub create: Vec<&'a T>,
    /// Submitted ids that did not match any existing child.
    pub unmatched: Vec<i64>,
}

mod impls;

pub use impls::replace_set;
