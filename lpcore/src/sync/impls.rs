use std::{
    collections::HashSet,
    fmt,
};
use crate::update::{
    DocumentItem,
    ExpertiseItem,
    LanguagePairRateItem,
    QualificationItem,
    ReferenceItem,
    TranslationToolItem,
};
use super::{
    Collection,
    Identified,
    Policy,
    SyncPlan,
};

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::NativeLanguages,
        Collection::Expertises,
        Collection::TranslationTools,
        Collection::LanguagePairsRates,
        Collection::Qualifications,
        Collection::References,
        Collection::Documents,
    ];

    pub const fn policy(&self) -> Policy {
        match self {
            Collection::NativeLanguages => Policy::ReplaceSet,
            Collection::TranslationTools => Policy::ReplaceSet,
            Collection::LanguagePairsRates => Policy::Sync,
            Collection::Expertises => Policy::Overwrite,
            Collection::Qualifications => Policy::Overwrite,
            Collection::References => Policy::Overwrite,
            Collection::Documents => Policy::Overwrite,
        }
    }

    /// The key of the collection within the update payload.
    pub const fn name(&self) -> &'static str {
        match self {
            Collection::NativeLanguages => "native_languages",
            Collection::Expertises => "expertises",
            Collection::TranslationTools => "translation_tools",
            Collection::LanguagePairsRates => "language_pairs_rates",
            Collection::Qualifications => "qualifications",
            Collection::References => "references",
            Collection::Documents => "documents",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a, T: Identified> SyncPlan<'a, T> {
    /// Plan the reconciliation of `items` against the ids of the
    /// children currently owned by the parent.
    ///
    /// The `existing` ids must already be scoped to the owner; an item
    /// naming an id outside of that set never touches that record and
    /// is created as a new child of the owner instead.
    pub fn new(existing: &[i64], items: &'a [T]) -> Self {
        let existing_set = existing.iter()
            .copied()
            .collect::<HashSet<_>>();
        let mut matched = HashSet::new();
        let mut update = Vec::new();
        let mut create = Vec::new();
        let mut unmatched = Vec::new();

        for item in items {
            match item.id() {
                Some(id) if existing_set.contains(&id) => {
                    matched.insert(id);
                    update.push((id, item));
                }
                Some(id) => {
                    unmatched.push(id);
                    create.push(item);
                }
                None => create.push(item),
            }
        }

        let prune = existing.iter()
            .copied()
            .filter(|id| !matched.contains(id))
            .collect();

        Self {
            prune,
            update,
            create,
            unmatched,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.prune.is_empty() && self.update.is_empty() && self.create.is_empty()
    }
}

/// The distinct ids from the submission, in order of first appearance.
pub fn replace_set(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

impl Identified for ExpertiseItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for TranslationToolItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for LanguagePairRateItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for QualificationItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for ReferenceItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Identified for DocumentItem {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
