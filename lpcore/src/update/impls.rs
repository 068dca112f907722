use crate::{
    profile::Profile,
    sync::Collection,
};
use super::{
    LanguagePairRateItem,
    ProfileUpdate,
};

impl ProfileUpdate {
    /// Merge the scalar fields present in this update onto the profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        fn merge<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        merge(&mut profile.first_name, &self.first_name);
        merge(&mut profile.last_name, &self.last_name);
        merge(&mut profile.company_name, &self.company_name);
        merge(&mut profile.phone_number, &self.phone_number);
        merge(&mut profile.date_of_birth, &self.date_of_birth);
        merge(&mut profile.is_individual, &self.is_individual);
        merge(&mut profile.is_translator, &self.is_translator);
        merge(&mut profile.is_interpreter, &self.is_interpreter);
        merge(&mut profile.preferred_currency_id, &self.preferred_currency_id);

        if let Some(info) = &self.additional_info {
            profile.secondary_email = info.secondary_email.clone();
            profile.secondary_phone = info.secondary_phone.clone();
            profile.additional_fields = info.additional_fields.clone();
        }
    }

    /// This update with the approval details removed from every rate
    /// item, leaving the stored approvals in place.
    pub fn without_approvals(&self) -> Self {
        Self {
            language_pairs_rates: self.language_pairs_rates.as_ref()
                .map(|items| items.iter().map(LanguagePairRateItem::as_proposal).collect()),
            .. self.clone()
        }
    }

    /// The child collections this update carries.
    pub fn collections(&self) -> Vec<Collection> {
        Collection::ALL.into_iter()
            .filter(|collection| match collection {
                Collection::NativeLanguages => self.native_languages.is_some(),
                Collection::Expertises => self.expertises.is_some(),
                Collection::TranslationTools => self.translation_tools.is_some(),
                Collection::LanguagePairsRates => self.language_pairs_rates.is_some(),
                Collection::Qualifications => self.qualifications.is_some(),
                Collection::References => self.references.is_some(),
                Collection::Documents => self.documents.is_some(),
            })
            .collect()
    }
}

impl LanguagePairRateItem {
    pub fn as_proposal(&self) -> Self {
        Self {
            final_rate: None,
            approved_by: None,
            approval_reference_email: None,
            .. self.clone()
        }
    }
}
