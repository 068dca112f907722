use super::{
    Address,
    Profile,
    ProfileAggregate,
};

impl Address {
    pub const PROFILE_KIND: &'static str = "profile";
}

impl Profile {
    pub fn display_name(&self) -> Option<String> {
        match (self.is_individual, &self.first_name, &self.last_name) {
            (Some(false), _, _) => self.company_name.clone(),
            (_, Some(first), Some(last)) => Some(format!("{first} {last}")),
            (_, Some(name), None) | (_, None, Some(name)) => Some(name.clone()),
            (_, None, None) => self.company_name.clone(),
        }
    }
}

impl ProfileAggregate {
    /// Whether the profile carries everything a linguist is required to
    /// provide before the rest of the application opens up to them.
    pub fn is_complete(&self) -> bool {
        let profile = &self.profile;
        profile.is_individual.unwrap_or(false)
            && profile.first_name.as_deref().is_some_and(|s| !s.is_empty())
            && profile.last_name.as_deref().is_some_and(|s| !s.is_empty())
            && profile.date_of_birth.is_some()
            && profile.phone_number.as_deref().is_some_and(|s| !s.is_empty())
            && profile.preferred_currency_id.is_some()
            && self.address.is_some()
            && !self.native_languages.is_empty()
            && profile.is_translator.unwrap_or(false)
            && profile.is_interpreter.unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use crate::profile::{
        Address,
        Profile,
        ProfileAggregate,
    };

    fn complete() -> ProfileAggregate {
        ProfileAggregate {
            profile: Profile {
                id: 1,
                user_id: 1,
                is_individual: Some(true),
                first_name: Some("Braxton".to_string()),
                last_name: Some("Cartwright".to_string()),
                phone_number: Some("+1 (831) 774-8192".to_string()),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 9, 9),
                preferred_currency_id: Some(1),
                is_translator: Some(true),
                is_interpreter: Some(true),
                .. Default::default()
            },
            address: Some(Address::default()),
            native_languages: vec![1],
            .. Default::default()
        }
    }

    #[test]
    fn completeness() {
        assert!(complete().is_complete());

        let mut aggregate = complete();
        aggregate.native_languages.clear();
        assert!(!aggregate.is_complete());

        let mut aggregate = complete();
        aggregate.address = None;
        assert!(!aggregate.is_complete());

        let mut aggregate = complete();
        aggregate.profile.first_name = Some("".to_string());
        assert!(!aggregate.is_complete());

        let mut aggregate = complete();
        aggregate.profile.is_interpreter = Some(false);
        assert!(!aggregate.is_complete());
    }

    #[test]
    fn display_name() {
        let profile = complete().profile;
        assert_eq!(profile.display_name().as_deref(), Some("Braxton Cartwright"));
        let company = Profile {
            is_individual: Some(false),
            company_name: Some("Braxton Inc.".to_string()),
            .. profile
        };
        assert_eq!(company.display_name().as_deref(), Some("Braxton Inc."));
        assert_eq!(Profile::default().display_name(), None);
    }
}
