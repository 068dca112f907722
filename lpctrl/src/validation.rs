//! Validation of profile updates ahead of the aggregate write.
//!
//! Required fields are checked against the profile as it would be once
//! the update is applied, so a partial update of a complete profile
//! passes while a first submission has to carry everything.

use lpcore::{
    catalog::{
        CatalogKind,
        traits::CatalogBackend,
    },
    error::BackendError,
    profile::ProfileAggregate,
    update::{
        AddressInput,
        LanguagePairRateItem,
        ProfileUpdate,
    },
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::{
    collections::{
        BTreeMap,
        HashSet,
    },
    fmt,
};
use validator::{
    ValidateEmail,
    ValidateLength,
};

pub const DEFAULT_MAX_NATIVE_LANGUAGES: usize = 2;

/// Messages keyed by the path of the offending field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let messages = self.0.entry(field.into()).or_default();
        let message = message.into();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("the given data was invalid")?;
        for (field, messages) in self.0.iter() {
            for message in messages {
                write!(f, "; {field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn required(field: &str) -> String {
    format!("The {} field is required.", field.replace('_', " "))
}

fn too_long(field: &str, max: u64) -> String {
    format!(
        "The {} field must not be greater than {max} characters.",
        field.replace('_', " "),
    )
}

fn invalid_selection(field: &str) -> String {
    format!("The selected {} is invalid.", field.replace('_', " "))
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).map_or(true, str::is_empty)
}

fn is_email(value: &str) -> bool {
    value.validate_email()
}

/// The submitted value, falling back to the stored one.
fn merged<'a>(submitted: &'a Option<String>, stored: Option<&'a Option<String>>) -> Option<&'a str> {
    submitted.as_deref()
        .or_else(|| stored.and_then(Option::as_deref))
}

fn check_len(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: u64) {
    if value.is_some_and(|value| !value.validate_length(None, Some(max), None)) {
        errors.add(field, too_long(field, max));
    }
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !value.trim().validate_length(Some(1), None, None) {
        errors.add(field, required(field));
    }
}

fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>) {
    if value.is_some_and(|value| value.is_sign_negative() && !value.is_zero()) {
        errors.add(field, format!("The {field} field must be at least 0."));
    }
}

fn check_address(errors: &mut ValidationErrors, address: &AddressInput) {
    for (field, value, message, max) in [
        ("address.address_line_1", &address.address_line_1, "Please enter street address.", Some(255)),
        ("address.city", &address.city, "Please enter a city.", Some(100)),
        ("address.state", &address.state, "Please enter a state.", Some(100)),
        ("address.postal_code", &address.postal_code, "Please enter a postal code.", Some(20)),
        ("address.country", &address.country, "Please enter a country.", None),
    ] {
        if value.trim().is_empty() {
            errors.add(field, message);
        }
        if let Some(max) = max {
            check_len(errors, field, Some(value.as_str()), max);
        }
    }
    check_len(errors, "address.address_line_2", address.address_line_2.as_deref(), 255);
    check_len(errors, "address.type", address.kind.as_deref(), 50);
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_rate_item(errors: &mut ValidationErrors, prefix: &str, item: &LanguagePairRateItem) {
    check_non_negative(errors, &join(prefix, "proposed_rate"), item.proposed_rate);
    check_non_negative(errors, &join(prefix, "final_rate"), item.final_rate);
    if item.approval_reference_email.as_deref().is_some_and(|email| !is_email(email)) {
        let field = join(prefix, "approval_reference_email");
        errors.add(&field, format!("The {field} field must be a valid email address."));
    }
}

struct Reference {
    kind: CatalogKind,
    field: String,
    id: i64,
    message: String,
}

#[derive(Clone, Debug)]
pub struct Validator {
    max_native_languages: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NATIVE_LANGUAGES)
    }
}

impl Validator {
    pub fn new(max_native_languages: usize) -> Self {
        Self { max_native_languages }
    }

    pub fn max_native_languages(&self) -> usize {
        self.max_native_languages
    }

    /// Check everything about the update that can be determined without
    /// consulting the catalogs.
    pub fn check_fields(
        &self,
        update: &ProfileUpdate,
        existing: Option<&ProfileAggregate>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let profile = existing.map(|aggregate| &aggregate.profile);

        for (field, submitted, stored) in [
            ("first_name", &update.first_name, profile.map(|p| &p.first_name)),
            ("last_name", &update.last_name, profile.map(|p| &p.last_name)),
            ("phone_number", &update.phone_number, profile.map(|p| &p.phone_number)),
        ] {
            if is_blank(merged(submitted, stored)) {
                errors.add(field, required(field));
            }
        }
        check_len(&mut errors, "first_name", update.first_name.as_deref(), 255);
        check_len(&mut errors, "last_name", update.last_name.as_deref(), 255);
        check_len(&mut errors, "phone_number", update.phone_number.as_deref(), 20);
        check_len(&mut errors, "company_name", update.company_name.as_deref(), 255);

        let is_individual = update.is_individual
            .or_else(|| profile.and_then(|p| p.is_individual));
        match is_individual {
            None => errors.add(
                "is_individual",
                "Please select if you are an individual or a company.",
            ),
            Some(false) => if is_blank(merged(
                &update.company_name,
                profile.map(|p| &p.company_name),
            )) {
                errors.add("company_name", "Please enter a company name.");
            },
            Some(true) => if update.date_of_birth
                .or_else(|| profile.and_then(|p| p.date_of_birth))
                .is_none()
            {
                errors.add("date_of_birth", "Please enter a date of birth.");
            },
        }

        if update.is_individual.is_some() && update.preferred_currency_id
            .or_else(|| profile.and_then(|p| p.preferred_currency_id))
            .is_none()
        {
            errors.add("preferred_currency_id", "Please select a preferred currency.");
        }

        match &update.native_languages {
            Some(ids) if ids.is_empty() => errors.add(
                "native_languages",
                "Please select at least 1 native language.",
            ),
            Some(ids) if ids.len() > self.max_native_languages => errors.add(
                "native_languages",
                format!(
                    "You can select a maximum of {} native languages.",
                    self.max_native_languages,
                ),
            ),
            Some(_) => (),
            None => if update.is_individual.is_some()
                && existing.map_or(true, |a| a.native_languages.is_empty())
            {
                errors.add("native_languages", "Please select at least 1 native language.");
            },
        }

        match &update.address {
            Some(address) => check_address(&mut errors, address),
            None => if existing.and_then(|a| a.address.as_ref()).is_none() {
                errors.add("address", "Please enter an address.");
            },
        }

        if let Some(info) = &update.additional_info {
            if info.secondary_email.as_deref().is_some_and(|email| !is_email(email)) {
                errors.add(
                    "additional_info.secondary_email",
                    "The additional_info.secondary_email field must be a valid email address.",
                );
            }
            check_len(&mut errors, "additional_info.secondary_phone", info.secondary_phone.as_deref(), 20);
        }

        for (i, item) in update.expertises.iter().flatten().enumerate() {
            if item.years_of_experience.is_some_and(|years| years < 0) {
                let field = format!("expertises.{i}.years_of_experience");
                errors.add(&field, format!("The {field} field must be at least 0."));
            }
        }

        if let Some(items) = &update.language_pairs_rates {
            let mut seen = HashSet::new();
            for (i, item) in items.iter().enumerate() {
                let prefix = format!("language_pairs_rates.{i}");
                check_rate_item(&mut errors, &prefix, item);
                if !seen.insert((item.source_language_id, item.target_language_id, item.service_id)) {
                    errors.add(
                        prefix,
                        "The language pair and service combination has already been taken.",
                    );
                }
            }
        }

        for (i, item) in update.qualifications.iter().flatten().enumerate() {
            for (name, value) in [("type", &item.kind), ("name", &item.name)] {
                let field = format!("qualifications.{i}.{name}");
                check_required(&mut errors, &field, value);
                check_len(&mut errors, &field, Some(value.as_str()), 255);
            }
            if let (Some(issued), Some(expiry)) = (item.issued_date, item.expiry_date) {
                if expiry < issued {
                    let field = format!("qualifications.{i}.expiry_date");
                    errors.add(
                        &field,
                        format!("The {field} field must be a date after or equal to issued_date."),
                    );
                }
            }
        }

        for (i, item) in update.references.iter().flatten().enumerate() {
            for (name, value) in [
                ("company_name", &item.company_name),
                ("contact_name", &item.contact_name),
                ("contact_email", &item.contact_email),
            ] {
                let field = format!("references.{i}.{name}");
                check_required(&mut errors, &field, value);
                check_len(&mut errors, &field, Some(value.as_str()), 255);
            }
            if !item.contact_email.trim().is_empty() && !is_email(&item.contact_email) {
                let field = format!("references.{i}.contact_email");
                errors.add(&field, format!("The {field} field must be a valid email address."));
            }
        }

        for (i, item) in update.documents.iter().flatten().enumerate() {
            for (name, value) in [("name", &item.name), ("file_path", &item.file_path)] {
                let field = format!("documents.{i}.{name}");
                check_required(&mut errors, &field, value);
                check_len(&mut errors, &field, Some(value.as_str()), 255);
            }
        }

        errors
    }

    fn references(update: &ProfileUpdate) -> Vec<Reference> {
        let mut result = Vec::new();
        let mut push = |kind: CatalogKind, field: String, id: i64, message: String| result.push(Reference {
            kind,
            field,
            id,
            message,
        });

        if let Some(id) = update.preferred_currency_id {
            push(
                CatalogKind::Currency,
                "preferred_currency_id".to_string(),
                id,
                invalid_selection("preferred_currency_id"),
            );
        }
        for id in update.native_languages.iter().flatten() {
            push(
                CatalogKind::Language,
                "native_languages".to_string(),
                *id,
                "One or more selected languages are invalid.".to_string(),
            );
        }
        for (i, item) in update.expertises.iter().flatten().enumerate() {
            let field = format!("expertises.{i}.domain_id");
            let message = format!("The selected {field} is invalid.");
            push(CatalogKind::Domain, field, item.domain_id, message);
        }
        for (i, item) in update.translation_tools.iter().flatten().enumerate() {
            let field = format!("translation_tools.{i}.translation_tool_id");
            let message = format!("The selected {field} is invalid.");
            push(CatalogKind::TranslationTool, field, item.translation_tool_id, message);
        }
        for (i, item) in update.language_pairs_rates.iter().flatten().enumerate() {
            for (kind, name, id) in [
                (CatalogKind::Language, "source_language_id", item.source_language_id),
                (CatalogKind::Language, "target_language_id", item.target_language_id),
                (CatalogKind::Service, "service_id", item.service_id),
            ] {
                let field = format!("language_pairs_rates.{i}.{name}");
                let message = format!("The selected {field} is invalid.");
                push(kind, field, id, message);
            }
        }
        result
    }

    /// Check that every catalog entry referenced by the update exists.
    pub async fn check_references<C: CatalogBackend + Sync + ?Sized>(
        &self,
        catalog: &C,
        update: &ProfileUpdate,
        errors: &mut ValidationErrors,
    ) -> Result<(), BackendError> {
        let references = Self::references(update);
        for kind in CatalogKind::ALL {
            let ids = references.iter()
                .filter(|r| r.kind == kind)
                .map(|r| r.id)
                .collect::<Vec<_>>();
            if ids.is_empty() {
                continue;
            }
            let existing = catalog.existing_catalog_ids(kind, &ids).await?
                .into_iter()
                .collect::<HashSet<_>>();
            for reference in references.iter()
                .filter(|r| r.kind == kind && !existing.contains(&r.id))
            {
                log::debug!("{} {} referenced by {} is missing", kind, reference.id, reference.field);
                errors.add(reference.field.clone(), reference.message.clone());
            }
        }
        Ok(())
    }

    pub async fn validate<C: CatalogBackend + Sync + ?Sized>(
        &self,
        catalog: &C,
        update: &ProfileUpdate,
        existing: Option<&ProfileAggregate>,
    ) -> Result<ValidationErrors, BackendError> {
        let mut errors = self.check_fields(update, existing);
        self.check_references(catalog, update, &mut errors).await?;
        Ok(errors)
    }

    /// Check a single rate item submitted on its own.
    pub async fn validate_rate_item<C: CatalogBackend + Sync + ?Sized>(
        &self,
        catalog: &C,
        item: &LanguagePairRateItem,
    ) -> Result<ValidationErrors, BackendError> {
        let mut errors = ValidationErrors::new();
        check_rate_item(&mut errors, "", item);
        for (kind, field, id) in [
            (CatalogKind::Language, "source_language_id", item.source_language_id),
            (CatalogKind::Language, "target_language_id", item.target_language_id),
            (CatalogKind::Service, "service_id", item.service_id),
        ] {
            if catalog.existing_catalog_ids(kind, &[id]).await?.is_empty() {
                errors.add(field, invalid_selection(field));
            }
        }
        Ok(errors)
    }

    /// Check an approved rate along with its reference.
    pub fn check_approval(
        &self,
        final_rate: Decimal,
        approval_reference_email: Option<&str>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_rate_item(&mut errors, "", &LanguagePairRateItem {
            final_rate: Some(final_rate),
            approval_reference_email: approval_reference_email.map(str::to_string),
            .. Default::default()
        });
        errors
    }
}
