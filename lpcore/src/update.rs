use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// The payload submitted by the profile edit form.  Every scalar is
// optional; an absent (or null) value leaves the stored value alone.
// An absent collection leaves that collection alone, while a present
// one is reconciled according to the policy of that collection (see
// the sync module).
//
// None of the items carry an owner; ownership always comes from the
// user the update is applied for.  The avatar is not part of the
// payload either, it only changes through an upload.

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub is_individual: Option<bool>,
    pub is_translator: Option<bool>,
    pub is_interpreter: Option<bool>,
    pub preferred_currency_id: Option<i64>,

    pub additional_info: Option<AdditionalInfoInput>,
    pub address: Option<AddressInput>,
    pub native_languages: Option<Vec<i64>>,

    pub expertises: Option<Vec<ExpertiseItem>>,
    pub translation_tools: Option<Vec<TranslationToolItem>>,
    pub language_pairs_rates: Option<Vec<LanguagePairRateItem>>,
    pub qualifications: Option<Vec<QualificationItem>>,
    pub references: Option<Vec<ReferenceItem>>,
    pub documents: Option<Vec<DocumentItem>>,
}

/// Replaces all secondary contact details at once; omitted values are
/// cleared.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct AdditionalInfoInput {
    pub secondary_email: Option<String>,
    pub secondary_phone: Option<String>,
    pub additional_fields: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AddressInput {
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExpertiseItem {
    pub id: Option<i64>,
    pub domain_id: i64,
    pub years_of_experience: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationToolItem {
    pub id: Option<i64>,
    pub translation_tool_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguagePairRateItem {
    pub id: Option<i64>,
    pub source_language_id: i64,
    pub target_language_id: i64,
    pub service_id: i64,
    pub proposed_rate: Option<Decimal>,
    // the following are left as stored when absent on an existing item
    pub final_rate: Option<Decimal>,
    pub machine_translation_experience: Option<bool>,
    pub approved_by: Option<i64>,
    pub approval_reference_email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QualificationItem {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub institution: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub issued_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceItem {
    pub id: Option<i64>,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentItem {
    pub id: Option<i64>,
    pub name: String,
    pub file_path: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

mod impls;
