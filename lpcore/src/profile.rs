use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    linguist::{
        Documents,
        Expertises,
        Qualifications,
        References,
        TranslationTools,
    },
    rate::LanguagePairRates,
};

/// The per-user aggregate root.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    /// `Some(true)` for an individual, `Some(false)` for a company.
    pub is_individual: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub preferred_currency_id: Option<i64>,
    pub is_translator: Option<bool>,
    pub is_interpreter: Option<bool>,
    /// Storage relative path to the avatar image.
    pub avatar: Option<String>,
    pub secondary_email: Option<String>,
    pub secondary_phone: Option<String>,
    pub additional_fields: Option<serde_json::Value>,
    #[serde(default)]
    pub created_ts: i64,
    #[serde(default)]
    pub updated_ts: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(default)]
    pub id: i64,
    /// The kind of record that owns this address, e.g. "profile".
    pub addressable_kind: String,
    pub addressable_id: i64,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// synthesized from the records above plus the child collections owned
// by the same user; isn't stored in this form.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ProfileAggregate {
    pub profile: Profile,
    pub address: Option<Address>,
    pub native_languages: Vec<i64>,
    pub expertises: Expertises,
    pub translation_tools: TranslationTools,
    pub language_pairs_rates: LanguagePairRates,
    pub qualifications: Qualifications,
    pub references: References,
    pub documents: Documents,
}

mod impls;
pub mod traits;
