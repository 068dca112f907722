use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Records that describe the professional side of a linguist.  Each is
// owned by a user and carries no invariant across records other than
// that ownership.

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expertise {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub domain_id: i64,
    pub years_of_experience: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Expertises(Vec<Expertise>);

/// Binds a user to an entry of the shared translation tool catalog.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TranslationTool {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub translation_tool_id: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TranslationTools(Vec<TranslationTool>);

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Qualification {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    /// Degree, Certification, Training, Diploma
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
pub struct Qualifications(Vec<Qualification>);

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Reference {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct References(Vec<Reference>);

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Document {
    #[serde(default)]
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub file_path: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Documents(Vec<Document>);

mod impls;
pub mod traits;
