use serde::{Deserialize, Serialize};

// Reference data that profile records point at through foreign keys.
// These are maintained by administrators and only read by the profile
// workflows.

#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Language,
    Currency,
    Service,
    Domain,
    TranslationTool,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Short code, e.g. an ISO language or currency code.
    pub code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CatalogEntries(Vec<CatalogEntry>);

mod impls;
pub mod traits;
