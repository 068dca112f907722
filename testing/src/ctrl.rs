use lpcore::{
    catalog::{
        CatalogKind,
        traits::CatalogBackend,
    },
    update::ProfileUpdate,
};
use lpctrl::{
    platform::{
        Builder,
        Platform,
    },
    storage::LocalFileStorage,
};
use lpdb_sqlite::SqliteBackend;
use std::sync::Arc;
use tempfile::TempDir;

/// Catalog entries seeded by `seed_catalog`; ids are assigned in this
/// order starting from 1 within each kind.
pub const CATALOG: &[(CatalogKind, &[(&str, &str)])] = &[
    (CatalogKind::Language, &[("English", "en"), ("French", "fr"), ("Spanish", "es")]),
    (CatalogKind::Currency, &[("US Dollar", "USD"), ("Euro", "EUR")]),
    (CatalogKind::Service, &[("Translation", "TR"), ("Proofreading", "PR")]),
    (CatalogKind::Domain, &[("Legal", "LEG"), ("Medical", "MED")]),
    (CatalogKind::TranslationTool, &[("Trados", "TRD"), ("memoQ", "MQ")]),
];

pub async fn seed_catalog(catalog: &dyn CatalogBackend) -> anyhow::Result<()> {
    for (kind, entries) in CATALOG {
        for &(name, code) in entries.iter() {
            catalog.add_catalog_entry(*kind, name, Some(code)).await?;
        }
    }
    Ok(())
}

pub async fn create_sqlite_backend() -> anyhow::Result<SqliteBackend> {
    let backend = SqliteBackend::connect("sqlite::memory:".into())
        .await?
        .migrate_lp()
        .await?;
    seed_catalog(&backend).await?;
    Ok(backend)
}

pub async fn create_sqlite_platform() -> anyhow::Result<(TempDir, Platform)> {
    let tempdir = tempfile::tempdir()?;
    let platform = Builder::new()
        .lp_platform(Arc::new(create_sqlite_backend().await?))
        .storage(LocalFileStorage::new(tempdir.path()))
        .build()?;
    Ok((tempdir, platform))
}

/// A complete first submission for an individual translator.
pub fn braxton_update() -> ProfileUpdate {
    serde_json::from_value(serde_json::json!({
        "first_name": "Braxton",
        "last_name": "Cartwright",
        "company_name": "Braxton Inc.",
        "phone_number": "+1 (831) 774-8192",
        "date_of_birth": "1980-09-09",
        "is_individual": true,
        "is_translator": true,
        "is_interpreter": true,
        "preferred_currency_id": 1,
        "native_languages": [1, 2],
        "address": {
            "address_line_1": "5678 Oak St",
            "address_line_2": "Suite 200",
            "city": "Shelbyville",
            "state": "IL",
            "postal_code": "62705",
            "country": "USA"
        },
        "additional_info": {
            "secondary_email": "braxton@example.com"
        },
        "expertises": [
            {"domain_id": 1, "years_of_experience": 10}
        ],
        "translation_tools": [
            {"translation_tool_id": 2}
        ],
        "language_pairs_rates": [
            {"source_language_id": 1, "target_language_id": 2, "service_id": 1,
             "proposed_rate": "0.125"}
        ],
        "qualifications": [
            {"type": "degree", "name": "BA Translation", "issued_date": "2002-06-01"}
        ],
        "references": [
            {"company_name": "Acme", "contact_name": "Jo Smith",
             "contact_email": "jo@acme.example.com"}
        ]
    }))
    .expect("fixture payload is valid")
}
