use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::error::ValueError;
use super::{
    CatalogEntries,
    CatalogEntry,
    CatalogKind,
};

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Language,
        CatalogKind::Currency,
        CatalogKind::Service,
        CatalogKind::Domain,
        CatalogKind::TranslationTool,
    ];

    /// The name of the table holding the entries of this kind.
    pub const fn table(&self) -> &'static str {
        match self {
            CatalogKind::Language => "language",
            CatalogKind::Currency => "currency",
            CatalogKind::Service => "service",
            CatalogKind::Domain => "domain",
            CatalogKind::TranslationTool => "translation_tool_list",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Language => "language",
            CatalogKind::Currency => "currency",
            CatalogKind::Service => "service",
            CatalogKind::Domain => "domain",
            CatalogKind::TranslationTool => "translation_tool",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogKind::ALL.into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::Unsupported(s.to_string()))
    }
}

impl From<Vec<CatalogEntry>> for CatalogEntries {
    fn from(args: Vec<CatalogEntry>) -> Self {
        Self(args)
    }
}

impl From<CatalogEntries> for Vec<CatalogEntry> {
    fn from(value: CatalogEntries) -> Self {
        value.0
    }
}

impl Deref for CatalogEntries {
    type Target = Vec<CatalogEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::CatalogKind;
    use crate::error::ValueError;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        for kind in CatalogKind::ALL {
            assert_eq!(kind, CatalogKind::from_str(&kind.to_string())?);
        }
        assert_eq!(CatalogKind::TranslationTool.table(), "translation_tool_list");
        assert!(matches!(
            CatalogKind::from_str("planet")
                .expect_err("should be an error"),
            ValueError::Unsupported(s) if s == "planet",
        ));
        Ok(())
    }
}
