use lpcore::platform::{
    LPPlatform,
    PlatformConnector,
};
#[cfg(feature = "sqlite")]
use lpdb_sqlite::SqliteBackend;
use std::sync::Arc;

pub use lpcore::platform::ConnectorOption;

pub struct Backend;

#[derive(Clone, Debug, PartialEq)]
pub struct Error(String);

#[derive(Debug)]
enum BackendKind {
    Sqlite,
}

mod display {
    use super::{BackendKind, Error};
    use std::fmt::{Display, Formatter, Result};

    impl Display for BackendKind {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            match self {
                Self::Sqlite => "sqlite".fmt(f),
            }
        }
    }

    impl Display for Error {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            self.0.fmt(f)
        }
    }

    impl std::error::Error for Error {}
}

impl TryFrom<&str> for BackendKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split(':').next() {
            Some("sqlite") => Ok(BackendKind::Sqlite),
            _ => Err(Error(format!("The connection string {s:?} is unsupported.")))
        }
    }
}

impl Backend {
    /// Connect to the linguist profile platform at the url held by the
    /// options, running any pending migrations.
    pub async fn lp(
        opts: impl Into<ConnectorOption> + Send,
    ) -> Result<Arc<dyn LPPlatform>, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let opts = opts.into();
        match BackendKind::try_from(opts.url.as_str()) {
            #[cfg(feature = "sqlite")]
            Ok(BackendKind::Sqlite) => Ok(Arc::new(SqliteBackend::lp(opts).await?)),
            #[cfg(not(feature = "sqlite"))]
            Ok(s) => Err(Box::new(Error(format!(
                "The feature {s:?} must be enabled for lpdb in order to connect to {:?}",
                opts.url,
            )))),
            Err(e) => Err(Box::new(e)),
        }
    }
}
