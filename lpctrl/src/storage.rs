//! Storage for uploaded files, addressed by relative paths.

use async_trait::async_trait;
use rand::{
    Rng,
    distributions::Alphanumeric,
};
use std::{
    io,
    path::{
        Component,
        Path,
        PathBuf,
    },
    sync::Mutex,
};

const NAME_LENGTH: usize = 40;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store the contents under a freshly generated name within the
    /// directory, returning the relative path of the stored file.
    async fn store(
        &self,
        dir: &str,
        extension: &str,
        contents: &[u8],
    ) -> io::Result<String>;
    /// Remove the file at the relative path; a file that is already
    /// gone is not an error, but is reported as `false`.
    async fn delete(&self, path: &str) -> io::Result<bool>;
}

pub fn random_name(rng: &mut impl Rng, extension: &str) -> String {
    let name = rng.sample_iter(&Alphanumeric)
        .take(NAME_LENGTH)
        .map(char::from)
        .collect::<String>();
    if extension.is_empty() {
        name
    } else {
        format!("{name}.{}", extension.to_lowercase())
    }
}

/// Files kept under a root directory on the local filesystem.
pub struct LocalFileStorage<R = rand::rngs::StdRng> {
    root: PathBuf,
    rng: Mutex<R>,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_rng(root, rand::SeedableRng::from_entropy())
    }
}

impl<R: Rng + Send> LocalFileStorage<R> {
    pub fn with_rng(root: impl Into<PathBuf>, rng: R) -> Self {
        Self {
            root: root.into(),
            rng: Mutex::new(rng),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        if path.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage path: {path:?}"),
            ));
        }
        Ok(self.root.join(relative))
    }

    fn next_name(&self, extension: &str) -> String {
        match self.rng.lock() {
            Ok(mut rng) => random_name(&mut *rng, extension),
            Err(poisoned) => random_name(&mut *poisoned.into_inner(), extension),
        }
    }
}

#[async_trait]
impl<R: Rng + Send> FileStorage for LocalFileStorage<R> {
    async fn store(
        &self,
        dir: &str,
        extension: &str,
        contents: &[u8],
    ) -> io::Result<String> {
        let relative = format!("{dir}/{}", self.next_name(extension));
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, contents).await?;
        log::debug!("stored {} bytes at {relative}", contents.len());
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> io::Result<bool> {
        match tokio::fs::remove_file(self.resolve(path)?).await {
            Ok(()) => {
                log::debug!("deleted {path}");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("{path} was already absent from storage");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
