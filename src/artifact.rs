use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::pipeline::FittedPipeline;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// On-disk store for fitted pipeline artifacts.
///
/// Artifacts are serialized as JSON next to a SHA-256 sidecar that is
/// verified on every load. A failed load or verification is fatal to the
/// caller — serving must refuse to start rather than run a partially loaded
/// model.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    artifacts_dir: PathBuf,
}

/// The conventional artifact name for the current crate version.
pub fn default_artifact_name() -> String {
    format!("triage_svc_v{}", env!("CARGO_PKG_VERSION"))
}

impl ArtifactStore {
    /// Creates a store at the default artifacts directory.
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_artifacts_dir())
    }

    /// Returns the default artifacts directory path.
    pub fn get_default_artifacts_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("TRIAGE_CACHE") {
            return PathBuf::from(path).join("artifacts");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("triage").join("artifacts");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("triage").join("artifacts");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("triage").join("artifacts")
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> io::Result<Self> {
        let artifacts_dir = artifacts_dir.as_ref().to_path_buf();
        fs::create_dir_all(&artifacts_dir)?;
        Ok(Self { artifacts_dir })
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.artifacts_dir.join(format!("{}.json", name))
    }

    pub fn checksum_path(&self, name: &str) -> PathBuf {
        self.artifacts_dir.join(format!("{}.sha256", name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.artifact_path(name).exists() && self.checksum_path(name).exists()
    }

    /// Serializes the artifact and writes the checksum sidecar.
    pub fn save(&self, name: &str, artifact: &FittedPipeline) -> Result<(), ArtifactError> {
        let path = self.artifact_path(name);
        log::info!("Saving artifact '{}' to {:?}", name, path);

        let bytes = serde_json::to_vec(artifact)?;
        let checksum = Self::checksum(&bytes);
        fs::write(&path, &bytes)?;
        fs::write(self.checksum_path(name), &checksum)?;

        log::info!("Artifact saved ({} bytes, sha256 {})", bytes.len(), checksum);
        Ok(())
    }

    /// Loads and verifies an artifact.
    ///
    /// Fails if the artifact or its checksum file is missing, if the
    /// checksum does not match, or if deserialization fails.
    pub fn load(&self, name: &str) -> Result<FittedPipeline, ArtifactError> {
        let path = self.artifact_path(name);
        let checksum_path = self.checksum_path(name);
        log::info!("Loading artifact '{}' from {:?}", name, path);

        if !path.exists() || !checksum_path.exists() {
            return Err(ArtifactError::NotFound(name.to_string()));
        }

        let bytes = fs::read(&path)?;
        let expected = fs::read_to_string(&checksum_path)?.trim().to_string();
        let actual = Self::checksum(&bytes);
        if actual != expected {
            log::error!(
                "Artifact '{}' failed verification: expected {}, got {}",
                name,
                expected,
                actual
            );
            return Err(ArtifactError::ChecksumMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }

        let artifact: FittedPipeline = serde_json::from_slice(&bytes)?;
        log::info!("Artifact '{}' verified and loaded", name);
        Ok(artifact)
    }

    /// Removes an artifact and its checksum file, if present.
    pub fn remove(&self, name: &str) -> Result<(), ArtifactError> {
        let path = self.artifact_path(name);
        let checksum_path = self.checksum_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        if checksum_path.exists() {
            fs::remove_file(&checksum_path)?;
        }
        Ok(())
    }

    fn checksum(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}
