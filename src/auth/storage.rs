use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use super::session::{Identity, TokenPair};

/// Durable storage key for the access token
const ACCESS_TOKEN_FILE: &str = "access_token";

/// Durable storage key for the refresh token
const REFRESH_TOKEN_FILE: &str = "refresh_token";

/// Durable storage key for the serialized signed-in identity
const IDENTITY_FILE: &str = "user.json";

/// Durable credential storage: one file per key under the app's data
/// directory. The session store is the only writer; the API client reads
/// the access token from here before every request so the freshest
/// persisted value always wins.
#[derive(Clone)]
pub struct CredentialStorage {
    dir: PathBuf,
}

impl CredentialStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create credential directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn write_key(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.path(name);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write credential key: {}", name))?;

        // Credential files are readable by the owner only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)
                .with_context(|| format!("Failed to stat credential key: {}", name))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)
                .with_context(|| format!("Failed to set permissions on: {}", name))?;
        }

        Ok(())
    }

    fn read_key(&self, name: &str) -> Option<String> {
        let contents = fs::read_to_string(self.path(name)).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn remove_key(&self, name: &str) {
        let path = self.path(name);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!(key = name, error = %e, "Failed to remove credential key");
            }
        }
    }

    /// Persist both halves of the credential pair. These are two separate
    /// writes with no transactional discipline; `initialize()` treats a
    /// missing half as unauthenticated.
    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.write_key(ACCESS_TOKEN_FILE, &tokens.access)?;
        self.write_key(REFRESH_TOKEN_FILE, &tokens.refresh)?;
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_key(ACCESS_TOKEN_FILE)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_key(REFRESH_TOKEN_FILE)
    }

    pub fn store_identity(&self, identity: &Identity) -> Result<()> {
        let json = serde_json::to_string_pretty(identity)?;
        self.write_key(IDENTITY_FILE, &json)
    }

    /// Load the stored identity. `Ok(None)` means no record; `Err` means a
    /// record exists but does not deserialize (caller decides to purge).
    pub fn load_identity(&self) -> Result<Option<Identity>> {
        let Some(json) = self.read_key(IDENTITY_FILE) else {
            return Ok(None);
        };
        let identity: Identity =
            serde_json::from_str(&json).context("Failed to parse stored identity")?;
        Ok(Some(identity))
    }

    pub fn purge_identity(&self) {
        self.remove_key(IDENTITY_FILE);
    }

    /// Remove all three keys together. Logs failures but never errors;
    /// logout has no failure mode.
    pub fn clear(&self) {
        self.remove_key(ACCESS_TOKEN_FILE);
        self.remove_key(REFRESH_TOKEN_FILE);
        self.remove_key(IDENTITY_FILE);
    }
}
