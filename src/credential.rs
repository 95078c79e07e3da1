use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::error::{CvmError, Result};

/// Tencent Cloud API credential.
///
/// `token` is set for temporary credentials issued by STS/CAM and is sent
/// in the `X-TC-Token` header. The `Debug` implementation redacts
/// `secret_key` and `token` to prevent accidental leakage in logs.
#[derive(Clone)]
pub struct Credential {
    pub secret_id: String,
    pub secret_key: String,
    pub token: Option<String>,
}

impl Credential {
    /// Creates a long-lived credential from a secret id and key.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            token: None,
        }
    }

    /// Attaches a session token, making this a temporary credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fails with `MissingCredential` when the secret id or key is empty.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.secret_id.is_empty() || self.secret_key.is_empty() {
            return Err(CvmError::MissingCredential(
                "secret id or secret key is empty".into(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"****")
            .field("token", &self.token.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Supplies a [`Credential`] for each call.
///
/// Implementations must be cheap to call repeatedly; the client fetches a
/// credential on every attempt so that refreshed material is picked up.
pub trait CredentialProvider: Send + Sync {
    /// Resolves a credential, or fails with `MissingCredential`.
    fn get(&self) -> Result<Credential>;
}

/// Provides a credential from explicitly specified values.
pub struct StaticProvider {
    credential: Credential,
}

impl StaticProvider {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

impl CredentialProvider for StaticProvider {
    fn get(&self) -> Result<Credential> {
        self.credential.validate()?;
        Ok(self.credential.clone())
    }
}

/// Provides a credential from environment variables.
///
/// Reads `TENCENTCLOUD_SECRET_ID`, `TENCENTCLOUD_SECRET_KEY` and the
/// optional `TENCENTCLOUD_TOKEN`.
pub struct EnvProvider;

impl CredentialProvider for EnvProvider {
    fn get(&self) -> Result<Credential> {
        let id = env::var("TENCENTCLOUD_SECRET_ID")
            .map_err(|_| CvmError::MissingCredential("TENCENTCLOUD_SECRET_ID not set".into()))?;
        let key = env::var("TENCENTCLOUD_SECRET_KEY")
            .map_err(|_| CvmError::MissingCredential("TENCENTCLOUD_SECRET_KEY not set".into()))?;

        let mut credential = Credential::new(id, key);
        if let Ok(token) = env::var("TENCENTCLOUD_TOKEN")
            && !token.is_empty()
        {
            credential = credential.with_token(token);
        }
        credential.validate()?;
        Ok(credential)
    }
}

/// Provides a credential from the shared credentials profile file.
///
/// Reads `~/.tencentcloud/credentials` in INI format. The default profile
/// name is `default`.
pub struct ProfileProvider {
    profile_name: String,
    file_path: Option<PathBuf>,
}

impl Default for ProfileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileProvider {
    /// Creates a provider that reads the `default` profile.
    pub fn new() -> Self {
        Self {
            profile_name: "default".to_string(),
            file_path: None,
        }
    }

    /// Specifies a custom profile name.
    pub fn with_profile(mut self, name: impl Into<String>) -> Self {
        self.profile_name = name.into();
        self
    }

    /// Specifies a custom file path instead of the default location.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    fn default_path() -> Result<PathBuf> {
        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| CvmError::Config("cannot determine home directory".into()))?;
        Ok(PathBuf::from(home).join(".tencentcloud").join("credentials"))
    }

    fn parse_ini(content: &str, profile: &str) -> Result<Credential> {
        let section_header = format!("[{}]", profile);
        let mut in_section = false;
        let mut secret_id = None;
        let mut secret_key = None;

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_section = line == section_header;
                continue;
            }
            if !in_section || line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "secret_id" => secret_id = Some(value.trim().to_string()),
                    "secret_key" => secret_key = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }

        match (secret_id, secret_key) {
            (Some(id), Some(key)) => Ok(Credential::new(id, key)),
            _ => Err(CvmError::Config(format!(
                "profile '{}' missing secret_id or secret_key",
                profile
            ))),
        }
    }
}

impl CredentialProvider for ProfileProvider {
    fn get(&self) -> Result<Credential> {
        let path = match &self.file_path {
            Some(p) => p.clone(),
            None => Self::default_path()?,
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            CvmError::Config(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        let credential = Self::parse_ini(&content, &self.profile_name)?;
        credential.validate()?;
        Ok(credential)
    }
}

/// Tries multiple credential providers in order and returns the first success.
pub struct ChainProvider {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainProvider {
    /// Creates a chain with the given providers.
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Creates the default credential chain: Env → Profile.
    pub fn default_chain() -> Self {
        Self {
            providers: vec![Box::new(EnvProvider), Box::new(ProfileProvider::new())],
        }
    }
}

impl CredentialProvider for ChainProvider {
    fn get(&self) -> Result<Credential> {
        let mut last_err = CvmError::MissingCredential("no credential providers configured".into());
        for provider in &self.providers {
            match provider.get() {
                Ok(cred) => return Ok(cred),
                Err(e) => last_err = e,
            }
        }
        Err(CvmError::MissingCredential(format!(
            "all credential providers failed, last error: {}",
            last_err
        )))
    }
}

/// A credential together with the instant it stops being usable.
pub struct TimedCredential {
    pub credential: Credential,
    pub expires_at: SystemTime,
}

/// Fetches a fresh [`TimedCredential`] from an underlying source, e.g. an
/// STS endpoint or an instance metadata service.
pub trait CredentialSource: Send + Sync {
    fn fetch(&self) -> Result<TimedCredential>;
}

struct CachedCredential {
    credential: Credential,
    expires_at: SystemTime,
}

/// Wraps a [`CredentialSource`] and caches its last good value.
///
/// The cached credential is reused until its expiry is within the safety
/// margin, then fetched again. The cache mutex is held across the fetch,
/// so concurrent `get()` calls during a refresh coalesce into one
/// underlying fetch whose result fans out to all waiters.
pub struct RefreshableProvider<S> {
    source: S,
    margin: Duration,
    cache: Mutex<Option<CachedCredential>>,
}

impl<S: CredentialSource> RefreshableProvider<S> {
    /// Default safety margin before expiry at which a refresh is triggered.
    pub const DEFAULT_MARGIN: Duration = Duration::from_secs(300);

    pub fn new(source: S) -> Self {
        Self::with_margin(source, Self::DEFAULT_MARGIN)
    }

    pub fn with_margin(source: S, margin: Duration) -> Self {
        Self {
            source,
            margin,
            cache: Mutex::new(None),
        }
    }

    fn is_fresh(&self, cached: &CachedCredential) -> bool {
        match cached.expires_at.duration_since(SystemTime::now()) {
            Ok(remaining) => remaining > self.margin,
            Err(_) => false,
        }
    }
}

impl<S: CredentialSource> CredentialProvider for RefreshableProvider<S> {
    fn get(&self) -> Result<Credential> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(cached) = cache.as_ref()
            && self.is_fresh(cached)
        {
            return Ok(cached.credential.clone());
        }

        let fetched = self.source.fetch()?;
        fetched.credential.validate()?;
        let credential = fetched.credential.clone();
        *cache = Some(CachedCredential {
            credential: fetched.credential,
            expires_at: fetched.expires_at,
        });
        Ok(credential)
    }
}
