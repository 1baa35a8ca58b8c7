//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use kasir_client::{ApiClient, ClientError, Session};
use tracing::debug;

use crate::config::{CliConfig, API_URL_ENV};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Where the login session is stored.
    pub session_path: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };
        let config = config.with_api_url_override(std::env::var(API_URL_ENV).ok());

        Ok(Self {
            config,
            output,
            cwd,
            session_path: dirs_path().join("kasir").join("session.json"),
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["kasir.toml", ".kasir.toml", "kasir.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        debug!(path = %config_path.display(), "using config file");
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Client without a session, for login and account recovery.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::new(self.config.api.clone()).context("Invalid API configuration")
    }

    /// Client carrying the stored session.
    pub fn authed_client(&self) -> Result<ApiClient> {
        let session = match self.load_session()? {
            Some(session) => session,
            None => bail!("Not logged in. Run `kasir login` first."),
        };
        Ok(self.client()?.with_session(session))
    }

    pub fn load_session(&self) -> Result<Option<Session>> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.session_path)
            .with_context(|| format!("Failed to read session: {}", self.session_path.display()))?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                debug!(error = %e, "discarding unreadable session file");
                self.delete_session()?;
                Ok(None)
            }
        }
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.session_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.session_path, content)
            .with_context(|| format!("Failed to write session: {}", self.session_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.session_path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn delete_session(&self) -> Result<()> {
        match std::fs::remove_file(&self.session_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session"),
        }
    }

    /// Drop the stored session if `err` says the server no longer accepts it.
    pub fn forget_rejected_session(&self, err: &anyhow::Error) -> bool {
        let rejected = err
            .chain()
            .filter_map(|e| e.downcast_ref::<ClientError>())
            .any(|e| matches!(e, ClientError::Unauthorized(_)));
        if rejected {
            let _ = self.delete_session();
        }
        rejected
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_client::User;

    fn context(dir: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
            session_path: dir.join("kasir").join("session.json"),
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kasir-ctx-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_session_lifecycle() {
        let dir = temp_dir("session");
        let ctx = context(&dir);
        assert!(ctx.load_session().unwrap().is_none());
        assert!(ctx.authed_client().is_err());

        let user: User = serde_json::from_str(r#"{"name":"Nay"}"#).unwrap();
        ctx.save_session(&Session::new("tok", user)).unwrap();
        let loaded = ctx.load_session().unwrap().unwrap();
        assert_eq!(loaded.token(), "tok");
        assert!(ctx.authed_client().unwrap().is_authenticated());

        ctx.delete_session().unwrap();
        ctx.delete_session().unwrap();
        assert!(ctx.load_session().unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let dir = temp_dir("corrupt");
        let ctx = context(&dir);
        std::fs::create_dir_all(ctx.session_path.parent().unwrap()).unwrap();
        std::fs::write(&ctx.session_path, "not json").unwrap();

        assert!(ctx.load_session().unwrap().is_none());
        assert!(!ctx.session_path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = temp_dir("find");
        let nested = dir.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.join("kasir.toml"), "[store]\nname = \"Toko Atas\"\n").unwrap();

        let config = Context::find_config(&nested).unwrap();
        assert_eq!(config.store.name, "Toko Atas");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_forget_rejected_session() {
        let dir = temp_dir("reject");
        let ctx = context(&dir);
        let user: User = serde_json::from_str("{}").unwrap();
        ctx.save_session(&Session::new("tok", user)).unwrap();

        let err = anyhow::Error::new(ClientError::Unauthorized("expired".into())).context("listing products");
        assert!(ctx.forget_rejected_session(&err));
        assert!(!ctx.session_path.exists());

        let other = anyhow::anyhow!("boom");
        assert!(!ctx.forget_rejected_session(&other));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
