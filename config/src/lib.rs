//! Environment layering for the atelier binaries.
//!
//! Reads the `[env]` table of `$XDG_CONFIG_HOME/<app>/config.toml` and a
//! project `.env`, then applies both to the process environment without
//! overwriting anything already set. Precedence: **existing env > .env >
//! config.toml**.
//!
//! Keys are arbitrary; in practice this carries `GEMINI_API_KEY`,
//! `GEMINI_MODEL`, `GEMINI_BASE_URL`, `PROMPTS_DIR`, and `RUST_LOG`.

mod config_file;
mod env_file;

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read config.toml: {0}")]
    ConfigRead(std::io::Error),
    #[error("parse config.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    EnvFileRead(std::io::Error),
}

/// Loads both config sources and sets every key that is not already present
/// in the process environment.
///
/// * `app_name`: the XDG path component, `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of
///   the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let mut merged = config_file::load_env_map(app_name)?;
    let from_env_file = env_file::load_env_map(override_dir).map_err(LoadError::EnvFileRead)?;
    // .env entries shadow config.toml entries for the same key.
    merged.extend(from_env_file);

    for (key, value) in merged {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
        }
    }

    Ok(())
}

/// Ensures only one test mutates XDG_CONFIG_HOME at a time so temp dirs are
/// not overwritten or dropped early.
#[cfg(test)]
pub(crate) static XDG_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Restores XDG_CONFIG_HOME on drop so env is cleaned up even on panic.
#[cfg(test)]
pub(crate) struct RestoreXdgConfigHome(pub Option<String>);

#[cfg(test)]
impl Drop for RestoreXdgConfigHome {
    fn drop(&mut self) {
        match self.0.take() {
            Some(p) => std::env::set_var("XDG_CONFIG_HOME", p),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_config_toml(base: &Path, app: &str, body: &str) {
        let app_dir = base.join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
    }

    #[test]
    fn existing_env_wins() {
        env::set_var("ATELIER_TEST_EXISTING", "from_env");
        let _ = load_and_apply("atelier", None);
        assert_eq!(env::var("ATELIER_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("ATELIER_TEST_EXISTING");
    }

    #[test]
    fn load_and_apply_no_config_ok() {
        let r = load_and_apply("config-crate-nonexistent-app-xyz", None::<&std::path::Path>);
        assert!(r.is_ok());
    }

    #[test]
    fn env_file_overrides_config_toml() {
        let _guard = XDG_TEST_LOCK.lock().unwrap();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_config_toml(
            xdg_dir.path(),
            "atelier",
            "[env]\nATELIER_TEST_PRIORITY = \"from_toml\"\n",
        );

        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "ATELIER_TEST_PRIORITY=from_env_file\n",
        )
        .unwrap();

        let _restore = RestoreXdgConfigHome(env::var("XDG_CONFIG_HOME").ok());
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("ATELIER_TEST_PRIORITY");

        let _ = load_and_apply("atelier", Some(dotenv_dir.path()));
        let val = env::var("ATELIER_TEST_PRIORITY").unwrap();
        env::remove_var("ATELIER_TEST_PRIORITY");

        assert_eq!(val, "from_env_file");
    }

    #[test]
    fn config_toml_applied_when_no_env_file() {
        let _guard = XDG_TEST_LOCK.lock().unwrap();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_config_toml(
            xdg_dir.path(),
            "atelier",
            "[env]\nATELIER_TEST_TOML_ONLY = \"from_toml\"\n",
        );

        let empty_dir = tempfile::tempdir().unwrap();

        let _restore = RestoreXdgConfigHome(env::var("XDG_CONFIG_HOME").ok());
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        env::remove_var("ATELIER_TEST_TOML_ONLY");

        let _ = load_and_apply("atelier", Some(empty_dir.path()));
        let val = env::var("ATELIER_TEST_TOML_ONLY").unwrap();
        env::remove_var("ATELIER_TEST_TOML_ONLY");

        assert_eq!(val, "from_toml");
    }

    #[test]
    fn env_file_only_when_no_config_toml() {
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "ATELIER_TEST_ENV_FILE_ONLY=from_env_file_only\n",
        )
        .unwrap();

        env::remove_var("ATELIER_TEST_ENV_FILE_ONLY");
        let _ = load_and_apply("config-crate-nonexistent-app-xyz", Some(dotenv_dir.path()));
        let val = env::var("ATELIER_TEST_ENV_FILE_ONLY").unwrap();
        env::remove_var("ATELIER_TEST_ENV_FILE_ONLY");

        assert_eq!(val, "from_env_file_only");
    }

    #[test]
    fn invalid_config_toml_fails_with_parse_error() {
        let _guard = XDG_TEST_LOCK.lock().unwrap();
        let xdg_dir = tempfile::tempdir().unwrap();
        write_config_toml(xdg_dir.path(), "atelier", "invalid [[[\n");

        let _restore = RestoreXdgConfigHome(env::var("XDG_CONFIG_HOME").ok());
        env::set_var("XDG_CONFIG_HOME", xdg_dir.path());

        let result = load_and_apply("atelier", None::<&std::path::Path>);

        assert!(matches!(result, Err(LoadError::ConfigParse(_))));
    }
}
