use std::path::PathBuf;

use eyre::{Context, Result};

/// Walk from the current directory up to the filesystem root looking for a
/// `.env` file. Returns the loaded path, if any.
///
/// Runs before logging is installed, so nothing is traced here.
pub fn load_env_recursively() -> Result<Option<PathBuf>> {
    let mut path = std::env::current_dir()?;
    loop {
        let env_path = path.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load .env from path: {}", env_path.display()))?;
            return Ok(Some(env_path));
        }
        if !path.pop() {
            break;
        }
    }
    Ok(None)
}

/// Read an environment variable, treating an empty value as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
