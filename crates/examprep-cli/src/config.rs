//! Config file discovery and environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use examprep_core::config::ExamConfig;

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `examprep.toml` in the current directory
/// 2. `~/.config/examprep/config.toml`
///
/// Environment variable overrides: `EXAMPREP_DURATION_MINUTES`,
/// `EXAMPREP_PASSING_PERCENTAGE`.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examprep.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate().context("invalid exam configuration")?;
    Ok(config)
}

fn apply_env_overrides(config: &mut ExamConfig) -> Result<()> {
    if let Ok(value) = std::env::var("EXAMPREP_DURATION_MINUTES") {
        config.duration_minutes = value
            .trim()
            .parse()
            .with_context(|| format!("invalid EXAMPREP_DURATION_MINUTES: '{value}'"))?;
    }
    if let Ok(value) = std::env::var("EXAMPREP_PASSING_PERCENTAGE") {
        config.passing_percentage = value
            .trim()
            .parse()
            .with_context(|| format!("invalid EXAMPREP_PASSING_PERCENTAGE: '{value}'"))?;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examprep"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/definitely/missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_parsed_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examprep.toml");

        std::fs::write(
            &path,
            "duration_minutes = 20\n\n[[domains]]\nnumber = 2\nname = \"Controls\"\nquota = 4\n",
        )
        .unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.total_questions(), 4);

        std::fs::write(&path, "[[domains]]\nnumber = 7\nname = \"Bad\"\nquota = 4\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("outside 1..=5"));
    }
}
