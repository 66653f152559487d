//! Configuration resolution for CLI runs

use anyhow::{Context, Result};
use spanwatch_core::config::{AnalysisConfig, Preset, Validatable};
use std::path::PathBuf;

/// Flags shared by every subcommand that runs the analyzer
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub config: Option<PathBuf>,
    pub preset: Option<Preset>,
    pub workers: Option<usize>,
    pub timeout_ms: Option<u64>,
}

/// YAML file (or preset) first, then flag overrides, then validation
pub fn resolve_config(args: &ConfigArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_yaml(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => AnalysisConfig::preset(args.preset.unwrap_or_default()),
    };

    if let Some(workers) = args.workers {
        config = config.workers(workers);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.solver(|s| s.timeout_ms(timeout_ms));
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_preset_without_file() {
        let config = resolve_config(&ConfigArgs {
            preset: Some(Preset::Fast),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.preset, Preset::Fast);
        assert_eq!(config.solver.timeout_ms, 1_000);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version: 1\npreset: thorough").unwrap();

        let config = resolve_config(&ConfigArgs {
            config: Some(file.path().to_path_buf()),
            workers: Some(3),
            timeout_ms: Some(250),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.preset, Preset::Thorough);
        assert_eq!(config.parallel.workers, 3);
        assert_eq!(config.solver.timeout_ms, 250);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = resolve_config(&ConfigArgs {
            timeout_ms: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
