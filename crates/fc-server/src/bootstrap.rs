use std::path::Path;

use anyhow::Context;

use fc_config::FleetConfig;
use fc_db::repos::SeedFile;

use crate::cli::GlobalFlags;

/// Layered config plus command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<FleetConfig> {
    let mut config = FleetConfig::load_with_dotenv(Path::new("."))?;
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    tracing::debug!(database = %config.database.path, "configuration loaded");
    Ok(config)
}

pub fn read_seed_file(path: &Path) -> anyhow::Result<SeedFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} is not valid seed JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn seed_file_parses_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"staff": [{{"name": "Alan Day"}}], "assets": [{{"make": "JCB", "model": "3CX"}}]}}"#
        )
        .unwrap();

        let seed = read_seed_file(file.path()).unwrap();
        assert_eq!(seed.staff.len(), 1);
        assert_eq!(seed.assets[0].model, "3CX");
    }

    #[test]
    fn bad_seed_file_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_seed_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not valid seed JSON"));
    }
}
