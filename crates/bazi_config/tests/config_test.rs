//! Loading configuration files from disk.

use std::path::PathBuf;

use bazi_config::{BaziConfig, ConfigError};

fn temp_file(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("bazi_config_{}_{name}", std::process::id()));
    std::fs::write(&path, text).unwrap();
    path
}

/// A full file round-trips into engine and calendar settings.
#[test]
fn load_full_file() {
    let path = temp_file(
        "full.toml",
        "[calendar]\nutc_offset_hours = 9.0\n\
         [luck]\nmax_cycles = 6\n\
         [scoring]\nuseful_pattern_discount = true\n\
         [log]\nlevel = \"debug\"\n",
    );
    let config = BaziConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let options = config.luck_options();
    assert_eq!(options.max_cycles, 6);
    assert!(options.scoring.useful_pattern_discount);
    assert_eq!(config.calendar().unwrap().utc_offset_hours(), 9.0);
    assert_eq!(config.log.level, "debug");
}

/// A missing file is an I/O error for `load`, defaults for `load_or_default`.
#[test]
fn missing_file() {
    let path = std::env::temp_dir().join("bazi_config_does_not_exist.toml");
    assert!(matches!(BaziConfig::load(&path), Err(ConfigError::Io { .. })));
    assert_eq!(
        BaziConfig::load_or_default(Some(&path)).unwrap(),
        BaziConfig::default()
    );
    assert_eq!(BaziConfig::load_or_default(None).unwrap(), BaziConfig::default());
}
