mod fight;

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::{run_app, LoopConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fight::roster::{FileStore, KvStore, MemoryStore};
use fight::scene::{pad_layout, FightScene, SURFACE_HEIGHT, SURFACE_WIDTH};

const DATA_DIR_ENV_VAR: &str = "STICKFIGHT_DATA_DIR";
const SEED_ENV_VAR: &str = "STICKFIGHT_SEED";
const DEFAULT_DATA_DIR: &str = "data";

fn main() {
    init_tracing();
    info!("=== StickFight Startup ===");

    let seed = resolve_seed();
    let data_dir = resolve_data_dir();
    let store: Box<dyn KvStore> = match FileStore::open(data_dir.clone()) {
        Ok(store) => {
            info!(dir = %data_dir.display(), "file_store_ready");
            Box::new(store)
        }
        Err(err) => {
            warn!(error = %err, "file_store_unavailable, falling back to memory");
            Box::new(MemoryStore::new())
        }
    };

    let scene = FightScene::new(store, seed);
    let config = LoopConfig {
        window_title: "StickFight".to_string(),
        surface_width: SURFACE_WIDTH,
        surface_height: SURFACE_HEIGHT,
        pad: pad_layout(),
        ..LoopConfig::default()
    };

    if let Err(err) = run_app(config, Box::new(scene)) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn resolve_data_dir() -> PathBuf {
    env::var(DATA_DIR_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

fn resolve_seed() -> u64 {
    if let Ok(raw) = env::var(SEED_ENV_VAR) {
        if let Some(seed) = parse_seed(&raw) {
            info!(seed, "seed_from_env");
            return seed;
        }
        warn!(value = raw.as_str(), "invalid seed env var value; using clock");
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5713_f167)
}

fn parse_seed(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seed_accepts_decimal_values() {
        assert_eq!(parse_seed("42"), Some(42));
        assert_eq!(parse_seed("  7 "), Some(7));
    }

    #[test]
    fn parse_seed_rejects_junk() {
        assert_eq!(parse_seed(""), None);
        assert_eq!(parse_seed("  "), None);
        assert_eq!(parse_seed("fast"), None);
        assert_eq!(parse_seed("-3"), None);
    }
}
