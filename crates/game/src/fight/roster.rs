//! Roster and leaderboard persistence over a minimal key-value string
//! store. Missing keys and malformed payloads always degrade to empty
//! collections; nothing in here is allowed to fail the game.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const RECENT_PLAYERS_KEY: &str = "stickfight_players";
pub const LEADERBOARD_KEY: &str = "stickfight_leaderboard";

const RECENT_PLAYERS_CAP: usize = 50;
const LEADERBOARD_CAP: usize = 10;

const NAME_PREFIXES: &[&str] = &[
    "Dark", "Shadow", "Thunder", "Lightning", "Fire", "Ice", "Storm", "Kick", "Punch", "Strike",
    "Dragon", "Tiger", "Phoenix", "Blade", "Iron", "Steel", "Golden", "Silver", "Cosmic", "Ninja",
    "Samurai",
];

const NAME_SUFFIXES: &[&str] = &[
    "Master", "Warrior", "Fighter", "Champion", "Destroyer", "Slayer", "Breaker", "Crusher",
    "Knight", "Lord", "King", "Queen", "Sage", "Falcon", "Eagle", "Wolf", "Bear", "Lion", "Hawk",
    "Viper",
];

/// String key-value collaborator. Reads answer absence with `None`; writes
/// degrade silently, matching the no-error-surface contract.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create store directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One JSON file per key, written atomically via a temp file rename.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_atomic(&self, key: &str, value: &str) -> io::Result<()> {
        let final_path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, value)?;
        if let Err(error) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(error);
        }
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(error) = self.write_atomic(key, value) {
            warn!(key, error = %error, "store_write_failed");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub wins: u32,
}

pub fn stored_players(store: &dyn KvStore) -> Vec<PlayerRecord> {
    read_list(store, RECENT_PLAYERS_KEY)
}

/// Appends a match record, keeping only the most recent entries.
pub fn save_player(store: &mut dyn KvStore, record: PlayerRecord) {
    let mut players = stored_players(store);
    players.push(record);
    if players.len() > RECENT_PLAYERS_CAP {
        let overflow = players.len() - RECENT_PLAYERS_CAP;
        players.drain(..overflow);
    }
    write_list(store, RECENT_PLAYERS_KEY, &players);
}

pub fn random_opponent(store: &dyn KvStore, rng: &mut impl Rng) -> Option<PlayerRecord> {
    let players = stored_players(store);
    if players.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..players.len());
    players.into_iter().nth(index)
}

pub fn leaderboard(store: &dyn KvStore) -> Vec<LeaderboardEntry> {
    read_list(store, LEADERBOARD_KEY)
}

/// Merges wins into the named entry and keeps the board sorted descending,
/// truncated to the top ten.
pub fn record_wins(store: &mut dyn KvStore, name: &str, wins: u32) {
    let mut board = leaderboard(store);
    match board.iter_mut().find(|entry| entry.name == name) {
        Some(entry) => entry.wins += wins,
        None => board.push(LeaderboardEntry {
            name: name.to_string(),
            wins,
        }),
    }
    board.sort_by(|a, b| b.wins.cmp(&a.wins));
    board.truncate(LEADERBOARD_CAP);
    write_list(store, LEADERBOARD_KEY, &board);
}

pub fn random_fighter_name(rng: &mut impl Rng) -> String {
    let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
    let number = rng.gen_range(1..=99);
    format!("{prefix}{suffix}{number}")
}

fn read_list<T: for<'de> Deserialize<'de>>(store: &dyn KvStore, key: &str) -> Vec<T> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(list) => list,
        Err(error) => {
            warn!(key, path = %error.path(), error = %error, "store_payload_corrupt");
            Vec::new()
        }
    }
}

fn write_list<T: Serialize>(store: &mut dyn KvStore, key: &str, list: &[T]) {
    match serde_json::to_string(list) {
        Ok(raw) => store.set(key, &raw),
        Err(error) => warn!(key, error = %error, "store_payload_serialize_failed"),
    }
}
