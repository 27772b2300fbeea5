//! bz-logging: NDJSON game events and game manifests.
//!
//! Append-only NDJSON logs for replaying and auditing games after the fact.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game manifest schema version.
pub const GAME_MANIFEST_VERSION: u32 = 1;

/// One scored category, as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecordV1 {
    pub player: usize,
    pub category: String,
    pub dice: [u8; 5],
    pub points: u16,
    pub yahtzee_bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotalV1 {
    pub name: String,
    pub upper_total: u16,
    pub upper_bonus: u16,
    pub lower_total: u16,
    pub yahtzee_bonus: u16,
    pub grand_total: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecordV1 {
    pub game_index: u64,
    pub seed: u64,
    pub commits: Vec<CommitRecordV1>,
    pub totals: Vec<PlayerTotalV1>,
    pub winners: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameManifestV1 {
    pub game_manifest_version: u32,
    pub created_ts_ms: u64,

    pub ruleset_id: String,
    pub yahtzee_bonus_rule: String,

    // Hashes for reproducibility.
    pub git_hash: Option<String>,
    pub config_hash: Option<String>,

    pub seed: u64,
    pub chance_mode: String, // "rng" | "event_keyed"
    pub players: Vec<String>,

    pub games: Vec<GameRecordV1>,
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn try_git_hash() -> Option<String> {
    use std::process::Command;

    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8(out.stdout).ok()?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<GameManifestV1, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<GameManifestV1>(&bytes)?)
}

pub fn write_manifest_atomic(
    path: impl AsRef<Path>,
    m: &GameManifestV1,
) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(m)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Schema versioning fields carried by every event.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub ruleset_id: &'static str,
    pub logging_version: &'static str,
}

impl VersionInfoV1 {
    pub fn new(ruleset_id: &'static str) -> Self {
        Self {
            ruleset_id,
            logging_version: VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStartEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub seed: u64,
    pub chance_mode: &'static str,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub player: usize,
    pub round: u8,
    pub roll: u8,
    pub held: [bool; 5],
    pub dice: [u8; 5],
    pub rolls_remaining: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub player: usize,
    pub pos: u8,
    pub held: [bool; 5],
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub player: usize,
    pub category: String,
    pub dice: [u8; 5],
    pub points: u16,
    pub yahtzee_bonus: bool,
    pub grand_total: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct IllegalActionEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub player: usize,
    pub action: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameOverEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub game_index: u64,
    pub totals: Vec<PlayerTotalV1>,
    pub winners: Vec<usize>,
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
