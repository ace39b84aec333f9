//! RocksDB persistence for checkpoint histories.
//!
//! Each checkpoint lives under its own key, `cp::` + address + big-endian
//! index, so an ordered scan over the prefix yields every history in
//! insertion order and an append or overwrite touches a single key.

use crate::errors::CoreError;
use crate::history::{CheckpointWrite, History};
use crate::types::{Address, Checkpoint, Step};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Constants for RocksDB keys
const HEAD_KEY: &[u8] = b"head";
const CHECKPOINT_PREFIX: &[u8] = b"cp::";
const CHECKPOINT_KEY_LEN: usize = CHECKPOINT_PREFIX.len() + 32 + 8;

/// A RocksDB-backed store of checkpoint histories.
#[derive(Clone)]
pub struct HistoryStore {
    /// The RocksDB instance
    db: Arc<DB>,
}

fn checkpoint_key(addr: &Address, index: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(CHECKPOINT_KEY_LEN);
    key.extend_from_slice(CHECKPOINT_PREFIX);
    key.extend_from_slice(addr);

    let mut index_bytes = [0u8; 8];
    BigEndian::write_u64(&mut index_bytes, index as u64);
    key.extend_from_slice(&index_bytes);
    key
}

fn encode_checkpoint(checkpoint: &Checkpoint) -> Result<Vec<u8>, CoreError> {
    bincode::serialize(checkpoint).map_err(|e| CoreError::SerializationError(e.to_string()))
}

impl HistoryStore {
    /// Opens (or creates) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path).map_err(|e| CoreError::StorageError(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Wraps an already opened database.
    pub fn from_db(db: Arc<DB>) -> Self {
        Self { db }
    }

    /// Rebuilds every persisted history with one ordered scan.
    pub fn load_histories(&self) -> Result<HashMap<Address, History>, CoreError> {
        let mut loaded: HashMap<Address, Vec<Checkpoint>> = HashMap::new();

        let iter = self
            .db
            .iterator(IteratorMode::From(CHECKPOINT_PREFIX, Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| CoreError::StorageError(e.to_string()))?;
            if !key.starts_with(CHECKPOINT_PREFIX) {
                break;
            }
            if key.len() != CHECKPOINT_KEY_LEN {
                return Err(CoreError::StorageError(format!(
                    "Malformed checkpoint key of length {}",
                    key.len()
                )));
            }

            let mut addr = [0u8; 32];
            addr.copy_from_slice(&key[CHECKPOINT_PREFIX.len()..CHECKPOINT_PREFIX.len() + 32]);
            let index = BigEndian::read_u64(&key[CHECKPOINT_PREFIX.len() + 32..]) as usize;

            let checkpoint: Checkpoint = bincode::deserialize(&value)
                .map_err(|e| CoreError::SerializationError(e.to_string()))?;

            let checkpoints = loaded.entry(addr).or_default();
            if index != checkpoints.len() {
                return Err(CoreError::StorageError(format!(
                    "Gap in history of {}: expected index {}, found {}",
                    hex::encode(addr),
                    checkpoints.len(),
                    index
                )));
            }
            checkpoints.push(checkpoint);
        }

        info!("Loaded {} account histories from RocksDB", loaded.len());

        Ok(loaded
            .into_iter()
            .map(|(addr, checkpoints)| (addr, History::from_checkpoints(checkpoints)))
            .collect())
    }

    /// Applies the planned writes of several accounts in one atomic batch.
    pub fn commit(&self, writes: &[(Address, Vec<CheckpointWrite>)]) -> Result<(), CoreError> {
        let mut batch = WriteBatch::default();
        for (addr, account_writes) in writes {
            for write in account_writes {
                batch.put(checkpoint_key(addr, write.index), encode_checkpoint(&write.checkpoint)?);
            }
        }

        self.db
            .write(batch)
            .map_err(|e| CoreError::StorageError(format!("Failed to persist checkpoints: {}", e)))?;

        debug!("Persisted checkpoint writes for {} accounts", writes.len());
        Ok(())
    }

    /// Replaces a persisted history of `old_len` entries with `checkpoints`.
    pub fn replace(
        &self,
        addr: &Address,
        old_len: usize,
        checkpoints: &[Checkpoint],
    ) -> Result<(), CoreError> {
        let mut batch = WriteBatch::default();
        for (index, checkpoint) in checkpoints.iter().enumerate() {
            batch.put(checkpoint_key(addr, index), encode_checkpoint(checkpoint)?);
        }
        for index in checkpoints.len()..old_len {
            batch.delete(checkpoint_key(addr, index));
        }

        self.db
            .write(batch)
            .map_err(|e| CoreError::StorageError(format!("Failed to replace history: {}", e)))
    }

    /// Reads the persisted head step, if one was saved.
    pub fn load_head(&self) -> Result<Option<Step>, CoreError> {
        let bytes = self
            .db
            .get(HEAD_KEY)
            .map_err(|e| CoreError::StorageError(e.to_string()))?;

        match bytes {
            Some(bytes) if bytes.len() == 8 => Ok(Some(LittleEndian::read_u64(&bytes))),
            Some(bytes) => Err(CoreError::StorageError(format!(
                "Malformed head step of length {}",
                bytes.len()
            ))),
            None => Ok(None),
        }
    }

    /// Persists the head step.
    pub fn save_head(&self, step: Step) -> Result<(), CoreError> {
        let mut bytes = [0u8; 8];
        LittleEndian::write_u64(&mut bytes, step);

        self.db
            .put(HEAD_KEY, bytes)
            .map_err(|e| CoreError::StorageError(format!("Failed to persist head: {}", e)))
    }
}
