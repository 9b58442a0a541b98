use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::{IdleTaskQueue, TaskPriority, schedule_process};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CachedAsset {
    bytes: Vec<u8>,
    stored_at: Instant,
    ttl: Duration,
}

impl CachedAsset {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

/// Byte blobs kept for a limited time, keyed by their source.
#[derive(Default)]
pub struct AssetCache {
    entries: HashMap<String, CachedAsset>,
}

pub type SharedAssetCache = Rc<RefCell<AssetCache>>;

impl AssetCache {
    pub fn insert(&mut self, key: String, bytes: Vec<u8>, ttl: Duration, now: Instant) {
        self.entries.insert(
            key,
            CachedAsset {
                bytes,
                stored_at: now,
                ttl,
            },
        );
    }

    #[cfg(test)]
    pub fn get(&self, key: &str, now: Instant) -> Option<&[u8]> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.bytes.as_slice())
    }

    /// Drops expired entries and returns how many were removed.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries
            .values()
            .map(|entry| entry.bytes.len() as u64)
            .sum()
    }
}

/// A file read queued by [`schedule_preload`] that has not reached the cache yet.
pub struct PendingAsset {
    key: String,
    result: Receiver<Result<Vec<u8>>>,
}

/// Queues one read per path; finished reads are picked up by [`collect_preloaded`].
pub fn schedule_preload(
    queue: &mut IdleTaskQueue,
    paths: &[PathBuf],
    priority: TaskPriority,
) -> Vec<PendingAsset> {
    paths
        .iter()
        .map(|path| PendingAsset {
            key: path.display().to_string(),
            result: schedule_process(queue, path.clone(), read_asset, priority),
        })
        .collect()
}

fn read_asset(path: PathBuf) -> Result<Vec<u8>> {
    let bytes =
        fs::read(&path).with_context(|| format!("failed to preload {}", path.display()))?;
    log::debug!("preloaded {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Hands finished reads to Low-priority cache inserts and keeps the ones still queued.
pub fn collect_preloaded(
    pending: &mut Vec<PendingAsset>,
    queue: &mut IdleTaskQueue,
    cache: &SharedAssetCache,
) {
    pending.retain_mut(|asset| match asset.result.try_recv() {
        Ok(Ok(bytes)) => {
            schedule_cache_insert(
                queue,
                cache,
                mem::take(&mut asset.key),
                bytes,
                TaskPriority::Low,
            );
            false
        }
        Ok(Err(error)) => {
            log::warn!("{error:#}");
            false
        }
        Err(TryRecvError::Empty) => true,
        Err(TryRecvError::Disconnected) => false,
    });
}

pub fn schedule_cache_insert(
    queue: &mut IdleTaskQueue,
    cache: &SharedAssetCache,
    key: String,
    bytes: Vec<u8>,
    priority: TaskPriority,
) {
    let cache = Rc::clone(cache);
    queue.add_task(
        Box::new(move || -> Result<()> {
            cache
                .borrow_mut()
                .insert(key, bytes, DEFAULT_TTL, Instant::now());
            Ok(())
        }),
        priority,
    );
}

pub fn schedule_cleanup(queue: &mut IdleTaskQueue, cache: &SharedAssetCache) {
    let cache = Rc::clone(cache);
    queue.add_task(
        Box::new(move || -> Result<()> {
            let removed = cache.borrow_mut().prune_expired(Instant::now());
            if removed > 0 {
                log::debug!("pruned {removed} expired cache entries");
            }
            Ok(())
        }),
        TaskPriority::Low,
    );
}
