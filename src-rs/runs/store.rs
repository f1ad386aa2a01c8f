use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tracing::warn;

use super::types::{RunRecord, RunStatus, RunUpdate};

pub const INTERRUPTED: &str = "interrupted by restart";

static COUNTER: AtomicUsize = AtomicUsize::new(1);

/// In-memory run records, optionally mirrored to a JSON file after every change.
pub struct RunStore {
    path: Option<PathBuf>,
    runs: RwLock<HashMap<String, RunRecord>>,
}

impl RunStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            runs: RwLock::new(HashMap::new()),
        }
    }

    /// Starts from whatever a previous process persisted at `path`.
    ///
    /// Workflows only live in memory, so any run that was still in flight is
    /// marked failed; its pending review can no longer be answered.
    pub fn open(path: PathBuf) -> Self {
        let existing = Self::load_from_disk(&path).unwrap_or_default();
        let mut runs = HashMap::with_capacity(existing.len());
        let mut interrupted = 0usize;
        for mut run in existing {
            if !run.status.is_finished() {
                run.status = RunStatus::Failed;
                run.pending_request_id = None;
                run.error = Some(INTERRUPTED.to_string());
                run.completed_at = Some(Utc::now());
                interrupted += 1;
            }
            runs.insert(run.id.clone(), run);
        }
        if interrupted > 0 {
            warn!(path = %path.display(), interrupted, "failed runs interrupted by restart");
            persist(&path, &runs);
        }
        Self {
            path: Some(path),
            runs: RwLock::new(runs),
        }
    }

    pub fn create(&self, topic: &str) -> RunRecord {
        let id = next_id();
        let run = RunRecord {
            id: id.clone(),
            topic: topic.to_string(),
            status: RunStatus::Drafting,
            draft: None,
            pending_request_id: None,
            output: None,
            error: None,
            revisions: 0,
            created_at: Utc::now(),
            completed_at: None,
        };
        if let Ok(mut map) = self.runs.write() {
            map.insert(id, run.clone());
            self.save_if_needed(&map);
        }
        run
    }

    pub fn update(&self, id: &str, change: RunUpdate) -> Option<RunRecord> {
        let mut updated = None;
        if let Ok(mut map) = self.runs.write() {
            if let Some(run) = map.get_mut(id) {
                if let Some(status) = change.status {
                    run.status = status;
                }
                if change.draft.is_some() {
                    run.draft = change.draft;
                }
                if let Some(pending) = change.pending_request_id {
                    run.pending_request_id = pending;
                }
                if change.output.is_some() {
                    run.output = change.output;
                }
                if change.error.is_some() {
                    run.error = change.error;
                }
                if let Some(revisions) = change.revisions {
                    run.revisions = revisions;
                }
                if run.status.is_finished() && run.completed_at.is_none() {
                    run.completed_at = Some(Utc::now());
                }
                updated = Some(run.clone());
            }
            if updated.is_some() {
                self.save_if_needed(&map);
            }
        }
        updated
    }

    pub fn get(&self, id: &str) -> Option<RunRecord> {
        let map = self.runs.read().ok()?;
        map.get(id).cloned()
    }

    /// Newest first.
    pub fn list(&self, limit: usize) -> Vec<RunRecord> {
        let map = match self.runs.read() {
            Ok(lock) => lock,
            Err(_) => return vec![],
        };
        let mut items: Vec<RunRecord> = map.values().cloned().collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| sequence(&b.id).cmp(&sequence(&a.id)))
        });
        items.truncate(limit);
        items
    }

    // Called with the write guard held so snapshots reach disk in order.
    fn save_if_needed(&self, map: &HashMap<String, RunRecord>) {
        if let Some(path) = &self.path {
            persist(path, map);
        }
    }

    pub fn load_from_disk(path: &Path) -> Option<Vec<RunRecord>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str::<Vec<RunRecord>>(&data).ok()
    }
}

fn persist(path: &Path, map: &HashMap<String, RunRecord>) {
    let list: Vec<&RunRecord> = map.values().collect();
    match serde_json::to_string_pretty(&list) {
        Ok(serialized) => {
            if let Err(err) = fs::write(path, serialized) {
                warn!(path = %path.display(), error = %err, "failed to persist runs");
            }
        }
        Err(err) => warn!(error = %err, "failed to serialize runs"),
    }
}

// Orders runs created within the same millisecond.
fn sequence(id: &str) -> usize {
    id.rsplit('_').next().and_then(|raw| raw.parse().ok()).unwrap_or(0)
}

fn next_id() -> String {
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("run_{}_{}", Utc::now().timestamp_millis(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_update_to_completion() {
        let store = RunStore::new(None);
        let run = store.create("cats");
        assert_eq!(run.status, RunStatus::Drafting);

        let waiting = store
            .update(
                &run.id,
                RunUpdate {
                    status: Some(RunStatus::AwaitingFeedback),
                    draft: Some("Cats are great.".to_string()),
                    pending_request_id: Some(Some("req-1".to_string())),
                    ..RunUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(waiting.pending_request_id.as_deref(), Some("req-1"));
        assert!(waiting.completed_at.is_none());

        let done = store
            .update(
                &run.id,
                RunUpdate {
                    status: Some(RunStatus::Completed),
                    pending_request_id: Some(None),
                    output: Some("Polished".to_string()),
                    ..RunUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(done.pending_request_id, None);
        assert_eq!(done.draft.as_deref(), Some("Cats are great."));
        assert!(done.completed_at.is_some());
        assert_eq!(store.get(&run.id), Some(done));
    }

    #[test]
    fn update_of_unknown_run_is_none() {
        let store = RunStore::new(None);
        assert!(store.update("missing", RunUpdate::default()).is_none());
    }

    #[test]
    fn list_is_limited_and_newest_first() {
        let store = RunStore::new(None);
        let first = store.create("a");
        let second = store.create("b");
        let third = store.create("c");
        let listed: Vec<String> = store.list(2).into_iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![third.id, second.id]);
        assert_eq!(store.list(10).last().map(|r| r.id.clone()), Some(first.id));
    }
}
