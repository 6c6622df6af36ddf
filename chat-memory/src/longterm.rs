//! Long-term memory store: bounded per-user note lists.
//!
//! Written by the model's `remember` tool during a turn, read on every turn
//! to build the prompt. When a [`MemoryRepository`] is attached, every
//! mutation is mirrored to SQLite fire-and-forget: the caller never waits
//! for, and never sees, a persistence failure. The in-memory copy is
//! authoritative for reads; the database is only read once at startup.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use llm_client::ChatMessage;
use tracing::{error, info};

use crate::persist::MemoryRepository;

/// Default maximum notes kept per user.
pub const DEFAULT_MEMORY_CAPACITY: usize = 10;

/// Per-user long-term notes with bounded FIFO eviction.
pub struct MemoryStore {
    notes: DashMap<i64, Vec<String>>,
    capacity: usize,
    repository: Option<MemoryRepository>,
    synced: AtomicBool,
}

impl MemoryStore {
    /// Memory-only store.
    pub fn new(capacity: usize) -> Self {
        Self {
            notes: DashMap::new(),
            capacity: capacity.max(1),
            repository: None,
            synced: AtomicBool::new(false),
        }
    }

    /// Store mirrored to the given repository. Call
    /// [`MemoryStore::load_from_database`] once at startup.
    pub fn with_repository(capacity: usize, repository: MemoryRepository) -> Self {
        let mut store = Self::new(capacity);
        store.repository = Some(repository);
        store
    }

    /// Appends a note for the user, evicting the oldest on overflow, then
    /// schedules a best-effort upsert. Never fails the caller.
    pub fn remember(&self, user_id: i64, text: &str) {
        let snapshot = {
            let mut notes = self.notes.entry(user_id).or_default();
            notes.push(text.to_string());
            if notes.len() > self.capacity {
                notes.remove(0);
            }
            notes.clone()
        };
        info!(user_id, total = snapshot.len(), "remembered long-term note");

        if let Some(repository) = &self.repository {
            let repository = repository.clone();
            tokio::spawn(async move {
                if let Err(e) = repository.upsert(user_id, &snapshot).await {
                    error!(error = %e, user_id, "failed to persist long-term memory");
                }
            });
        }
    }

    /// Snapshot of the user's notes, oldest first; empty when none exist.
    pub fn memories(&self, user_id: i64) -> Vec<String> {
        self.notes
            .get(&user_id)
            .map(|notes| notes.clone())
            .unwrap_or_default()
    }

    /// One prompt message carrying the user's notes as a numbered list,
    /// for injection immediately before the conversation history.
    /// `None` when the user has no notes.
    pub fn prompt_message(&self, user_id: i64, display_name: &str) -> Option<ChatMessage> {
        let notes = self.memories(user_id);
        if notes.is_empty() {
            return None;
        }
        let list = notes
            .iter()
            .enumerate()
            .map(|(i, note)| format!("{}. {}", i + 1, note))
            .collect::<Vec<_>>()
            .join("\n\n");
        Some(ChatMessage::user(format!(
            "Memory about {}:\n\n{}",
            display_name, list
        )))
    }

    /// Loads existing rows into the map. Invoked once at startup when a
    /// repository is configured. A user already present in memory keeps its
    /// in-memory list: an early `remember` racing this load wins. Failures
    /// leave the store in memory-only mode and unset the readiness flag.
    pub async fn load_from_database(&self) {
        let Some(repository) = &self.repository else {
            return;
        };
        match repository.load_all().await {
            Ok(rows) => {
                let users = rows.len();
                for (user_id, mut notes) in rows {
                    if notes.len() > self.capacity {
                        notes.drain(..notes.len() - self.capacity);
                    }
                    self.notes.entry(user_id).or_insert(notes);
                }
                self.synced.store(true, Ordering::SeqCst);
                info!(users, "long-term memory loaded from database");
            }
            Err(e) => {
                error!(error = %e, "failed to load long-term memory; continuing in memory-only mode");
            }
        }
    }

    /// True once the startup load completed. Surfaced by the memory command
    /// so users can tell a degraded (memory-only) state from a synced one.
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    /// True when a durable repository is attached.
    pub fn is_persistent(&self) -> bool {
        self.repository.is_some()
    }
}
