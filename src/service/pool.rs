//! In-memory pool of waiting seeks
//!
//! The pool stands in for the seek store owned by the surrounding system.
//! Passes only ever see a snapshot; matched seeks are removed afterwards.

use crate::types::{Seek, SeekId};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

/// Insertion-ordered, id-keyed collection of seeks
#[derive(Debug, Default)]
pub struct SeekPool {
    seeks: RwLock<Vec<Seek>>,
}

impl SeekPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seeks(seeks: Vec<Seek>) -> Self {
        let mut pooled = Vec::with_capacity(seeks.len());
        for seek in seeks {
            upsert(&mut pooled, seek);
        }
        Self {
            seeks: RwLock::new(pooled),
        }
    }

    /// Add a seek, replacing any seek with the same id
    ///
    /// Returns `true` when the seek was not already present.
    pub async fn insert(&self, seek: Seek) -> bool {
        let mut seeks = self.seeks.write().await;
        upsert(&mut seeks, seek)
    }

    /// Add several seeks; returns how many were new
    pub async fn extend<I>(&self, incoming: I) -> usize
    where
        I: IntoIterator<Item = Seek>,
    {
        let mut seeks = self.seeks.write().await;
        incoming
            .into_iter()
            .map(|seek| upsert(&mut seeks, seek))
            .filter(|added| *added)
            .count()
    }

    /// Remove the seeks with the given ids; returns how many were removed
    pub async fn remove(&self, ids: &HashSet<SeekId>) -> usize {
        if ids.is_empty() {
            return 0;
        }

        let mut seeks = self.seeks.write().await;
        let before = seeks.len();
        seeks.retain(|seek| !ids.contains(&seek.id));
        let removed = before - seeks.len();

        debug!("Removed {} seeks from pool, {} remain", removed, seeks.len());
        removed
    }

    /// Copy of the current pool contents
    pub async fn snapshot(&self) -> Vec<Seek> {
        self.seeks.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.seeks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.seeks.read().await.is_empty()
    }

    /// Non-blocking size probe for health checks
    pub fn try_len(&self) -> Option<usize> {
        self.seeks.try_read().ok().map(|seeks| seeks.len())
    }
}

fn upsert(seeks: &mut Vec<Seek>, seek: Seek) -> bool {
    match seeks.iter_mut().find(|existing| existing.id == seek.id) {
        Some(existing) => {
            *existing = seek;
            false
        }
        None => {
            seeks.push(seek);
            true
        }
    }
}
