// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared insights: the cross-user learned context.
//!
//! Insights are append-only. The only removal path is the optional
//! retention cap, which drops the oldest entries first.

use std::sync::Arc;

use tracing::info;

use hive_core::HiveError;
use hive_core::types::SharedInsight;

use crate::collections::Collection;
use crate::store::Store;

pub struct SharedInsightRepository {
    store: Arc<Store>,
    max_retained: Option<usize>,
}

impl SharedInsightRepository {
    /// Unbounded repository.
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            max_retained: None,
        }
    }

    /// Repository that prunes to `max_retained` after every insert.
    pub fn with_retention(store: Arc<Store>, max_retained: Option<usize>) -> Self {
        Self {
            store,
            max_retained,
        }
    }

    pub async fn add_insight(&self, insight: &SharedInsight) -> Result<(), HiveError> {
        self.store
            .put_keyed(Collection::SharedInsights, insight)
            .await?;
        info!(
            insight_id = %insight.id,
            source_base_id = insight.source_base_id.as_deref(),
            "shared insight created"
        );
        if let Some(max) = self.max_retained {
            self.prune_to(max).await?;
        }
        Ok(())
    }

    /// Every insight, oldest first.
    pub async fn list(&self) -> Vec<SharedInsight> {
        let mut insights: Vec<SharedInsight> =
            self.store.get_all(Collection::SharedInsights).await.or_empty();
        insights.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        insights
    }

    /// The most recent `n` insights, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<SharedInsight> {
        let mut insights = self.list().await;
        let skip = insights.len().saturating_sub(n);
        insights.drain(..skip);
        insights
    }

    /// Delete the oldest insights beyond `max`. Returns how many were removed.
    pub async fn prune_to(&self, max: usize) -> Result<usize, HiveError> {
        let insights = self.list().await;
        let excess = insights.len().saturating_sub(max);
        if excess == 0 {
            return Ok(0);
        }
        let doomed = insights.into_iter().take(excess).map(|i| i.id).collect();
        let removed = self
            .store
            .delete_many(Collection::SharedInsights, doomed)
            .await?;
        info!(removed, max, "pruned shared insights");
        Ok(removed)
    }
}
