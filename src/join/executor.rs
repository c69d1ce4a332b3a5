//! Join execution
//!
//! Evaluates the sub-query on the from-side, collects the distinct values of
//! the from-field across its matches, then probes an inverted index of the
//! to-field. Building that index visits every live to-document and dominates
//! the cost of a join.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::collection::{CollectionResolver, DocSet, SharedSnapshot};
use crate::index::{FieldValue, IndexCache, ValueExtractor, ValueToDocsIndex, DEFAULT_CHECK_INTERVAL};
use crate::observability::{MetricsRegistry, ObservationScope};
use crate::query::Query;

use super::budget::ExecutionBudget;
use super::errors::JoinResult;
use super::result::JoinOutcome;
use super::spec::JoinSpec;

/// Runs joins against collection snapshots
#[derive(Debug)]
pub struct JoinExecutor {
    cache: Option<Arc<IndexCache>>,
    metrics: Arc<MetricsRegistry>,
    check_interval: usize,
}

impl JoinExecutor {
    /// Creates an executor that builds a fresh index for every join
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            cache: None,
            metrics,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Reuses indexes built for an unchanged snapshot
    pub fn with_cache(mut self, cache: Arc<IndexCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets how many documents or values pass between budget checks
    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    pub fn cache(&self) -> Option<&Arc<IndexCache>> {
        self.cache.as_ref()
    }

    pub fn check_interval(&self) -> usize {
        self.check_interval
    }

    /// Resolves the from-collection, then executes the join into `to`.
    ///
    /// `to` is always the outer query's snapshot.
    pub fn run<R, F>(
        &self,
        spec: &JoinSpec,
        resolver: &R,
        to: &SharedSnapshot,
        budget: &ExecutionBudget,
        evaluate: F,
    ) -> JoinResult<JoinOutcome>
    where
        R: CollectionResolver + ?Sized,
        F: FnOnce(&Query, &SharedSnapshot) -> JoinResult<DocSet>,
    {
        let from = resolver.resolve_or_default(spec.from_collection(), to)?;
        self.execute(spec, &from, to, budget, evaluate)
    }

    /// Executes `spec` with both snapshots already acquired.
    ///
    /// `evaluate` runs the sub-query against the from-snapshot. Outer filters
    /// must not be folded into it.
    pub fn execute<F>(
        &self,
        spec: &JoinSpec,
        from: &SharedSnapshot,
        to: &SharedSnapshot,
        budget: &ExecutionBudget,
        evaluate: F,
    ) -> JoinResult<JoinOutcome>
    where
        F: FnOnce(&Query, &SharedSnapshot) -> JoinResult<DocSet>,
    {
        let scope = ObservationScope::with_fields(
            "JOIN",
            &[
                ("from", spec.from_field()),
                ("to", spec.to_field()),
                ("from_collection", from.collection()),
                ("to_collection", to.collection()),
            ],
        );

        match self.execute_steps(spec, from, to, budget, evaluate) {
            Ok(outcome) => {
                self.metrics.increment_joins_executed();
                let from_set_size = outcome.from_set_size.to_string();
                let to_set_size = outcome.to_set_size.to_string();
                let docs = outcome.docs.len().to_string();
                scope.complete_with_fields(&[
                    ("from_set_size", from_set_size.as_str()),
                    ("to_set_size", to_set_size.as_str()),
                    ("docs", docs.as_str()),
                ]);
                Ok(outcome)
            }
            Err(err) => {
                self.metrics.increment_joins_failed();
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    fn execute_steps<F>(
        &self,
        spec: &JoinSpec,
        from: &SharedSnapshot,
        to: &SharedSnapshot,
        budget: &ExecutionBudget,
        evaluate: F,
    ) -> JoinResult<JoinOutcome>
    where
        F: FnOnce(&Query, &SharedSnapshot) -> JoinResult<DocSet>,
    {
        budget.check()?;

        // 1. from-side matches
        let matches = evaluate(spec.sub_query(), from)?;

        // 2. distinct from-values
        let mut from_values: BTreeSet<FieldValue> = BTreeSet::new();
        for (visited, doc) in matches.iter().enumerate() {
            if visited % self.check_interval == 0 {
                budget.check()?;
            }
            from_values.extend(ValueExtractor::values(&**from, *doc, spec.from_field()));
        }
        if from_values.is_empty() {
            return Ok(JoinOutcome::default());
        }

        // 3. to-side index
        let index = self.index_for(to, spec.to_field(), budget)?;

        // 4. probe
        let mut docs = DocSet::new();
        let mut to_set_size = 0;
        for (visited, value) in from_values.iter().enumerate() {
            if visited % self.check_interval == 0 {
                budget.check()?;
            }
            let hits = index.lookup(value);
            if !hits.is_empty() {
                to_set_size += 1;
                docs.extend(hits.iter().copied());
            }
        }
        self.metrics.add_values_probed(from_values.len() as u64);

        Ok(JoinOutcome {
            docs,
            from_set_size: from_values.len(),
            to_set_size,
        })
    }

    fn index_for(
        &self,
        to: &SharedSnapshot,
        field: &str,
        budget: &ExecutionBudget,
    ) -> JoinResult<Arc<ValueToDocsIndex>> {
        let build = || {
            self.metrics.increment_index_builds();
            ValueToDocsIndex::build(&**to, field, budget, self.check_interval)
        };

        match &self.cache {
            Some(cache) => {
                let (index, hit) = cache.get_or_build(&**to, field, build)?;
                if hit {
                    self.metrics.increment_index_cache_hits();
                } else {
                    self.metrics.increment_index_cache_misses();
                }
                Ok(index)
            }
            None => Ok(Arc::new(build()?)),
        }
    }
}
