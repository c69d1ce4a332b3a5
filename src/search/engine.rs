//! Search entry point
//!
//! Parses `q` and every `fq` before touching any collection, evaluates them
//! against one snapshot of the target collection, then intersects. Filters
//! restrict the outer result only; they never reach a join's sub-query or
//! index build.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::collection::{CollectionRegistry, CollectionResolver, DocId, TimeoutResolver};
use crate::config::SearchConfig;
use crate::errors::Severity;
use crate::index::IndexCache;
use crate::join::{ExecutionBudget, JoinExecutor};
use crate::observability::{MetricsRegistry, ObservationScope};
use crate::query::{Query, QueryParser, QueryResult, RequestParams, LUCENE};

use super::errors::SearchResult;
use super::evaluator::QueryEvaluator;
use super::request::SearchRequest;
use super::response::{project, DebugInfo, ResultPage, SearchResponse};
use super::sorter::ResultSorter;

/// Executes search requests against resolvable collections
pub struct SearchEngine {
    resolver: Arc<dyn CollectionResolver>,
    executor: JoinExecutor,
    metrics: Arc<MetricsRegistry>,
    config: SearchConfig,
}

impl SearchEngine {
    /// Serves collections from `registry`, bounding each resolution by the
    /// configured timeout
    pub fn new(registry: Arc<CollectionRegistry>, config: SearchConfig) -> Self {
        let timeout = Duration::from_millis(config.collection_timeout_ms);
        let resolver: Arc<dyn CollectionResolver> = Arc::new(TimeoutResolver::new(registry, timeout));
        Self::with_resolver(resolver, config)
    }

    /// Serves collections from any resolver
    pub fn with_resolver(resolver: Arc<dyn CollectionResolver>, config: SearchConfig) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let mut executor = JoinExecutor::new(Arc::clone(&metrics))
            .with_check_interval(config.cancel_check_interval);
        if config.index_cache_enabled {
            executor = executor.with_cache(Arc::new(IndexCache::new(config.index_cache_capacity)));
        }

        Self {
            resolver,
            executor,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn index_cache(&self) -> Option<&Arc<IndexCache>> {
        self.executor.cache()
    }

    /// Runs one search under the configured time limit
    pub fn search(&self, collection: &str, params: &RequestParams) -> SearchResult<SearchResponse> {
        let budget = match self.config.query_time_limit_ms {
            Some(ms) => ExecutionBudget::with_time_limit(Duration::from_millis(ms)),
            None => ExecutionBudget::unlimited(),
        };
        self.search_with_budget(collection, params, &budget)
    }

    /// Runs one search under a caller-supplied budget, which the caller may
    /// cancel from another thread
    pub fn search_with_budget(
        &self,
        collection: &str,
        params: &RequestParams,
        budget: &ExecutionBudget,
    ) -> SearchResult<SearchResponse> {
        let query_id = Uuid::new_v4().to_string();
        let scope = ObservationScope::with_fields(
            "SEARCH",
            &[("query_id", query_id.as_str()), ("collection", collection)],
        );

        match self.execute(collection, params, budget) {
            Ok(response) => {
                self.metrics.increment_queries_executed();
                let num_found = response.num_found().to_string();
                scope.complete_with_fields(&[("num_found", num_found.as_str())]);
                Ok(response)
            }
            Err(err) => {
                if err.severity() == Severity::Reject {
                    self.metrics.increment_queries_rejected();
                }
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    fn execute(
        &self,
        collection: &str,
        params: &RequestParams,
        budget: &ExecutionBudget,
    ) -> SearchResult<SearchResponse> {
        let request = SearchRequest::from_params(params, &self.config)?;

        let parser = QueryParser::new(params);
        let query = parser.parse(request.query(), request.def_type())?;
        let filters = request
            .filters()
            .iter()
            .map(|fq| parser.parse(fq, LUCENE))
            .collect::<QueryResult<Vec<Query>>>()?;

        let snapshot = self.resolver.resolve(collection)?;
        let evaluator = QueryEvaluator::new(&self.executor, &*self.resolver, budget);

        let mut docs = evaluator.evaluate(&query, &snapshot)?;
        for filter in &filters {
            let allowed = evaluator.evaluate(filter, &snapshot)?;
            docs.retain(|doc| allowed.contains(doc));
        }

        let mut ordered: Vec<DocId> = docs.into_iter().collect();
        ResultSorter::sort(&*snapshot, &mut ordered, request.sort());

        let num_found = ordered.len();
        let page = ordered
            .into_iter()
            .skip(request.start())
            .take(request.rows())
            .filter_map(|doc| snapshot.document(doc))
            .map(|body| project(body, request.fields()))
            .collect();

        let debug = request.debug().then(|| DebugInfo {
            join: evaluator.into_diagnostics(),
            parsed_query: query.to_string(),
            parsed_filter_queries: filters.iter().map(ToString::to_string).collect(),
        });

        Ok(SearchResponse {
            response: ResultPage {
                num_found,
                start: request.start(),
                docs: page,
            },
            debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionError;
    use crate::query::QueryError;
    use crate::search::SearchError;
    use serde_json::json;

    fn engine() -> SearchEngine {
        let registry = Arc::new(CollectionRegistry::new());
        let people = registry.create("people");
        people
            .add_all(vec![
                json!({"id": "1", "name": "john", "dept_s": "Engineering"}),
                json!({"id": "2", "name": "mark", "dept_s": "Marketing"}),
                json!({"id": "3", "name": "nancy", "dept_s": "Engineering"}),
            ])
            .unwrap();
        SearchEngine::new(registry, SearchConfig::default())
    }

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        RequestParams::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_filter_intersects() {
        let engine = engine();
        let response = engine
            .search("people", &params(&[("q", "dept_s:Engineering"), ("fq", "name:nancy")]))
            .unwrap();
        assert_eq!(response.ids(), vec!["3"]);
        assert_eq!(engine.metrics().snapshot().queries_executed, 1);
    }

    #[test]
    fn test_pagination_and_sort() {
        let engine = engine();
        let response = engine
            .search(
                "people",
                &params(&[("q", "*:*"), ("sort", "name desc"), ("start", "1"), ("rows", "1"), ("fl", "id")]),
            )
            .unwrap();
        assert_eq!(response.num_found(), 3);
        assert_eq!(response.response.start, 1);
        assert_eq!(response.response.docs, vec![json!({"id": "2"})]);
    }

    #[test]
    fn test_unknown_collection() {
        let err = engine()
            .search("nope", &params(&[("q", "*:*")]))
            .unwrap_err();
        assert_eq!(err, SearchError::Collection(CollectionError::NotFound("nope".into())));
    }

    #[test]
    fn test_filter_parse_error_before_evaluation() {
        let engine = engine();
        let err = engine
            .search("people", &params(&[("q", "*:*"), ("fq", "name:")]))
            .unwrap_err();
        assert!(matches!(err, SearchError::Query(QueryError::Syntax { .. })));
        assert_eq!(engine.metrics().snapshot().queries_rejected, 1);
    }

    #[test]
    fn test_cancelled_budget() {
        let engine = engine();
        let budget = ExecutionBudget::unlimited();
        budget.cancel_handle().cancel();
        let err = engine
            .search_with_budget("people", &params(&[("q", "*:*")]), &budget)
            .unwrap_err();
        assert_eq!(err.code(), "AERO_QUERY_CANCELLED");
        assert_eq!(engine.metrics().snapshot().queries_rejected, 0);
    }

    #[test]
    fn test_cache_enabled_by_config() {
        let registry = Arc::new(CollectionRegistry::new());
        let config = SearchConfig {
            index_cache_enabled: true,
            ..Default::default()
        };
        assert!(SearchEngine::new(registry, config).index_cache().is_some());
        assert!(engine().index_cache().is_none());
    }
}
