//! Query evaluation against a snapshot
//!
//! Every clause scans the snapshot's live documents except joins, which
//! hand off to the [`JoinExecutor`] with this evaluator as the sub-query
//! evaluator. Nested joins therefore recurse through the same path.

use std::cell::RefCell;

use serde_json::Value;

use crate::collection::{CollectionResolver, DocSet, SharedSnapshot};
use crate::index::ValueExtractor;
use crate::join::{ExecutionBudget, JoinDiagnostics, JoinExecutor, JoinResult, JoinSpec};
use crate::query::Query;

use super::matcher::TermMatcher;

/// Evaluates queries for one request
pub struct QueryEvaluator<'e> {
    executor: &'e JoinExecutor,
    resolver: &'e dyn CollectionResolver,
    budget: &'e ExecutionBudget,
    diagnostics: RefCell<JoinDiagnostics>,
}

impl<'e> QueryEvaluator<'e> {
    pub fn new(
        executor: &'e JoinExecutor,
        resolver: &'e dyn CollectionResolver,
        budget: &'e ExecutionBudget,
    ) -> Self {
        Self {
            executor,
            resolver,
            budget,
            diagnostics: RefCell::new(JoinDiagnostics::new()),
        }
    }

    /// Documents of `snapshot` matching `query`
    pub fn evaluate(&self, query: &Query, snapshot: &SharedSnapshot) -> JoinResult<DocSet> {
        self.budget.check()?;

        match query {
            Query::MatchAll => self.scan(snapshot, |_| true),
            Query::MatchNone => Ok(DocSet::new()),
            Query::Term { field, value } => self.scan(snapshot, |body| {
                ValueExtractor::from_body(body, field)
                    .iter()
                    .any(|v| TermMatcher::matches(v, value))
            }),
            Query::Exists { field } => {
                self.scan(snapshot, |body| ValueExtractor::has_values(body, field))
            }
            Query::DisMax { fields, terms } => self.scan(snapshot, |body| {
                terms.iter().all(|term| {
                    fields.iter().any(|field| {
                        ValueExtractor::from_body(body, field)
                            .iter()
                            .any(|v| TermMatcher::matches(v, term))
                    })
                })
            }),
            Query::Boolean {
                must,
                should,
                must_not,
            } => self.evaluate_boolean(must, should, must_not, snapshot),
            Query::Join(spec) => self.evaluate_join(spec, snapshot),
        }
    }

    /// Stats for every join evaluated, consuming the evaluator
    pub fn into_diagnostics(self) -> JoinDiagnostics {
        self.diagnostics.into_inner()
    }

    fn evaluate_join(&self, spec: &JoinSpec, snapshot: &SharedSnapshot) -> JoinResult<DocSet> {
        let outcome = self.executor.run(
            spec,
            self.resolver,
            snapshot,
            self.budget,
            |sub_query, from| self.evaluate(sub_query, from),
        )?;
        self.diagnostics
            .borrow_mut()
            .record(spec.signature(), outcome.stats());
        Ok(outcome.docs)
    }

    /// Required clauses intersect; optional clauses only select when there
    /// are no required ones; prohibited clauses are removed last.
    fn evaluate_boolean(
        &self,
        must: &[Query],
        should: &[Query],
        must_not: &[Query],
        snapshot: &SharedSnapshot,
    ) -> JoinResult<DocSet> {
        let mut docs = if !must.is_empty() {
            let mut acc: Option<DocSet> = None;
            for clause in must {
                let matched = self.evaluate(clause, snapshot)?;
                acc = Some(match acc {
                    None => matched,
                    Some(prev) => prev.intersection(&matched).copied().collect(),
                });
            }
            acc.unwrap_or_default()
        } else if !should.is_empty() {
            let mut acc = DocSet::new();
            for clause in should {
                acc.extend(self.evaluate(clause, snapshot)?);
            }
            acc
        } else {
            self.scan(snapshot, |_| true)?
        };

        for clause in must_not {
            let excluded = self.evaluate(clause, snapshot)?;
            docs.retain(|doc| !excluded.contains(doc));
        }
        Ok(docs)
    }

    fn scan(
        &self,
        snapshot: &SharedSnapshot,
        mut keep: impl FnMut(&Value) -> bool,
    ) -> JoinResult<DocSet> {
        let interval = self.executor.check_interval();
        let mut docs = DocSet::new();
        for (visited, doc) in snapshot.live_docs().enumerate() {
            if visited % interval == 0 {
                self.budget.check()?;
            }
            if let Some(body) = snapshot.document(doc) {
                if keep(body) {
                    docs.insert(doc);
                }
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::collection::CollectionRegistry;
    use crate::observability::MetricsRegistry;
    use crate::query::{QueryParser, RequestParams, LUCENE};
    use serde_json::json;

    fn registry() -> CollectionRegistry {
        let registry = CollectionRegistry::new();
        let people = registry.create("people");
        people
            .add_all(vec![
                json!({"id": "1", "name": "john", "title": "Director", "dept_s": "Engineering"}),
                json!({"id": "2", "name": "mark", "title": "VP", "dept_s": "Marketing"}),
                json!({"id": "3", "name": "nancy", "title": "MTS", "dept_s": "Sales"}),
                json!({"id": "4", "name": "dave", "title": "MTS", "dept_s": ["Support", "Engineering"]}),
            ])
            .unwrap();
        registry
    }

    fn run(registry: &CollectionRegistry, text: &str, request: &RequestParams) -> (Vec<String>, JoinDiagnostics) {
        let executor = JoinExecutor::new(Arc::new(MetricsRegistry::new()));
        let budget = ExecutionBudget::unlimited();
        let evaluator = QueryEvaluator::new(&executor, registry, &budget);
        let snapshot: SharedSnapshot = registry.get("people").unwrap().snapshot();

        let query = QueryParser::new(request).parse(text, LUCENE).unwrap();
        let docs = evaluator.evaluate(&query, &snapshot).unwrap();
        let ids = docs
            .iter()
            .filter_map(|doc| snapshot.document(*doc))
            .map(|body| body["id"].as_str().unwrap().to_string())
            .collect();
        (ids, evaluator.into_diagnostics())
    }

    fn ids(registry: &CollectionRegistry, text: &str) -> Vec<String> {
        run(registry, text, &RequestParams::new()).0
    }

    #[test]
    fn test_basic_clauses() {
        let registry = registry();
        assert_eq!(ids(&registry, "*:*"), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&registry, "title:MTS"), vec!["3", "4"]);
        assert_eq!(ids(&registry, "dept_s:engineering"), vec!["1", "4"]);
        assert_eq!(ids(&registry, "dept_s:*"), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&registry, "missing_s:*"), Vec::<String>::new());
    }

    #[test]
    fn test_boolean_semantics() {
        let registry = registry();
        assert_eq!(ids(&registry, "name:john name:mark"), vec!["1", "2"]);
        assert_eq!(ids(&registry, "+title:MTS name:dave"), vec!["3", "4"]);
        assert_eq!(ids(&registry, "+title:MTS +name:dave"), vec!["4"]);
        assert_eq!(ids(&registry, "title:MTS -name:dave"), vec!["3"]);
        assert_eq!(ids(&registry, "-title:MTS"), vec!["1", "2"]);
    }

    #[test]
    fn test_dismax_all_terms() {
        let registry = registry();
        let request = RequestParams::new().with("qf", "name title");
        let (found, _) = run(&registry, "{!dismax}dave MTS", &request);
        assert_eq!(found, vec!["4"]);
        let (found, _) = run(&registry, "{!dismax}MTS", &request);
        assert_eq!(found, vec!["3", "4"]);
    }

    #[test]
    fn test_join_records_diagnostics() {
        let registry = registry();
        let (found, diagnostics) = run(
            &registry,
            "{!join from=title to=title}name:dave",
            &RequestParams::new(),
        );
        assert_eq!(found, vec!["3", "4"]);
        let stats = diagnostics.get("{!join from=title to=title}name:dave").unwrap();
        assert_eq!(stats.from_set_size, 1);
        assert_eq!(stats.to_set_size, 1);
    }

    #[test]
    fn test_nested_join() {
        let registry = registry();
        // people sharing a department with anyone titled like nancy
        let (found, diagnostics) = run(
            &registry,
            "{!join from=dept_s to=dept_s v=$inner}",
            &RequestParams::new().with("inner", "{!join from=title to=title}name:nancy"),
        );
        assert_eq!(found, vec!["1", "3", "4"]);
        assert_eq!(diagnostics.len(), 2);
    }
}
