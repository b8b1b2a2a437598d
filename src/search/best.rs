//! Cheapest decomposition by exhaustive enumeration
//!
//! Runs the enumeration to completion, evaluates every decomposition and
//! emits the cheapest one. Ties keep the first found. A cancelled run,
//! including one stopped by `--timeout`, emits nothing: the cheapest of a
//! partial enumeration is not reported.

use std::sync::Arc;

use super::cancel::CancelToken;
use super::config::SearchConfig;
use super::enumerate::EnumSearch;
use super::errors::{SearchError, SearchResult};
use super::streamer::{spawn_stream, DecompStream, Streamer};
use crate::eval::{Cost, Evaluator};
use crate::hypergraph::{Decomp, Hypergraph};
use crate::observability::{log_event_with_fields, Event, SearchMetrics};

pub struct BestSearch {
    inner: EnumSearch,
    width: usize,
    evaluator: Box<dyn Evaluator>,
}

impl BestSearch {
    pub fn new(graph: Hypergraph, config: &SearchConfig, evaluator: Box<dyn Evaluator>) -> SearchResult<Self> {
        Ok(Self {
            inner: EnumSearch::new(graph, config)?,
            width: config.width,
            evaluator,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<SearchMetrics>) -> Self {
        self.inner = self.inner.with_metrics(metrics);
        self
    }

    /// Evaluates every enumerated decomposition; `None` if there are none or the run was cancelled
    pub fn select(&mut self, cancel: &CancelToken) -> SearchResult<Option<(Decomp, Cost)>> {
        let evaluator = &mut self.evaluator;
        let mut best: Option<(Decomp, Cost)> = None;
        let mut failure: Option<SearchError> = None;

        self.inner.run(&mut |decomp| {
            match evaluator.eval(&decomp) {
                Ok(cost) => {
                    if best.as_ref().map_or(true, |(_, c)| cost < *c) {
                        best = Some((decomp, cost));
                    }
                }
                Err(err) => {
                    failure = Some(err.into());
                    return false;
                }
            }
            !cancel.is_cancelled()
        })?;

        if let Some(err) = failure {
            return Err(err);
        }
        if cancel.is_cancelled() {
            return Ok(None);
        }
        Ok(best)
    }

    pub(crate) fn run(&mut self, cancel: &CancelToken, sink: &mut dyn FnMut(Decomp) -> bool) -> SearchResult<()> {
        if let Some((decomp, cost)) = self.select(cancel)? {
            log_event_with_fields(Event::BestSelected, &[("cost", &cost.to_string())]);
            sink(decomp);
        }
        Ok(())
    }
}

impl Streamer for BestSearch {
    fn name(&self) -> &'static str {
        "best"
    }

    fn stream(self: Box<Self>, cancel: CancelToken) -> DecompStream {
        let mut search = *self;
        log_event_with_fields(
            Event::SearchBegin,
            &[
                ("algorithm", "best"),
                ("evaluator", search.evaluator.name()),
                ("width", &search.width.to_string()),
            ],
        );
        let token = cancel.clone();
        spawn_stream("best", cancel, move |sink| search.run(&token, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::EstimateEvaluator;
    use crate::hypergraph::parse;
    use crate::stats::read_estimates;

    const GRAPH: &str = "A(x,y), B(y,z), C(z,w).";
    const SIZES: &str = "A,10\nB,30\nC,20\nA,B,100\nB,C,100\nA,C,1000\nA,B,C,1000\n";

    fn evaluator() -> (Hypergraph, EstimateEvaluator) {
        let parsed = parse(GRAPH).unwrap();
        let sizes = read_estimates(SIZES.as_bytes(), &parsed.graph, &parsed.encoding).unwrap();
        let ev = EstimateEvaluator::new(sizes, &parsed.graph).unwrap();
        (parsed.graph, ev)
    }

    #[test]
    fn test_selects_minimum_over_enumeration() {
        let (g, mut ev) = evaluator();
        let config = SearchConfig::new(2);

        let mut enumeration = EnumSearch::new(g.clone(), &config).unwrap();
        let mut min = Cost::MAX;
        while let Some(d) = enumeration.next_decomp().unwrap() {
            min = min.min(ev.eval(&d).unwrap());
        }

        let mut best = BestSearch::new(g.clone(), &config, Box::new(ev)).unwrap();
        let (decomp, cost) = best.select(&CancelToken::new()).unwrap().unwrap();
        assert_eq!(cost, min);
        assert!(decomp.is_correct(&g));
    }

    #[test]
    fn test_stream_emits_exactly_one() {
        let (g, ev) = evaluator();
        let best = BestSearch::new(g, &SearchConfig::new(1), Box::new(ev)).unwrap();
        let out = Box::new(best)
            .stream(CancelToken::new())
            .collect::<SearchResult<Vec<_>>>()
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_cancelled_run_emits_nothing() {
        let (g, ev) = evaluator();
        let mut best = BestSearch::new(g, &SearchConfig::new(2), Box::new(ev)).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(best.select(&cancel).unwrap().is_none());
    }

    #[test]
    fn test_timed_out_stream_emits_nothing() {
        let (g, ev) = evaluator();
        let best = BestSearch::new(g, &SearchConfig::new(2), Box::new(ev)).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel_after(std::time::Duration::ZERO);
        while !cancel.is_cancelled() {
            std::thread::yield_now();
        }
        let out = Box::new(best)
            .stream(cancel)
            .collect::<SearchResult<Vec<_>>>()
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_no_decomposition_emits_nothing() {
        let parsed = parse("A(x,y), B(y,z), C(z,x).").unwrap();
        let sizes = read_estimates("A,1\nB,1\nC,1\n".as_bytes(), &parsed.graph, &parsed.encoding).unwrap();
        let ev = EstimateEvaluator::new(sizes, &parsed.graph).unwrap();
        let mut best = BestSearch::new(parsed.graph, &SearchConfig::new(1), Box::new(ev)).unwrap();
        assert!(best.select(&CancelToken::new()).unwrap().is_none());
    }
}
