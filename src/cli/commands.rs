//! CLI command implementations
//!
//! `decompose` resolves the run configuration, loads every input before the
//! search starts, then consumes the engine's stream. `answer` takes the first
//! decomposition and evaluates the query with Yannakakis.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::args::{AnswerArgs, Command, DecomposeArgs};
use super::config::{RunConfig, SearchMode};
use super::errors::{CliError, CliErrorCode, CliResult};
use super::output::{write_answers, write_gml, write_stanza, write_summary, Stanza};
use super::sources::CostInputs;
use crate::db::{load_database, Table};
use crate::eval::Evaluator;
use crate::hypergraph::{parse, Encoding, Hypergraph, ParsedGraph};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, SearchMetrics};
use crate::search::{shrink, BestSearch, BnbSearch, CancelToken, EnumSearch, SearchConfig, Streamer};
use crate::yannakakis::Yannakakis;

/// Outcome of `answer`
#[derive(Debug, Clone)]
pub enum Answer {
    /// No decomposition of the requested width exists
    NoDecomposition,
    Unsat,
    Sat,
    /// Every answer, when requested
    Answers(Table),
}

pub fn run_command(command: Command) -> CliResult<()> {
    let mut stdout = io::stdout();
    match command {
        Command::Decompose(args) => decompose(&args, &mut stdout).map(|_| ()),
        Command::Answer(args) => answer(&args, &mut stdout).map(|_| ()),
    }
}

/// Returns the number of decompositions written
pub fn decompose<W: Write>(args: &DecomposeArgs, out: &mut W) -> CliResult<usize> {
    let config = RunConfig::resolve(args)?;
    Logger::set_min_severity(config.log_level()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("mode", config.mode.as_str()), ("width", &config.width.to_string())],
    );
    run_decompose(&config, out)
}

/// Streams decompositions for an already validated configuration
pub fn run_decompose<W: Write>(config: &RunConfig, out: &mut W) -> CliResult<usize> {
    log_event(Event::RunStart);
    let graph_path = config
        .graph
        .as_deref()
        .ok_or_else(|| CliError::config_error("a hypergraph is required (--graph)"))?;
    let ParsedGraph {
        graph: original,
        encoding,
    } = read_graph(graph_path)?;

    let inputs = match config.eval_source() {
        Some(source) => Some(CostInputs::load(&source, &original, &encoding)?),
        None => None,
    };
    let mut reporter = match &inputs {
        Some(inputs) => Some(inputs.evaluator(&original, &encoding, config.mixed_stats)?),
        None => None,
    };

    let mut graph = original.clone();
    let added = if config.complete {
        graph.make_edges_distinct(encoding.vertex_count())
    } else {
        Vec::new()
    };

    let metrics = Arc::new(SearchMetrics::new());
    let engine = build_engine(config, graph, inputs.as_ref(), &encoding, &original, Arc::clone(&metrics))?;
    let algorithm = engine.name();

    let cancel = CancelToken::new();
    if config.timeout_ms > 0 {
        cancel.cancel_after(Duration::from_millis(config.timeout_ms));
    }

    let run_started = Instant::now();
    let mut started = Instant::now();
    let mut count = 0usize;
    for item in engine.stream(cancel.clone()) {
        let mut decomp = item?;
        let elapsed = started.elapsed();

        if config.complete {
            decomp.remove_vertices(&added);
            decomp.graph = original.clone();
        }
        if let Some(mode) = config.shrink {
            let before = decomp.root.size();
            decomp = shrink(&decomp, mode);
            log_event_with_fields(
                Event::ShrinkApplied,
                &[
                    ("mode", mode.as_str()),
                    ("nodes_before", &before.to_string()),
                    ("nodes_after", &decomp.root.size().to_string()),
                ],
            );
        }

        let correct = decomp.is_correct(&original);
        if !correct {
            log_event_with_fields(Event::DecompInvalid, &[("index", &count.to_string())]);
            return Err(CliError::invalid_decomposition(count));
        }

        let cost = match reporter.as_mut() {
            Some(ev) => Some(
                ev.eval(&decomp)
                    .map_err(|e| CliError::new(CliErrorCode::EvaluationFailed, e.to_string()))?,
            ),
            None => None,
        };

        let stanza = Stanza {
            algorithm,
            index: count,
            width_bound: config.width,
            decomp: &decomp,
            correct,
            cost,
            elapsed,
        };
        write_stanza(out, &stanza, &encoding)?;
        if let Some(prefix) = &config.gml {
            write_gml(prefix, count, &decomp, &encoding)?;
        }

        count += 1;
        if config.enum_limit > 0 && count == config.enum_limit {
            cancel.cancel();
            break;
        }
        started = Instant::now();
    }

    write_summary(out, count, run_started.elapsed())?;
    log_event_with_fields(
        Event::RunComplete,
        &[("decompositions", &count.to_string()), ("metrics", &metrics.to_json())],
    );
    Ok(count)
}

fn build_engine(
    config: &RunConfig,
    graph: Hypergraph,
    inputs: Option<&CostInputs>,
    encoding: &Encoding,
    original: &Hypergraph,
    metrics: Arc<SearchMetrics>,
) -> CliResult<Box<dyn Streamer>> {
    let search_config = config.search_config();
    let engine: Box<dyn Streamer> = match config.mode {
        SearchMode::Enum => Box::new(EnumSearch::new(graph, &search_config)?.with_metrics(metrics)),
        SearchMode::Best => {
            let ev = engine_evaluator(config, inputs, encoding, original)?;
            Box::new(BestSearch::new(graph, &search_config, ev)?.with_metrics(metrics))
        }
        SearchMode::Bnb => {
            let ev = engine_evaluator(config, inputs, encoding, original)?;
            Box::new(BnbSearch::new(graph, &search_config, ev)?.with_metrics(metrics))
        }
    };
    Ok(engine)
}

fn engine_evaluator(
    config: &RunConfig,
    inputs: Option<&CostInputs>,
    encoding: &Encoding,
    original: &Hypergraph,
) -> CliResult<Box<dyn Evaluator>> {
    let inputs = inputs.ok_or_else(|| {
        CliError::config_error(format!("mode {} requires an evaluation source", config.mode))
    })?;
    inputs.evaluator(original, encoding, config.mixed_stats)
}

pub fn answer<W: Write>(args: &AnswerArgs, out: &mut W) -> CliResult<Answer> {
    Logger::set_min_severity(args.log_level);
    log_event(Event::RunStart);

    let ParsedGraph { graph, encoding } = read_graph(&args.graph)?;
    let db = load_database(&args.db)?;
    log_event_with_fields(
        Event::DatabaseLoaded,
        &[("path", &args.db.display().to_string()), ("relations", &db.len().to_string())],
    );

    let mut search = EnumSearch::new(graph, &SearchConfig::new(args.width))?;
    let Some(decomp) = search.next_decomp()? else {
        writeln!(out, "no decomposition of width {} exists", args.width)?;
        return Ok(Answer::NoDecomposition);
    };

    let mut yannakakis = Yannakakis::new(&decomp, &db, &encoding)?;
    let outcome = if args.all {
        match yannakakis.all_answers()? {
            Some(answers) => {
                write_answers(out, &answers)?;
                Answer::Answers(answers)
            }
            None => {
                writeln!(out, "UNSAT")?;
                Answer::Unsat
            }
        }
    } else if yannakakis.bool_answer()? {
        writeln!(out, "SAT")?;
        Answer::Sat
    } else {
        writeln!(out, "UNSAT")?;
        Answer::Unsat
    };

    log_event(Event::RunComplete);
    Ok(outcome)
}

fn read_graph(path: &Path) -> CliResult<ParsedGraph> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::input_error(format!("failed to read graph {}: {}", path.display(), e)))?;
    let parsed = parse(&text)?;
    log_event_with_fields(
        Event::GraphLoaded,
        &[
            ("edges", &parsed.graph.len().to_string()),
            ("path", &path.display().to_string()),
            ("vertices", &parsed.encoding.vertex_count().to_string()),
        ],
    );
    Ok(parsed)
}
