use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use callchain::analysis::{build_graph, display_name, load_source, resolve_functions};
use callchain_lib::export::to_dot;
use callchain_lib::function_id::FunctionId;
use callchain_lib::graph::CallGraph;
use callchain_lib::pipeline::{declared_call_graph, sample_record, DemoPipeline, FixedClock, StdoutProgress};
use callchain_lib::query::GraphQuery;
use callchain_lib::search::{compile_pattern, recursive_search};
use callchain_lib::traversal::{bfs_traversal, traversal_from_entries, TraversalResult};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "callchain")]
#[command(about = "Demo call-chain pipeline and call graph tools", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults to `run` on the sample record
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline on a record and print its trace
    Run(RunArgs),
    /// Print the call graph of a source file, or of the pipeline itself
    Graph(GraphArgs),
    /// Direct and nested callees of a function
    Callees(QueryArgs),
    /// Direct and transitive callers of a function
    Callers(QueryArgs),
    /// Search a function and everything it calls for a pattern
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input record as JSON (defaults to {"id": 123, "name": "Test"})
    #[arg(short, long)]
    record: Option<String>,

    /// Fixed timestamp in seconds instead of the system clock
    #[arg(short, long)]
    timestamp: Option<f64>,

    /// `text` prints the result as a Python dict, `json` as JSON
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Source file to analyse (the pipeline's declared graph when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Language (auto-detected from file extension if not specified)
    #[arg(short, long)]
    language: Option<String>,

    /// Module path for the input file (file stem if not specified)
    #[arg(short, long)]
    module: Option<String>,
}

#[derive(Args, Debug)]
struct GraphArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(short, long, value_enum, default_value_t = GraphFormat::Json)]
    format: GraphFormat,

    /// Keep only functions reachable from these (`name`, `Type::name` or full id)
    #[arg(long)]
    entry_points: Vec<String>,

    /// Traversal used to collect functions reachable from the entry points
    #[arg(long, value_enum, default_value_t = TraversalOrder::Dfs)]
    order: TraversalOrder,

    /// Drop calls to functions not defined in the input
    #[arg(long)]
    no_external: bool,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Function name, `Type::name` or full id
    function: String,

    #[command(flatten)]
    source: SourceArgs,

    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Leave out functions not defined in the input
    #[arg(long)]
    no_external: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Highlighted function
    function: String,

    /// Case-insensitive regular expression
    pattern: String,

    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    language: Option<String>,

    #[arg(short, long)]
    module: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphFormat {
    Json,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TraversalOrder {
    Dfs,
    Bfs,
}

impl Default for RunArgs {
    fn default() -> Self {
        RunArgs {
            record: None,
            timestamp: None,
            format: ReportFormat::Text,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &RunArgs) -> Result<()> {
    let record: Value = match &args.record {
        Some(text) => serde_json::from_str(text).context("--record is not valid JSON")?,
        None => sample_record(),
    };
    debug!(%record, "running pipeline");

    let result = match args.timestamp {
        Some(timestamp) => {
            DemoPipeline::with_parts(FixedClock(timestamp), StdoutProgress).process_data(Some(&record))?
        }
        None => DemoPipeline::new().process_data(Some(&record))?,
    };

    match (result, args.format) {
        (Some(output), ReportFormat::Text) => println!("Result: {output}"),
        (None, ReportFormat::Text) => println!("Result: None"),
        (output, ReportFormat::Json) => println!("Result: {}", serde_json::to_string(&output)?),
    }
    Ok(())
}

/// Graph of `--input`, or the pipeline's declared graph
fn load_graph(source: &SourceArgs) -> Result<CallGraph> {
    let Some(input) = &source.input else {
        return declared_call_graph().context("building the pipeline call graph");
    };
    let loaded = load_source(input, source.language.as_deref(), source.module.as_deref())
        .with_context(|| format!("loading {}", input.display()))?;
    Ok(build_graph(&loaded.ast)?)
}

fn internal_only(graph: &CallGraph) -> CallGraph {
    let keep: HashSet<FunctionId> = graph
        .nodes
        .values()
        .filter(|n| !n.is_external)
        .map(|n| n.id.clone())
        .collect();
    graph.restrict_to(&keep)
}

/// `reachable` is the traversal order from the entry points, empty without them
fn graph_json(graph: &CallGraph, entry_points: &[FunctionId], reachable: &[FunctionId]) -> Value {
    let nodes: Vec<Value> = graph
        .nodes
        .values()
        .map(|n| {
            json!({
                "id": n.id,
                "name": n.metadata.name,
                "module": n.metadata.module,
                "external": n.is_external,
                "line": n.metadata.span.map(|s| s.start_line),
            })
        })
        .collect();
    let edges: Vec<Value> = graph
        .edges
        .iter()
        .map(|e| json!({ "from": e.from, "to": e.to, "line": e.line }))
        .collect();

    json!({
        "entry_points": entry_points,
        "reachable": reachable,
        "node_count": graph.node_count(),
        "edge_count": graph.edge_count(),
        "nodes": nodes,
        "edges": edges,
    })
}

fn graph(args: &GraphArgs) -> Result<()> {
    let mut graph = load_graph(&args.source)?;
    let entries = resolve_functions(&graph, &args.entry_points)?;

    let mut reachable = Vec::new();
    if !entries.is_empty() {
        let traversal = match args.order {
            TraversalOrder::Dfs => traversal_from_entries(&graph, &entries),
            TraversalOrder::Bfs => entries.iter().fold(TraversalResult::new(), |mut acc, entry| {
                acc.merge(bfs_traversal(&graph, entry));
                acc
            }),
        };
        info!(entries = entries.len(), reachable = traversal.reachable.len(), "restricting to entry points");
        graph = graph.restrict_to(&traversal.reachable);
        reachable = traversal.visited_order;
    }
    if args.no_external {
        graph = internal_only(&graph);
        reachable.retain(|id| graph.contains(id));
    }

    let output = match args.format {
        GraphFormat::Json => serde_json::to_string_pretty(&graph_json(&graph, &entries, &reachable))?,
        GraphFormat::Dot => to_dot(&graph, &entries),
    };
    write_output(&output, args.output.as_deref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Callees,
    Callers,
}

fn query(args: &QueryArgs, direction: Direction) -> Result<()> {
    let mut graph = load_graph(&args.source)?;
    if args.no_external {
        graph = internal_only(&graph);
    }
    let targets = resolve_functions(&graph, std::slice::from_ref(&args.function))?;

    let mut reports = Vec::new();
    for id in &targets {
        let (direct, transitive) = match direction {
            Direction::Callees => (graph.direct_callees(id), graph.nested_calls(id)?),
            Direction::Callers => (graph.direct_callers(id), graph.transitive_callers(id)?),
        };
        let names = |ids: &[FunctionId]| ids.iter().map(|i| display_name(&graph, i)).collect::<Vec<_>>();
        reports.push((display_name(&graph, id), names(&direct), names(&transitive)));
    }

    let (direct_label, transitive_label) = match direction {
        Direction::Callees => ("direct", "nested"),
        Direction::Callers => ("direct", "transitive"),
    };
    let output = match args.format {
        ReportFormat::Json => {
            let reports: Vec<Value> = reports
                .iter()
                .map(|(function, direct, transitive)| {
                    json!({
                        "function": function,
                        direct_label: direct,
                        transitive_label: transitive,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&reports)?
        }
        ReportFormat::Text => reports
            .iter()
            .map(|(function, direct, transitive)| {
                format!(
                    "{function}\n  {direct_label}: {}\n  {transitive_label}: {}",
                    direct.join(", "),
                    transitive.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    write_output(&output, None)
}

fn search(args: &SearchArgs) -> Result<()> {
    let loaded = load_source(&args.input, args.language.as_deref(), args.module.as_deref())
        .with_context(|| format!("loading {}", args.input.display()))?;
    let graph = build_graph(&loaded.ast)?;
    let pattern = compile_pattern(&args.pattern)?;
    let matches = recursive_search(&loaded.source, &loaded.ast, &graph, &args.function, &pattern)?;
    info!(matches = matches.len(), "search finished");

    let output = match args.format {
        ReportFormat::Json => serde_json::to_string_pretty(&matches)?,
        ReportFormat::Text => matches
            .iter()
            .map(|m| {
                let marker = if m.in_highlighted { '*' } else { ' ' };
                format!("{marker} {}:{}: {}", m.function, m.line, m.text)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    write_output(&output, None)
}

fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, output).with_context(|| format!("writing {}", path.display()))?;
            info!("output written to {}", path.display());
        }
        None if output.is_empty() => {}
        None => println!("{output}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => run(&RunArgs::default()),
        Some(Command::Run(args)) => run(&args),
        Some(Command::Graph(args)) => graph(&args),
        Some(Command::Callees(args)) => query(&args, Direction::Callees),
        Some(Command::Callers(args)) => query(&args, Direction::Callers),
        Some(Command::Search(args)) => search(&args),
    }
}
