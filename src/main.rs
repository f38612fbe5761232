use anyhow::Context;
use clap::Parser;
use schemagraph::config::{CheckArgs, Cli, Command, ExportArgs};
use schemagraph::document;
use schemagraph::layout::resolve_positions;
use schemagraph::logging::{LogConfig, init_logging};
use schemagraph::server;
use schemagraph::store::{DocumentStore, FileStore};
use std::collections::HashSet;
use std::fs;
use std::process;
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Command::Serve(args) => run_serve(&args),
        Command::Check(args) => run_check(&args),
        Command::Export(args) => run_export(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run_serve(args: &schemagraph::config::ServeArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(server::serve(args))
}

fn run_check(args: &CheckArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let graph = document::parse(&text)
        .with_context(|| format!("{} is not a schema graph", args.path.display()))?;

    let names: HashSet<&str> = graph.table_names().into_iter().collect();
    let dangling = graph
        .relations
        .iter()
        .filter(|r| !names.contains(r.from_table.as_str()) || !names.contains(r.to_table.as_str()))
        .count();
    let stale_members: usize = graph
        .scenarios()
        .iter()
        .map(|s| s.table_names.iter().filter(|n| !names.contains(n.as_str())).count())
        .sum();
    let placed = graph.positions.as_ref().map_or(0, |p| p.len());

    println!("tables:     {}", graph.tables.len());
    println!("relations:  {}", graph.relations.len());
    println!("scenarios:  {}", graph.scenarios().len());
    println!("positioned: {} of {}", placed, resolve_positions(&graph).len());

    if dangling > 0 {
        warn!(dangling, "relations reference missing tables");
    }
    if stale_members > 0 {
        warn!(stale_members, "scenarios reference missing tables");
    }
    Ok(())
}

fn run_export(args: &ExportArgs) -> anyhow::Result<()> {
    let store = FileStore::new(&args.file);
    let graph = match store.load() {
        Ok(Some(graph)) => graph,
        Ok(None) => {
            info!(file = %args.file.display(), "nothing saved, exporting bundled example");
            document::bundled_example()
        }
        Err(e) => return Err(e).context("failed to load saved document"),
    };

    let text = document::to_pretty_json(&graph)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => println!("{}", text),
    }
    Ok(())
}
