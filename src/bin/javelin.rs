//! Javelin CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use javelin::cli::args::JavelinArgs;
use javelin::cli::repl::Repl;
use javelin::config::AppConfig;
use javelin::document::load_records;
use javelin::index::IndexConfig;
use javelin::schema::product_schema;
use javelin::search::engine::SearchEngine;

fn main() {
    let args = JavelinArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: JavelinArgs) -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let data_file = args.data_file.unwrap_or(config.data_file);
    let index_dir = args.index_dir.unwrap_or(config.index_dir);
    let default_limit = args.default_limit.unwrap_or(config.default_limit);

    let schema = product_schema(config.stem_cache_size)?;
    let index_config = IndexConfig {
        stem_cache_size: config.stem_cache_size,
    };

    let (engine, first_run) =
        SearchEngine::open_or_create_in_dir(&index_dir, schema, index_config)?;
    let engine = engine.with_default_limit(default_limit);

    // The collection is indexed exactly once, on the run that created the
    // index directory.
    if first_run {
        let records = load_records(&data_file)?;
        let count = engine.build(records)?;
        log::info!("indexed {count} documents from {}", data_file.display());
    } else {
        log::info!("opened index with {} documents", engine.doc_count());
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Repl::new(&engine).run(stdin.lock(), stdout.lock())?;
    Ok(())
}
