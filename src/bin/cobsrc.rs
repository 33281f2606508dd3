//! Command-line interface for cobol-source
//! This binary is used to inspect how source lines classify and how they fold.
//!
//! Usage:
//!   cobsrc view `<paths>...` [--raw] [--tabs] [--format `<format>`]   - Print classified lines
//!   cobsrc comments `<path>`                                        - List recognized comments
//!   cobsrc fold `<path>` --symbols `<file>` [--style `<style>`] [--[no-]constants-upper]
//!                                                                   - Print the folded source

use clap::{Arg, ArgAction, ArgMatches, Command};
use cobol_source::config::{Loader, Settings};
use cobol_source::folding::{CaseFolder, FoldStyle, SymbolOracle, SymbolTable, UnitSymbols};
use cobol_source::source::{load_many, ChannelSink, FormatMode, SourceOptions, SourceUnit};
use std::path::{Path, PathBuf};

fn main() {
    let matches = Command::new("cobsrc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting fixed-column COBOL source lines")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Settings file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (repeatable)"),
        )
        .subcommand(
            Command::new("view")
                .about("Print the lines of one or more files")
                .arg(
                    Arg::new("paths")
                        .help("Source files to view")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Print the original lines untouched")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("tabs")
                        .long("tabs")
                        .help("Print the original lines with tabs expanded")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("raw"),
                )
                .args(column_args()),
        )
        .subcommand(
            Command::new("comments")
                .about("List the comments recognized in a file")
                .arg(
                    Arg::new("path")
                        .help("Source file")
                        .required(true)
                        .index(1),
                )
                .args(column_args()),
        )
        .subcommand(
            Command::new("fold")
                .about("Fold keyword, variable and paragraph casing in a file")
                .arg(
                    Arg::new("path")
                        .help("Source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("symbols")
                        .long("symbols")
                        .short('s')
                        .required(true)
                        .help("JSON or YAML file listing declared variables and paragraphs"),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .value_parser(["upper", "lower", "camel"])
                        .help("Casing style (default: format.on_return, else upper)"),
                )
                .arg(
                    Arg::new("constants-upper")
                        .long("constants-upper")
                        .help("Keep constants and variables uppercase")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-constants-upper")
                        .long("no-constants-upper")
                        .help("Fold constants and variables in the requested style")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("constants-upper"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["unknown", "fixed", "terminal", "free"])
                        .help("Column dialect (default: from settings)"),
                ),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let settings = load_settings(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Settings error: {}", e);
        std::process::exit(1);
    });

    match matches.subcommand() {
        Some(("view", view_matches)) => handle_view_command(&settings, view_matches),
        Some(("comments", comment_matches)) => handle_comments_command(&settings, comment_matches),
        Some(("fold", fold_matches)) => handle_fold_command(&settings, fold_matches),
        _ => unreachable!(),
    }
}

fn column_args() -> [Arg; 3] {
    [
        Arg::new("format")
            .long("format")
            .short('f')
            .value_parser(["unknown", "fixed", "terminal", "free"])
            .help("Column dialect (default: from settings)"),
        Arg::new("dump-area-a")
            .long("dump-area-a")
            .help("Blank sequence numbers in columns 1-6")
            .action(ArgAction::SetTrue),
        Arg::new("dump-area-b")
            .long("dump-area-b")
            .help("Drop everything past column 72")
            .action(ArgAction::SetTrue),
    ]
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: Option<&String>) -> Result<Settings, config::ConfigError> {
    let loader = match config {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build()
}

fn parse_format(name: &str) -> FormatMode {
    match name {
        "fixed" => FormatMode::Fixed,
        "terminal" => FormatMode::Terminal,
        "free" => FormatMode::Free,
        _ => FormatMode::Unknown,
    }
}

/// Settings for `path`, with command-line column flags applied on top.
fn options_for(settings: &Settings, path: &Path, matches: &ArgMatches) -> SourceOptions {
    let mut options = settings.source_options(path);
    if let Some(format) = matches.get_one::<String>("format") {
        options.format = parse_format(format);
    }
    if matches.get_flag("dump-area-a") {
        options.dump_area_a = true;
    }
    if matches.get_flag("dump-area-b") {
        options.dump_area_b_onwards = true;
    }
    options
}

fn load_or_exit(path: &Path, options: &SourceOptions) -> SourceUnit {
    SourceUnit::load(path, options).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the view command
fn handle_view_command(settings: &Settings, matches: &ArgMatches) {
    let paths: Vec<PathBuf> = matches
        .get_many::<String>("paths")
        .expect("paths are required")
        .map(PathBuf::from)
        .collect();
    // every file shares the first file's options; per-file format rules still apply
    let options = options_for(settings, &paths[0], matches);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Error starting runtime: {}", e);
        std::process::exit(1);
    });
    let results = runtime.block_on(load_many(paths.clone(), &options));

    let raw = matches.get_flag("raw");
    let tabs = matches.get_flag("tabs");
    let mut failed = false;
    for (path, result) in paths.iter().zip(results) {
        let mut unit = match result {
            Ok(unit) => unit,
            Err(e) => {
                eprintln!("Error: {}", e);
                failed = true;
                continue;
            }
        };
        unit.set_format(settings.format_for(path));
        if let Some(format) = matches.get_one::<String>("format") {
            unit.set_format(parse_format(format));
        }
        if paths.len() > 1 {
            println!("==> {} <==", path.display());
        }
        for index in 0..unit.line_count() {
            let line = if tabs {
                unit.get_line_tab_expanded(index).map(|l| l.into_owned())
            } else {
                unit.get_line(index, raw)
            };
            println!("{:>6} | {}", index + 1, line.unwrap_or_default());
        }
    }
    if failed {
        std::process::exit(1);
    }
}

/// Handle the comments command
fn handle_comments_command(settings: &Settings, matches: &ArgMatches) {
    let path = PathBuf::from(matches.get_one::<String>("path").expect("path is required"));
    let options = options_for(settings, &path, matches);
    let mut unit = load_or_exit(&path, &options);

    let (sink, mut receiver) = ChannelSink::new();
    unit.set_comment_sink(sink);
    for index in 0..unit.line_count() {
        unit.get_line(index, false);
    }
    unit.clear_comment_sink();

    while let Ok(event) = receiver.try_recv() {
        println!(
            "{}:{}: {}",
            event.filename.display(),
            event.line_number + 1,
            event.line
        );
    }
    println!("comments: {}", unit.comment_count());
}

/// Handle the fold command
fn handle_fold_command(settings: &Settings, matches: &ArgMatches) {
    let path = PathBuf::from(matches.get_one::<String>("path").expect("path is required"));
    let mut options = settings.source_options(&path);
    if let Some(format) = matches.get_one::<String>("format") {
        options.format = parse_format(format);
    }
    let mut unit = load_or_exit(&path, &options);

    let symbols_path = matches
        .get_one::<String>("symbols")
        .expect("symbols is required");
    let symbols = UnitSymbols::from_path(symbols_path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", symbols_path, e);
        std::process::exit(1);
    });
    let mut table = SymbolTable::new();
    table.insert(&unit.id(), symbols);

    let style = match matches.get_one::<String>("style").map(String::as_str) {
        Some("lower") => FoldStyle::LowerCase,
        Some("camel") => FoldStyle::CamelCase,
        Some(_) => FoldStyle::UpperCase,
        None => settings
            .format
            .on_return
            .fold_style()
            .unwrap_or(FoldStyle::UpperCase),
    };
    let constants_upper = if matches.get_flag("constants-upper") {
        true
    } else if matches.get_flag("no-constants-upper") {
        false
    } else {
        settings.format.constants_to_uppercase
    };

    let oracle: &dyn SymbolOracle = &table;
    let folder = CaseFolder::new(Some(oracle), unit.format());
    let id = unit.id();
    for index in 0..unit.line_count() {
        let Some(original) = unit.get_line(index, true) else {
            continue;
        };
        let folded = folder.fold_all(&original, &id, style, constants_upper, unit.language());
        if folded != original {
            unit.set_updated_line(index, folded);
        }
    }

    tracing::info!(changed = unit.updated_indices().len(), "folded {}", path.display());
    for index in 0..unit.line_count() {
        let line = match unit.updated_line(index) {
            Some(updated) => updated.to_string(),
            None => unit.get_line(index, true).unwrap_or_default(),
        };
        println!("{}", line);
    }
}
