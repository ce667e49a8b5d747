//! filter-lines: keep, remove or split the lines of a delimited file.
//!
//! Usage: filter-lines (--keep FILE | --remove FILE | --filters EXPR) [OPTIONS]

use clap::{ArgGroup, Parser};
use log::LevelFilter;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use filter_lines::commands::FilterLinesCommand;
use filter_lines::config::{zero_based, zero_based_index, ChromSource, FilterConfig, Selection};
use filter_lines::decision::{Combine, Operation};
use filter_lines::error::FilterError;
use filter_lines::fields::Separator;
use filter_lines::filters::FilterExpr;
use filter_lines::output::LineWriter;
use filter_lines::targets::{TargetKind, TargetSet};

const AFTER_HELP: &str = "\
Examples:
  Keep lines of f1.txt whose first space-separated column is listed in words.txt:
    filter-lines --in f1.txt --keep words.txt --sep space --column 1 --out filtered.txt

  Keep the header and lines where weight > 13 or taste is \"good\":
    filter-lines --in f1.txt --filters \"weight>13,taste=good\" --sep space

  As above, but require both conditions:
    filter-lines --match-all --in f1.txt --filters \"weight>13,taste=good\" --sep space";

#[derive(Parser)]
#[command(name = "filter-lines")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "Filter the lines of a delimited text file by keywords, genomic ranges or column expressions", long_about = None)]
#[command(after_help = AFTER_HELP)]
#[command(group(ArgGroup::new("targets").required(true).args(["keep", "remove", "filters"])))]
struct Cli {
    /// The file to filter (use - for stdin; default: stdin)
    #[arg(long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where kept lines are written (default: stdout)
    #[arg(long = "out", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Keep lines containing a value listed in this file
    #[arg(long, value_name = "FILE")]
    keep: Option<PathBuf>,

    /// Remove lines containing a value listed in this file
    #[arg(long, value_name = "FILE")]
    remove: Option<PathBuf>,

    /// Filter by values in named columns, e.g. "chrom=1,pos>3,pos<500,chrom!=MT".
    /// Recognizes the operators >, <, = and !=
    #[arg(long, value_name = "EXPR")]
    filters: Option<String>,

    /// Columns searched with --keep/--remove, 1-based and comma-separated (default: all)
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    column: Vec<String>,

    /// Require every column or filter to match (logical AND instead of OR)
    #[arg(long)]
    match_all: bool,

    /// Filter by column names on the header instead of values on rows
    #[arg(long, conflicts_with = "filters")]
    filter_columns: bool,

    /// Where excluded lines are written (default: discarded)
    #[arg(long = "excluded-out", value_name = "FILE")]
    excluded_out: Option<PathBuf>,

    /// Do not filter the first line of the input
    #[arg(long)]
    header: bool,

    /// Field separator: tab, space, whitespace, or any literal string
    #[arg(long, default_value = "tab", allow_hyphen_values = true)]
    sep: String,

    /// Ignore case when comparing with --keep/--remove values
    #[arg(long)]
    ignore_case: bool,

    /// Log every comparison to stderr
    #[arg(long)]
    debug: bool,

    /// Allow --filters names to match part of a column name, if unique
    #[arg(long)]
    partial_match: bool,

    /// Match if exactly one --keep/--remove value is a substring of the field
    #[arg(long)]
    substring_match: bool,

    /// --keep/--remove files hold genomic ranges such as "1:400-50000" or "1"
    #[arg(long, conflicts_with_all = ["filters", "filter_columns"], requires = "pos_index")]
    range: bool,

    /// Chromosome column (1-based), used with --range; --assume-chr takes precedence
    #[arg(long, value_name = "N")]
    chr_index: Option<usize>,

    /// Position column (1-based), used with --range
    #[arg(long, value_name = "N")]
    pos_index: Option<usize>,

    /// Chromosome assumed for every line, used with --range
    #[arg(long, value_name = "CHROM")]
    assume_chr: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), FilterError> {
    let config = build_config(&cli)?;

    let input = cli.input.filter(|p| p.as_os_str() != "-");
    if let Some(path) = &input {
        if !path.is_file() {
            return Err(FilterError::Config(format!(
                "File {} was not found.",
                path.display()
            )));
        }
    }

    let primary: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(create_output(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut output = LineWriter::new(primary);
    let mut excluded = cli
        .excluded_out
        .as_deref()
        .map(create_output)
        .transpose()?
        .map(LineWriter::new);

    let cmd = FilterLinesCommand::new(config);
    let (stats, name) = match &input {
        Some(path) => (
            cmd.run(path, &mut output, excluded.as_mut())?,
            path.display().to_string(),
        ),
        None => (
            cmd.run_stdin(&mut output, excluded.as_mut())?,
            "STDIN".to_string(),
        ),
    };

    log::info!("done, {} in {}", stats, name);
    Ok(())
}

fn create_output(path: &Path) -> Result<File, FilterError> {
    File::create(path).map_err(|e| {
        FilterError::Config(format!(
            "File {} could not be opened for writing output: {}",
            path.display(),
            e
        ))
    })
}

fn build_config(cli: &Cli) -> Result<FilterConfig, FilterError> {
    let separator = Separator::parse(&cli.sep)?;
    let combine = if cli.match_all {
        Combine::All
    } else {
        Combine::Any
    };

    let (selection, operation) = match (&cli.filters, &cli.keep, &cli.remove) {
        (Some(expr), _, _) => (
            Selection::Filters {
                expr: FilterExpr::parse(expr)?,
                partial_match: cli.partial_match,
            },
            Operation::Keep,
        ),
        (None, Some(path), _) => (load_selection(cli, path)?, Operation::Keep),
        (None, None, Some(path)) => (load_selection(cli, path)?, Operation::Remove),
        (None, None, None) => {
            return Err(FilterError::Config(
                "Please specify either --keep, --remove, or --filters".to_string(),
            ))
        }
    };

    let config = FilterConfig::new(selection)
        .with_separator(separator)
        .with_header(cli.header)
        .with_operation(operation)
        .with_combine(combine);
    config.validate()?;
    Ok(config)
}

fn load_selection(cli: &Cli, path: &Path) -> Result<Selection, FilterError> {
    let kind = if cli.range {
        TargetKind::Ranges
    } else {
        TargetKind::Keywords
    };

    match TargetSet::from_path(path, kind, cli.ignore_case)? {
        TargetSet::Ranges(targets) => {
            let chrom = match (cli.chr_index, &cli.assume_chr) {
                (_, Some(chrom)) => ChromSource::Assumed(chrom.clone()),
                (Some(index), None) => {
                    ChromSource::Column(zero_based_index(index, "--chr-index")?)
                }
                (None, None) => {
                    return Err(FilterError::Config(
                        "--range needs either --chr-index or --assume-chr".to_string(),
                    ))
                }
            };
            let pos_index = cli.pos_index.ok_or_else(|| {
                FilterError::Config("--range needs --pos-index".to_string())
            })?;
            Ok(Selection::Ranges {
                targets,
                chrom,
                pos_index: zero_based_index(pos_index, "--pos-index")?,
            })
        }
        TargetSet::Keywords(targets) if cli.filter_columns => Ok(Selection::Columns { targets }),
        TargetSet::Keywords(targets) => {
            let columns = if cli.column.is_empty() {
                None
            } else {
                Some(zero_based(&cli.column, "--column")?)
            };
            Ok(Selection::Keywords {
                targets,
                columns,
                substring: cli.substring_match,
            })
        }
    }
}
