mod source;

use anyhow::{Context, Result, anyhow};
use logsift_framework::{
    CursorState, Entry, LevelSet, LogLevel, LogView, ViewDesc,
    filter::{parse_time_end, parse_time_start},
};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use source::MappedFile;
use std::env;

fn print_usage() {
    eprintln!("Usage: logsift <FILE> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --filter, -f EXPR       Filter expression, e.g. 'error||!timeout||#10::#500'");
    eprintln!("  --level, -l LIST        Comma-separated levels to show (error,warn,info,debug,trace)");
    eprintln!("  --from TS               Hide entries before TS (YYYY-MM-DD[ HH:MM:SS[.mmm]])");
    eprintln!("  --to TS                 Hide entries after TS");
    eprintln!("  --context, -C N         Show N entries around each match");
    eprintln!("  --search, -s QUERY      Mark entries matching any '||'-separated term");
    eprintln!("  --batch N               Lines per assembly batch");
    eprintln!("  --verbose, -v           Debug logging on stderr");
    eprintln!("  --help, -h              Print this help message");
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    path: String,
    filter: Option<String>,
    levels: Option<Vec<LogLevel>>,
    from: Option<String>,
    to: Option<String>,
    context: Option<usize>,
    search: Option<String>,
    batch: Option<usize>,
    verbose: bool,
}

impl CliOptions {
    /// `Ok(None)` when help was requested
    fn from_args(args: &[String]) -> Result<Option<Self>> {
        let mut options = Self::default();
        let mut path = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .cloned()
                    .ok_or_else(|| anyhow!("Missing value for {arg}"))
            };

            match arg.as_str() {
                "--help" | "-h" => return Ok(None),
                "--verbose" | "-v" => options.verbose = true,
                "--filter" | "-f" => options.filter = Some(value()?),
                "--level" | "-l" => options.levels = Some(parse_levels(&value()?)?),
                "--from" => options.from = Some(value()?),
                "--to" => options.to = Some(value()?),
                "--search" | "-s" => options.search = Some(value()?),
                "--context" | "-C" => {
                    let raw = value()?;
                    options.context = Some(
                        raw.parse::<usize>()
                            .with_context(|| format!("Invalid context width: {raw}"))?,
                    );
                }
                "--batch" => {
                    let raw = value()?;
                    let batch: usize = raw
                        .parse()
                        .with_context(|| format!("Invalid batch size: {raw}"))?;
                    if batch == 0 {
                        return Err(anyhow!("Batch size must be at least 1"));
                    }
                    options.batch = Some(batch);
                }
                other if other.starts_with('-') => return Err(anyhow!("Unknown option: {other}")),
                other => {
                    if path.replace(other.to_string()).is_some() {
                        return Err(anyhow!("Only one log file is allowed"));
                    }
                }
            }
        }

        options.path = path.ok_or_else(|| anyhow!("Missing log file"))?;
        Ok(Some(options))
    }

    fn view_desc(&self) -> Result<ViewDesc> {
        let mut desc = ViewDesc::new();
        desc.initial_filter = self.filter.clone();
        if let Some(levels) = &self.levels {
            desc.levels = LevelSet::only(levels.iter().copied());
        }
        if let Some(context) = self.context {
            desc.context_lines = context;
        }
        if let Some(batch) = self.batch {
            desc.batch_size = batch;
        }
        if let Some(from) = &self.from {
            desc.time_start =
                Some(parse_time_start(from).ok_or_else(|| anyhow!("Invalid --from timestamp: {from}"))?);
        }
        if let Some(to) = &self.to {
            desc.time_end =
                Some(parse_time_end(to).ok_or_else(|| anyhow!("Invalid --to timestamp: {to}"))?);
        }
        Ok(desc)
    }
}

fn parse_levels(list: &str) -> Result<Vec<LogLevel>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| LogLevel::from_token(token).ok_or_else(|| anyhow!("Unknown level: {token}")))
        .collect()
}

fn setup_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
    {
        eprintln!("Failed to initialize logger: {e}");
    }
}

fn format_row(entry: &Entry, is_context: bool, gap: bool, is_hit: bool) -> String {
    let marker = match (is_hit, is_context) {
        (true, _) => '*',
        (false, true) => '-',
        (false, false) => ' ',
    };
    let level = entry.level.map(|l| l.as_str()).unwrap_or("-");
    let time = match (&entry.display_date, &entry.display_time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (None, Some(time)) => time.clone(),
        _ => "-".to_string(),
    };
    let module = entry.module.as_deref().unwrap_or("-");

    let mut row = String::new();
    if gap {
        row.push_str("   ~~~ gap ~~~\n");
    }
    row.push_str(&format!(
        "{marker}{:>6} {time} {level:<7} [{module}] {}",
        entry.line_number,
        entry.preview()
    ));
    row
}

fn run(options: &CliOptions) -> Result<()> {
    let desc = options.view_desc()?;
    let mut source = MappedFile::new(&options.path);
    let mut view = LogView::from_source(&mut source, &desc)?;

    if let Some(query) = &options.search {
        view.set_search(query);
    }

    for (key, value) in view.headers().iter() {
        println!("# {key}: {value}");
    }

    let hits = view.search().matches().to_vec();
    for (pos, row) in view.view().rows.iter().enumerate() {
        let Some(entry) = view.entries().get(row.index) else {
            continue;
        };
        let is_hit = hits.binary_search(&pos).is_ok();
        println!("{}", format_row(entry, row.is_context_line, row.gap_exceeded, is_hit));
    }

    eprintln!(
        "{} of {} entries matched, {} rows shown",
        view.view().match_count,
        view.entries().len(),
        view.view().len()
    );
    if options.search.is_some() {
        match view.search_state() {
            CursorState::NoMatch => eprintln!("search: no match"),
            CursorState::AtPosition(_) => eprintln!("search: {} hits at rows {:?}", hits.len(), hits),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match CliOptions::from_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            print_usage();
            return Err(e);
        }
    };

    setup_logger(options.verbose);
    run(&options)
}
