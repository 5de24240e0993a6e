use clap::Parser;
use datetext::{ClassNames, DateTextRewriter, Document, HtmlError};
use log::{debug, info};
use std::{
    fmt::{self, Display},
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

#[derive(thiserror::Error, Debug)]
enum DateTextCliError {
    #[error("{source_name}: {source}")]
    Html {
        source_name: Source,
        #[source]
        source: HtmlError,
    },

    #[error("{source_name}: {source}")]
    Io {
        source_name: Source,
        #[source]
        source: io::Error,
    },

    #[error("Several files can only be rewritten with `--in-place`")]
    SeveralFilesNeedInPlace,
}

/// Where a document comes from, and where an in-place rewrite goes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn read(&self) -> Result<String, DateTextCliError> {
        let read = match self {
            Source::Stdin => {
                let mut html = String::new();
                io::stdin().read_to_string(&mut html).map(|_| html)
            }
            Source::File(path) => fs::read_to_string(path),
        };
        read.map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> DateTextCliError {
        DateTextCliError::Io {
            source_name: self.clone(),
            source,
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Rewrites `YYYY-MM-DD` dates in marked HTML elements into readable en-US dates.
///
/// Elements with the long-form class become `March 5, 2024`. Elements with the short-form class
/// become `Mar 5`. Elements whose text is not a date are left as they are and reported on stderr.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Cli {
    /// HTML files to rewrite. Reads standard input when omitted.
    files: Vec<PathBuf>,

    /// Rewrite each file in place instead of writing the result to standard output.
    #[arg(short, long, requires = "files", conflicts_with = "output")]
    in_place: bool,

    /// Write the result to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Class marking elements to render like `March 5, 2024`.
    #[arg(long, value_name = "CLASS", default_value = "date")]
    long_class: String,

    /// Class marking elements to render like `Mar 5`.
    #[arg(long, value_name = "CLASS", default_value = "short-date")]
    short_class: String,

    /// Exit with status 2 if any marked element could not be read as a date. Output is still
    /// written.
    #[arg(long)]
    strict: bool,

    /// Instead of writing the result, print `MARKER<TAB>TEXT<TAB>RENDERED` for every element the
    /// rewrite would change, then for every element it would skip (with RENDERED as `-`).
    #[arg(short, long, conflicts_with_all = ["in_place", "output"])]
    list: bool,
}

impl Cli {
    fn sources(&self) -> Vec<Source> {
        if self.files.is_empty() {
            vec![Source::Stdin]
        } else {
            self.files.iter().cloned().map(Source::File).collect()
        }
    }

    fn classes(&self) -> ClassNames {
        ClassNames {
            long: self.long_class.clone(),
            short: self.short_class.clone(),
        }
    }
}

/// Text for standard output and the exit code.
type Output = (String, u8);

const EXIT_SKIPPED: u8 = 2;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("{:?}", &cli);

    match do_work(cli) {
        Ok((output, exit_code)) => {
            print!("{output}");
            ExitCode::from(exit_code)
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, DateTextCliError> {
    let sources = cli.sources();
    if sources.len() > 1 && !cli.in_place && !cli.list {
        return Err(DateTextCliError::SeveralFilesNeedInPlace);
    }

    let (stdout, any_skipped) = if cli.list {
        list(&cli, &sources)?
    } else {
        rewrite(&cli, &sources)?
    };

    let exit_code = if cli.strict && any_skipped {
        EXIT_SKIPPED
    } else {
        0
    };
    Ok((stdout, exit_code))
}

fn rewrite(cli: &Cli, sources: &[Source]) -> Result<(String, bool), DateTextCliError> {
    let rewriter = DateTextRewriter::new(cli.classes());
    let mut stdout = String::new();
    let mut any_skipped = false;

    for source in sources {
        let html = source.read()?;
        let (rewritten, report) =
            rewriter
                .rewrite_html(&html)
                .map_err(|e| DateTextCliError::Html {
                    source_name: source.clone(),
                    source: e,
                })?;
        any_skipped |= !report.is_clean();

        match (&cli.output, source) {
            (_, Source::File(path)) if cli.in_place => {
                if rewritten != html {
                    fs::write(path, &rewritten).map_err(|e| source.io_error(e))?;
                }
                info!("{}: {} date(s) rewritten", source, report.rewritten.len());
            }
            (Some(path), _) => {
                fs::write(path, &rewritten)
                    .map_err(|e| Source::File(path.clone()).io_error(e))?;
            }
            _ => stdout.push_str(&rewritten),
        }
    }

    Ok((stdout, any_skipped))
}

/// Rewrites each source without writing it anywhere, and lists what the rewrite did: rewritten
/// elements first, then skipped ones.
fn list(cli: &Cli, sources: &[Source]) -> Result<(String, bool), DateTextCliError> {
    let rewriter = DateTextRewriter::new(cli.classes());
    let mut stdout = String::new();
    let mut any_skipped = false;

    for source in sources {
        let html = source.read()?;
        let mut document: Document = html.parse().map_err(|e| DateTextCliError::Html {
            source_name: source.clone(),
            source: e,
        })?;
        let report = rewriter.rewrite(&mut document);
        any_skipped |= !report.is_clean();

        for rewritten in &report.rewritten {
            let line = format!(
                "{}\t{}\t{}\n",
                rewritten.marker,
                rewritten.text.trim(),
                rewritten.rendered
            );
            stdout.push_str(&line);
        }
        for skipped in &report.skipped {
            stdout.push_str(&format!("{}\t{}\t-\n", skipped.marker, skipped.text.trim()));
        }
    }

    Ok((stdout, any_skipped))
}
