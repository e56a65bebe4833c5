use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use relative_path::RelativePathBuf;
use usfm_editor_config::Config;
use usfm_editor_engine::editing::{Cmd, Document};
use usfm_editor_engine::{find_verse, io, outline};
use usfm_editor_syntax::Taxonomy;

#[derive(Parser)]
#[command(name = "usfm-editor")]
#[command(version, about = "Structured editing for USFM Scripture files", long_about = None)]
#[command(after_help = "EXAMPLES:
    usfm-editor roundtrip 08-RUT.usfm       Check the file survives parse and serialize
    usfm-editor tree --json 08-RUT.usfm     Dump the document tree
    usfm-editor join 08-RUT.usfm 1 2 -i     Join 1:2 onto 1:1 in place")]
struct Cli {
    /// Config file to use instead of ~/.config/usfm-editor/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stylesheet (.sty) replacing the bundled marker taxonomy
    #[arg(long, global = true, value_name = "FILE")]
    stylesheet: Option<PathBuf>,

    /// Project directory that relative file names resolve against
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and serialize a file, failing unless the text comes back unchanged
    Roundtrip { file: PathBuf },
    /// Print the document tree
    Tree {
        file: PathBuf,
        /// Print JSON instead of the indented outline
        #[arg(long)]
        json: bool,
    },
    /// Parse every .usfm/.sfm file under a directory and check its structure
    Check {
        /// Defaults to the project root
        dir: Option<PathBuf>,
    },
    /// Join a verse onto the verse before it
    Join(VerseArgs),
    /// Split a verse range back into single verses
    Unjoin(VerseArgs),
    /// Append an empty verse after the last verse of its chapter
    AddVerse(VerseArgs),
    /// Remove a verse, moving its content onto the verse before it
    RemoveVerse(VerseArgs),
}

#[derive(Args)]
struct VerseArgs {
    file: PathBuf,
    chapter: u32,
    verse: u32,
    /// Rewrite the file instead of printing the result
    #[arg(short, long)]
    in_place: bool,
}

/// Settings resolved from the config file and command-line overrides.
struct Session {
    root: PathBuf,
    taxonomy: Arc<Taxonomy>,
}

impl Session {
    fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from_path(path)?,
            None => Config::load()?,
        }
        .unwrap_or_default()
        .with_overrides(cli.stylesheet.clone(), cli.root.clone());

        let taxonomy = match config.stylesheet {
            Some(path) => {
                log::info!("Using stylesheet {}", path.display());
                let source = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading stylesheet {}", path.display()))?;
                Taxonomy::parse(&source)
                    .with_context(|| format!("parsing stylesheet {}", path.display()))?
            }
            None => Taxonomy::standard().clone(),
        };

        let root = match config.project_root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        Ok(Self {
            root,
            taxonomy: Arc::new(taxonomy),
        })
    }

    /// Split `file` into a directory and a path relative to it.
    fn locate(&self, file: &Path) -> Result<(PathBuf, RelativePathBuf)> {
        if file.is_absolute() {
            let (Some(dir), Some(name)) = (file.parent(), file.file_name()) else {
                bail!("{} is not a file path", file.display());
            };
            return Ok((dir.to_path_buf(), RelativePathBuf::from_path(name)?));
        }
        Ok((self.root.clone(), RelativePathBuf::from_path(file)?))
    }

    fn read(&self, file: &Path) -> Result<String> {
        let (dir, relative) = self.locate(file)?;
        Ok(io::read_file(&relative, &dir)?)
    }

    fn open(&self, file: &Path) -> Result<Document> {
        let (dir, relative) = self.locate(file)?;
        Ok(io::open_document(&relative, &dir, self.taxonomy.clone())?)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let session = Session::new(cli)?;

    match &cli.command {
        Command::Roundtrip { file } => roundtrip(&session, file),
        Command::Tree { file, json } => {
            let doc = session.open(file)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(doc.book())?);
            } else {
                print!("{}", outline(doc.book()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { dir } => check(&session, dir.as_deref().unwrap_or(session.root.as_path())),
        Command::Join(args) => transform(&session, args, |at| Cmd::JoinWithPreviousVerse { at }),
        Command::Unjoin(args) => transform(&session, args, |at| Cmd::UnjoinVerses { at }),
        Command::AddVerse(args) => transform(&session, args, |at| Cmd::AddVerse { at }),
        Command::RemoveVerse(args) => {
            transform(&session, args, |at| Cmd::RemoveVerseAndConcatenate { at })
        }
    }
}

fn roundtrip(session: &Session, file: &Path) -> Result<ExitCode> {
    let text = session.read(file)?;
    let doc = Document::parse_with_taxonomy(&text, session.taxonomy.clone())?;
    let output = doc.text();

    match first_difference(&text, &output) {
        None => {
            println!("{}: round-trip exact", file.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(line) => {
            eprintln!("{}: output differs from line {line}", file.display());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// One-based number of the first line where `a` and `b` differ.
fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let mut a_lines = a.split('\n');
    let mut b_lines = b.split('\n');
    let mut line = 1;
    loop {
        match (a_lines.next(), b_lines.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            _ => return Some(line),
        }
    }
}

fn check(session: &Session, dir: &Path) -> Result<ExitCode> {
    io::validate_project_dir(dir)?;
    let files = io::scan_usfm_files(dir)?;
    log::info!("Checking {} files under {}", files.len(), dir.display());

    let mut failures = 0;
    for file in &files {
        match io::open_document(file, dir, session.taxonomy.clone()) {
            Ok(doc) => {
                let violations = doc.check();
                for violation in &violations {
                    println!("{file}: {violation}");
                }
                if !violations.is_empty() {
                    failures += 1;
                }
            }
            Err(e) => {
                println!("{e}");
                failures += 1;
            }
        }
    }

    println!("{} files, {failures} with problems", files.len());
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn transform(
    session: &Session,
    args: &VerseArgs,
    command: impl FnOnce(usfm_editor_engine::VersePath) -> Cmd,
) -> Result<ExitCode> {
    let mut doc = session.open(&args.file)?;
    let at = find_verse(doc.book(), args.chapter, args.verse)
        .with_context(|| format!("no verse {}:{}", args.chapter, args.verse))?;

    doc.apply(command(at))?;

    if args.in_place {
        let (dir, relative) = session.locate(&args.file)?;
        io::save_document(&doc, &relative, &dir)?;
        log::info!("Wrote {}", args.file.display());
    } else {
        print!("{}", doc.text());
    }
    Ok(ExitCode::SUCCESS)
}
