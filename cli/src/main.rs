//! pdfmarks CLI - PDF bookmark editor

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmarks::export::{bookmarks_file_name, output_pdf_name, to_json};
use pdfmarks::import::{parse_bookmarks, read_bookmarks_file};
use pdfmarks::{Bookmark, Editor, ImportStatus, JsonFormat, SaveOptions, SessionWorker};

mod edits;

use edits::{parse_add, parse_move, EditPlan};

#[derive(Parser)]
#[command(name = "pdfmarks")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "List, edit and rewrite PDF bookmarks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bookmarks of a PDF
    #[command(alias = "ls")]
    List {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Export the bookmarks of a PDF to a JSON file
    Export {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: <name>_bookmarks.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Edit the bookmarks of a PDF and save a copy
    Edit {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: <name>_with_bookmarks.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Start from a JSON bookmark list (path or http(s) URL)
        #[arg(short, long, value_name = "SOURCE")]
        bookmarks: Option<String>,

        /// Delete the bookmark at INDEX (0-based, repeatable)
        #[arg(short, long, value_name = "INDEX")]
        delete: Vec<usize>,

        /// Move a bookmark, e.g. "3:0" (repeatable)
        #[arg(short, long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,

        /// Add a bookmark, e.g. "Appendix@120" (repeatable)
        #[arg(short, long, value_name = "NAME@PAGE", value_parser = parse_add)]
        add: Vec<Bookmark>,

        /// Sort bookmarks by page
        #[arg(short, long)]
        sort: bool,

        /// Discard all edits and write the original bookmarks
        #[arg(long)]
        reset: bool,

        /// Keep unreferenced objects
        #[arg(long)]
        no_garbage: bool,

        /// Do not compress streams
        #[arg(long)]
        no_compress: bool,

        /// Document permission mask
        #[arg(long, env = "PDFMARKS_PERMISSIONS", default_value_t = pdfmarks::options::DEFAULT_PERMISSIONS)]
        permissions: u32,
    },

    /// Show document and outline information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            input,
            json,
            compact,
        } => cmd_list(&input, json, compact),
        Commands::Export {
            input,
            output,
            compact,
        } => cmd_export(&input, output.as_deref(), compact),
        Commands::Edit {
            input,
            output,
            bookmarks,
            delete,
            moves,
            add,
            sort,
            reset,
            no_garbage,
            no_compress,
            permissions,
        } => {
            let plan = EditPlan {
                delete,
                moves,
                add,
                sort,
                reset,
            };
            let options = SaveOptions::new()
                .with_garbage_collection(!no_garbage)
                .with_compression(!no_compress)
                .with_permissions(permissions);
            cmd_edit(
                &input,
                output.as_deref(),
                bookmarks.as_deref(),
                &plan,
                options,
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_list(input: &Path, json: bool, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bookmarks = pdfmarks::read_bookmarks(input)?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", to_json(&bookmarks, format)?);
        return Ok(());
    }

    if bookmarks.is_empty() {
        println!("{}", "No bookmarks".dimmed());
        return Ok(());
    }

    print_bookmarks(&bookmarks);
    Ok(())
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bookmarks = pdfmarks::read_bookmarks(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&bookmarks, format)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(input, &bookmarks_file_name(Some(input))));
    fs::write(&path, json)?;
    println!(
        "{} {} bookmarks to {}",
        "Exported".green(),
        bookmarks.len(),
        path.display()
    );

    Ok(())
}

fn cmd_edit(
    input: &Path,
    output: Option<&Path>,
    source: Option<&str>,
    plan: &EditPlan,
    options: SaveOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = Editor::new();

    // Fetch the import first: a valid list replaces the document outline.
    if let Some(source) = source {
        editor.set_imported(load_source(source));
        match editor.import_status() {
            ImportStatus::Loaded { count } => {
                println!("{} {} bookmarks from {}", "Imported".green(), count, source)
            }
            ImportStatus::Failed(message) => {
                eprintln!(
                    "{}: could not load bookmarks from {}: {}",
                    "Warning".yellow().bold(),
                    source,
                    message
                );
                eprintln!("         using the bookmarks stored in the document");
            }
            ImportStatus::NotRequested => {}
        }
    }

    let mut handle = SessionWorker::spawn_with_options(options)?;
    handle.open(fs::read(input)?)?;
    editor.load(&mut handle)?;

    plan.apply(editor.list_mut())?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Writing PDF...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    let bytes = editor.save(&mut handle);
    pb.finish_and_clear();
    let bytes = bytes?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling(input, &output_pdf_name(Some(input))));
    fs::write(&path, &bytes)?;
    handle.shutdown()?;

    print_bookmarks(editor.list().as_ref());
    println!(
        "\n{} {} ({} bookmarks)",
        "Saved to".green().bold(),
        path.display(),
        editor.list().len()
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let header = pdfmarks::sniff_header(&data)?;

    let mut session = pdfmarks::DocumentSession::new();
    session.open(&data)?;
    let outline = session.outline()?;
    let total: usize = outline.iter().map(|node| node.total_items()).sum();
    let depth = outline.iter().map(|node| node.depth()).max().unwrap_or(0);
    let unresolved = session
        .bookmarks()?
        .iter()
        .filter(|b| b.has_unknown_page())
        .count();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), header);
    println!("{}: {}", "Size".bold(), format_size(data.len()));
    println!("{}: {}", "Pages".bold(), session.page_count()?);

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Top-level entries".bold(), outline.len());
    println!("{}: {}", "Total entries".bold(), total);
    println!("{}: {}", "Depth".bold(), depth);
    println!("{}: {}", "Without page".bold(), unresolved);

    if depth > 1 {
        println!(
            "\n{}",
            "Nested entries are dropped when the outline is edited.".yellow()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfmarks".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF bookmark editor");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfmarks".dimmed());
    println!("License: MIT");
}

/// Load an external bookmark list from a path or an http(s) URL.
fn load_source(source: &str) -> pdfmarks::Result<Vec<Bookmark>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let body = fetch(source).map_err(|e| {
            pdfmarks::Error::ExternalSourceInvalid(format!("failed to fetch {}: {}", source, e))
        })?;
        parse_bookmarks(&body)
    } else {
        read_bookmarks_file(source)
    }
}

fn fetch(url: &str) -> Result<String, Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        log::info!("Fetching bookmarks from {}", url);
        let response = reqwest::get(url).await?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()).into());
        }
        Ok(response.text().await?)
    })
}

fn print_bookmarks(bookmarks: &[Bookmark]) {
    let width = bookmarks.len().saturating_sub(1).to_string().len();
    for (index, bookmark) in bookmarks.iter().enumerate() {
        let page = if bookmark.has_unknown_page() {
            "?".to_string()
        } else {
            bookmark.page.to_string()
        };
        println!(
            "{:>width$}  {}  {}",
            index.to_string().dimmed(),
            format!("p.{:<5}", page).cyan(),
            bookmark.name,
            width = width
        );
    }
}

/// `name` placed next to `input`.
fn sibling(input: &Path, name: &str) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{:.1} MB", bytes / (KB * KB))
    }
}
