use std::error::Error;
use std::path::PathBuf;

use atty::Stream;
use clap::{Parser, Subcommand};
use inline_gloss::breakpoint::{BREAKPOINTS, BreakpointSelection, DEFAULT_BREAKPOINT_WIDTH};
use inline_gloss::{ClickEvent, Essay, ParagraphView, Reader, Segment, TermMatch, locate};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};

/// Approximate width of one terminal column when previewing a breakpoint.
const PIXELS_PER_COLUMN: u32 = 8;
const MIN_COLUMNS: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "inline-gloss",
    about = "Read essays with inline glossary lookups",
    version
)]
pub struct Cli {
    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Essay JSON file to read instead of the bundled essay.
    #[arg(long, global = true)]
    essay: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the essay, optionally after replaying clicks.
    Render {
        /// Only render this paragraph.
        #[arg(short, long)]
        paragraph: Option<usize>,
        /// Click to replay, as `PARAGRAPH:WORD`; a bare `PARAGRAPH` clicks outside.
        #[arg(long = "click", value_parser = parse_click)]
        clicks: Vec<ClickArg>,
        /// Preview width in pixels (defaults to the small breakpoint).
        #[arg(short, long)]
        width: Option<String>,
    },
    /// List glossary terms in order of first appearance.
    Locate {
        /// Paragraph of the essay to scan.
        #[arg(short, long, conflicts_with = "text")]
        paragraph: Option<usize>,
        /// Arbitrary text to scan with the essay's glossary.
        #[arg(short, long)]
        text: Option<String>,
    },
    /// Show the look-up view of a paragraph for one term.
    Lookup {
        /// Paragraph index.
        paragraph: usize,
        /// Term to look up.
        word: String,
    },
    /// List the preview breakpoints.
    Breakpoints,
    /// Serve the essay over HTTP.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
        /// CSS framework used by the pages.
        #[arg(long, value_enum, default_value_t = ThemeArg::Tailwind)]
        theme: ThemeArg,
        /// Public base URL used for canonical links.
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[cfg(feature = "web")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Tailwind,
    Bootstrap,
}

#[derive(Debug, Clone)]
struct ClickArg {
    paragraph: usize,
    word: Option<String>,
}

impl ClickArg {
    fn event(&self) -> ClickEvent {
        match &self.word {
            Some(word) => ClickEvent::term(word.clone()),
            None => ClickEvent::Outside,
        }
    }
}

fn parse_click(raw: &str) -> Result<ClickArg, String> {
    let (index, word) = match raw.split_once(':') {
        Some((index, word)) => (index, Some(word.trim().to_string())),
        None => (raw, None),
    };
    let paragraph = index
        .trim()
        .parse()
        .map_err(|_| format!("invalid paragraph index in {raw:?}"))?;
    Ok(ClickArg {
        paragraph,
        word: word.filter(|word| !word.is_empty()),
    })
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let essay = match &cli.essay {
        Some(path) => Essay::from_path(path)?,
        None => Essay::default_essay().clone(),
    };
    match cli.command {
        Command::Render {
            paragraph,
            clicks,
            width,
        } => handle_render(&essay, paragraph, &clicks, width.as_deref(), cli.json),
        Command::Locate { paragraph, text } => handle_locate(&essay, paragraph, text, cli.json),
        Command::Lookup { paragraph, word } => handle_lookup(&essay, paragraph, word, cli.json),
        Command::Breakpoints => handle_breakpoints(cli.json),
        #[cfg(feature = "web")]
        Command::Serve {
            addr,
            theme,
            base_url,
        } => handle_serve(essay, addr, theme, base_url),
    }
}

fn handle_render(
    essay: &Essay,
    only: Option<usize>,
    clicks: &[ClickArg],
    width: Option<&str>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut reader = Reader::new(essay);
    for click in clicks {
        reader.click(click.paragraph, click.event())?;
    }
    let indices: Vec<usize> = match only {
        Some(index) => {
            essay.paragraph(index)?;
            vec![index]
        }
        None => (0..essay.paragraphs.len()).collect(),
    };
    let views = indices
        .iter()
        .map(|&index| reader.view(essay, index).map(|view| (index, view)))
        .collect::<Result<Vec<_>, _>>()?;

    if as_json {
        let payload = json!({
            "title": essay.title,
            "date": essay.date,
            "paragraphs": views.iter().map(|(index, view)| {
                json!({ "index": index, "view": view })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let selection = BreakpointSelection::from_stored(width);
    let columns = preview_columns(selection);
    println!("{}", essay.title);
    if let Some(date) = &essay.date {
        println!("{date}");
    }
    for (index, view) in &views {
        println!();
        print_view(*index, view, columns);
    }
    Ok(())
}

fn handle_locate(
    essay: &Essay,
    paragraph: Option<usize>,
    text: Option<String>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let scans: Vec<(Option<usize>, String)> = match (paragraph, text) {
        (_, Some(text)) => vec![(None, text)],
        (Some(index), None) => vec![(Some(index), essay.paragraph(index)?.text.to_string())],
        (None, None) => essay
            .paragraphs
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, text)| (Some(index), text))
            .collect(),
    };
    let results: Vec<(Option<usize>, Vec<TermMatch>)> = scans
        .iter()
        .map(|(index, text)| (*index, locate(text, &essay.glossary)))
        .collect();

    if as_json {
        let payload: Vec<_> = results
            .iter()
            .map(|(index, matches)| json!({ "paragraph": index, "matches": matches }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        for (index, matches) in &results {
            print_match_table(*index, matches);
        }
    }
    Ok(())
}

fn handle_lookup(
    essay: &Essay,
    index: usize,
    word: String,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let mut reader = Reader::new(essay);
    reader.click(index, ClickEvent::term(word.clone()))?;
    let view = reader.view(essay, index)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if essay.glossary.definition(&word).is_none() {
        eprintln!("note: {word:?} is not in the glossary");
    }
    print_view(index, &view, preview_columns(BreakpointSelection::default()));
    Ok(())
}

fn handle_breakpoints(as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(BREAKPOINTS)?);
        return Ok(());
    }
    let width = BREAKPOINTS
        .iter()
        .map(|bp| bp.name.len())
        .max()
        .unwrap_or(4)
        .max("NAME".len());
    println!("{:<width$}  {:>6}  {}", "NAME", "WIDTH", "LABEL", width = width);
    println!("{:-<width$}  {:->6}  {}", "", "", "-----", width = width);
    for bp in BREAKPOINTS {
        let marker = if bp.width == DEFAULT_BREAKPOINT_WIDTH {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<width$}  {:>6}  {}{}",
            bp.name,
            bp.width,
            bp.label(),
            marker,
            width = width
        );
    }
    Ok(())
}

#[cfg(feature = "web")]
fn handle_serve(
    essay: Essay,
    addr: std::net::SocketAddr,
    theme: ThemeArg,
    base_url: Option<String>,
) -> Result<(), Box<dyn Error>> {
    use inline_gloss::web::{WebConfig, WebTheme, serve};
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = WebConfig {
        addr,
        theme: match theme {
            ThemeArg::Tailwind => WebTheme::Tailwind,
            ThemeArg::Bootstrap => WebTheme::Bootstrap,
        },
        base_url: base_url.unwrap_or_else(|| format!("http://{addr}")),
        essay,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))?;
    Ok(())
}

fn print_match_table(index: Option<usize>, rows: &[TermMatch]) {
    match index {
        Some(index) => println!("Paragraph {index}:"),
        None => println!("Text:"),
    }
    if rows.is_empty() {
        println!("  No glossary terms found.");
        return;
    }
    let width = rows
        .iter()
        .map(|row| row.matched_text.len())
        .max()
        .unwrap_or(4)
        .max("MATCH".len());
    println!("  {:<width$}  {:>6}  {:>4}  {}", "MATCH", "START", "LEN", "TERM", width = width);
    println!("  {:-<width$}  {:->6}  {:->4}  {}", "", "", "", "----", width = width);
    for row in rows {
        println!(
            "  {:<width$}  {:>6}  {:>4}  {}",
            row.matched_text,
            row.start,
            row.len,
            row.term,
            width = width
        );
    }
}

fn print_view(index: usize, view: &ParagraphView, columns: usize) {
    if stdout_is_tty() {
        let markdown = view_markdown(view);
        let skin = markdown_skin();
        let formatted = FmtText::from(&skin, &markdown, Some(columns));
        println!("{formatted}");
    } else {
        println!("[{index}] {}", view_plain(view));
    }
}

/// Markdown for the current mode: terms in bold, the lookup definition in
/// italics after the highlighted term.
fn view_markdown(view: &ParagraphView) -> String {
    let mut out = String::new();
    let mut reveal = String::new();
    for segment in view.segments() {
        match segment {
            Segment::Plain { content } => out.push_str(&escape_markdown(content)),
            Segment::Term { text, .. } => {
                out.push_str("**");
                out.push_str(&escape_markdown(text));
                out.push_str("**");
            }
            Segment::RevealChar { ch, .. } => reveal.push(*ch),
        }
    }
    if let Some(definition) = format_reveal(&reveal) {
        out.push_str(" *");
        out.push_str(&escape_markdown(&definition));
        out.push('*');
    }
    out
}

fn view_plain(view: &ParagraphView) -> String {
    let mut out = String::new();
    let mut reveal = String::new();
    for segment in view.segments() {
        match segment {
            Segment::Plain { content } => out.push_str(content),
            Segment::Term { text, .. } => {
                out.push('[');
                out.push_str(text);
                out.push(']');
            }
            Segment::RevealChar { ch, .. } => reveal.push(*ch),
        }
    }
    if let Some(definition) = format_reveal(&reveal) {
        out.push(' ');
        out.push_str(&definition);
    }
    out
}

/// Puts a space after the revealed separator: `-def` becomes `- def`.
fn format_reveal(reveal: &str) -> Option<String> {
    let mut chars = reveal.chars();
    let separator = chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() {
        Some(separator.to_string())
    } else {
        Some(format!("{separator} {rest}"))
    }
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '~') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn preview_columns(selection: BreakpointSelection) -> usize {
    let (terminal_width, _) = terminal_size();
    let requested = (selection.width() / PIXELS_PER_COLUMN) as usize;
    requested.clamp(MIN_COLUMNS, (terminal_width as usize).max(MIN_COLUMNS))
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_skin() -> MadSkin {
    MadSkin::default()
}
