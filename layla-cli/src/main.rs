//! Thin demo binary, in the spirit of the original's `cmd/layla/main.go`:
//! reads a JSON node tree and a JSON font-registration list, runs layout
//! and pagination, and prints the resulting draw list as JSON. It does not
//! parse templates, real font files, or barcodes; those stay out of scope.

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;

use layla::{Draw, FaceSource, FixedFaceSource, FontManager, Layouter, Node, ZeroStyler};

/// Measures and paginates a node tree, printing its draw list as JSON.
#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Options {
    /// Path to a JSON node tree (the shape an external template evaluator
    /// would produce).
    node: String,

    /// Path to a JSON array of font registrations. Defaults to no fonts,
    /// which only works for trees that never reach a `text`/`markup` node.
    #[clap(long)]
    fonts: Option<String>,

    /// Resolution in dots per inch; `<= 0` defaults to 72.
    #[clap(long, default_value_t = 203.0)]
    dpi: f32,

    /// Horizontal sub-pixel divisions; `<= 0` defaults to 2.
    #[clap(long, default_value_t = 2)]
    subx: i32,

    /// Vertical sub-pixel divisions; `<= 0` defaults to 4.
    #[clap(long, default_value_t = 4)]
    suby: i32,

    /// Rune used for inter-word spacing during line-breaking.
    #[clap(long, default_value_t = String::from("m"))]
    spacer: String,

    /// Raise logging verbosity (`-v` debug, `-vv` trace).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One entry of the `--fonts` JSON list: a named, fixed-metrics stand-in
/// face, since real font-file parsing is an external concern this crate
/// never performs.
#[derive(Deserialize)]
struct FontEntry {
    name: String,
    #[serde(default = "default_advance_em")]
    advance_em: f64,
    #[serde(default = "default_line_em")]
    line_em: f64,
}

fn default_advance_em() -> f64 {
    FixedFaceSource::default().advance_em
}

fn default_line_em() -> f64 {
    FixedFaceSource::default().line_em
}

fn set_up_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }
}

fn run(opts: Options) -> Result<String, String> {
    let node_json = fs::read_to_string(&opts.node).map_err(|e| format!("read node tree {:?}: {e}", opts.node))?;
    let mut node: Node = serde_json::from_str(&node_json).map_err(|e| format!("parse node tree: {e}"))?;

    let manager = FontManager::new(opts.dpi, opts.subx, opts.suby);
    if let Some(path) = &opts.fonts {
        let fonts_json = fs::read_to_string(path).map_err(|e| format!("read fonts {path:?}: {e}"))?;
        let entries: Vec<FontEntry> = serde_json::from_str(&fonts_json).map_err(|e| format!("parse fonts: {e}"))?;
        for entry in entries {
            log::debug!("registering font {:?} (advance_em {}, line_em {})", entry.name, entry.advance_em, entry.line_em);
            let source: Arc<dyn FaceSource> =
                Arc::new(FixedFaceSource { advance_em: entry.advance_em, line_em: entry.line_em });
            manager.register(entry.name, source);
        }
    }

    let spacer = opts.spacer.chars().next().unwrap_or('m');
    let draws: Vec<Draw> = Layouter::new(&manager, &ZeroStyler)
        .with_spacer(spacer)
        .layout_and_page(&mut node)
        .map_err(|e| format!("layout: {e}"))?;
    log::info!("produced {} draw records across {} page(s)", draws.len(), draws.iter().filter(|d| matches!(d, Draw::PageBreak)).count() + 1);

    serde_json::to_string_pretty(&draws).map_err(|e| format!("encode draw list: {e}"))
}

fn main() -> ExitCode {
    let opts = Options::parse();
    set_up_logging(opts.verbose);
    match run(opts) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
