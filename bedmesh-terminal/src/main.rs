/// bedmesh Terminal Viewer
///
/// Reads a bed mesh grid from a file or stdin and renders it as a colored
/// height surface in the terminal.
/// Controls:
///   - WASD: Rotate, scroll or +/-: Zoom
///   - 1/2/3: Isometric / top / side view
///   - Arrows + Enter or mouse: Hover and select points
///   - Q: Quit

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use web_time::Instant;
use bedmesh_core::{
    format_offset, GridFormat, ParserConfig, Session, SurfaceConfig, ViewerConfig,
};
use bedmesh_terminal::{TerminalApp, SAMPLE_GRID};

/// Input grammar for the pasted grid.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// Rows of sign-prefixed values (`+0.125 -0.050`).
    Signed,
    /// Rows prefixed with their index (` 0 +0.125 -0.050`).
    RowIndexed,
}

impl From<FormatArg> for GridFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Signed => GridFormat::Signed,
            FormatArg::RowIndexed => GridFormat::RowIndexed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bedmesh-terminal", version, about = "View a 3D printer bed mesh in the terminal")]
struct Args {
    /// Grid file; reads stdin when omitted and piped, else shows a sample grid.
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "signed")]
    format: FormatArg,

    /// Vertical exaggeration of offsets.
    #[arg(long, default_value_t = bedmesh_core::config::DEFAULT_HEIGHT_SCALE)]
    height_scale: f32,

    /// Print the parsed grid and its summary instead of opening the viewer.
    #[arg(long)]
    dump: bool,
}

fn read_input(args: &Args) -> Result<String> {
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read grid file {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        info!("no input given, using the sample grid");
        return Ok(SAMPLE_GRID.to_string());
    }

    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("failed to read grid from stdin")?;
    Ok(text)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig {
        parser: ParserConfig {
            format: args.format.into(),
        },
        surface: SurfaceConfig {
            height_scale: args.height_scale,
            ..SurfaceConfig::default()
        },
        ..ViewerConfig::default()
    };

    let text = read_input(&args)?;
    let mut session = Session::new(config);
    session
        .submit(&text, Instant::now())
        .context("could not parse the bed mesh")?;

    if args.dump {
        if let (Some(matrix), Some(summary)) = (session.matrix(), session.summary()) {
            println!(
                "{}x{} grid, min {}, max {}, mean {}",
                summary.rows,
                summary.cols,
                format_offset(summary.range.min),
                format_offset(summary.range.max),
                format_offset(summary.mean)
            );
            println!("{matrix}");
        }
        return Ok(());
    }

    // Run the terminal app
    let mut app = TerminalApp::new(session)?;
    app.run()?;

    Ok(())
}
