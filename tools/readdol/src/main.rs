use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use dol::{Anomaly, ExtraInfo, Image};
use log::{info, warn};

/// Display information about the contents of DOL files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
#[command(group(
    ArgGroup::new("output")
        .required(true)
        .multiple(true)
        .args(["header", "sections", "check"])
))]
struct Args {
    /// Print DOL header (bss and entry point)
    #[arg(short = 'h', long)]
    header: bool,

    /// Print DOL section table
    #[arg(short = 'S', long)]
    sections: bool,

    /// Print in raw format, aka as is from the file
    #[arg(short = 'w', long)]
    raw: bool,

    /// Report sections that extend past the end of the file
    #[arg(short, long)]
    check: bool,

    /// Preset plist with game-specific section names
    #[arg(short, long)]
    preset: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    dol_file: PathBuf,
}

fn load_preset(path: &Path) -> Result<Option<ExtraInfo>> {
    let info = ExtraInfo::from_file(path)
        .with_context(|| format!("failed to read preset {}", path.display()))?;
    if info.is_empty() {
        warn!("preset {} has no description, ignoring it", path.display());
        return Ok(None);
    }
    info!("using preset: {}", info.description);
    Ok(Some(info))
}

/// Prints everything `args` asks for. Returns false if `--check` found problems.
fn run<W: Write>(args: &Args, out: &mut W) -> Result<bool> {
    let data = fs::read(&args.dol_file)
        .with_context(|| format!("File {} not found.", args.dol_file.display()))?;

    let preset = match &args.preset {
        Some(path) => load_preset(path)?,
        None => None,
    };
    let image = match &preset {
        Some(info) => Image::parse_with_names(&data, info),
        None => Image::parse(&data),
    }
    .with_context(|| format!("failed to parse {}", args.dol_file.display()))?;
    drop(data);

    if args.sections {
        if args.raw {
            write!(out, "{}", image.header())?;
        } else {
            write!(out, "{}", image)?;
            writeln!(out)?;
            write!(out, "{}", image.section_table())?;
        }
    } else if args.header {
        write!(out, "{}", image.header().summary())?;
    }

    if !args.check {
        return Ok(true);
    }

    let anomalies = image.anomalies();
    for anomaly in &anomalies {
        match anomaly {
            Anomaly::SectionOutOfBounds {
                slot,
                end,
                file_size,
            } => writeln!(
                out,
                "slot {} ends at {:#x}, past end of file ({:#x})",
                slot, end, file_size
            )?,
        }
    }
    if anomalies.is_empty() {
        writeln!(
            out,
            "ok: {} sections within {:#x} bytes",
            image.sections().len(),
            image.file_size()
        )?;
    }
    Ok(anomalies.is_empty())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stdout = io::stdout();
    let ok = run(&args, &mut stdout.lock())?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
