use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bmpfx::{Overflow, Param, Params, PixelBuffer, TransformKind};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bmpfx")]
#[command(about = "Apply pixel effects to 24-bit BMP images")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Saturate out-of-range channel values instead of wrapping them.
    #[arg(long, global = true)]
    clamp: bool,
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for files and effects until `Q` (the default).
    #[command(name = "interactive")]
    Interactive,
    /// Print the available effects.
    #[command(name = "list")]
    List,
    /// Apply one effect to one file.
    #[command(name = "apply")]
    Apply(ApplyArgs),
}

#[derive(Args, Debug, Clone)]
struct ApplyArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// Effect name or menu id.
    #[arg(long, short)]
    transform: TransformKind,
    /// Defaults to `<stem>_<effect>.<ext>` next to the input.
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long)]
    factor: Option<f64>,
    #[arg(long)]
    rotations: Option<u32>,
    #[arg(long)]
    x_scale: Option<u32>,
    #[arg(long)]
    y_scale: Option<u32>,
}

const QUIT_CHOICE: u8 = 99;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let overflow = if cli.clamp {
        Overflow::Clamp
    } else {
        Overflow::Wrap
    };

    match cli.cmd.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            let stdin = io::stdin();
            run_interactive(&mut stdin.lock(), &mut io::stdout(), &cwd, overflow)
        }
        Command::List => {
            let mut out = io::stdout();
            print_menu(&mut out)?;
            Ok(())
        }
        Command::Apply(args) => run_apply(&args, overflow),
    }
}

fn run_apply(args: &ApplyArgs, overflow: Overflow) -> Result<()> {
    let params = Params {
        factor: args.factor,
        rotations: args.rotations,
        x_scale: args.x_scale,
        y_scale: args.y_scale,
    };
    let transform = args.transform.with_params(&params)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| output_path(&args.input, args.transform.name()));

    bmpfx::process_file(&args.input, &output, &transform, overflow).with_context(|| {
        format!(
            "failed to apply {} to {}",
            transform.name(),
            args.input.display()
        )
    })?;
    println!("{} has been created!", output.display());
    Ok(())
}

/// `<parent>/<stem>_<name><.ext>`, or `<stem>_<name><.ext>` without a parent.
fn output_path(input: &Path, name: &str) -> PathBuf {
    let mut file_name = input.file_stem().unwrap_or_default().to_os_string();
    file_name.push("_");
    file_name.push(name);
    if let Some(ext) = input.extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    match input.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn print_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, " Please select from the following image processing options: ")?;
    for kind in TransformKind::ALL {
        writeln!(out, "  {} - {} - {}", kind.id(), kind.name(), kind.description())?;
    }
    writeln!(out, "  {QUIT_CHOICE} - Quit")
}

/// Next input line without its line ending, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Prompt until the answer parses as `T`.
fn prompt_value<T: std::str::FromStr>(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
) -> Result<Option<T>> {
    loop {
        writeln!(out, "{prompt}")?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.trim().parse() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => writeln!(out, "{:?} is not a valid value.", line.trim())?,
        }
    }
}

fn collect_params(
    kind: TransformKind,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<Params>> {
    let mut params = Params::default();
    for &param in kind.params() {
        match param {
            Param::Factor => {
                let Some(v) = prompt_value(input, out, param.prompt())? else {
                    return Ok(None);
                };
                params.factor = Some(v);
            }
            Param::Rotations => {
                let Some(v) = prompt_value(input, out, param.prompt())? else {
                    return Ok(None);
                };
                params.rotations = Some(v);
            }
            Param::XScale => {
                let Some(v) = prompt_value(input, out, param.prompt())? else {
                    return Ok(None);
                };
                params.x_scale = Some(v);
            }
            Param::YScale => {
                let Some(v) = prompt_value(input, out, param.prompt())? else {
                    return Ok(None);
                };
                params.y_scale = Some(v);
            }
        }
    }
    Ok(Some(params))
}

/// The prompt loop. Returns when the user enters `Q`, picks 99, or input ends.
/// A file that fails to decode or transform is reported and the loop goes on.
fn run_interactive(
    input: &mut impl BufRead,
    out: &mut impl Write,
    cwd: &Path,
    overflow: Overflow,
) -> Result<()> {
    loop {
        writeln!(out, "Welcome to Image Processor Application")?;
        writeln!(out)?;

        let bmp_path = loop {
            write!(
                out,
                "Please Enter absolute path (or path relative to {}) for bmp file to process or Q to exit: ",
                cwd.display()
            )?;
            out.flush()?;
            let Some(line) = read_line(input)? else {
                return Ok(());
            };
            if line == "Q" {
                return Ok(());
            }
            let candidate = cwd.join(line.trim());
            let is_bmp = candidate
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
            if candidate.is_file() && is_bmp {
                writeln!(out, "{} is a valid bmp file. ", line.trim())?;
                break candidate;
            }
            writeln!(out, "That is not an existing bmp file.")?;
        };

        print_menu(out)?;
        let Some(choice) = read_line(input)? else {
            return Ok(());
        };
        let kind = match choice.trim().parse::<u8>() {
            Ok(QUIT_CHOICE) => return Ok(()),
            Ok(id) => TransformKind::from_id(id),
            Err(_) => None,
        };
        let Some(kind) = kind else {
            writeln!(out, "{:?} is not one of the listed options.", choice.trim())?;
            continue;
        };

        match process_interactive(kind, &bmp_path, input, out, overflow) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => {
                log::warn!("{e:#}");
                writeln!(out, "{e:#}")?;
            }
        }
        writeln!(out)?;
        writeln!(out)?;
    }
}

/// One decode → transform → encode run. `Ok(false)` means input ended.
fn process_interactive(
    kind: TransformKind,
    bmp_path: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
    overflow: Overflow,
) -> Result<bool> {
    let image: PixelBuffer = match bmpfx::read_bmp_file(bmp_path) {
        Ok(image) => image,
        Err(e) if e.is_format() => {
            log::debug!("{}: {e}", bmp_path.display());
            writeln!(out, "Not a 24-bit true color image file.")?;
            return Ok(true);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", bmp_path.display()));
        }
    };

    let default_out = output_path(bmp_path, kind.name());
    writeln!(
        out,
        "Default output filename: {} If you would like to save the file to a different location;",
        default_out.display()
    )?;
    writeln!(out, "Enter a new path now or just hit enter to accept the default: ")?;
    let Some(answer) = read_line(input)? else {
        return Ok(false);
    };
    let out_path = match answer.trim() {
        "" => default_out,
        other => PathBuf::from(other),
    };

    let Some(params) = collect_params(kind, input, out)? else {
        return Ok(false);
    };
    let transform = kind.with_params(&params)?;
    let result = transform.apply_with(&image, overflow)?;
    bmpfx::write_bmp_file(&out_path, &result)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    writeln!(out, "{} has been created!", out_path.display())?;
    Ok(true)
}
