use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use arch::OpKind;
use clap::{Parser, ValueEnum};
use color_print::ceprintln;
use mr8asm::{eval::parse_number, util, AssembleError, Assembler, Config, CppOptions};
use thiserror::Error;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutFormat {
    /// Binary with MR8C header
    Rom,
    /// C/C++ byte array
    Cpp,
}

#[derive(Debug, Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Entry source file, `-` reads standard input
    #[clap(required_unless_present = "isa")]
    input: Option<String>,

    /// Origin used before any `.org` and written to the ROM header
    #[clap(short, long, default_value = "0x0000", value_parser = parse_u16)]
    origin: u16,

    /// Byte used to fill gaps between segments
    #[clap(short, long, default_value = "0x00", value_parser = parse_u8)]
    fill: u8,

    /// Output format
    #[clap(short = 't', long, value_enum, default_value_t = OutFormat::Rom)]
    out_format: OutFormat,

    /// Array variable name for cpp output
    #[clap(short, long, default_value = "ROM")]
    var: String,

    /// Bytes per row for cpp output
    #[clap(long, default_value_t = 12)]
    columns: usize,

    /// Output file (cpp: stdout, rom: input with `.rom` extension)
    #[clap(short = 'O', long)]
    output: Option<PathBuf>,

    /// Include search directory (repeatable)
    #[clap(short = 'I', value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Define NAME=VALUE, or NAME as 1 (repeatable)
    #[clap(short = 'D', value_name = "NAME[=VALUE]", value_parser = parse_define)]
    define: Vec<(String, String)>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,

    /// Print the instruction set and exit
    #[clap(long)]
    isa: bool,

    /// Only print errors
    #[clap(short, long)]
    quiet: bool,
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let val = parse_number(s).map_err(|e| e.to_string())?;
    u16::try_from(val).map_err(|_| format!("`{s}` does not fit in 16 bits"))
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let val = parse_number(s).map_err(|e| e.to_string())?;
    u8::try_from(val).map_err(|_| format!("`{s}` does not fit in 8 bits"))
}

fn parse_define(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=').unwrap_or((s, "1"));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid NAME=VALUE: `{s}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("Failed to read {0}: {1}")]
    Read(String, #[source] io::Error),

    #[error("Failed to write {0}: {1}")]
    Write(String, #[source] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.isa {
        for op in OpKind::all() {
            println!("{}", op.cformat());
        }
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let CliError::Assemble(err) = &err {
                for diag in err.diags() {
                    diag.print();
                }
            }
            ceprintln!("<red,bold>error</>: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let start = Instant::now();
    let step = |msg: &str| {
        if !args.quiet {
            ceprintln!("<bold>{}</>", msg);
        }
    };
    let input = args.input.as_deref().unwrap_or("-");

    let asm = Assembler::new(Config {
        origin: args.origin,
        fill: args.fill,
        include_paths: args.include.clone(),
        defines: args.define.iter().cloned().collect(),
    });

    step("1. Load Sources");
    let source = if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::Read("<stdin>".to_string(), e))?;
        asm.load_str("<stdin>", &text)
    } else {
        asm.load_file(Path::new(input))
    };
    if !args.quiet {
        eprintln!("  < {} ({} lines)", input, source.records.len());
    }

    step("2. Resolve Labels");
    let resolved = asm.resolve(source)?;

    step("3. Generate Binary");
    let out = asm.encode(resolved)?;

    if args.dump {
        print!("{}", util::dump(&out));
    }

    step("4. Output");
    let path = match args.out_format {
        OutFormat::Cpp => {
            let opts = CppOptions {
                var: args.var.clone(),
                columns: args.columns,
            };
            let text = out.to_cpp(&opts);
            match &args.output {
                Some(path) => write(path, text.as_bytes())?,
                None => io::stdout()
                    .write_all(text.as_bytes())
                    .map_err(|e| CliError::Write("<stdout>".to_string(), e))?,
            }
            args.output.clone()
        }
        OutFormat::Rom => {
            let path = match &args.output {
                Some(path) => path.clone(),
                None if input == "-" => PathBuf::from("out.rom"),
                None => Path::new(input).with_extension("rom"),
            };
            write(&path, &out.to_rom())?;
            Some(path)
        }
    };

    if !args.quiet {
        if let Some(path) = path {
            ceprintln!("<green,bold>Wrote ROM</>: {}", path.display());
        }
        ceprintln!(
            "<green>Built ROM in {} milliseconds.</>",
            start.elapsed().as_millis()
        );
    }
    Ok(())
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|e| CliError::Write(path.display().to_string(), e))
}
