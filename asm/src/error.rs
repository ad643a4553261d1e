use color_print::ceprintln;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown mnemonic: `{0}`")]
    UnknownMnemonic(String),

    #[error("Re-defined label: `{0}` (first defined at {1})")]
    DuplicateLabel(String, String),

    #[error("`{0}` requires {1} operand(s), found {2}")]
    OperandCount(String, usize, usize),

    #[error(".org requires one address")]
    OrgOperand,

    #[error("Invalid .org address: `{0}`")]
    InvalidOrg(String),

    #[error("Cannot parse `{0}` as number")]
    ParseNumber(String),

    #[error("Operand out of range for `{0}`: {1}")]
    ImmOutOfRange(String, i64),

    #[error("Address out of range for `{0}`: {1}")]
    AddrOutOfRange(String, i64),

    #[error("Branch target out of range for `{0}`: offset {1}")]
    BranchOutOfRange(String, i64),

    #[error("`{0}` at ${1:04X} runs past the end of the address space")]
    AddressOverflow(String, u32),

    #[error("Include not found: `{0}`")]
    IncludeNotFound(String),

    #[error("Circular include detected: {0}")]
    CircularInclude(String),

    #[error("Malformed directive: `{0}`")]
    MalformedDirective(String),

    #[error("Failed to open file: {0}: {1}")]
    FileOpen(String, #[source] std::io::Error),
}

/// An [`Error`] tagged with the source position it was found at.
#[derive(Debug)]
pub struct Diag {
    pub file: String,
    pub line: Option<usize>,
    pub text: String,
    pub error: Error,
}

impl Diag {
    pub fn new(file: &str, line: usize, text: &str, error: Error) -> Self {
        Diag {
            file: file.to_string(),
            line: Some(line),
            text: text.to_string(),
            error,
        }
    }

    /// Diagnostic about a whole file, e.g. an entry file that cannot be read.
    pub fn file(file: &str, error: Error) -> Self {
        Diag {
            file: file.to_string(),
            line: None,
            text: String::new(),
            error,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print(&self) {
        ceprintln!("<red,bold>error</>: {}", self.error);
        match self.line {
            Some(line) => {
                ceprintln!("     <blue>--></> <underline>{}:{}</>", self.file, line);
                ceprintln!("      <blue>|</>");
                ceprintln!(" <blue>{:>4} |</> {}", line, self.text);
                ceprintln!("      <blue>|</>");
            }
            None => ceprintln!("     <blue>--></> <underline>{}</>", self.file),
        }
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.error),
            None => write!(f, "{}: {}", self.file, self.error),
        }
    }
}

/// Failure of a whole run. Every diagnostic collected by the failing pass is kept.
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("{} error(s) while resolving labels", .0.len())]
    Resolve(Vec<Diag>),

    #[error("{} error(s) while generating binary", .0.len())]
    Encode(Vec<Diag>),
}

impl AssembleError {
    pub fn diags(&self) -> &[Diag] {
        match self {
            AssembleError::Resolve(diags) | AssembleError::Encode(diags) => diags,
        }
    }
}
