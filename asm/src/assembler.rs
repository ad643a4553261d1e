use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{
    defines::Defines,
    error::AssembleError,
    image::{Image, Segment},
    label::Labels,
    loader::{Loader, Record, Source},
    output::{to_cpp, to_rom, CppOptions},
    pass1::pass1,
    pass2::{pass2, Emit},
};

/// Settings shared by every run of an [`Assembler`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Start address before any `.org`, also written to the ROM header.
    pub origin: u16,
    /// Byte used for gaps between segments.
    pub fill: u8,
    /// Searched in order after the including file's directory.
    pub include_paths: Vec<PathBuf>,
    /// Definitions in effect before the first source line.
    pub defines: IndexMap<String, String>,
}

pub struct Assembler {
    config: Config,
}

/// Records and labels after a successful first pass.
#[derive(Debug)]
pub struct Resolved {
    pub records: Vec<Record>,
    pub defines: Defines,
    pub labels: Labels,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Assembly {
    pub records: Vec<Record>,
    pub labels: Labels,
    pub segments: Vec<Segment>,
    pub emits: Vec<Emit>,
    origin: u16,
    fill: u8,
}

impl Assembler {
    pub fn new(config: Config) -> Self {
        Assembler { config }
    }

    fn loader(&self) -> Loader<'_> {
        let defines = self
            .config
            .defines
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Loader::new(&self.config.include_paths, defines)
    }

    pub fn load_file(&self, path: &Path) -> Source {
        self.loader().load_file(path)
    }

    pub fn load_str(&self, name: &str, text: &str) -> Source {
        self.loader().load_str(name, text)
    }

    /// Run the first pass. Loader diagnostics are reported together with its own.
    pub fn resolve(&self, source: Source) -> Result<Resolved, AssembleError> {
        let Source {
            records,
            defines,
            mut diags,
        } = source;
        let (labels, errs) = pass1(&records, self.config.origin, &defines);
        diags.extend(errs);
        if !diags.is_empty() {
            return Err(AssembleError::Resolve(diags));
        }
        Ok(Resolved {
            records,
            defines,
            labels,
        })
    }

    pub fn encode(&self, resolved: Resolved) -> Result<Assembly, AssembleError> {
        let Resolved {
            records,
            defines,
            labels,
        } = resolved;
        let (segments, emits, diags) = pass2(&records, self.config.origin, &defines, &labels);
        if !diags.is_empty() {
            return Err(AssembleError::Encode(diags));
        }
        Ok(Assembly {
            records,
            labels,
            segments,
            emits,
            origin: self.config.origin,
            fill: self.config.fill,
        })
    }

    pub fn assemble(&self, source: Source) -> Result<Assembly, AssembleError> {
        let resolved = self.resolve(source)?;
        self.encode(resolved)
    }

    pub fn assemble_file(&self, path: &Path) -> Result<Assembly, AssembleError> {
        self.assemble(self.load_file(path))
    }

    pub fn assemble_str(&self, name: &str, text: &str) -> Result<Assembly, AssembleError> {
        self.assemble(self.load_str(name, text))
    }
}

impl Assembly {
    pub fn image(&self) -> Image {
        Image::build(&self.segments, self.origin, self.fill)
    }

    pub fn to_rom(&self) -> Vec<u8> {
        to_rom(&self.image(), self.origin)
    }

    pub fn to_cpp(&self, opts: &CppOptions) -> String {
        to_cpp(&self.image(), self.origin, opts)
    }
}
