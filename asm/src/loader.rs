use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    defines::Defines,
    error::{Diag, Error},
    parser::{strip_comment, Directive},
};

/// One comment-stripped source line that is neither blank nor a preprocessor directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub file: String,
    pub line: usize,
    pub text: String,
}

impl Record {
    pub fn diag(&self, error: Error) -> Diag {
        Diag::new(&self.file, self.line, &self.text, error)
    }
}

/// Output of preprocessing: the flat record list both passes replay.
#[derive(Debug, Default)]
pub struct Source {
    pub records: Vec<Record>,
    pub defines: Defines,
    pub diags: Vec<Diag>,
}

/// Reads the entry file, splices includes in place and collects definitions.
pub struct Loader<'a> {
    include_paths: &'a [PathBuf],
    stack: Vec<PathBuf>,
    source: Source,
}

impl<'a> Loader<'a> {
    /// `defines` seeds the definition table, e.g. with command line definitions.
    pub fn new(include_paths: &'a [PathBuf], defines: Defines) -> Self {
        Loader {
            include_paths,
            stack: vec![],
            source: Source {
                defines,
                ..Default::default()
            },
        }
    }

    pub fn load_file(mut self, path: &Path) -> Source {
        self.file(path, None);
        self.source
    }

    /// Load source text that does not come from a file (standard input).
    /// Relative includes are resolved against the current directory.
    pub fn load_str(mut self, name: &str, text: &str) -> Source {
        self.lines(name, Path::new(""), text);
        self.source
    }

    fn file(&mut self, path: &Path, from: Option<&Record>) {
        let name = path.display().to_string();
        let report = |error: Error| match from {
            Some(record) => record.diag(error),
            None => Diag::file(&name, error),
        };

        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&canonical) {
            self.source.diags.push(report(Error::CircularInclude(name.clone())));
            return;
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                self.source.diags.push(report(Error::FileOpen(name.clone(), err)));
                return;
            }
        };

        let dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        self.stack.push(canonical);
        self.lines(&name, &dir, &text);
        self.stack.pop();
    }

    fn lines(&mut self, name: &str, dir: &Path, text: &str) {
        for (idx, raw) in text.lines().enumerate() {
            let code = strip_comment(raw);
            if code.trim().is_empty() {
                continue;
            }
            let record = Record {
                file: name.to_string(),
                line: idx + 1,
                text: code.trim().to_string(),
            };

            match Directive::parse(code) {
                None => self.source.records.push(record),
                Some(Ok(Directive::Define(key, value))) => {
                    self.source
                        .defines
                        .insert(key.to_string(), value.to_string());
                }
                Some(Ok(Directive::Include(inc))) => match self.resolve_include(inc, dir) {
                    Some(path) => self.file(&path, Some(&record)),
                    None => {
                        let diag = record.diag(Error::IncludeNotFound(inc.to_string()));
                        self.source.diags.push(diag);
                    }
                },
                Some(Err(err)) => self.source.diags.push(record.diag(err)),
            }
        }
    }

    /// Absolute path, then relative to the including file, then each search directory.
    fn resolve_include(&self, inc: &str, dir: &Path) -> Option<PathBuf> {
        let path = Path::new(inc);
        if path.is_absolute() && path.exists() {
            return Some(path.to_path_buf());
        }
        let rel = dir.join(path);
        if rel.exists() {
            return Some(rel);
        }
        self.include_paths
            .iter()
            .map(|inc_dir| inc_dir.join(path))
            .find(|cand| cand.exists())
    }
}
