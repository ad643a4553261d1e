//! Two-pass assembler for the MR8 8-bit CPU.
//!
//! ```no_run
//! use mr8asm::{Assembler, Config, CppOptions};
//! use std::path::Path;
//!
//! let asm = Assembler::new(Config::default());
//! match asm.assemble_file(Path::new("main.asm")) {
//!     Ok(out) => print!("{}", out.to_cpp(&CppOptions::default())),
//!     Err(err) => err.diags().iter().for_each(|diag| diag.print()),
//! }
//! ```

pub mod assembler;
pub mod defines;
pub mod error;
pub mod eval;
pub mod image;
pub mod label;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pass1;
pub mod pass2;
pub mod util;

pub use assembler::{Assembler, Assembly, Config, Resolved};
pub use error::{AssembleError, Diag, Error};
pub use image::{Image, Segment};
pub use output::{CppOptions, RomError, RomHeader};
