pub mod op;

pub use op::{Form, OpKind};
