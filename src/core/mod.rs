pub mod decode;
pub mod error;
pub mod path;
pub mod process;

pub use decode::{decode_output, DecodePolicy};
pub use error::{AuditError, Result};
pub use path::resolve_path;
pub use process::{Invocation, ProcessLauncher, RawOutput, SystemLauncher};
