pub mod interpreter;

pub use interpreter::{resolve_interpreter, Interpreter, InterpreterSource};
