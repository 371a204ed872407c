pub mod script;

pub use script::{ScriptEvent, ScriptReader, ScriptRect, Target, parse_line};
