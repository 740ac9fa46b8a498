//! One persistent run of the pipeline: lex → parse → resolve → interpret.
//!
//! A `Session` keeps its interpreter (and so its globals) between calls to
//! [`Session::run`], which is what the interactive prompt needs.

use std::io::Write;

use log::{debug, info};

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::tokenize;

/// Result of running one source text.
#[derive(Debug)]
pub enum RunOutcome {
    Success,

    /// Lex, parse, or resolve errors.  Nothing was executed.
    StaticErrors(Vec<LoxError>),

    /// The program ran; these top‑level statements failed.
    RuntimeErrors(Vec<LoxError>),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }

    pub fn errors(&self) -> &[LoxError] {
        match self {
            RunOutcome::Success => &[],
            RunOutcome::StaticErrors(errors) | RunOutcome::RuntimeErrors(errors) => errors,
        }
    }

    /// Conventional process status: 0, 65 for static errors, 70 for runtime
    /// errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::StaticErrors(_) => 65,
            RunOutcome::RuntimeErrors(_) => 70,
        }
    }
}

pub struct Session {
    interpreter: Interpreter,
    next_id: u32,
}

impl Session {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            next_id: 0,
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
            next_id: 0,
        }
    }

    /// Run a complete source text.  Programs with static errors are not
    /// executed; lex and parse errors are reported together.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut errors) = tokenize(source);

        let mut parser = Parser::with_first_id(tokens, self.next_id);
        let parsed = parser.parse();
        self.next_id = parser.next_id();

        let statements = match parsed {
            Ok(statements) if errors.is_empty() => statements,
            Ok(_) => return RunOutcome::StaticErrors(errors),
            Err(mut parse_errors) => {
                errors.append(&mut parse_errors);
                return RunOutcome::StaticErrors(errors);
            }
        };

        let locals = match Resolver::new().resolve(&statements) {
            Ok(locals) => locals,
            Err(resolve_errors) => return RunOutcome::StaticErrors(resolve_errors),
        };

        debug!("Executing {} statement(s)", statements.len());

        let runtime_errors = self.interpreter.interpret(&statements, locals);

        if runtime_errors.is_empty() {
            RunOutcome::Success
        } else {
            RunOutcome::RuntimeErrors(runtime_errors)
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
