//! A front end for a small block-structured imperative language: grammar and
//! LR(1) table generation, a table-driven parser that builds an AST, and a
//! syntax-directed three-address-code generator with a scoped symbol table.

pub mod address;
pub mod ast;
pub mod driver;
pub mod error;
pub mod first;
pub mod grammar;
pub mod instruction;
pub mod lexer;
pub mod lr1;
pub mod symbol;
pub mod symtab;
pub mod tac;
pub mod token;

use error::{DriverError, GeneratorError};
use instruction::Instruction;
use tac::TacGenerator;

/// The result of running the whole pipeline once: the rendered TAC listing, any
/// collected syntax/semantic diagnostics, and the final symbol-table dump.
pub struct CompileOutput {
    pub instructions: Vec<Instruction>,
    pub syntax_errors: Vec<error::SyntaxError>,
    pub semantic_errors: Vec<error::SemanticError>,
    pub symbol_table_dump: String,
}

/// Builds the parse tables, drives the parser over `source`'s token stream, and
/// lowers the resulting AST to TAC. Returns `Err` only for the fatal classes of
/// failure (generator conflict on GOTO, unrecoverable syntax error, or an
/// internal invariant violation); syntax/semantic diagnostics are collected and
/// returned alongside a successful compile.
pub fn compile(source: &str) -> Result<CompileOutput, CompileError> {
    let prods = grammar::productions();
    let (tables, _collection) = lr1::tables::build(&prods)?;
    let parser = driver::Parser::new(tables);
    let tokens = lexer::scan(source);
    let outcome = parser.parse(&tokens)?;

    let mut generator = TacGenerator::new();
    if let Some(program) = &outcome.program {
        generator.generate(program);
    }

    let symbol_table_dump = generator.symbols.describe();
    let semantic_errors = std::mem::take(&mut generator.errors);

    Ok(CompileOutput {
        instructions: generator.into_instructions(),
        syntax_errors: outcome.errors,
        semantic_errors,
        symbol_table_dump,
    })
}

#[derive(Debug)]
pub enum CompileError {
    Generator(GeneratorError),
    Driver(DriverError),
}

impl From<GeneratorError> for CompileError {
    fn from(e: GeneratorError) -> Self {
        CompileError::Generator(e)
    }
}

impl From<DriverError> for CompileError {
    fn from(e: DriverError) -> Self {
        CompileError::Driver(e)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Generator(e) => write!(f, "{}", e),
            CompileError::Driver(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_simple_program_end_to_end() {
        let output = compile("{ int x; x = 3 + 4; }").expect("fatal compile error");
        assert!(output.syntax_errors.is_empty());
        assert!(output.semantic_errors.is_empty());
        let rendered = instruction::render_program(&output.instructions);
        assert_eq!(
            rendered,
            "BEGIN_BLOCK (Line: 1)\nDECLARE x : int (Line: 1)\n(+, 3, 4, t0)\n(=, t0, _, x_scope1)\nEND_BLOCK (Line: 1)"
        );
    }

    #[test]
    fn reports_undefined_variable_without_aborting() {
        let output = compile("{ x = 1; }").expect("fatal compile error");
        assert_eq!(output.semantic_errors.len(), 1);
    }
}
