//! Command-line entry point: reads a source file, runs the pipeline, and prints
//! the token stream, TAC listing, and symbol-table dump. File I/O and argument
//! handling are external-collaborator concerns the core library itself stays
//! agnostic to; this binary is a thin driver over `blockc::compile`.

use std::fs;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use blockc::{compile, instruction, lexer};

#[derive(ClapParser, Debug)]
#[command(name = "blockc", about = "Block-language front end: tokens, AST, and TAC")]
struct Args {
    /// Source file to compile.
    source: String,

    /// Print the token stream before parsing.
    #[arg(long)]
    dump_tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let text = match fs::read_to_string(&args.source) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error reading {}: {}", args.source, e);
            return ExitCode::FAILURE;
        }
    };

    if args.dump_tokens {
        for token in lexer::scan(&text) {
            println!("{}", token);
        }
    }

    match compile(&text) {
        Ok(output) => {
            for err in &output.syntax_errors {
                eprintln!("{}", err);
            }
            for err in &output.semantic_errors {
                eprintln!("{}", err);
            }
            println!("{}", instruction::render_program(&output.instructions));
            println!("--- symbols ---");
            println!("{}", output.symbol_table_dump);
            if output.syntax_errors.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}
