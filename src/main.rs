//! Command-line driver: read a source file, write an assembly listing.

use std::env;
use std::fs;
use std::process;

use minic::lexer;
use minic::parser;
use minic::semantic;

const USAGE: &str = "usage: minic <input> [-o <output>] [--dump-ast]";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.len() == 1 && (args[0] == "--version" || args[0] == "-v") {
        println!("minic {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let mut input = None;
    let mut output = None;
    let mut dump_ast = false;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "-o" {
            match iter.next() {
                Some(path) => output = Some(path),
                None => fail(&format!("missing path after -o\n{USAGE}")),
            }
        } else if arg == "--dump-ast" {
            dump_ast = true;
        } else if input.is_none() {
            input = Some(arg);
        } else {
            fail(&format!("unexpected argument '{arg}'\n{USAGE}"));
        }
    }
    let Some(input) = input else {
        fail(USAGE);
    };

    let source = match fs::read_to_string(&input) {
        Ok(source) => source,
        Err(error) => fail(&format!("cannot read '{input}': {error}")),
    };

    if dump_ast {
        match parse_only(&source) {
            Ok(unit) => print!("{}", unit.dump()),
            Err(error) => fail(&error.display_with_source(&source)),
        }
        return;
    }

    match minic::compile(&source) {
        Ok(asm) => match output {
            Some(path) => {
                if let Err(error) = fs::write(&path, asm) {
                    fail(&format!("cannot write '{path}': {error}"));
                }
            }
            None => print!("{asm}"),
        },
        Err(error) => fail(&error.display_with_source(&source)),
    }
}

/// Run the front end and decoration only, for `--dump-ast`.
fn parse_only(source: &str) -> Result<minic::ast::TranslationUnit, minic::CompileError> {
    let tokens = lexer::tokenize(source)?;
    let mut unit = parser::parse(tokens)?;
    let mut scopes = semantic::ScopeStack::new();
    semantic::decorate(&mut unit, &mut scopes)?;
    Ok(unit)
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}
