//! D front-end CLI.

mod commands;

use commands::{check_file, lex_file, parse_file, tree_file};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    match command {
        "lex" | "parse" | "tree" | "check" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: dlangp {command} <file.d>");
                std::process::exit(1);
            };
            match command {
                "lex" => lex_file(path),
                "parse" => parse_file(path),
                "tree" => tree_file(path),
                _ => check_file(path),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("dlangp {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Enable with `RUST_LOG=dlang_parse=debug` or similar.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}

fn print_usage() {
    println!("D front-end driver");
    println!();
    println!("Usage: dlangp <command> <file.d>");
    println!();
    println!("Commands:");
    println!("  lex <file.d>     Tokenize and print every token");
    println!("  parse <file.d>   Parse and print the top-level declarations");
    println!("  tree <file.d>    Parse and print the full syntax tree");
    println!("  check <file.d>   Parse and report diagnostics only");
    println!("  help             Show this help message");
    println!("  version          Show version information");
    println!();
    println!("Exit code is 1 when the file has lexical or syntax errors.");
}
