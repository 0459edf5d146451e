use std::io::Write;

#[macro_use]
mod macros;

// helpers and other things
mod args;
mod format;
mod util;

// the flag computation itself
mod classify;
mod config;
mod flag;
mod handler;
mod normalize;

// sub-commands
mod cmd;

const USAGE: &'static str = "\
Derives the compiler flags a completion host should use to parse a C or C++
source file.

USAGE:
    flagconf <command> ...

COMMANDS:
    catalog    Print the flags in a catalog as a table.
    classify   Print the language a file is parsed as.
    flags      Print the compiler flags for a single file.
    normalize  Resolve the relative paths in a list of flags.
    serve      Answer flag requests read from stdin as JSON lines.
    version    Print the version of flagconf.

";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();
    if let Err(err) = run(&mut lexopt::Parser::from_env()) {
        let mut stderr = std::io::stderr();
        let _ = if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1")
        {
            writeln!(stderr, "{:?}", err)
        } else {
            writeln!(stderr, "{:#}", err)
        };
        std::process::exit(1);
    }
    Ok(())
}

fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = args::next_as_command(USAGE, p)?;
    match &*cmd {
        "catalog" => cmd::catalog::run(p),
        "classify" => cmd::classify::run(p),
        "flags" => cmd::flags::run(p),
        "normalize" => cmd::normalize::run(p),
        "serve" => cmd::serve::run(p),
        "version" => cmd::version::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
