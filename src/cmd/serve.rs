use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use {anyhow::Context, lexopt::Arg};

use crate::{
    args::{self, Usage},
    config::Config,
    format::request::{Reply, Request},
    handler::Handler,
};

const USAGES: &[Usage] = &[Usage::CATALOG, Usage::ROOT];

fn usage() -> String {
    format!(
        "\
Answer flag requests read from stdin, one JSON object per line.

Each line of input must be a request of the form

    {{\"filename\": \"src/arq.h\", \"options\": {{\"cache\": false}}}}

where 'options' (and each key inside it) may be omitted. Option keys other
than 'cache' are accepted and ignored. For each request, exactly one line is
written to stdout: either {{\"flags\": [...], \"do_cache\": bool}}, or
{{\"error\": \"...\"}} when the line couldn't be decoded. Blank lines are
skipped. Serving stops at the end of input.

The catalog and project root are decided once, before the first request is
read. Without -c/--catalog, the search for a catalog file starts in the
current directory.

USAGE:
    flagconf serve

OPTIONS:
{options}
",
        options = Usage::short(USAGES),
    )
    .trim()
    .to_string()
}

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let c = Cmd::parse(p)?;
    let config = Config::load(
        Some(Path::new(".")),
        c.catalog.as_deref(),
        c.root.as_deref(),
    )?;
    let handler = Handler::new(config);
    serve(&handler, std::io::stdin().lock(), std::io::stdout().lock())
}

/// Answer every request line read from `rdr`, writing one reply per line to
/// `wtr`. Only a failure to read or write stops serving. A closed output pipe
/// stops it quietly.
fn serve<R: BufRead, W: Write>(
    handler: &Handler,
    rdr: R,
    mut wtr: W,
) -> anyhow::Result<()> {
    for (i, line) in rdr.split(b'\n').enumerate() {
        let mut line = line.context("failed to read request from stdin")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }
        let reply = answer(handler, &line);
        if let Reply::Err { ref error } = reply {
            log::warn!("request on line {}: {}", i + 1, error);
        }
        let json = serde_json::to_string(&reply)?;
        if let Err(err) = writeln!(wtr, "{}", json).and_then(|_| wtr.flush()) {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                break;
            }
            return Err(anyhow::Error::from(err)
                .context("failed to write response to stdout"));
        }
    }
    Ok(())
}

/// Decode one request line and answer it.
fn answer(handler: &Handler, line: &[u8]) -> Reply {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line,
        Err(err) => {
            return Reply::Err { error: format!("invalid request: {}", err) }
        }
    };
    match serde_json::from_str::<Request>(line) {
        Ok(req) => Reply::Ok(handler.flags_for_file(&req)),
        Err(err) => Reply::Err { error: format!("invalid request: {}", err) },
    }
}

#[derive(Clone, Debug, Default)]
struct Cmd {
    catalog: Option<PathBuf>,
    root: Option<PathBuf>,
}

impl Cmd {
    fn parse(p: &mut lexopt::Parser) -> anyhow::Result<Cmd> {
        let mut c = Cmd::default();
        while let Some(arg) = p.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => {
                    anyhow::bail!("{}", usage())
                }
                Arg::Short('c') | Arg::Long("catalog") => {
                    c.catalog = Some(args::path(p, "-c/--catalog")?);
                }
                Arg::Short('r') | Arg::Long("root") => {
                    c.root = Some(args::path(p, "-r/--root")?);
                }
                _ => return Err(arg.unexpected().into()),
            }
        }
        Ok(c)
    }
}
