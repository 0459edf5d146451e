use std::path::{Path, PathBuf};

use lexopt::{Arg, ValueExt};

use crate::{
    args::{self, OutputFormat, Usage},
    config::Config,
    format::request::Request,
    handler::Handler,
    util,
};

const USAGES: &[Usage] =
    &[Usage::CATALOG, OutputFormat::USAGE, Usage::NO_CACHE, Usage::ROOT];

fn usage_short() -> String {
    format!(
        "\
Print the compiler flags for parsing a single source file.

USAGE:
    flagconf flags <file>

TIP:
    use -h for short docs and --help for long docs

OPTIONS:
{options}
",
        options = Usage::short(USAGES),
    )
    .trim()
    .to_string()
}

fn usage_long() -> String {
    format!(
        "\
Print the compiler flags for parsing a single source file.

The flags are the catalog's project flags, with every relative path given to
-I, -isystem, -iquote or --sysroot= resolved against the project root, followed
by the dialect flags for the file. A file is parsed as C when its name (the
final path component only) is listed in the catalog's 'c-files', and as C++
otherwise.

The file itself is never read and does not need to exist. Its location is only
used to search for a catalog file when -c/--catalog isn't given.

USAGE:
    flagconf flags <file>

OPTIONS:
{options}
",
        options = Usage::long(USAGES),
    )
    .trim()
    .to_string()
}

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let c = Cmd::parse(p)?;
    // A bare file name has an empty parent, which resolves to the current
    // directory.
    let search = c.file.parent().unwrap_or(Path::new("."));
    let config =
        Config::load(Some(search), c.catalog.as_deref(), c.root.as_deref())?;
    let handler = Handler::new(config);
    let mut req = Request::new(c.file.to_string_lossy());
    if c.no_cache {
        req.options.cache = Some(false);
    }
    let resp = handler.flags_for_file(&req);

    let mut out = std::io::stdout().lock();
    match c.format {
        OutputFormat::Json => {
            let json = serde_json::to_string(&resp)?;
            util::write_line(&mut out, &json)?;
        }
        OutputFormat::Lines => {
            for flag in resp.flags.iter() {
                if !util::write_line(&mut out, flag)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Default)]
struct Cmd {
    file: PathBuf,
    catalog: Option<PathBuf>,
    root: Option<PathBuf>,
    format: OutputFormat,
    no_cache: bool,
}

impl Cmd {
    fn parse(p: &mut lexopt::Parser) -> anyhow::Result<Cmd> {
        let mut c = Cmd::default();
        let mut file = None;
        while let Some(arg) = p.next()? {
            match arg {
                Arg::Value(v) => {
                    if file.is_some() {
                        anyhow::bail!(
                            "only one file is accepted, but multiple \
                             were given",
                        );
                    }
                    file = Some(PathBuf::from(v.string()?));
                }
                Arg::Short('h') => anyhow::bail!("{}", usage_short()),
                Arg::Long("help") => anyhow::bail!("{}", usage_long()),
                Arg::Short('c') | Arg::Long("catalog") => {
                    c.catalog = Some(args::path(p, "-c/--catalog")?);
                }
                Arg::Short('r') | Arg::Long("root") => {
                    c.root = Some(args::path(p, "-r/--root")?);
                }
                Arg::Short('f') | Arg::Long("format") => {
                    c.format = args::parse(p, "-f/--format")?;
                }
                Arg::Long("no-cache") => {
                    c.no_cache = true;
                }
                _ => return Err(arg.unexpected().into()),
            }
        }
        c.file = match file {
            None => anyhow::bail!("missing file name"),
            Some(file) => file,
        };
        Ok(c)
    }
}
