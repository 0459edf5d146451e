use std::path::{Path, PathBuf};

use lexopt::{Arg, ValueExt};

use crate::{
    args::{self, Usage},
    config::ProjectRoot,
    normalize::normalize,
    util,
};

const USAGES: &[Usage] = &[
    Usage::ROOT,
    Usage::new(
        "--no-root",
        "Don't resolve any paths.",
        r#"
Don't resolve any paths.

Every flag is printed exactly as given. This is mostly useful for checking how
a flag list is split up by the shell.
"#,
    ),
];

fn usage() -> String {
    format!(
        "\
Resolve the relative paths in a list of compiler flags.

Each path given to -I, -isystem or -iquote (as the next argument) or to
--sysroot= (in the same argument) that isn't already absolute is joined onto
the project root, which defaults to the current directory. All other flags are
printed unchanged. One flag is printed per line, in the order given.

Put the flags after '--' so that they aren't mistaken for options of this
command.

USAGE:
    flagconf normalize [-r <directory>] -- <flag> ...

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
    let root = if c.no_root {
        None
    } else {
        let dir = c.root.as_deref().unwrap_or(Path::new("."));
        Some(ProjectRoot::new(dir)?)
    };
    let mut out = std::io::stdout().lock();
    for flag in normalize(&c.flags, root.as_ref()) {
        if !util::write_line(&mut out, &flag)? {
            break;
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Default)]
struct Cmd {
    root: Option<PathBuf>,
    no_root: bool,
    flags: Vec<String>,
}

impl Cmd {
    fn parse(p: &mut lexopt::Parser) -> anyhow::Result<Cmd> {
        let mut c = Cmd::default();
        while let Some(arg) = p.next()? {
            match arg {
                Arg::Value(v) => c.flags.push(v.string()?),
                Arg::Short('h') | Arg::Long("help") => {
                    anyhow::bail!("{}", usage())
                }
                Arg::Short('r') | Arg::Long("root") => {
                    c.root = Some(args::path(p, "-r/--root")?);
                }
                Arg::Long("no-root") => {
                    c.no_root = true;
                }
                _ => return Err(arg.unexpected().into()),
            }
        }
        anyhow::ensure!(
            !(c.no_root && c.root.is_some()),
            "-r/--root and --no-root cannot be used together",
        );
        Ok(c)
    }
}
