use std::{
    io::Write,
    path::{Path, PathBuf},
};

use lexopt::Arg;

use crate::{
    args::{self, Color, Filter, Usage},
    classify::Language,
    config::Config,
    flag::Flag,
    normalize::normalize,
    util,
};

const USAGES: &[Usage] = &[
    Usage::CATALOG,
    Color::USAGE,
    Filter::USAGE_FLAG,
    Filter::USAGE_FLAG_NOT,
    Usage::ROOT,
];

fn usage_short() -> String {
    format!(
        "\
Print the flags in a catalog as a table.

USAGE:
    flagconf catalog

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
Print the flags in a catalog as a table.

Each row shows one flag: what kind of flag it is, the flag as written in the
catalog and the flag as it is handed to a host after its path (if any) has been
resolved. A path flag written as two separate arguments (like '-I include') is
shown as a single row. The project flags come first, followed by the extra
flags for C and then for C++.

The catalog is found the same way as for 'flagconf flags', with the search
starting in the current directory.

USAGE:
    flagconf catalog

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
    let config = Config::load(
        Some(Path::new(".")),
        c.catalog.as_deref(),
        c.root.as_deref(),
    )?;
    let rows = rows(&config)
        .into_iter()
        .filter(|r| c.filter.include(&r.written))
        .collect::<Vec<Row>>();

    let mut wtr = c.color.elastic_stdout();
    util::colorize_label(&mut wtr, |w| {
        writeln!(w, "kind\twritten\tresolved")
    })?;
    for row in rows.iter() {
        if row.kind == "plain" {
            write!(wtr, "{}", row.kind)?;
        } else {
            util::colorize_note(&mut wtr, |w| write!(w, "{}", row.kind))?;
        }
        writeln!(wtr, "\t{}\t{}", row.written, row.resolved)?;
    }
    wtr.flush()?;
    Ok(())
}

/// A single line of the catalog table.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Row {
    kind: String,
    written: String,
    resolved: String,
}

fn rows(config: &Config) -> Vec<Row> {
    let catalog = &config.catalog;
    let resolved = normalize(&catalog.flags, config.root.as_ref());
    let mut rows = vec![];
    let mut i = 0;
    while i < catalog.flags.len() {
        let flag = Flag::parse(&catalog.flags[i]);
        let (kind, width) = match flag {
            Flag::Plain => ("plain".to_string(), 1),
            Flag::Path { prefix, .. } if flag.takes_next() => {
                (prefix.to_string(), 2)
            }
            Flag::Path { prefix, .. } => (prefix.to_string(), 1),
        };
        // A trailing separate prefix has no value to pair with.
        let end = std::cmp::min(i + width, catalog.flags.len());
        rows.push(Row {
            kind,
            written: catalog.flags[i..end].join(" "),
            resolved: resolved[i..end].join(" "),
        });
        i = end;
    }
    for lang in [Language::C, Language::Cpp] {
        for flag in catalog.language_flags(lang) {
            rows.push(Row {
                kind: lang.to_string(),
                written: flag.clone(),
                resolved: flag.clone(),
            });
        }
    }
    rows
}

#[derive(Clone, Debug, Default)]
struct Cmd {
    catalog: Option<PathBuf>,
    root: Option<PathBuf>,
    color: Color,
    filter: Filter,
}

impl Cmd {
    fn parse(p: &mut lexopt::Parser) -> anyhow::Result<Cmd> {
        let mut c = Cmd::default();
        while let Some(arg) = p.next()? {
            match arg {
                Arg::Short('h') => anyhow::bail!("{}", usage_short()),
                Arg::Long("help") => anyhow::bail!("{}", usage_long()),
                Arg::Short('c') | Arg::Long("catalog") => {
                    c.catalog = Some(args::path(p, "-c/--catalog")?);
                }
                Arg::Short('r') | Arg::Long("root") => {
                    c.root = Some(args::path(p, "-r/--root")?);
                }
                Arg::Long("color") => {
                    c.color = args::parse(p, "--color")?;
                }
                Arg::Short('f') | Arg::Long("filter") => {
                    c.filter.arg_whitelist(p, "-f/--filter")?;
                }
                Arg::Short('F') | Arg::Long("filter-not") => {
                    c.filter.arg_blacklist(p, "-F/--filter-not")?;
                }
                _ => return Err(arg.unexpected().into()),
            }
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::ProjectRoot, format::catalog::Catalog};

    use super::*;

    fn row(kind: &str, written: &str, resolved: &str) -> Row {
        Row {
            kind: kind.to_string(),
            written: written.to_string(),
            resolved: resolved.to_string(),
        }
    }

    #[test]
    fn pairs_separate_prefixes() {
        let raw = r#"
flags = ['-Wall', '-I', 'inc', '--sysroot=sdk', '-isystem']
[c]
flags = ['-std=c99']
[cpp]
flags = ['-std=c++20']
"#;
        let config = Config {
            root: Some(ProjectRoot::new("/p").unwrap()),
            catalog: Catalog::from_slice(raw.as_bytes()).unwrap(),
        };
        let expected = vec![
            row("plain", "-Wall", "-Wall"),
            row("-I", "-I inc", "-I /p/inc"),
            row("--sysroot=", "--sysroot=sdk", "--sysroot=/p/sdk"),
            row("-isystem", "-isystem", "-isystem"),
            row("c", "-std=c99", "-std=c99"),
            row("c++", "-std=c++20", "-std=c++20"),
        ];
        assert_eq!(expected, rows(&config));
    }
}
