use std::path::{Path, PathBuf};

use lexopt::{Arg, ValueExt};

use crate::{
    args::{self, Usage},
    config::Config,
    handler::Handler,
    util,
};

const USAGES: &[Usage] = &[Usage::CATALOG];

fn usage() -> String {
    format!(
        "\
Print the language a source file is parsed as, either 'c' or 'c++'.

Only the final component of the file name is considered. It is compared,
case sensitively, with the catalog's 'c-files'. Anything not listed there
(including an empty name) is C++.

USAGE:
    flagconf classify <file>

OPTIONS:
{options}
",
        options = Usage::short(USAGES),
    )
    .trim()
    .to_string()
}

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut catalog: Option<PathBuf> = None;
    let mut file: Option<String> = None;
    while let Some(arg) = p.next()? {
        match arg {
            Arg::Value(v) => {
                anyhow::ensure!(
                    file.is_none(),
                    "only one file is accepted, but multiple were given",
                );
                file = Some(v.string()?);
            }
            Arg::Short('h') | Arg::Long("help") => {
                anyhow::bail!("{}", usage())
            }
            Arg::Short('c') | Arg::Long("catalog") => {
                catalog = Some(args::path(p, "-c/--catalog")?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }
    let Some(file) = file else { anyhow::bail!("missing file name") };
    let search = Path::new(&file).parent().unwrap_or(Path::new("."));
    let config = Config::load(Some(search), catalog.as_deref(), None)?;
    let lang = Handler::new(config).language(&file);
    util::write_line(std::io::stdout().lock(), &lang.to_string())?;
    Ok(())
}
