use lexopt::Arg;

use crate::util;

const USAGE: &str = "\
Print the version of this flagconf command.

USAGE:
    flagconf version
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    if let Some(arg) = p.next()? {
        match arg {
            Arg::Short('h') | Arg::Long("help") => {
                anyhow::bail!("{}", USAGE.trim())
            }
            _ => return Err(arg.unexpected().into()),
        }
    }
    util::write_line(std::io::stdout().lock(), &util::version())?;
    Ok(())
}
