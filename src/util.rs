/// The flagconf Cargo package version. This environment variable is
/// guaranteed to be made available by Cargo.
pub const FLAGCONF_VERSION: &'static str = env!("CARGO_PKG_VERSION");

/// The commit revision hash that flagconf was built from. This environment
/// variable is set by a custom build script, and is only available when `git`
/// is available.
pub const FLAGCONF_REVISION: Option<&'static str> =
    option_env!("FLAGCONF_REVISION");

/// Returns a complete version string for `flagconf`, including the revision
/// hash when it is known.
pub fn version() -> String {
    match FLAGCONF_REVISION {
        None => FLAGCONF_VERSION.to_string(),
        Some(rev) => format!("{} (rev {})", FLAGCONF_VERSION, rev),
    }
}

/// Colorize the given writer in a "label" style.
pub fn colorize_label<W: termcolor::WriteColor>(
    wtr: W,
    with: impl FnMut(&mut W) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    let mut spec = termcolor::ColorSpec::new();
    spec.set_bold(true);
    colorize(wtr, &spec, with)
}

/// Colorize the given writer in a "note" style.
pub fn colorize_note<W: termcolor::WriteColor>(
    wtr: W,
    with: impl FnMut(&mut W) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    let mut spec = termcolor::ColorSpec::new();
    spec.set_fg(Some(termcolor::Color::Blue));
    spec.set_bold(true);
    colorize(wtr, &spec, with)
}

fn colorize<W: termcolor::WriteColor>(
    mut wtr: W,
    spec: &termcolor::ColorSpec,
    mut with: impl FnMut(&mut W) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    wtr.set_color(spec)?;
    with(&mut wtr)?;
    wtr.reset()?;
    Ok(())
}

/// Write `line` followed by a newline to `wtr`. A closed pipe (as with
/// `flagconf ... | head -n1`) is reported as `Ok(false)` so that callers
/// can stop writing quietly.
pub fn write_line<W: std::io::Write>(
    mut wtr: W,
    line: &str,
) -> anyhow::Result<bool> {
    if let Err(err) = writeln!(wtr, "{}", line) {
        if err.kind() == std::io::ErrorKind::BrokenPipe {
            return Ok(false);
        }
        return Err(anyhow::Error::from(err).context("failed to write output"));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_starts_with_package_version() {
        assert!(version().starts_with(FLAGCONF_VERSION));
    }

    #[test]
    fn write_line_appends_newline() {
        let mut buf = vec![];
        assert!(write_line(&mut buf, "-Wall").unwrap());
        assert_eq!(b"-Wall\n", &buf[..]);
    }
}
