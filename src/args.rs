use std::{
    fmt::{Debug, Display, Write},
    path::PathBuf,
    str::FromStr,
};

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    regex_lite::Regex,
};

/// Parses the argument from the given parser as a command name, and returns
/// it. If the next arg isn't a simple value then this returns an error.
///
/// This also handles the case where -h/--help is given, in which case, the
/// given usage information is converted into an error and printed.
pub fn next_as_command(usage: &str, p: &mut Parser) -> anyhow::Result<String> {
    let usage = usage.trim();
    let arg = match p.next()? {
        Some(arg) => arg,
        None => anyhow::bail!("{}", usage),
    };
    let cmd = match arg {
        Arg::Value(cmd) => cmd.string()?,
        Arg::Short('h') | Arg::Long("help") => anyhow::bail!("{}", usage),
        arg => return Err(arg.unexpected().into()),
    };
    Ok(cmd)
}

/// Parses the next 'p.value()' into 'T'. Any error messages will include the
/// given flag name in them.
pub fn parse<T>(p: &mut Parser, flag_name: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: Display + Debug + Send + Sync + 'static,
{
    let strv = string(p, flag_name)?;
    strv.parse().map_err(|err| anyhow::anyhow!("{}: {}", flag_name, err))
}

/// Returns the next 'p.value()' as a UTF-8 string.
pub fn string(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<String> {
    let osv = p.value().context(flag_name)?;
    match osv.into_string() {
        Ok(strv) => Ok(strv),
        Err(osv) => {
            let err = lexopt::Error::NonUnicodeValue(osv);
            Err(anyhow::Error::from(err).context(flag_name))
        }
    }
}

/// Returns the next 'p.value()' as a path.
pub fn path(
    p: &mut Parser,
    flag_name: &'static str,
) -> anyhow::Result<PathBuf> {
    Ok(PathBuf::from(p.value().context(flag_name)?))
}

/// This defines a flag for controlling the use of color in the output.
#[derive(Clone, Copy, Debug)]
pub enum Color {
    /// Color is only enabled when the output is a tty.
    Auto,
    /// Color is always enabled.
    Always,
    /// Color is disabled.
    Never,
}

impl Color {
    pub const USAGE: Usage = Usage::new(
        "--color <mode>",
        "One of: auto, always, never.",
        r#"
Whether to use color (default: auto).

When enabled, the kind column of the catalog table is colorized so that path
flags and their resolved values stand out from plain flags. The choices are:
auto, always, never.
"#,
    );

    /// Return a possibly colorized stdout that supports elastic tabstops.
    pub fn elastic_stdout(&self) -> Box<dyn termcolor::WriteColor> {
        use {
            tabwriter::TabWriter,
            termcolor::{Ansi, NoColor},
        };

        if self.should_color() {
            Box::new(Ansi::new(TabWriter::new(std::io::stdout())))
        } else {
            Box::new(NoColor::new(TabWriter::new(std::io::stdout())))
        }
    }

    /// Return true if colors should be used. When the color choice is 'auto',
    /// this only returns true if stdout is a tty.
    pub fn should_color(&self) -> bool {
        use std::io::IsTerminal;
        match *self {
            Color::Auto => std::io::stdout().is_terminal(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

impl Default for Color {
    fn default() -> Color {
        Color::Auto
    }
}

impl std::str::FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Color> {
        let color = match s {
            "auto" => Color::Auto,
            "always" => Color::Always,
            "never" => Color::Never,
            unknown => {
                anyhow::bail!(
                    "unrecognized color config '{}', must be \
                     one of auto, always or never.",
                    unknown,
                )
            }
        };
        Ok(color)
    }
}

/// How a computed flag list is written to stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// A single JSON object with 'flags' and 'do_cache' keys.
    Json,
    /// One flag per line, suitable for a 'compile_flags.txt' file.
    Lines,
}

impl OutputFormat {
    pub const USAGE: Usage = Usage::new(
        "-f, --format <format>",
        "One of: json, lines.",
        r#"
The output format (default: json).

With 'json', a single object of the form {"flags": [...], "do_cache": bool}
is printed. With 'lines', each flag is printed on its own line and the cache
hint is dropped. The latter is exactly the format of a 'compile_flags.txt'
file, so its output can be redirected into one.
"#,
    );
}

impl Default for OutputFormat {
    fn default() -> OutputFormat {
        OutputFormat::Json
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<OutputFormat> {
        let format = match s {
            "json" => OutputFormat::Json,
            "lines" => OutputFormat::Lines,
            unknown => {
                anyhow::bail!(
                    "unrecognized output format '{}', must be \
                     one of json or lines.",
                    unknown,
                )
            }
        };
        Ok(format)
    }
}

/// Filter is the implementation of whitelist/blacklist rules. If there are no
/// rules, everything matches. If there's at least one whitelist rule, then you
/// need at least one whitelist rule to match to get through the filter. If
/// there are no whitelist regexes, then you can't match any of the blacklist
/// regexes.
///
/// The order of rules matters: the last rule that matches a subject decides
/// whether it is included.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    rules: Vec<FilterRule>,
}

impl Filter {
    pub const USAGE_FLAG: Usage = Usage::new(
        "-f, --filter <regex> ...",
        "Include catalog flags matching a regex pattern.",
        r#"
Include catalog flags matching a regex pattern.

This flag may be given multiple times and works in concert with the
-F/--filter-not flag. The -f flag introduces a whitelist regex pattern while
-F introduces a blacklist regex pattern. If there is at least one whitelist
pattern, then a flag must match at least one of them in order to be shown. The
last pattern that matches a flag wins.

Patterns are matched against the flag as written in the catalog, before any
path is resolved. A path flag written as two entries is matched as both
entries joined by a single space, e.g., '-I include'.
"#,
    );

    pub const USAGE_FLAG_NOT: Usage = Usage::new(
        "-F, --filter-not <regex> ...",
        "Exclude catalog flags matching a regex pattern.",
        r#"
Exclude catalog flags matching a regex pattern.

This flag may be given multiple times and each time it contributes a blacklist
regex pattern. See -f/--filter for how patterns combine.
"#,
    );

    /// Add a whitelist pattern to this filter by parsing the pattern from the
    /// given arg parser.
    pub fn arg_whitelist(
        &mut self,
        p: &mut lexopt::Parser,
        flag_name: &'static str,
    ) -> anyhow::Result<()> {
        let pattern = string(p, flag_name)?;
        self.whitelist(&pattern).context(flag_name)
    }

    /// Add a blacklist pattern to this filter by parsing the pattern from the
    /// given arg parser.
    pub fn arg_blacklist(
        &mut self,
        p: &mut lexopt::Parser,
        flag_name: &'static str,
    ) -> anyhow::Result<()> {
        let pattern = string(p, flag_name)?;
        self.blacklist(&pattern).context(flag_name)
    }

    /// Add a whitelist pattern to this filter.
    ///
    /// If the pattern is not a valid regex, then this returns an error.
    pub fn whitelist(&mut self, pattern: &str) -> anyhow::Result<()> {
        let re =
            Regex::new(pattern).context("whitelist regex is not valid")?;
        self.rules.push(FilterRule { re, blacklist: false });
        Ok(())
    }

    /// Add a blacklist pattern to this filter.
    ///
    /// If the pattern is not a valid regex, then this returns an error.
    pub fn blacklist(&mut self, pattern: &str) -> anyhow::Result<()> {
        let re =
            Regex::new(pattern).context("blacklist regex is not valid")?;
        self.rules.push(FilterRule { re, blacklist: true });
        Ok(())
    }

    /// Return true if and only if the given subject passes this filter.
    pub fn include(&self, subject: &str) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        // With only blacklist rules, everything starts out included.
        let mut include = self.rules.iter().all(|r| r.blacklist);
        for rule in &self.rules {
            if rule.re.is_match(subject) {
                include = !rule.blacklist;
            }
        }
        include
    }
}

/// A single rule in a filter, which is a combination of a regex and whether
/// it's a blacklist rule or not.
#[derive(Clone, Debug)]
struct FilterRule {
    re: Regex,
    blacklist: bool,
}

/// A type for expressing the documentation of a flag.
///
/// The `Usage::short` and `Usage::long` functions take a slice of usages and
/// format them into a human readable display. It does simple word wrapping and
/// column alignment for you.
#[derive(Clone, Debug)]
pub struct Usage {
    /// The format of the flag, for example, '-c, --catalog <path>'.
    pub format: &'static str,
    /// A very short description of the flag. Should fit on one line along with
    /// the format.
    pub short: &'static str,
    /// A longer form description of the flag. May be multiple paragraphs long
    /// (but doesn't have to be).
    pub long: &'static str,
}

impl Usage {
    pub const CATALOG: Usage = Usage::new(
        "-c, --catalog <path>",
        "The catalog file to read flags from.",
        r#"
The catalog file to read flags from.

A catalog is a TOML file listing the flags shared by every file in a project,
the extra flags for C and C++ and which file names are parsed as C. When this
flag is absent, a file named '.flagconf.toml' is searched for in the directory
of the source file and then in each of its parent directories. If none is
found, a built-in catalog is used.
"#,
    );

    pub const ROOT: Usage = Usage::new(
        "-r, --root <directory>",
        "The directory relative paths are resolved against.",
        r#"
The directory relative paths in flags are resolved against.

Every path given to -I, -isystem, -iquote or --sysroot= that isn't already
absolute is joined onto this directory. When absent, the directory containing
the catalog file is used, or the current directory when the built-in catalog
is in effect. A relative directory given here is itself resolved against the
current directory.
"#,
    );

    pub const NO_CACHE: Usage = Usage::new(
        "--no-cache",
        "Tell the host not to reuse the flags.",
        r#"
Tell the host not to reuse the flags.

By default, the response carries the catalog's cache hint (which is true
unless the catalog says otherwise). This forces the hint to false.
"#,
    );

    /// Create a new usage from the given components.
    pub const fn new(
        format: &'static str,
        short: &'static str,
        long: &'static str,
    ) -> Usage {
        Usage { format, short, long }
    }

    /// Format a two column table from the given usages, where the first
    /// column is the format and the second column is the short description.
    pub fn short(usages: &[Usage]) -> String {
        const MIN_SPACE: usize = 2;

        let mut result = String::new();
        let max_len = match usages.iter().map(|u| u.format.len()).max() {
            None => return result,
            Some(len) => len,
        };
        for usage in usages.iter() {
            let padlen = MIN_SPACE + (max_len - usage.format.len());
            let padding = " ".repeat(padlen);
            // Writing to a String never fails.
            let _ = writeln!(
                result,
                "    {}{}{}",
                usage.format, padding, usage.short
            );
        }
        result
    }

    /// Print the format of each usage and its long description below the
    /// format. This also does appropriate indentation with the assumption that
    /// it is in an OPTIONS section of a bigger usage message.
    pub fn long(usages: &[Usage]) -> String {
        let wrap_opts = textwrap::Options::new(79)
            .initial_indent("        ")
            .subsequent_indent("        ");
        let mut result = String::new();
        for (i, usage) in usages.iter().enumerate() {
            if i > 0 {
                result.push('\n');
            }
            let _ = writeln!(result, "    {}", usage.format);
            for (i, paragraph) in usage.long.trim().split("\n\n").enumerate() {
                if i > 0 {
                    result.push('\n');
                }
                let flattened = paragraph.replace("\n", " ");
                for line in textwrap::wrap(&flattened, &wrap_opts) {
                    result.push_str(&line);
                    result.push('\n');
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_empty_includes_everything() {
        assert!(Filter::default().include("-Wall"));
    }

    #[test]
    fn filter_last_match_wins() {
        let mut filter = Filter::default();
        filter.whitelist("^-W").unwrap();
        filter.blacklist("shadow").unwrap();
        assert!(filter.include("-Wall"));
        assert!(!filter.include("-Wshadow"));
        assert!(!filter.include("-I"));
    }

    #[test]
    fn filter_blacklist_only() {
        let mut filter = Filter::default();
        filter.blacklist("^-D").unwrap();
        assert!(filter.include("-Wall"));
        assert!(!filter.include("-DARQ_COMPILE_CRC32=1"));
    }

    #[test]
    fn output_format() {
        assert_eq!(OutputFormat::Json, "json".parse().unwrap());
        assert_eq!(OutputFormat::Lines, "lines".parse().unwrap());
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn usage_short_aligns() {
        let got = Usage::short(&[Usage::ROOT, Usage::NO_CACHE]);
        let lines: Vec<&str> = got.lines().collect();
        assert_eq!(2, lines.len());
        let col = |line: &str, needle: &str| line.find(needle).unwrap();
        assert_eq!(
            col(lines[0], "The directory"),
            col(lines[1], "Tell the host"),
        );
    }
}
