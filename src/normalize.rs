use std::path::Path;

use crate::{
    config::ProjectRoot,
    flag::{Flag, PathPrefix},
};

/// Rewrite every relative path in the given flags so that it is absolute with
/// respect to `base`.
///
/// The result always has the same length as `flags`, and each entry is either
/// identical to the corresponding input entry or is the same flag with its
/// path resolved against `base`. Paths that are already absolute and flags
/// that don't carry a path are never changed.
///
/// When `base` is absent (or empty), this returns a copy of `flags`.
///
/// A separate-argument prefix (like `-I`) at the very end of the list has no
/// path to resolve. It is kept as is and nothing is appended.
pub fn normalize<S: AsRef<str>>(
    flags: &[S],
    base: Option<&ProjectRoot>,
) -> Vec<String> {
    let base = match base {
        Some(base) if !base.is_empty() => base,
        _ => return flags.iter().map(|f| f.as_ref().to_string()).collect(),
    };
    let mut normalized = Vec::with_capacity(flags.len());
    let mut pending = false;
    for flag in flags.iter().map(|f| f.as_ref()) {
        if pending {
            // This entry is the value of the prefix before it, so it is
            // never itself treated as a prefix.
            pending = false;
            if is_absolute(flag) {
                normalized.push(flag.to_string());
            } else {
                let resolved = base.join(flag);
                log::trace!("resolved '{}' to '{}'", flag, resolved);
                normalized.push(resolved);
            }
            continue;
        }
        match Flag::parse(flag) {
            Flag::Plain => normalized.push(flag.to_string()),
            Flag::Path { attached: None, .. } => {
                pending = true;
                normalized.push(flag.to_string());
            }
            Flag::Path { prefix, attached: Some(path) } => {
                normalized.push(rewrite_attached(prefix, path, base));
            }
        }
    }
    normalized
}

fn rewrite_attached(
    prefix: PathPrefix,
    path: &str,
    base: &ProjectRoot,
) -> String {
    let resolved = format!("{}{}", prefix.spelling(), base.join(path));
    log::trace!("resolved '{}{}' to '{}'", prefix, path, resolved);
    resolved
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || Path::new(path).is_absolute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(dir: &str) -> ProjectRoot {
        ProjectRoot::new(dir).unwrap()
    }

    fn strings(flags: &[&str]) -> Vec<String> {
        flags.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn separate_relative() {
        let got = normalize(&["-I", "relative/path"], Some(&root("/root")));
        assert_eq!(strings(&["-I", "/root/relative/path"]), got);
    }

    #[test]
    fn separate_absolute() {
        let flags = ["-isystem", "/usr/include", "-iquote", "/opt/q"];
        let got = normalize(&flags, Some(&root("/root")));
        assert_eq!(strings(&flags), got);
    }

    #[test]
    fn attached_relative() {
        let got =
            normalize(&["--sysroot=relative/path"], Some(&root("/root")));
        assert_eq!(strings(&["--sysroot=/root/relative/path"]), got);
    }

    #[test]
    fn attached_absolute() {
        let got = normalize(&["--sysroot=/opt/sdk"], Some(&root("/root")));
        assert_eq!(strings(&["--sysroot=/opt/sdk"]), got);
    }

    #[test]
    fn no_base_is_identity() {
        let flags = ["-Wall", "-I", "include", "--sysroot=sdk", "-I"];
        assert_eq!(strings(&flags), normalize(&flags, None));
    }

    #[test]
    fn trailing_prefix() {
        let got = normalize(&["-Wall", "-I", "inc", "-I"], Some(&root("/r")));
        assert_eq!(strings(&["-Wall", "-I", "/r/inc", "-I"]), got);
    }

    #[test]
    fn value_is_not_reparsed() {
        // The value of '-I' happens to look like a prefix itself. It must be
        // resolved as a path, and the entry after it is left alone.
        let got = normalize(&["-I", "-I", "include"], Some(&root("/r")));
        assert_eq!(strings(&["-I", "/r/-I", "include"]), got);
    }

    #[test]
    fn plain_flags_keep_position() {
        let flags = [
            "-DARQ_ASSERTS_ENABLED=1",
            "-I",
            ".",
            "-Wall",
            "-Iattached",
            "-I",
            "unit_tests",
            "-Wshadow",
        ];
        let got = normalize(&flags, Some(&root("/work/arq")));
        assert_eq!(
            strings(&[
                "-DARQ_ASSERTS_ENABLED=1",
                "-I",
                "/work/arq/.",
                "-Wall",
                "-Iattached",
                "-I",
                "/work/arq/unit_tests",
                "-Wshadow",
            ]),
            got,
        );
    }

    #[test]
    fn length_is_preserved() {
        let lists: &[&[&str]] = &[
            &[],
            &["-I"],
            &["-I", "a"],
            &["-isystem", "-iquote", "--sysroot=x", "y", "-I"],
            &["--sysroot=", "-x", "c++"],
        ];
        for &list in lists {
            let got = normalize(list, Some(&root("/base")));
            assert_eq!(list.len(), got.len(), "list: {:?}", list);
        }
    }
}
