/// The dialect a source file is parsed as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Language {
    C,
    Cpp,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match *self {
            Language::C => "c",
            Language::Cpp => "c++",
        };
        write!(f, "{}", name)
    }
}

/// Pick the language for the given file name.
///
/// Only the final path component is considered, and both '/' and '\' are
/// treated as separators regardless of platform. The file is C when that
/// component is exactly (and case sensitively) one of `c_files`. Everything
/// else is C++, including the empty string.
pub fn classify<S: AsRef<str>>(filename: &str, c_files: &[S]) -> Language {
    let leaf = leaf(filename);
    if c_files.iter().any(|name| name.as_ref() == leaf) {
        Language::C
    } else {
        Language::Cpp
    }
}

/// Returns the last component of a path written with either separator
/// convention.
///
/// Trailing separators are ignored, so `foo/bar/` yields `bar`. A leading
/// drive designator such as `C:` is never part of the result.
fn leaf(path: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let path = strip_drive(path);
    let trimmed = path.trim_end_matches(is_sep);
    match trimmed.rfind(is_sep) {
        None => trimmed,
        Some(i) => &trimmed[i + 1..],
    }
}

fn strip_drive(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
    {
        &path[2..]
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_FILES: &[&str] = &["arq.h"];

    #[test]
    fn designated_name() {
        assert_eq!(Language::C, classify("arq.h", C_FILES));
        assert_eq!(Language::C, classify("foo/bar/arq.h", C_FILES));
        assert_eq!(Language::C, classify("/work/nanoarq/arq.h", C_FILES));
    }

    #[test]
    fn windows_separators() {
        assert_eq!(Language::C, classify(r"foo\bar\arq.h", C_FILES));
        assert_eq!(Language::C, classify(r"C:\work\arq.h", C_FILES));
        assert_eq!(Language::C, classify("C:arq.h", C_FILES));
    }

    #[test]
    fn everything_else_is_cpp() {
        assert_eq!(Language::Cpp, classify("arq.cpp", C_FILES));
        assert_eq!(Language::Cpp, classify("", C_FILES));
        assert_eq!(Language::Cpp, classify("ARQ.H", C_FILES));
        assert_eq!(Language::Cpp, classify("arq.h/nanoarq.h", C_FILES));
        assert_eq!(Language::Cpp, classify("nanoarq.h", C_FILES));
        assert_eq!(Language::Cpp, classify("arq.h", &[] as &[&str]));
    }

    #[test]
    fn trailing_separator() {
        assert_eq!("bar", leaf("foo/bar/"));
        assert_eq!("bar", leaf(r"foo\bar\\"));
        assert_eq!(Language::C, classify("src/arq.h/", C_FILES));
    }

    #[test]
    fn display() {
        assert_eq!("c", Language::C.to_string());
        assert_eq!("c++", Language::Cpp.to_string());
    }
}
