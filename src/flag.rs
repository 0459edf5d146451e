/// A compiler flag spelling that introduces a filesystem search path.
///
/// The order of `PathPrefix::ALL` is the order in which prefixes are tried
/// when parsing a flag. The first one that matches wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathPrefix {
    /// `-isystem <dir>`
    System,
    /// `-I <dir>`
    Include,
    /// `-iquote <dir>`
    Quote,
    /// `--sysroot=<dir>`
    Sysroot,
}

/// How a path prefix and its value are laid out in a flag list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// The path is the next entry in the list, e.g., `["-I", "include"]`.
    Separate,
    /// The path is glued onto the prefix, e.g., `"--sysroot=sdk"`.
    Attached,
}

impl PathPrefix {
    pub const ALL: &'static [PathPrefix] = &[
        PathPrefix::System,
        PathPrefix::Include,
        PathPrefix::Quote,
        PathPrefix::Sysroot,
    ];

    /// Returns the literal spelling of this prefix.
    pub const fn spelling(self) -> &'static str {
        match self {
            PathPrefix::System => "-isystem",
            PathPrefix::Include => "-I",
            PathPrefix::Quote => "-iquote",
            PathPrefix::Sysroot => "--sysroot=",
        }
    }

    pub const fn shape(self) -> Shape {
        match self {
            PathPrefix::System | PathPrefix::Include | PathPrefix::Quote => {
                Shape::Separate
            }
            PathPrefix::Sysroot => Shape::Attached,
        }
    }
}

impl std::fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.spelling())
    }
}

// Attached prefixes are matched with "starts with," so an attached prefix
// must never share a leading substring relationship with any other prefix.
// Otherwise, which rule applies would silently depend on list order.
const _: () = assert!(is_unambiguous(PathPrefix::ALL));

/// Returns true when no prefix in the given set is a leading substring of
/// another prefix in the set, for every pair in which at least one of the two
/// has the attached shape.
///
/// Separate prefixes are matched exactly, so two of those may overlap freely.
pub const fn is_unambiguous(prefixes: &[PathPrefix]) -> bool {
    let mut i = 0;
    while i < prefixes.len() {
        let mut j = 0;
        while j < prefixes.len() {
            let (a, b) = (prefixes[i], prefixes[j]);
            let attached = matches!(a.shape(), Shape::Attached)
                || matches!(b.shape(), Shape::Attached);
            if i != j
                && attached
                && starts_with(
                    b.spelling().as_bytes(),
                    a.spelling().as_bytes(),
                )
            {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn starts_with(haystack: &[u8], prefix: &[u8]) -> bool {
    if prefix.len() > haystack.len() {
        return false;
    }
    let mut i = 0;
    while i < prefix.len() {
        if haystack[i] != prefix[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// A single entry of a flag list, classified.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flag<'a> {
    /// Anything that doesn't introduce a path. Passed through as is.
    Plain,
    /// A path-introducing flag. When the prefix has the attached shape,
    /// `attached` holds the path portion of the same entry. Otherwise it is
    /// `None` and the path is the next entry in the list.
    Path { prefix: PathPrefix, attached: Option<&'a str> },
}

impl<'a> Flag<'a> {
    /// Classify one entry of a flag list.
    ///
    /// Separate prefixes only match when the entry is exactly the prefix, so
    /// something like `-Iinclude` is a plain flag.
    pub fn parse(entry: &'a str) -> Flag<'a> {
        for &prefix in PathPrefix::ALL {
            match prefix.shape() {
                Shape::Separate if entry == prefix.spelling() => {
                    return Flag::Path { prefix, attached: None };
                }
                Shape::Separate => {}
                Shape::Attached => {
                    if let Some(path) = entry.strip_prefix(prefix.spelling()) {
                        return Flag::Path { prefix, attached: Some(path) };
                    }
                }
            }
        }
        Flag::Plain
    }

    /// Returns true when the entry after this one is a path value.
    pub fn takes_next(&self) -> bool {
        matches!(*self, Flag::Path { attached: None, .. })
    }
}
