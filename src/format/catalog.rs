use std::path::{Path, PathBuf};

use {anyhow::Context, once_cell::sync::Lazy};

use crate::classify::Language;

/// The name of a catalog file, as searched for by `Catalog::discover`.
pub const FILE_NAME: &str = ".flagconf.toml";

/// The flags used to parse every file in a project, plus the extra flags
/// that select a dialect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Catalog {
    /// Flags shared by all files, in the order given to the compiler.
    pub flags: Vec<String>,
    /// Appended when a file is parsed as C.
    pub c: Vec<String>,
    /// Appended when a file is parsed as C++.
    pub cpp: Vec<String>,
    /// File names (final path component only) that are parsed as C. All
    /// other files are C++.
    pub c_files: Vec<String>,
    /// Whether a host may reuse flags for a file without asking again.
    pub cache: bool,
    /// Where this catalog was read from, if anywhere.
    pub path: Option<PathBuf>,
}

impl Catalog {
    /// Returns the catalog that is used when no catalog file could be found.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: Lazy<Catalog> = Lazy::new(|| Catalog {
            flags: strings(&[
                "-DARQ_ASSERTS_ENABLED=1",
                "-DARQ_COMPILE_CRC32=1",
                "-DARQ_USE_C_STDLIB=1",
                "-DARQ_LITTLE_ENDIAN_CPU=1",
                "-Wall",
                "-Wextra",
                "-Wunreachable-code",
                "-Wshadow",
                "-Wcast-align",
                "-Wcast-qual",
                "-Wstrict-aliasing",
                "-Wmissing-braces",
                "-I",
                ".",
                "-I",
                "unit_tests",
                "-I",
                "functional_tests",
                "-I",
                "external/CppUTest/src/CppUTest_external/include",
            ]),
            c: default_c_flags(),
            cpp: default_cpp_flags(),
            c_files: strings(&["arq.h"]),
            cache: true,
            path: None,
        });
        &BUILTIN
    }

    /// Read and decode the catalog file at the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Catalog> {
        let path = path.as_ref();
        let data = std::fs::read(path).with_context(|| {
            format!("failed to read catalog from {}", path.display())
        })?;
        let mut catalog = Catalog::from_slice(&data)
            .with_context(|| format!("invalid catalog {}", path.display()))?;
        catalog.path = Some(path.to_path_buf());
        log::debug!("loaded catalog from {}", path.display());
        Ok(catalog)
    }

    /// Decode a catalog from the raw contents of a catalog file.
    pub fn from_slice(data: &[u8]) -> anyhow::Result<Catalog> {
        let data =
            std::str::from_utf8(data).context("catalog is not valid UTF-8")?;
        let wire: WireCatalog =
            toml::from_str(data).context("error decoding TOML")?;
        wire.validate()?;
        Ok(Catalog {
            flags: wire.flags,
            c: wire.c.map_or_else(default_c_flags, |d| d.flags),
            cpp: wire.cpp.map_or_else(default_cpp_flags, |d| d.flags),
            c_files: wire.c_files,
            cache: wire.cache,
            path: None,
        })
    }

    /// Look for a catalog file in `dir` and then in each of its ancestors,
    /// returning the first one found.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        for ancestor in dir.ancestors() {
            let candidate = ancestor.join(FILE_NAME);
            log::trace!("looking for catalog at {}", candidate.display());
            if candidate.is_file() {
                log::debug!("found catalog at {}", candidate.display());
                return Some(candidate);
            }
        }
        None
    }

    /// Returns the extra flags for the given language.
    pub fn language_flags(&self, lang: Language) -> &[String] {
        match lang {
            Language::C => &self.c,
            Language::Cpp => &self.cpp,
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct WireCatalog {
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    c_files: Vec<String>,
    #[serde(default = "default_cache")]
    cache: bool,
    c: Option<WireDialect>,
    cpp: Option<WireDialect>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct WireDialect {
    flags: Vec<String>,
}

impl WireCatalog {
    fn validate(&self) -> anyhow::Result<()> {
        // Only a bare file name can ever compare equal to the final component
        // of a path, so anything else is certainly a mistake.
        let re = regex!(r"^[^/\\]+$");
        for name in self.c_files.iter() {
            anyhow::ensure!(
                re.is_match(name),
                "c-files entry '{}' must be a file name, not a path",
                name,
            );
        }
        Ok(())
    }
}

fn default_cache() -> bool {
    true
}

fn default_c_flags() -> Vec<String> {
    strings(&["-std=c99", "-x", "c"])
}

fn default_cpp_flags() -> Vec<String> {
    strings(&["-std=c++11", "-x", "c++"])
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
