use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::format::catalog::Catalog;

/// An absolute directory against which relative paths in flags are resolved.
///
/// A project root is always absolute and always valid UTF-8, since the flags
/// it gets joined with are strings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    /// Build a project root from the given directory. Relative directories are
    /// interpreted with respect to the current working directory.
    ///
    /// The directory isn't required to exist.
    pub fn new<P: AsRef<Path>>(dir: P) -> anyhow::Result<ProjectRoot> {
        let dir = absolute(dir.as_ref())?;
        anyhow::ensure!(
            dir.to_str().is_some(),
            "project root '{}' is not valid UTF-8",
            dir.display(),
        );
        Ok(ProjectRoot(dir))
    }

    /// Returns the directory containing the given file as a project root.
    pub fn containing<P: AsRef<Path>>(
        file: P,
    ) -> anyhow::Result<ProjectRoot> {
        let file = absolute(file.as_ref())?;
        let dir = file.parent().with_context(|| {
            format!("'{}' has no parent directory", file.display())
        })?;
        ProjectRoot::new(dir)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve the given path against this root. If `path` is already
    /// absolute, then it is returned as is.
    pub fn join(&self, path: &str) -> String {
        // Lossless because both sides are known to be valid UTF-8.
        self.as_path().join(path).to_string_lossy().into_owned()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.as_path().as_os_str().is_empty()
    }
}

impl std::fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

/// Everything a request handler needs, decided once at startup.
///
/// Nothing in here changes after construction, so a single config can be
/// shared by any number of callers.
#[derive(Clone, Debug)]
pub struct Config {
    /// The root used to resolve relative paths. When absent, no paths are
    /// rewritten.
    pub root: Option<ProjectRoot>,
    pub catalog: Catalog,
}

impl Config {
    /// Load a config.
    ///
    /// When `catalog` is given, it is read from that path. Otherwise, a
    /// catalog file is searched for starting in the directory `search` and
    /// walking up through its ancestors. If there is no directory to search
    /// or nothing is found, the built-in catalog is used.
    ///
    /// The root is `root` if given, otherwise the directory containing the
    /// catalog file, otherwise the current working directory.
    pub fn load(
        search: Option<&Path>,
        catalog: Option<&Path>,
        root: Option<&Path>,
    ) -> anyhow::Result<Config> {
        let catalog_path = match catalog {
            Some(path) => Some(path.to_path_buf()),
            None => match search {
                None => None,
                Some(dir) => Catalog::discover(&absolute(dir)?),
            },
        };
        let catalog = match catalog_path {
            None => {
                log::debug!("no catalog file found, using built-in catalog");
                Catalog::builtin().clone()
            }
            Some(ref path) => Catalog::from_file(path)?,
        };
        let root = match (root, catalog_path) {
            (Some(root), _) => ProjectRoot::new(root)?,
            (None, Some(path)) => ProjectRoot::containing(path)?,
            (None, None) => ProjectRoot::new(".")?,
        };
        log::debug!("project root: {}", root);
        Ok(Config { root: Some(root), catalog })
    }
}

/// Returns the given path as an absolute path. Relative paths are joined onto
/// the current working directory.
pub fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .context("could not get current working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_root_is_made_absolute() {
        let root = ProjectRoot::new("some/project").unwrap();
        assert!(root.as_path().is_absolute());
        assert!(root.as_path().ends_with("some/project"));
    }

    #[test]
    fn containing_directory() {
        let root =
            ProjectRoot::containing("/work/arq/.flagconf.toml").unwrap();
        assert_eq!(Path::new("/work/arq"), root.as_path());
    }

    #[test]
    fn join() {
        let root = ProjectRoot::new("/work/arq").unwrap();
        assert_eq!("/work/arq/unit_tests", root.join("unit_tests"));
        assert_eq!("/usr/include", root.join("/usr/include"));
    }

    #[test]
    fn explicit_root_without_catalog_uses_builtin() {
        let config = Config::load(None, None, Some(Path::new("/work/arq")))
            .unwrap();
        assert_eq!(
            Some(ProjectRoot::new("/work/arq").unwrap()),
            config.root,
        );
        assert_eq!(Catalog::builtin().flags, config.catalog.flags);
    }

    /// Creates a fresh directory holding a catalog file, and returns the
    /// directory along with the path of the catalog file in it.
    fn catalog_dir(name: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir()
            .join(format!("flagconf-{}-{}", name, std::process::id()));
        let nested = dir.join("sub").join("deep");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.join(crate::format::catalog::FILE_NAME);
        std::fs::write(&path, "flags = ['-I', 'inc']\n").unwrap();
        (dir, path)
    }

    #[test]
    fn discovered_catalog_decides_root() {
        let (dir, path) = catalog_dir("discovered-root");
        let search = dir.join("sub").join("deep");
        let config = Config::load(Some(search.as_path()), None, None);
        std::fs::remove_dir_all(&dir).unwrap();

        let config = config.unwrap();
        assert_eq!(Some(ProjectRoot::new(&dir).unwrap()), config.root);
        assert_eq!(Some(path), config.catalog.path);
        let root = config.root.unwrap();
        assert_eq!(dir.join("inc").to_str().unwrap(), root.join("inc"));
    }

    #[test]
    fn explicit_catalog_decides_root() {
        let (dir, path) = catalog_dir("explicit-root");
        let config = Config::load(None, Some(path.as_path()), None);
        std::fs::remove_dir_all(&dir).unwrap();

        let config = config.unwrap();
        assert_eq!(Some(ProjectRoot::new(&dir).unwrap()), config.root);
    }

    #[test]
    fn explicit_root_beats_catalog() {
        let (dir, path) = catalog_dir("root-wins");
        let config = Config::load(
            Some(dir.as_path()),
            Some(path.as_path()),
            Some(Path::new("/work/arq")),
        );
        std::fs::remove_dir_all(&dir).unwrap();

        let config = config.unwrap();
        assert_eq!(Some(ProjectRoot::new("/work/arq").unwrap()), config.root);
        assert_eq!(Some(path), config.catalog.path);
    }

    #[test]
    fn current_dir_is_last_resort() {
        let config = Config::load(None, None, None).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(Some(ProjectRoot::new(&cwd).unwrap()), config.root);
        assert!(config.root.unwrap().as_path().is_absolute());
        assert_eq!(None, config.catalog.path);
    }
}
