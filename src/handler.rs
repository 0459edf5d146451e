use crate::{
    classify::{classify, Language},
    config::Config,
    format::request::{Request, Response},
    normalize::normalize,
};

/// Answers flag requests using a fixed configuration.
///
/// A handler holds no mutable state. Every request recomputes its flags from
/// the config, so one handler may be shared freely.
#[derive(Clone, Debug)]
pub struct Handler {
    config: Config,
}

impl Handler {
    pub fn new(config: Config) -> Handler {
        match config.catalog.path {
            None => log::debug!("handler using built-in catalog"),
            Some(ref path) => {
                log::debug!("handler using catalog {}", path.display())
            }
        }
        Handler { config }
    }

    /// Returns the complete flags for the file in the given request.
    ///
    /// This is the project's flags, with paths resolved against the project
    /// root, followed by the extra flags for the file's language.
    pub fn flags_for_file(&self, req: &Request) -> Response {
        if !req.ignored.is_empty() {
            log::debug!(
                "ignoring unrecognized request keys: {:?}",
                req.ignored.keys().collect::<Vec<_>>(),
            );
        }
        if !req.options.ignored.is_empty() {
            log::debug!(
                "ignoring unrecognized request options: {:?}",
                req.options.ignored.keys().collect::<Vec<_>>(),
            );
        }
        let catalog = &self.config.catalog;
        let lang = self.language(&req.filename);
        log::debug!("'{}' will be parsed as {}", req.filename, lang);
        let mut flags = normalize(&catalog.flags, self.config.root.as_ref());
        flags.extend(catalog.language_flags(lang).iter().cloned());
        Response { flags, cache: req.options.cache.unwrap_or(catalog.cache) }
    }

    /// Returns the language the given file will be parsed as.
    pub fn language(&self, filename: &str) -> Language {
        classify(filename, &self.config.catalog.c_files)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::ProjectRoot, format::catalog::Catalog,
        format::request::RequestOptions,
    };

    use super::*;

    fn handler(root: Option<&str>) -> Handler {
        Handler::new(Config {
            root: root.map(|r| ProjectRoot::new(r).unwrap()),
            catalog: Catalog::builtin().clone(),
        })
    }

    fn ends_with(flags: &[String], suffix: &[String]) -> bool {
        flags.len() >= suffix.len()
            && &flags[flags.len() - suffix.len()..] == suffix
    }

    #[test]
    fn c_file() {
        let h = handler(Some("/work/nanoarq"));
        let resp = h.flags_for_file(&Request::new("/work/nanoarq/arq.h"));
        assert!(resp.cache);
        assert_eq!(23, resp.flags.len());
        assert_eq!("-DARQ_ASSERTS_ENABLED=1", resp.flags[0]);
        assert_eq!("/work/nanoarq/.", resp.flags[13]);
        assert_eq!("/work/nanoarq/unit_tests", resp.flags[15]);
        assert_eq!(
            "/work/nanoarq/external/CppUTest/src/CppUTest_external/include",
            resp.flags[19],
        );
        assert_eq!(&["-std=c99", "-x", "c"], &resp.flags[20..]);
    }

    #[test]
    fn cpp_file() {
        let h = handler(Some("/work/nanoarq"));
        let resp =
            h.flags_for_file(&Request::new("unit_tests/test_window.cpp"));
        assert_eq!(&["-std=c++11", "-x", "c++"], &resp.flags[20..]);
    }

    #[test]
    fn exactly_one_language_suffix() {
        let h = handler(Some("/p"));
        let catalog = Catalog::builtin();
        for name in ["arq.h", "x/arq.h", "arq.cpp", "", "nanoarq.h", "a.c"] {
            let flags = h.flags_for_file(&Request::new(name)).flags;
            let c = ends_with(&flags, &catalog.c);
            let cpp = ends_with(&flags, &catalog.cpp);
            assert!(c != cpp, "file: {:?}, flags: {:?}", name, flags);
            assert_eq!(catalog.flags.len() + 3, flags.len());
        }
    }

    #[test]
    fn without_root() {
        let h = handler(None);
        let resp = h.flags_for_file(&Request::new("arq.cpp"));
        assert_eq!(&Catalog::builtin().flags[..], &resp.flags[..20]);
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Handler>();
        assert_send_sync::<Config>();
    }

    #[test]
    fn cache_override() {
        let h = handler(Some("/p"));
        let req = Request {
            filename: "arq.h".to_string(),
            options: RequestOptions {
                cache: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!h.flags_for_file(&req).cache);
    }

    #[test]
    fn top_level_cache_is_ignored() {
        let h = handler(Some("/p"));
        let req: Request =
            serde_json::from_str(r#"{"filename": "a.cpp", "cache": false}"#)
                .unwrap();
        let resp = h.flags_for_file(&req);
        assert!(resp.cache);
        assert_eq!("c++", resp.flags[resp.flags.len() - 1]);
    }
}
