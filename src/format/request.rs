use std::collections::BTreeMap;

/// A single question from a completion host: which flags should be used to
/// parse `filename`?
///
/// Keys next to `filename` other than `options` are collected into `ignored`.
/// Options only take effect when they are inside `options`.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
pub struct Request {
    pub filename: String,
    #[serde(default)]
    pub options: RequestOptions,
    #[serde(flatten)]
    pub ignored: BTreeMap<String, serde_json::Value>,
}

impl Request {
    pub fn new<S: Into<String>>(filename: S) -> Request {
        Request {
            filename: filename.into(),
            options: RequestOptions::default(),
            ignored: BTreeMap::new(),
        }
    }
}

/// Per-request knobs a host may send along with a request.
///
/// Only the fields below are understood. Hosts are free to send more than
/// that (hosts tend to grow new options over time), and anything else is
/// collected into `ignored` and otherwise has no effect.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Overrides the catalog's cache hint for this request only. When absent,
    /// the catalog's `cache` setting (which defaults to `true`) is used.
    pub cache: Option<bool>,
    #[serde(flatten)]
    pub ignored: BTreeMap<String, serde_json::Value>,
}

/// The answer to a `Request`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Response {
    /// The complete list of flags to parse the file with, in order.
    pub flags: Vec<String>,
    /// When true, the host may reuse `flags` for later parses of the same
    /// file without asking again.
    #[serde(rename = "do_cache")]
    pub cache: bool,
}

/// One line of output in server mode: either a response, or the reason a
/// request line couldn't be answered.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ok(Response),
    Err { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_minimal() {
        let req: Request =
            serde_json::from_str(r#"{"filename": "src/arq.h"}"#).unwrap();
        assert_eq!(Request::new("src/arq.h"), req);
    }

    #[test]
    fn request_options() {
        let raw = r#"{
            "filename": "test.cpp",
            "options": {"cache": false, "client_data": {"x": 1}}
        }"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(Some(false), req.options.cache);
        assert_eq!(1, req.options.ignored.len());
        assert!(req.options.ignored.contains_key("client_data"));
    }

    #[test]
    fn response_shape() {
        let resp = Response { flags: vec!["-Wall".to_string()], cache: true };
        let got = serde_json::to_string(&Reply::Ok(resp)).unwrap();
        assert_eq!(r#"{"flags":["-Wall"],"do_cache":true}"#, got);

        let err = Reply::Err { error: "nope".to_string() };
        let got = serde_json::to_string(&err).unwrap();
        assert_eq!(r#"{"error":"nope"}"#, got);
    }

    #[test]
    fn request_top_level_keys() {
        let raw = r#"{"filename": "a.cpp", "cache": false}"#;
        let req: Request = serde_json::from_str(raw).unwrap();
        assert_eq!(None, req.options.cache);
        assert!(req.options.ignored.is_empty());
        assert_eq!(
            Some(&serde_json::Value::Bool(false)),
            req.ignored.get("cache"),
        );
    }
}
