/// Compiles the given regex literal once and returns a `&'static` handle to
/// it on every subsequent use.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: once_cell::sync::OnceCell<regex_lite::Regex> =
            once_cell::sync::OnceCell::new();
        RE.get_or_init(|| match regex_lite::Regex::new($re) {
            Ok(re) => re,
            Err(err) => panic!("invalid regex literal {:?}: {}", $re, err),
        })
    }};
}
