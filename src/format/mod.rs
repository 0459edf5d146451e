// Wire formats: the TOML catalog read from disk and the JSON messages
// exchanged with a completion host.
pub mod catalog;
pub mod request;
