pub mod catalog;
pub mod classify;
pub mod flags;
pub mod normalize;
pub mod serve;
pub mod version;
