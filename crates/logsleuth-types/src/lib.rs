pub mod loginfo;
pub mod query;
pub mod trace;

pub use loginfo::*;
pub use query::*;
pub use trace::*;
