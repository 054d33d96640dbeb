mod command;
mod group;
mod query;

pub use command::*;
pub use group::*;
pub use query::*;
