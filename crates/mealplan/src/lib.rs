mod agenda;
mod command;
mod query;

pub use agenda::*;
pub use command::*;
pub use query::*;
