pub mod arg;
pub mod parser;

pub use crate::domain::model::{Location, ParsedArgs};
pub use crate::domain::ports::{get_value, Request};
pub use crate::utils::error::Result;
pub use arg::{Arg, Kind};
pub use parser::{ArgMap, MapValidator, Parser};
