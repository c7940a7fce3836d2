pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{SimpleRequest, UploadedFile};
pub use config::spec::SpecFile;
pub use core::{Arg, ArgMap, Kind, Location, MapValidator, ParsedArgs, Parser, Request};
pub use utils::error::{ArgsError, Result, ValidationError};
