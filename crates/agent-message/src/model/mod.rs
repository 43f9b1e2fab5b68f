//! Protocol types shared by the parser, the reply assembler and the CLI.

pub mod command;
pub mod error;
pub mod plugin;
pub mod reply;

pub use command::*;
pub use error::*;
pub use plugin::*;
pub use reply::*;
