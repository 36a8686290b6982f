//! Generation pipeline adapters

mod command;

pub use command::CommandPipeline;
