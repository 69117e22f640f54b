pub mod command;
pub mod mcp;
pub mod serve;
