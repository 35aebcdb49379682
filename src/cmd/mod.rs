mod download;
mod resolve;
mod serve;

pub use download::cmd_download;
pub use resolve::cmd_resolve;
pub use serve::cmd_serve;
