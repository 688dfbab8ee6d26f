mod fetch;
mod init;
mod locate;
mod purge;

pub use fetch::cmd_fetch;
pub use init::cmd_init;
pub use locate::cmd_locate;
pub use purge::cmd_purge;
