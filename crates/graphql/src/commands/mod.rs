mod delegate;

use crate::Cli;
use crate::CommandResult;
use delegate::DelegateCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "graphql")]
pub(crate) enum CommandEnum {
    /// Plan the remote request for one delegated field of a caller document.
    Delegate(Box<DelegateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Delegate(cmd) => (*cmd).run(cli).await
        }
    }
}
