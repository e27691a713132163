use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bo")]
#[command(version)]
#[command(about = "Pick a registered project and open its tmux session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick from the plain project list, with live tmux/git/github status
    Open(ListingArgs),
    /// Pick from the structured registry, showing its stored details
    Browse(ListingArgs),
    /// Print the live status listing without picking
    Status(ListingArgs),
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ListingArgs {
    /// Show only projects with an active tmux session
    #[arg(short = 's', long)]
    pub sessions_only: bool,
}
