use clap::Parser;

#[derive(Parser)]
#[command(
    name = "xselowner",
    version,
    about = "Print the window name of the PRIMARY selection owner"
)]
pub struct Cli {}
