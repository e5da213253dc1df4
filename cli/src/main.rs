mod commands;
mod output;
mod progress;
mod terminal;

use commands::{CommandLine, Commands, expand, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();
    print::banner();

    match commands.command {
        Commands::Scan(args) => {
            print::header("probing candidates");
            scan::scan(args).await
        }
        Commands::Expand(args) => {
            print::header("expanding candidate list");
            expand::expand(args)
        }
    }
}
