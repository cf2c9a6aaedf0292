mod cmd;

use clap::Parser;
use cmd::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) =
        spec_diagram::logging::init_logging(cli.log_level.as_deref(), cli.log_format.as_deref())
    {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    if let Err(e) = cmd::run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
