// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;
use flic_heatmaps::cli::args::{Cli, Commands};
use flic_heatmaps::cli::logging::set_verbose;
use flic_heatmaps::cli::preview::run_preview;
use flic_heatmaps::error;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Preview(args) => {
            set_verbose(args.verbose);
            run_preview(args)
        }
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}
