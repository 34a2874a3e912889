//! faktura – renders a Polish VAT invoice described in YAML to a one-page PDF.
//!
//! Usage:
//!   faktura --config-file <invoice.yaml>
//!
//! The PDF is written to the current directory as
//! `FAKTURA_FA_<creation_date>_<invoice_number>.pdf`.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use faktura_pl::error::FakturaError;
use faktura_pl::pipeline;

#[derive(Debug, Parser)]
#[command(name = "faktura", version, about = "Generate a PDF invoice from a YAML file")]
struct Cli {
    /// Invoice configuration (YAML)
    #[arg(short = 'c', long = "config-file")]
    config_file: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match pipeline::run(&cli.config_file, &PathBuf::from(".")) {
        Ok(path) => eprintln!("Wrote '{}'", path.display()),
        Err(FakturaError::ConfigNotFound(_)) => {
            eprintln!("Configuration file not exists!");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
