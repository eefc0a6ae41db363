//! Command-line front end for the bakery driver (spec §4.7, §6.4): dispatches `compile`/
//! `decompile` to `bakery::driver` and prints the resulting log.

use bakery::FileIndication;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser)]
#[clap(name = "bakery", about = "Compile and decompile bakery data files")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a `.dat` source into a binary file, following its recipe indication.
    Compile {
        dat_path: PathBuf,
        bin_path: PathBuf,
        #[clap(short = 'I', long = "include", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,
    },
    /// Decompile a binary file back into text, against an explicit recipe.
    Decompile {
        bin_path: PathBuf,
        recipe_path: PathBuf,
        dat_path: PathBuf,
        #[clap(short = 't', long = "type", value_name = "TYPE")]
        recipe_type: Option<String>,
        #[clap(short = 'I', long = "include", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let log = match cli.command {
        Command::Compile {
            dat_path,
            bin_path,
            include_dirs,
        } => bakery::driver::compile(&dat_path, &bin_path, &include_dirs),
        Command::Decompile {
            bin_path,
            recipe_path,
            dat_path,
            recipe_type,
            include_dirs,
        } => {
            let recipe_file = FileIndication {
                path: recipe_path.display().to_string(),
                absolute: false,
            };
            bakery::driver::decompile(
                &bin_path,
                &recipe_file,
                recipe_type.as_deref(),
                &dat_path,
                &include_dirs,
            )
        }
    };

    log.print();
    if !log.ok() {
        exit(1);
    }
}
