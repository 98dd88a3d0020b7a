#![forbid(unsafe_code)]

//! pdbe command-line entry point

use pdbe::{cli, logging};

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    std::process::exit(cli::run(args));
}
