//! Classgram CLI - Convert Mermaid class diagrams to skeleton code and back

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let mut app = cli::ClassgramApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
