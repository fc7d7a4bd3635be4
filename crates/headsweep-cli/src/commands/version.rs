//! Version command implementation.

use headsweep_types::Algorithm;

/// Version information for the CLI.
const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

pub fn run() {
    println!("{NAME} {VERSION}");
    println!();
    println!("Disk head scheduling simulator.");
    println!();
    let algorithms = Algorithm::ALL.map(Algorithm::as_str).join(", ");
    println!("Algorithms: {algorithms}");
    println!();
    println!("Build info:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
}
