mod cli;

fn main() {
    // Delegate to CLI runner; errors are printed with their context chain.
    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
