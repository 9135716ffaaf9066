//! `holo` binary entry point

fn main() {
    if let Err(err) = holo_cli::run() {
        holo_cli::output::print_error(&err.to_string());
        std::process::exit(1);
    }
}
