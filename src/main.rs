//! Mycro binary entry point.

fn main() {
    if let Err(err) = mycro::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
