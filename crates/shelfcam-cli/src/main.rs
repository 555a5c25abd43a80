fn main() {
    if let Err(error) = shelfcam_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
