fn main() {
    if let Err(e) = cinescout::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
