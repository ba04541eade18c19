fn main() {
    if let Err(err) = staff_reconcile::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
