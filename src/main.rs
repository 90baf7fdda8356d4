fn main() {
    std::process::exit(certchain::run() as i32);
}
