fn main() {
    if let Err(err) = gostart::cli::run_cli() {
        eprintln!("❌ {err}");
        for cause in err.chain().skip(1) {
            eprintln!("   caused by: {cause}");
        }
        std::process::exit(1);
    }
}
