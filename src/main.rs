fn main() {
    std::process::exit(craft_cli::cli::run());
}
