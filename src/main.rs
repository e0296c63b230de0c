use clap::Parser;

fn main() {
    let cli = clipboard_ollama_lib::Cli::parse();
    if let Err(e) = clipboard_ollama_lib::run(cli) {
        eprintln!("❌ Fatal error: {}", e);
        std::process::exit(1);
    }
}
