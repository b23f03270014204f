#[tokio::main]
async fn main() {
    if let Err(e) = voltcare_lib::run().await {
        eprintln!("voltcare: {e}");
        std::process::exit(1);
    }
}
