#[tokio::main]
async fn main() {
  if let Err(e) = workout_relay::run().await {
    eprintln!("workout-relay failed: {}", e);
    std::process::exit(1);
  }
}
