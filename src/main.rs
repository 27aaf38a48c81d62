#[tokio::main]
async fn main() {
    raffle::start_server().await;
}
