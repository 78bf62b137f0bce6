use open_game_list_lib::{config, start_server};

#[tokio::main]
async fn main() {
    if let Err(e) = rolling_logger::init_logger(config::log_dir(), "OpenGameList") {
        eprintln!("Failed to init rolling logger: {}", e);
    }

    let config = config::Config::load();

    match start_server(config).await {
        Ok(()) => {
            let _ = rolling_logger::info("Server stopped");
        }
        Err(e) => {
            if rolling_logger::error(&format!("Server failed: {}", e)).is_err() {
                eprintln!("Server failed: {}", e);
            }
            std::process::exit(1);
        }
    }
}
