use infogen::app::App;
use std::{env, error::Error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = env::args()
        .find(|arg| arg.starts_with("--config="))
        .map(|arg| arg.trim_start_matches("--config=").to_string())
        .unwrap_or_else(|| "config.toml".to_string());
    let mode_override = env::args()
        .find(|arg| arg.starts_with("--mode="))
        .map(|arg| arg.trim_start_matches("--mode=").to_string());

    let mut app = match App::new(&config_path, mode_override.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return Err(e);
        }
    };

    app.run().await
}
