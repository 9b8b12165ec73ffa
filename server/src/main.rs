use std::error::Error;

use tokio::net::TcpListener;
use todo_server::{db, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let db = db::connect(&config.database).await?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    todo_server::run(listener, db).await?;
    Ok(())
}
