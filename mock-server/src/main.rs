use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let key = std::env::var("AKISMET_KEY").unwrap_or_else(|_| "123456789".to_string());
    let host = std::env::var("AKISMET_HOST").unwrap_or_else(|_| "localhost".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr} as {host}");
    mock_server::run(listener, &key, &host).await
}
