use taskboard::mcp::TaskboardMcp;
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_url =
        std::env::var("TASKBOARD_API_URL").unwrap_or_else(|_| "http://127.0.0.1:21547".to_string());

    let service = TaskboardMcp::new(api_url).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
