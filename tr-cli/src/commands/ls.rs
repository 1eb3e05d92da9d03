use super::Session;
use crate::messages::format_size;
use anyhow::Result;

pub async fn handle_ls(session: &Session, path: String, skip: u16, take: u16, json: bool) -> Result<()> {
    let content = session
        .client
        .get_directory(path, skip, take, session.settings.clone())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
        return Ok(());
    }

    println!("{}:{}", session.settings.storage_type, content.path);
    for dir in &content.directories {
        println!("  {}/", dir.name);
    }
    for file in &content.files {
        println!("  {:<40} {:>10}", file.name, format_size(file.size));
    }
    if content.is_empty() {
        println!("  (empty)");
    }
    Ok(())
}
