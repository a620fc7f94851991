use sqlx::sqlite::SqlitePool;
use taskboard::infrastructure::db::verify_wal_mode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:taskboard.db".to_string());
    let pool = SqlitePool::connect(&database_url).await?;

    let tables: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .fetch_all(&pool)
        .await?;

    println!("Tables: {}", tables.join(", "));

    let has_table = |name: &str| tables.iter().any(|t| t == name);

    for table in ["boards", "board_columns", "cards"] {
        if !has_table(table) {
            println!("{}: missing", table);
            continue;
        }
        let count: i64 = sqlx::query_scalar(&format!("SELECT count(*) FROM {}", table))
            .fetch_one(&pool)
            .await?;
        println!("{}: {} rows", table, count);
    }

    if has_table("boards") && has_table("board_columns") {
        let malformed: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM boards b WHERE (SELECT count(*) FROM board_columns c WHERE c.board_id = b.id) != 4",
        )
        .fetch_one(&pool)
        .await?;

        println!("Boards without the 4-column layout: {}", malformed);
    }

    println!("Journal mode: {}", verify_wal_mode(&pool).await?);

    Ok(())
}
