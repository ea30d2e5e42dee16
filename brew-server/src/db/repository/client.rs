//! Client Repository

use super::RepoResult;
use shared::models::Client;
use sqlx::SqliteExecutor;

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: &str) -> RepoResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT id, name, email FROM client WHERE id = ?")
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(client)
}
