//! Recipe Repository

use super::RepoResult;
use shared::models::Recipe;
use sqlx::SqliteExecutor;

pub async fn find_all(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT id, name, color, description, base_price, created_at FROM recipe ORDER BY name",
    )
    .fetch_all(ex)
    .await?;
    Ok(recipes)
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "SELECT id, name, color, description, base_price, created_at FROM recipe WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(recipe)
}
