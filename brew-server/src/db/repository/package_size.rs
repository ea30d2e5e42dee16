//! Package Size Repository

use super::RepoResult;
use shared::models::PackageSize;
use sqlx::SqliteExecutor;

pub async fn find_all(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<PackageSize>> {
    let sizes = sqlx::query_as::<_, PackageSize>(
        "SELECT id, volume_ml FROM package_size ORDER BY volume_ml",
    )
    .fetch_all(ex)
    .await?;
    Ok(sizes)
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<PackageSize>> {
    let size =
        sqlx::query_as::<_, PackageSize>("SELECT id, volume_ml FROM package_size WHERE id = ?")
            .bind(id)
            .fetch_optional(ex)
            .await?;
    Ok(size)
}
