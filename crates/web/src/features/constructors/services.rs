use sqlx::PgPool;
use storage::{
    error::Result, models::CurrentConstructor,
    repository::current_constructor::CurrentConstructorRepository,
};

/// Every stored constructor in championship order
pub async fn list_standings(pool: &PgPool) -> Result<Vec<CurrentConstructor>> {
    let repo = CurrentConstructorRepository::new(pool);
    repo.list_all().await
}
