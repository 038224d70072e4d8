use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Drink, DrinkRow, NewDrink};

const SELECT_DRINK: &str = "SELECT id, title, recipe FROM drink";

/// Single-row operations on the `drink` table. Every call is one statement,
/// committed on its own.
#[derive(Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn select_all(&self) -> Result<Vec<Drink>, DatabaseError> {
        let rows = sqlx::query_as::<_, DrinkRow>(&format!("{} ORDER BY id", SELECT_DRINK))
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::QueryError)?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn select_id(&self, id: i64) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(&format!("{} WHERE id = ?", SELECT_DRINK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::QueryError)?;

        row.map(decode_row).transpose()
    }

    pub async fn select_title(&self, title: &str) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(&format!("{} WHERE title = ?", SELECT_DRINK))
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::QueryError)?;

        row.map(decode_row).transpose()
    }

    pub async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError> {
        let recipe = serde_json::to_string(&drink.recipe)?;
        let result = sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(&drink.title)
            .bind(&recipe)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::WriteError)?;

        Ok(Drink {
            id: result.last_insert_rowid(),
            title: drink.title,
            recipe: drink.recipe,
        })
    }

    pub async fn update(&self, drink: &Drink) -> Result<(), DatabaseError> {
        let recipe = serde_json::to_string(&drink.recipe)?;
        sqlx::query("UPDATE drink SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(&recipe)
            .bind(drink.id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::WriteError)?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::WriteError)?;
        Ok(result.rows_affected() > 0)
    }
}

fn decode_row(row: DrinkRow) -> Result<Drink, DatabaseError> {
    let id = row.id;
    Drink::try_from(row).map_err(|source| DatabaseError::CorruptRecipe { id, source })
}
