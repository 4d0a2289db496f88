use govdata_types::Legislator;
use sqlx::{PgPool, Row};

use crate::error::retry_once_on_unique_violation;

/// Upserts `legislator` by its natural key `bioguide`, with the
/// same null-preserving and `inserted_at`-once semantics as
/// `upsert_bill`.
pub async fn upsert_legislator(pool: &PgPool, legislator: &Legislator) -> Result<i64, sqlx::Error> {
    retry_once_on_unique_violation(|| async {
        let row = sqlx::query(
            r#"
            INSERT INTO legislators (bioguide, name, current_party, state, source_file)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (bioguide) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, legislators.name),
                current_party = COALESCE(EXCLUDED.current_party, legislators.current_party),
                state = COALESCE(EXCLUDED.state, legislators.state),
                source_file = COALESCE(EXCLUDED.source_file, legislators.source_file)
            RETURNING id
            "#,
        )
        .bind(&legislator.bioguide)
        .bind(&legislator.name)
        .bind(&legislator.current_party)
        .bind(&legislator.state)
        .bind(&legislator.source_file)
        .fetch_one(pool)
        .await?;

        Ok(row.get::<i64, _>("id"))
    })
    .await
}

#[cfg(test)]
mod tests {
    // Exercised against a real Postgres instance in the integration
    // suite; no mock pool stands in for sqlx here.
}
