use govdata_types::Vote;
use sqlx::{PgPool, Row};

use crate::error::retry_once_on_unique_violation;

/// Upserts `vote` by its natural key `(congress, chamber, vote_id)`
///, with the same null-preserving and `inserted_at`-once
/// semantics as `upsert_bill`.
pub async fn upsert_vote(pool: &PgPool, vote: &Vote) -> Result<i64, sqlx::Error> {
    retry_once_on_unique_violation(|| async {
        let row = sqlx::query(
            r#"
            INSERT INTO votes (congress, chamber, vote_id, vote_date, result, source_file)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (congress, chamber, vote_id) DO UPDATE SET
                vote_date = COALESCE(EXCLUDED.vote_date, votes.vote_date),
                result = COALESCE(EXCLUDED.result, votes.result),
                source_file = COALESCE(EXCLUDED.source_file, votes.source_file)
            RETURNING id
            "#,
        )
        .bind(vote.congress)
        .bind(vote.chamber.as_str())
        .bind(&vote.vote_id)
        .bind(vote.vote_date)
        .bind(&vote.result)
        .bind(&vote.source_file)
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
