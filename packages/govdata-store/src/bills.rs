use govdata_types::Bill;
use sqlx::{PgPool, Row};

use crate::error::retry_once_on_unique_violation;

/// Upserts `bill` by its natural key `(congress, chamber, bill_number)`
///. Incoming null fields never overwrite a stored non-null value
/// (`COALESCE(EXCLUDED.col, bills.col)`); `inserted_at` is set once at
/// insert and is absent from the update list. Each call is its own
/// transaction via the single statement's implicit autocommit.
pub async fn upsert_bill(pool: &PgPool, bill: &Bill) -> Result<i64, sqlx::Error> {
    retry_once_on_unique_violation(|| async {
        let row = sqlx::query(
            r#"
            INSERT INTO bills (congress, chamber, bill_number, title, sponsor_name, introduced_date, source_file)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (congress, chamber, bill_number) DO UPDATE SET
                title = COALESCE(EXCLUDED.title, bills.title),
                sponsor_name = COALESCE(EXCLUDED.sponsor_name, bills.sponsor_name),
                introduced_date = COALESCE(EXCLUDED.introduced_date, bills.introduced_date),
                source_file = COALESCE(EXCLUDED.source_file, bills.source_file)
            RETURNING id
            "#,
        )
        .bind(bill.congress)
        .bind(bill.chamber.as_str())
        .bind(&bill.bill_number)
        .bind(&bill.title)
        .bind(&bill.sponsor_name)
        .bind(bill.introduced_date)
        .bind(&bill.source_file)
        .fetch_one(pool)
        .await?;

        Ok(row.get::<i64, _>("id"))
    })
    .await
}
