use sqlx::PgPool;

struct Migration {
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration { name: "0001_bills", sql: include_str!("../migrations/0001_bills.sql") },
    Migration { name: "0002_votes", sql: include_str!("../migrations/0002_votes.sql") },
    Migration { name: "0003_legislators", sql: include_str!("../migrations/0003_legislators.sql") },
    Migration { name: "0004_supporting_tables", sql: include_str!("../migrations/0004_supporting_tables.sql") },
];

/// Runs the fixed, ordered migration list against `pool`. Each
/// migration's SQL is idempotent (`CREATE ... IF NOT EXISTS`), and a
/// `schema_migrations` row records which names have already applied so
/// repeated startups are cheap no-ops.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_migrations (name TEXT PRIMARY KEY, applied_at TIMESTAMPTZ NOT NULL DEFAULT now())")
        .execute(pool)
        .await?;

    for migration in MIGRATIONS {
        let already_applied: Option<(String,)> =
            sqlx::query_as("SELECT name FROM schema_migrations WHERE name = $1")
                .bind(migration.name)
                .fetch_optional(pool)
                .await?;

        if already_applied.is_some() {
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");
        sqlx::query(migration.sql).execute(pool).await?;
        sqlx::query("INSERT INTO schema_migrations (name) VALUES ($1)")
            .bind(migration.name)
            .execute(pool)
            .await?;
    }

    Ok(())
}
