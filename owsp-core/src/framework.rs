use sqlx::PgPool;

/// Runs database commands against the shared connection pool.
///
/// Each command is a plain struct with a `kanau::processor::Processor`
/// implementation on this type.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
