use anyhow::Context;
use lambda_runtime::tracing;
use secrecy::ExposeSecret;
use sqlx::{ConnectOptions, Connection, MySqlConnection, mysql::MySqlConnectOptions};

use crate::{
    config::DatabaseConfig,
    domain::{
        assignment::{AssignmentValue, RecordUpdate},
        models::RecordId,
        ports::RecordRepo,
    },
};

/// Runs the record update against MySQL.
///
/// Each call opens its own connection and closes it before returning, nothing is kept
/// between invocations.
pub struct MySqlRecordRepo {
    options: MySqlConnectOptions,
    update: RecordUpdate,
}

impl MySqlRecordRepo {
    pub fn new(database: &DatabaseConfig, update: RecordUpdate) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&database.host)
            .port(database.port)
            .username(&database.user)
            .password(database.password.expose_secret())
            .database(&database.database);

        Self { options, update }
    }
}

impl RecordRepo for MySqlRecordRepo {
    #[tracing::instrument(skip(self))]
    async fn set_record_url(&self, record_id: &RecordId, url: &str) -> anyhow::Result<u64> {
        let mut conn = self
            .options
            .connect()
            .await
            .context("could not connect to db")?;

        let result = update_record_url(&mut conn, &self.update, record_id, url).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error=?e, "unable to close db connection cleanly");
        }

        result
    }
}

enum Parameter {
    String(String),
    BigNumber(i64),
    Bool(bool),
}

struct UpdateStatement {
    sql: String,
    parameters: Vec<Parameter>,
}

/// `UPDATE t SET url = ?, extra... WHERE pk = ?` with every value bound
fn build_update_statement(update: &RecordUpdate, record_id: &RecordId, url: &str) -> UpdateStatement {
    let mut parameters = vec![Parameter::String(url.to_string())];
    let mut set_parts = vec![format!("{} = ?", update.url_column.quoted())];

    for assignment in &update.additional {
        let column = assignment.column.quoted();
        match &assignment.value {
            AssignmentValue::Null => set_parts.push(format!("{column} = NULL")),
            AssignmentValue::Now => set_parts.push(format!("{column} = NOW()")),
            AssignmentValue::Bool(b) => {
                set_parts.push(format!("{column} = ?"));
                parameters.push(Parameter::Bool(*b));
            }
            AssignmentValue::Integer(n) => {
                set_parts.push(format!("{column} = ?"));
                parameters.push(Parameter::BigNumber(*n));
            }
            AssignmentValue::Text(text) => {
                set_parts.push(format!("{column} = ?"));
                parameters.push(Parameter::String(text.clone()));
            }
        }
    }

    parameters.push(Parameter::String(record_id.as_str().to_string()));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        update.table.quoted(),
        set_parts.join(", "),
        update.primary_key.quoted()
    );

    UpdateStatement { sql, parameters }
}

#[tracing::instrument(skip(conn, update))]
async fn update_record_url(
    conn: &mut MySqlConnection,
    update: &RecordUpdate,
    record_id: &RecordId,
    url: &str,
) -> anyhow::Result<u64> {
    let statement = build_update_statement(update, record_id, url);
    tracing::trace!(sql=%statement.sql, "running update");

    let mut query = sqlx::query(&statement.sql);
    for parameter in statement.parameters {
        query = match parameter {
            Parameter::String(string) => query.bind(string),
            Parameter::BigNumber(number) => query.bind(number),
            Parameter::Bool(bool) => query.bind(bool),
        };
    }

    let result = query
        .execute(&mut *conn)
        .await
        .context(format!("could not update {}", update.table))?;

    Ok(result.rows_affected())
}
