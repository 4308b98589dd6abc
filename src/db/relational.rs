use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;
use tracing::{debug, info};

use crate::config::RelationalTarget;
use crate::error::{Result, SetupError};
use crate::models::{NewUser, UserRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalBackend {
    Postgres,
    MySql,
    Sqlite,
}

impl RelationalBackend {
    /// 按 URL scheme 选择后端，`+driver` 后缀（如 `mysql+mysqlconnector`）忽略
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = match url.split_once(':') {
            Some((scheme, _)) if !scheme.is_empty() => scheme,
            _ => {
                return Err(SetupError::backend(
                    "sql",
                    format!("database URL has no scheme: {url}"),
                ));
            }
        };
        let dialect = scheme.split_once('+').map_or(scheme, |(dialect, _)| dialect);

        match dialect.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(RelationalBackend::Postgres),
            "mysql" | "mariadb" => Ok(RelationalBackend::MySql),
            "sqlite" => Ok(RelationalBackend::Sqlite),
            _ => Err(SetupError::backend(
                "sql",
                format!("unsupported database URL scheme: {scheme}"),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RelationalBackend::Postgres => "postgres",
            RelationalBackend::MySql => "mysql",
            RelationalBackend::Sqlite => "sqlite",
        }
    }

    /// 替换为客户端可识别的 scheme。
    ///
    /// SQLite 地址按 `sqlite:///relative.db`、`sqlite:////absolute.db` 的写法
    /// 解释，转换时去掉一个 `/`；`sqlite://` 为内存库。
    pub fn client_url(&self, url: &str) -> String {
        let Some((_, rest)) = url.split_once(':') else {
            return url.to_string();
        };
        if *self == RelationalBackend::Sqlite {
            if rest == "//" || rest.starts_with("//?") {
                return format!("sqlite::memory:{}", &rest[2..]);
            }
            if let Some(path) = rest.strip_prefix("///") {
                return format!("sqlite://{path}");
            }
        }
        format!("{}:{}", self.name(), rest)
    }

    fn quote(&self, ident: &str) -> String {
        match self {
            RelationalBackend::MySql => format!("`{}`", ident.replace('`', "``")),
            _ => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    fn as_bigint(&self, expr: &str) -> String {
        match self {
            RelationalBackend::MySql => format!("CAST({expr} AS SIGNED)"),
            _ => format!("CAST({expr} AS BIGINT)"),
        }
    }

    fn placeholder(&self, position: usize) -> String {
        match self {
            RelationalBackend::Postgres => format!("${position}"),
            _ => "?".to_string(),
        }
    }
}

/// 种子表结构：自增整数主键 + 文本列，文本列上建一个索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub key_column: String,
    pub name_column: String,
}

impl TableSchema {
    pub fn users(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: "id".to_string(),
            name_column: "name".to_string(),
        }
    }

    pub fn index_name(&self) -> String {
        format!("ix_{}_{}", self.table, self.name_column)
    }

    pub fn create_table_sql(&self, backend: RelationalBackend) -> String {
        let key_type = match backend {
            RelationalBackend::Postgres => "SERIAL NOT NULL",
            RelationalBackend::MySql => "INTEGER NOT NULL AUTO_INCREMENT",
            RelationalBackend::Sqlite => "INTEGER NOT NULL",
        };
        // MySQL 的 VARCHAR 必须带长度
        let text_type = match backend {
            RelationalBackend::MySql => "VARCHAR(255)",
            _ => "VARCHAR",
        };
        let key = backend.quote(&self.key_column);

        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                {} {},
                {} {},
                PRIMARY KEY ({})
            )",
            backend.quote(&self.table),
            key,
            key_type,
            backend.quote(&self.name_column),
            text_type,
            key,
        )
    }

    /// MySQL 不支持 `IF NOT EXISTS`，由调用方先检查索引是否存在
    pub fn create_index_sql(&self, backend: RelationalBackend) -> String {
        let guard = match backend {
            RelationalBackend::MySql => "",
            _ => "IF NOT EXISTS ",
        };
        format!(
            "CREATE INDEX {}{} ON {} ({})",
            guard,
            backend.quote(&self.index_name()),
            backend.quote(&self.table),
            backend.quote(&self.name_column),
        )
    }

    /// Postgres/SQLite 通过 `RETURNING` 取回主键，MySQL 使用 last_insert_id
    pub fn insert_sql(&self, backend: RelationalBackend) -> String {
        let returning = match backend {
            RelationalBackend::MySql => String::new(),
            _ => format!(
                " RETURNING {}",
                backend.as_bigint(&backend.quote(&self.key_column))
            ),
        };
        format!(
            "INSERT INTO {} ({}) VALUES ({}){}",
            backend.quote(&self.table),
            backend.quote(&self.name_column),
            backend.placeholder(1),
            returning,
        )
    }

    pub fn count_by_name_sql(&self, backend: RelationalBackend) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {} = {}",
            backend.quote(&self.table),
            backend.quote(&self.name_column),
            backend.placeholder(1),
        )
    }

    pub fn select_all_sql(&self, backend: RelationalBackend) -> String {
        format!(
            "SELECT {} AS id, {} AS name FROM {} ORDER BY {}",
            backend.as_bigint(&backend.quote(&self.key_column)),
            backend.quote(&self.name_column),
            backend.quote(&self.table),
            backend.quote(&self.key_column),
        )
    }
}

#[derive(Debug)]
pub struct RelationalSetupSummary {
    pub backend: RelationalBackend,
    pub inserted_id: i64,
    pub matching_rows: i64,
}

pub struct RelationalDB {
    pool: AnyPool,
    backend: RelationalBackend,
}

impl RelationalDB {
    pub async fn connect(target: &RelationalTarget) -> Result<Self> {
        install_default_drivers();
        let url = target.backend.client_url(&target.target.uri);
        // 单次初始化只需要一个连接
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await?;

        Ok(Self {
            pool,
            backend: target.backend,
        })
    }

    pub async fn ensure_table(&self, schema: &TableSchema) -> Result<()> {
        sqlx::query(&schema.create_table_sql(self.backend))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn ensure_index(&self, schema: &TableSchema) -> Result<()> {
        if self.backend == RelationalBackend::MySql && self.mysql_index_exists(schema).await? {
            debug!("索引 {} 已存在", schema.index_name());
            return Ok(());
        }
        sqlx::query(&schema.create_index_sql(self.backend))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mysql_index_exists(&self, schema: &TableSchema) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.statistics
            WHERE table_schema = DATABASE() AND table_name = ? AND index_name = ?",
        )
        .bind(schema.table.as_str())
        .bind(schema.index_name())
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// 在单独的事务中插入一行并提交
    pub async fn insert_user(&self, schema: &TableSchema, user: &NewUser) -> Result<i64> {
        let sql = schema.insert_sql(self.backend);
        let mut tx = self.pool.begin().await?;
        let id = match self.backend {
            RelationalBackend::MySql => sqlx::query(&sql)
                .bind(user.name.as_str())
                .execute(&mut *tx)
                .await?
                .last_insert_id(),
            _ => Some(
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(user.name.as_str())
                    .fetch_one(&mut *tx)
                    .await?,
            ),
        };
        let id = id.ok_or_else(|| SetupError::backend("sql", "insert returned no id"))?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn count_by_name(&self, schema: &TableSchema, name: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&schema.count_by_name_sql(self.backend))
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// 按主键顺序列出全部记录，用于检查种子数据
    pub async fn list_users(&self, schema: &TableSchema) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(&schema.select_all_sql(self.backend))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// 建表、建索引并插入一行种子数据；每次运行都会新增一行
pub async fn setup_database(
    target: &RelationalTarget,
    schema: &TableSchema,
    user: &NewUser,
) -> Result<RelationalSetupSummary> {
    debug!("连接 {} 数据库，地址来源: {}", target.backend.name(), target.target.source);
    let db = RelationalDB::connect(target).await?;

    db.ensure_table(schema).await?;
    db.ensure_index(schema).await?;
    info!("表 {} 及索引 {} 就绪", schema.table, schema.index_name());

    let inserted_id = db.insert_user(schema, user).await?;
    let matching_rows = db.count_by_name(schema, &user.name).await?;
    info!(
        "插入种子数据 name={} id={}，当前共 {} 条同名记录",
        user.name, inserted_id, matching_rows
    );

    db.close().await;
    Ok(RelationalSetupSummary {
        backend: target.backend,
        inserted_id,
        matching_rows,
    })
}
