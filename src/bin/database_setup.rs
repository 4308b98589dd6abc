use anyhow::Result;
use sandbox_seed::config::{env_lookup, resolve_relational_target};
use sandbox_seed::db::{setup_database, TableSchema};
use sandbox_seed::models::NewUser;
use sandbox_seed::{init_logging, Config, SetupError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let target = match resolve_relational_target(env_lookup) {
        Ok(target) => target,
        Err(SetupError::Unconfigured(message)) => {
            println!("{message}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // 未配置时直接退出，不创建日志目录
    let _log_guard = init_logging("database-setup.log")?;

    // 加载配置
    let config = Config::from_env()?;
    let schema = TableSchema::users(&config.relational.table);
    let seed = NewUser::new(&config.seed.name);

    info!("开始初始化 {} 示例数据", target.backend.name());
    let summary = setup_database(&target, &schema, &seed).await.map_err(|e| {
        error!("数据库初始化失败: {}", e);
        e
    })?;
    info!("新记录 id: {}", summary.inserted_id);

    println!("Database setup completed with engine {}", target.target.uri);
    Ok(())
}
