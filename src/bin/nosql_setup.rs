use anyhow::Result;
use sandbox_seed::config::{env_lookup, resolve_mongodb_target};
use sandbox_seed::db::setup_mongodb;
use sandbox_seed::{init_logging, Config, SetupError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let target = match resolve_mongodb_target(env_lookup) {
        Ok(target) => target,
        Err(SetupError::Unconfigured(message)) => {
            println!("{message}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // 未配置时直接退出，不创建日志目录
    let _log_guard = init_logging("nosql-setup.log")?;

    // 加载配置
    let config = Config::from_env()?;

    info!("开始初始化 MongoDB 示例数据");
    let summary = setup_mongodb(&target, &config).await.map_err(|e| {
        error!("MongoDB 初始化失败: {}", e);
        e
    })?;
    info!("索引 {}，文档 _id {}", summary.index_name, summary.inserted_id);

    println!("NoSQL database setup completed.");
    Ok(())
}
