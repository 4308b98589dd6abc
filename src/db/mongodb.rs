use crate::config::{Config, ConnectionTarget, MongoDBConfig};
use crate::error::Result;
use crate::models::{NewUser, UserDocument};
use mongodb::{
    bson::{Bson, Document},
    options::ClientOptions,
    Client, Collection, Database, IndexModel,
};
use tracing::{debug, info};

pub struct MongoDB {
    client: Client,
    database: Database,
}

#[derive(Debug)]
pub struct MongoSetupSummary {
    pub index_name: String,
    pub inserted_id: Bson,
}

impl MongoDB {
    pub async fn new(uri: &str, config: &MongoDBConfig) -> Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        // 数据库名固定取配置，不使用 URI 中的路径
        let database = client.database(&config.database);

        Ok(Self { client, database })
    }

    fn users(&self, collection_name: &str) -> Collection<UserDocument> {
        self.database.collection(collection_name)
    }

    /// 已存在同名同键的索引时服务端不做任何修改
    pub async fn ensure_index(&self, collection_name: &str, field: &str) -> Result<String> {
        let result = self
            .users(collection_name)
            .create_index(ascending_index(field))
            .await?;
        Ok(result.index_name)
    }

    pub async fn insert_user(&self, collection_name: &str, user: &NewUser) -> Result<Bson> {
        let result = self
            .users(collection_name)
            .insert_one(UserDocument::from(user))
            .await?;
        Ok(result.inserted_id)
    }

    pub async fn close(self) {
        self.client.shutdown().await;
    }
}

pub fn ascending_index(field: &str) -> IndexModel {
    let mut keys = Document::new();
    keys.insert(field, 1);
    IndexModel::builder().keys(keys).build()
}

/// 建立索引并插入一条种子文档；每次运行都会新增一条记录
pub async fn setup_mongodb(target: &ConnectionTarget, config: &Config) -> Result<MongoSetupSummary> {
    debug!("连接 MongoDB，地址来源: {}", target.source);
    let db = MongoDB::new(&target.uri, &config.mongodb).await?;
    let collection = &config.mongodb.collection;

    let index_name = db.ensure_index(collection, "name").await?;
    info!("集合 {}.{} 索引就绪: {}", config.mongodb.database, collection, index_name);

    let inserted_id = db.insert_user(collection, &NewUser::new(&config.seed.name)).await?;
    info!("插入种子文档 name={} _id={}", config.seed.name, inserted_id);

    db.close().await;
    Ok(MongoSetupSummary {
        index_name,
        inserted_id,
    })
}
