//! 应用装配
//!
//! 在入口处构造所有外部客户端，并注入到流水线中

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::clients::{FirestoreStatusStore, GoogleHttp, GoogleSheet, PubSubClient};
use crate::config::Config;
use crate::infrastructure::ChromeSessionFactory;
use crate::orchestrator::{BatchCoordinator, Pipeline};
use crate::server;
use crate::services::{QueueConsumer, SheetReconciler};
use crate::utils::logging::log_startup;
use crate::workflow::ItemProcessor;

/// 应用主结构
pub struct App {
    config: Config,
    consumer: Arc<QueueConsumer>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let http = GoogleHttp::from_config(&config).context("无法加载 Google 凭证")?;
        let endpoints = &config.endpoints;

        // 打开表格
        let sheet = GoogleSheet::open_by_name(
            http.clone(),
            &endpoints.drive,
            &endpoints.sheets,
            &config.google_sheet_name,
        )
        .await
        .with_context(|| format!("无法打开表格: {}", config.google_sheet_name))?;

        let status = FirestoreStatusStore::new(http.clone(), &endpoints.firestore, &config.project_id);
        let queue = PubSubClient::new(
            http,
            &endpoints.pubsub,
            &config.project_id,
            &config.pubsub_subscription,
        );
        info!("✓ 订阅: {}", queue.subscription_path());

        let processor = Arc::new(ItemProcessor::new(Arc::new(ChromeSessionFactory::new(
            &config,
        ))));
        let coordinator =
            BatchCoordinator::new(processor, Arc::new(status), config.concurrent_browsers);
        let pipeline = Pipeline::new(coordinator, SheetReconciler::new(Arc::new(sheet)));
        let consumer = QueueConsumer::new(Arc::new(queue), Arc::new(pipeline));

        Ok(Self {
            config,
            consumer: Arc::new(consumer),
        })
    }

    /// 启动 HTTP 服务，直到进程退出
    pub async fn run(self) -> Result<()> {
        server::serve(self.consumer, self.config.port)
            .await
            .context("HTTP 服务异常退出")?;
        Ok(())
    }
}
