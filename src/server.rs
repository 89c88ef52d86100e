//! HTTP 触发入口
//!
//! `POST /` 拉取队列直到为空，然后返回固定的确认文本

use std::sync::Arc;

use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::services::QueueConsumer;
use crate::utils::logging::print_consume_stats;

pub const ACK_BODY: &str = "Processing complete";

pub struct ServerState {
    consumer: Arc<QueueConsumer>,
    /// 批处理在主运行时的多线程调度器上执行
    runtime: Handle,
}

impl ServerState {
    pub fn new(consumer: Arc<QueueConsumer>, runtime: Handle) -> Self {
        Self { consumer, runtime }
    }
}

#[post("/")]
async fn process_request(state: web::Data<ServerState>) -> impl Responder {
    info!("📨 收到处理 ISBN 的请求");

    let consumer = state.consumer.clone();
    match state.runtime.spawn(async move { consumer.run().await }).await {
        Ok(Ok(stats)) => print_consume_stats(&stats),
        Ok(Err(e)) => error!("❌ 监听消息失败: {}", e),
        Err(e) => error!("❌ 消费任务异常退出: {}", e),
    }

    HttpResponse::Ok().body(ACK_BODY)
}

#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(process_request).service(health_check);
}

/// 启动 HTTP 服务
pub async fn serve(consumer: Arc<QueueConsumer>, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(ServerState::new(consumer, Handle::current()));

    info!("🌐 HTTP 服务监听 0.0.0.0:{}", port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
