#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use isbn_price_scraper::error::{AppError, BrowserError, PayloadError, Result};
use isbn_price_scraper::services::{
    InMemorySheet, InMemoryStatusStore, MessageSource, QueueMessage, SheetReconciler, StatusStore,
};
use isbn_price_scraper::{
    BatchCoordinator, ExtractionResult, ExtractionSession, ItemProcessor, Pipeline,
    ProcessingStatus, SessionFactory, SiteId, StatusRecord,
};

/// 计数打开/关闭的会话，记录同时存在的最大数量
#[derive(Default)]
pub struct SessionStats {
    pub live: AtomicUsize,
    pub peak: AtomicUsize,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
}

impl SessionStats {
    fn enter(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 按 ISBN 预设两个站点返回值的假会话工厂
pub struct FakeSessionFactory {
    pub stats: Arc<SessionStats>,
    answers: HashMap<String, (ExtractionResult, ExtractionResult)>,
    failing_isbns: HashSet<String>,
    extract_delay: Duration,
    next_isbn: Mutex<VecDeque<String>>,
}

impl FakeSessionFactory {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(SessionStats::default()),
            answers: HashMap::new(),
            failing_isbns: HashSet::new(),
            extract_delay: Duration::from_millis(0),
            next_isbn: Mutex::new(VecDeque::new()),
        }
    }

    pub fn answer(mut self, isbn: &str, site_a: ExtractionResult, site_b: ExtractionResult) -> Self {
        self.answers.insert(isbn.to_string(), (site_a, site_b));
        self
    }

    /// 这些 ISBN 的会话启动会失败（按打开顺序匹配）
    pub fn fail_open_for(mut self, isbn: &str) -> Self {
        self.failing_isbns.insert(isbn.to_string());
        self
    }

    /// 打开顺序，用于让启动失败对应到具体 ISBN
    pub fn open_order(self, isbns: &[&str]) -> Self {
        *self.next_isbn.lock().unwrap() = isbns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.extract_delay = delay;
        self
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn open(&self) -> Result<Box<dyn ExtractionSession>> {
        let expected = self.next_isbn.lock().unwrap().pop_front();
        if let Some(isbn) = expected {
            if self.failing_isbns.contains(&isbn) {
                return Err(BrowserError::ConfigurationFailed(format!("no browser for {}", isbn)).into());
            }
        }
        self.stats.enter();
        Ok(Box::new(FakeSession {
            stats: self.stats.clone(),
            answers: self.answers.clone(),
            delay: self.extract_delay,
            open: true,
        }))
    }
}

struct FakeSession {
    stats: Arc<SessionStats>,
    answers: HashMap<String, (ExtractionResult, ExtractionResult)>,
    delay: Duration,
    open: bool,
}

#[async_trait]
impl ExtractionSession for FakeSession {
    async fn extract(&self, site: SiteId, isbn: &str) -> ExtractionResult {
        tokio::time::sleep(self.delay).await;
        let Some((a, b)) = self.answers.get(isbn) else {
            return ExtractionResult::Unavailable;
        };
        match site {
            SiteId::BookScouter => a.clone(),
            SiteId::RestrictedInventory => b.clone(),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.stats.leave();
        }
        Ok(())
    }
}

/// 每次写入都失败的状态存储
pub struct BrokenStatusStore;

#[async_trait]
impl StatusStore for BrokenStatusStore {
    async fn mark(&self, _isbn: &str, _status: ProcessingStatus) -> Result<()> {
        Err(AppError::Task("status store offline".into()))
    }

    async fn get(&self, _isbn: &str) -> Result<Option<StatusRecord>> {
        Ok(None)
    }
}

/// 只拒绝指定 ISBN 的状态存储，其余写入内存
pub struct RejectingStatusStore {
    pub inner: InMemoryStatusStore,
    reject: String,
}

impl RejectingStatusStore {
    pub fn new(reject: &str) -> Self {
        Self {
            inner: InMemoryStatusStore::new(),
            reject: reject.to_string(),
        }
    }
}

#[async_trait]
impl StatusStore for RejectingStatusStore {
    async fn mark(&self, isbn: &str, status: ProcessingStatus) -> Result<()> {
        if isbn == self.reject {
            return Err(AppError::Task(format!("status write rejected for {}", isbn)));
        }
        self.inner.mark(isbn, status).await
    }

    async fn get(&self, isbn: &str) -> Result<Option<StatusRecord>> {
        self.inner.get(isbn).await
    }
}

pub struct Harness {
    pub pipeline: Arc<Pipeline>,
    pub sheet: Arc<InMemorySheet>,
    pub status: Arc<InMemoryStatusStore>,
    pub stats: Arc<SessionStats>,
}

pub fn harness(factory: FakeSessionFactory, concurrency: usize) -> Harness {
    let stats = factory.stats.clone();
    let sheet = Arc::new(InMemorySheet::new());
    let status = Arc::new(InMemoryStatusStore::new());
    let processor = Arc::new(ItemProcessor::new(Arc::new(factory)));
    let coordinator = BatchCoordinator::new(processor, status.clone(), concurrency);
    let pipeline = Pipeline::new(coordinator, SheetReconciler::new(sheet.clone()));
    Harness {
        pipeline: Arc::new(pipeline),
        sheet,
        status,
        stats,
    }
}

/// 预置消息的队列，记录确认过的 ack_id
#[derive(Default)]
pub struct FakeQueue {
    batches: Mutex<VecDeque<Vec<QueueMessage>>>,
    pub acked: Mutex<Vec<String>>,
    pub pulls: AtomicUsize,
}

impl FakeQueue {
    pub fn with_batches(batches: Vec<Vec<(&str, &str)>>) -> Self {
        Self::with_messages(
            batches
                .into_iter()
                .map(|batch| {
                    batch
                        .into_iter()
                        .map(|(id, payload)| message(id, Ok(payload.as_bytes().to_vec())))
                        .collect()
                })
                .collect(),
        )
    }

    pub fn with_messages(batches: Vec<Vec<QueueMessage>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            ..Self::default()
        }
    }

    pub fn acked(&self) -> Vec<String> {
        self.acked.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for FakeQueue {
    async fn pull(&self, _max_messages: usize) -> Result<Vec<QueueMessage>> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn acknowledge(&self, ack_ids: &[String]) -> Result<()> {
        self.acked.lock().unwrap().extend(ack_ids.iter().cloned());
        Ok(())
    }
}

pub fn message(id: &str, data: std::result::Result<Vec<u8>, PayloadError>) -> QueueMessage {
    QueueMessage {
        ack_id: format!("ack-{}", id),
        message_id: id.to_string(),
        data,
    }
}

pub fn success(value: &str) -> ExtractionResult {
    ExtractionResult::Success(value.to_string())
}
