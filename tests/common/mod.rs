//! Common test utilities
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bubble_vote::client::{ClientError, ItemApi};
use bubble_vote::item::{Item, ItemId, VoteReceipt};
use bubble_vote::server::{self, AppState};
use bubble_vote::store::ItemStore;
use bubble_vote::sync::{Bubble, Job, Notice, NoticeKind, Scheduler, TaskHandle, View};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub fn item(id: ItemId, name: &str, votes: u64) -> Item {
    Item {
        id,
        name: name.to_string(),
        votes,
        voted_by_me: false,
    }
}

pub fn status_error(status: u16, message: Option<&str>) -> ClientError {
    ClientError::Status {
        status,
        message: message.map(str::to_string),
    }
}

/// Yield to other tasks until `cond` holds.
pub async fn wait_until<F: Fn() -> bool>(cond: F) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

// ── FakeApi ───────────────────────────────────────────────────────────────────

type Reply<T> = oneshot::Receiver<Result<T, ClientError>>;
pub type Responder<T> = oneshot::Sender<Result<T, ClientError>>;

/// In-process [`ItemApi`].
///
/// Unscripted calls behave like a well-behaved server over `server_items`.
/// Scripted calls wait for the test to answer through the returned sender.
#[derive(Default)]
pub struct FakeApi {
    pub server_items: Mutex<Vec<Item>>,
    list_replies: Mutex<VecDeque<Reply<Vec<Item>>>>,
    add_replies: Mutex<VecDeque<Reply<Item>>>,
    vote_replies: Mutex<VecDeque<Reply<VoteReceipt>>>,
    pub list_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub vote_calls: AtomicUsize,
    pub added_names: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_items(items: Vec<Item>) -> Arc<Self> {
        let api = Self::default();
        *api.server_items.lock().unwrap() = items;
        Arc::new(api)
    }

    pub fn script_list(&self) -> Responder<Vec<Item>> {
        let (tx, rx) = oneshot::channel();
        self.list_replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn script_add(&self) -> Responder<Item> {
        let (tx, rx) = oneshot::channel();
        self.add_replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn script_vote(&self) -> Responder<VoteReceipt> {
        let (tx, rx) = oneshot::channel();
        self.vote_replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn vote_calls(&self) -> usize {
        self.vote_calls.load(Ordering::SeqCst)
    }
}

async fn answer<T>(reply: Reply<T>) -> Result<T, ClientError> {
    reply
        .await
        .unwrap_or_else(|_| Err(status_error(503, None)))
}

#[async_trait]
impl ItemApi for FakeApi {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.list_replies.lock().unwrap().pop_front();
        match scripted {
            Some(reply) => answer(reply).await,
            None => Ok(self.server_items.lock().unwrap().clone()),
        }
    }

    async fn add_item(&self, name: &str) -> Result<Item, ClientError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.added_names.lock().unwrap().push(name.to_string());
        let scripted = self.add_replies.lock().unwrap().pop_front();
        if let Some(reply) = scripted {
            return answer(reply).await;
        }
        let mut items = self.server_items.lock().unwrap();
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let created = item(id, name, 0);
        items.push(created.clone());
        Ok(created)
    }

    async fn vote(&self, id: ItemId) -> Result<VoteReceipt, ClientError> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.vote_replies.lock().unwrap().pop_front();
        if let Some(reply) = scripted {
            return answer(reply).await;
        }
        let mut items = self.server_items.lock().unwrap();
        let Some(found) = items.iter_mut().find(|i| i.id == id) else {
            return Err(status_error(404, Some("Item not found")));
        };
        found.votes += 1;
        Ok(VoteReceipt {
            id: Some(id),
            votes: found.votes,
        })
    }
}

// ── RecordingView ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Render(Vec<Bubble>),
    Update(Bubble),
    Pulse(ItemId, Duration),
    Notify(Notice),
    CloseDialog,
    ResetInput,
}

/// A [`View`] that remembers every call.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<Vec<Bubble>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Render(bubbles) => Some(bubbles),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<Bubble> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Update(bubble) => Some(bubble),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Notify(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn last_notice(&self) -> Option<(NoticeKind, String)> {
        self.notices().pop().map(|n| (n.kind, n.message))
    }

    pub fn count(&self, event: &ViewEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl View for RecordingView {
    fn render(&self, bubbles: &[Bubble]) {
        self.push(ViewEvent::Render(bubbles.to_vec()));
    }

    fn update_bubble(&self, bubble: &Bubble) {
        self.push(ViewEvent::Update(bubble.clone()));
    }

    fn pulse(&self, id: ItemId, duration: Duration) {
        self.push(ViewEvent::Pulse(id, duration));
    }

    fn notify(&self, notice: Notice) {
        self.push(ViewEvent::Notify(notice));
    }

    fn close_dialog(&self) {
        self.push(ViewEvent::CloseDialog);
    }

    fn reset_input(&self) {
        self.push(ViewEvent::ResetInput);
    }
}

// ── ManualScheduler ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Every,
    After,
}

struct Entry {
    kind: Kind,
    period: Duration,
    job: Job,
    cancelled: Arc<AtomicBool>,
}

/// A [`Scheduler`] that only fires when the test says so.
#[derive(Default)]
pub struct ManualScheduler {
    entries: Mutex<Vec<Entry>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn schedule(&self, kind: Kind, period: Duration, job: Job) -> TaskHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.entries.lock().unwrap().push(Entry {
            kind,
            period,
            job,
            cancelled: Arc::clone(&cancelled),
        });
        TaskHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }

    /// Periods (or delays) of live entries of `kind`.
    pub fn active(&self, kind: Kind) -> Vec<Duration> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind && !e.cancelled.load(Ordering::SeqCst))
            .map(|e| e.period)
            .collect()
    }

    /// Run every live periodic job once.
    pub async fn tick(&self) -> usize {
        let jobs: Vec<Job> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == Kind::Every && !e.cancelled.load(Ordering::SeqCst))
            .map(|e| Arc::clone(&e.job))
            .collect();
        for job in &jobs {
            job().await;
        }
        jobs.len()
    }

    /// Run and retire every live one-shot job.
    pub async fn fire_pending(&self) -> usize {
        let jobs: Vec<Job> = {
            let mut entries = self.entries.lock().unwrap();
            let jobs = entries
                .iter()
                .filter(|e| e.kind == Kind::After && !e.cancelled.load(Ordering::SeqCst))
                .map(|e| Arc::clone(&e.job))
                .collect();
            entries.retain(|e| e.kind == Kind::Every);
            jobs
        };
        for job in &jobs {
            job().await;
        }
        jobs.len()
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, job: Job) -> TaskHandle {
        self.schedule(Kind::Every, period, job)
    }

    fn after(&self, delay: Duration, job: Job) -> TaskHandle {
        self.schedule(Kind::After, delay, job)
    }
}

// ── Real server ───────────────────────────────────────────────────────────────

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        if let Some(task) = self.task.take() {
            task.await.unwrap().unwrap();
        }
    }
}

/// Start an in-memory item service on an ephemeral local port.
pub async fn spawn_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(ItemStore::in_memory(None)));
    let app = server::router(state);
    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(server::serve(listener, app, async move {
        rx.await.ok();
    }));
    TestServer {
        base_url: format!("http://{addr}"),
        shutdown: Some(tx),
        task: Some(task),
    }
}
