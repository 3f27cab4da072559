//! Shared fakes for the link flow tests: backend, widget, page, spawner, logger.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Once;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use log::{Level, LevelFilter, Log, Metadata, Record};

use linkglue::platform::TaskSpawner;
use linkglue::{
    ExchangeOutcome, ExchangeRequest, LinkBackend, LinkConfig, LinkError, LinkFlow, LinkHandlers,
    LinkToken, LinkWidget, Page, Trigger,
};

// --- logging ---------------------------------------------------------------

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records into a per-thread buffer so parallel tests don't see each other.
struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = record.args().to_string();
        RECORDS.with(|r| r.borrow_mut().push((record.level(), line)));
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static LOGGER_INIT: Once = Once::new();

pub fn init_logging() {
    LOGGER_INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn logs() -> Vec<(Level, String)> {
    RECORDS.with(|r| r.borrow().clone())
}

pub fn logs_at(level: Level) -> Vec<String> {
    logs()
        .into_iter()
        .filter(|(l, _)| *l == level)
        .map(|(_, s)| s)
        .collect()
}

// --- shared journal of side effects ----------------------------------------

pub type Journal = Rc<RefCell<Vec<String>>>;

// --- backend ---------------------------------------------------------------

#[derive(Clone)]
pub struct FakeBackend {
    journal: Journal,
    token: Rc<RefCell<Result<String, LinkError>>>,
    exchange: Rc<RefCell<Result<u16, LinkError>>>,
    pub token_calls: Rc<RefCell<usize>>,
    pub exchanges: Rc<RefCell<Vec<ExchangeRequest>>>,
}

impl FakeBackend {
    pub fn new(journal: &Journal) -> Self {
        FakeBackend {
            journal: Rc::clone(journal),
            token: Rc::new(RefCell::new(Ok("link-sandbox-1".to_string()))),
            exchange: Rc::new(RefCell::new(Ok(200))),
            token_calls: Rc::new(RefCell::new(0)),
            exchanges: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn token_result(self, result: Result<&str, LinkError>) -> Self {
        *self.token.borrow_mut() = result.map(str::to_string);
        self
    }

    pub fn exchange_result(self, result: Result<u16, LinkError>) -> Self {
        *self.exchange.borrow_mut() = result;
        self
    }
}

#[async_trait(?Send)]
impl LinkBackend for FakeBackend {
    async fn create_link_token(&self) -> Result<LinkToken, LinkError> {
        *self.token_calls.borrow_mut() += 1;
        self.journal.borrow_mut().push("create_link_token".to_string());
        self.token.borrow().clone().map(LinkToken::new)
    }

    async fn exchange_public_token(
        &self,
        request: &ExchangeRequest,
    ) -> Result<ExchangeOutcome, LinkError> {
        self.journal.borrow_mut().push("exchange".to_string());
        self.exchanges.borrow_mut().push(request.clone());
        self.exchange
            .borrow()
            .clone()
            .map(|status| ExchangeOutcome { status })
    }
}

// --- widget ----------------------------------------------------------------

#[derive(Clone)]
pub struct FakeWidget {
    journal: Journal,
    pub opened_with: Rc<RefCell<Vec<String>>>,
    handlers: Rc<RefCell<Option<Rc<dyn LinkHandlers>>>>,
}

impl FakeWidget {
    pub fn new(journal: &Journal) -> Self {
        FakeWidget {
            journal: Rc::clone(journal),
            opened_with: Rc::new(RefCell::new(Vec::new())),
            handlers: Rc::new(RefCell::new(None)),
        }
    }

    /// Handlers bound by the last `open`, as the widget would hold them.
    pub fn handlers(&self) -> Rc<dyn LinkHandlers> {
        self.handlers
            .borrow()
            .clone()
            .expect("widget was never opened")
    }

    pub fn open_count(&self) -> usize {
        self.opened_with.borrow().len()
    }
}

impl LinkWidget for FakeWidget {
    fn open(&self, token: &LinkToken, handlers: Rc<dyn LinkHandlers>) -> Result<(), LinkError> {
        self.journal
            .borrow_mut()
            .push(format!("open:{}", token.as_str()));
        self.opened_with.borrow_mut().push(token.as_str().to_string());
        *self.handlers.borrow_mut() = Some(handlers);
        Ok(())
    }
}

// --- page ------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeTrigger {
    handler: Rc<RefCell<Option<Box<dyn Fn()>>>>,
}

impl FakeTrigger {
    pub fn click(&self) {
        if let Some(handler) = self.handler.borrow().as_ref() {
            handler();
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.borrow().is_some()
    }
}

impl Trigger for FakeTrigger {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Result<(), LinkError> {
        *self.handler.borrow_mut() = Some(handler);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePage {
    elements: HashMap<String, FakeTrigger>,
}

impl FakePage {
    pub fn with_element(selector: &str) -> (Self, FakeTrigger) {
        let trigger = FakeTrigger::default();
        let mut page = FakePage::default();
        page.elements.insert(selector.to_string(), trigger.clone());
        (page, trigger)
    }
}

impl Page for FakePage {
    type Trigger = FakeTrigger;

    fn query_selector(&self, selector: &str) -> Option<FakeTrigger> {
        self.elements.get(selector).cloned()
    }
}

// --- spawner ---------------------------------------------------------------

/// Queues detached tasks; the test decides when they run.
#[derive(Clone, Default)]
pub struct QueueSpawner {
    queue: Rc<RefCell<VecDeque<LocalBoxFuture<'static, ()>>>>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued tasks (and anything they queue) to completion.
    pub async fn run_all(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl TaskSpawner for QueueSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.queue.borrow_mut().push_back(task);
    }
}

// --- assembly --------------------------------------------------------------

pub struct Harness {
    pub journal: Journal,
    pub backend: FakeBackend,
    pub widget: FakeWidget,
    pub spawner: QueueSpawner,
    pub flow: LinkFlow,
}

pub fn harness(config: LinkConfig, tweak: impl FnOnce(FakeBackend) -> FakeBackend) -> Harness {
    let journal: Journal = Rc::new(RefCell::new(Vec::new()));
    let backend = tweak(FakeBackend::new(&journal));
    let widget = FakeWidget::new(&journal);
    let spawner = QueueSpawner::default();
    let flow = LinkFlow::new(config, backend.clone(), widget.clone(), spawner.clone());
    Harness {
        journal,
        backend,
        widget,
        spawner,
        flow,
    }
}
