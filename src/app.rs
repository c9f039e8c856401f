//! Main application module
//!
//! This is the central hub: it owns every view, routes messages to them and
//! spawns fetches. View state is only ever mutated inside [`ContentApp::update`];
//! spawned fetches report back through a channel as [`InternalMessage::Fetched`].

use crate::catalog::ResourceKind;
use crate::config::CacheConfig;
use crate::i18n::Locale;
use crate::message::{InternalMessage, Message, ViewMessage};
use crate::render::{self, DisplayNode, RetryAction};
use crate::resource::ResourceFetcher;
use crate::state::{RequestTicket, Resolution, ResourceView, SharedCache, ViewId};

use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// A view together with what it shows
#[derive(Debug)]
pub struct ViewSlot {
    /// Resource shown by the view
    pub kind: ResourceKind,

    /// The view itself
    pub view: ResourceView,

    /// Shared cache key currently referenced by the view
    cache_key: Option<String>,
}

/// Campus Content application
pub struct ContentApp<F: ResourceFetcher> {
    /// Fetcher shared with spawned tasks
    fetcher: Arc<F>,

    /// Active language
    locale: Locale,

    /// Views in display order
    slots: Vec<ViewSlot>,

    /// Shared payload cache, when enabled
    shared: Option<SharedCache>,

    /// Sender handed to spawned fetches and input sources
    tx: UnboundedSender<Message>,

    /// Incoming messages
    rx: UnboundedReceiver<Message>,

    /// Fetches spawned but not yet reported back
    in_flight: usize,
}

impl<F: ResourceFetcher> ContentApp<F> {
    /// Create the application
    pub fn new(fetcher: F, locale: Locale, cache: &CacheConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            fetcher: Arc::new(fetcher),
            locale,
            slots: Vec::new(),
            shared: cache.shared.then(SharedCache::new),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Sender for feeding messages from outside the loop
    pub fn sender(&self) -> UnboundedSender<Message> {
        self.tx.clone()
    }

    pub fn slots(&self) -> &[ViewSlot] {
        &self.slots
    }

    pub fn view(&self, id: ViewId) -> Option<&ResourceView> {
        self.slot(id).map(|s| &s.view)
    }

    /// View id by display position
    pub fn view_at(&self, index: usize) -> Option<ViewId> {
        self.slots.get(index).map(|s| s.view.id())
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn shared_cache(&self) -> Option<&SharedCache> {
        self.shared.as_ref()
    }

    /// Add an unmounted view for `kind` in the active locale
    pub fn add_view<I, K, V>(&mut self, kind: ResourceKind, params: I) -> ViewId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let request = params
            .into_iter()
            .fold(kind.spec().request(self.locale), |req, (k, v)| req.with_param(k, v));
        let view = ResourceView::new(request);
        let id = view.id();
        log::debug!("Added {} view {}", kind, id);
        self.slots.push(ViewSlot {
            kind,
            view,
            cache_key: None,
        });
        id
    }

    /// Handle one message; returns false once the loop should stop
    pub fn update(&mut self, message: Message) -> bool {
        match message {
            Message::Locale(locale) => self.handle_locale_change(locale),
            Message::View(msg) => self.handle_view_message(msg),
            Message::Internal(msg) => self.handle_internal_message(msg),
            Message::Quit => return false,
            Message::None => {}
        }
        true
    }

    /// Wait for the next message and handle it
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => self.update(message),
            None => false,
        }
    }

    /// Handle messages until no fetch is in flight
    pub async fn settle(&mut self) -> bool {
        while self.in_flight > 0 {
            if !self.process_next().await {
                return false;
            }
        }
        true
    }

    /// Render every view
    pub fn render(&self) -> Vec<DisplayNode> {
        self.slots.iter().map(|slot| self.render_slot(slot)).collect()
    }

    /// Render one view
    pub fn render_view(&self, id: ViewId) -> Option<DisplayNode> {
        self.slot(id).map(|slot| self.render_slot(slot))
    }

    fn render_slot(&self, slot: &ViewSlot) -> DisplayNode {
        let spec = slot.kind.spec();
        render::render_section(
            spec.title(self.locale),
            slot.view.state(),
            spec.layout,
            self.locale,
            RetryAction { view: slot.view.id() },
        )
    }

    fn handle_locale_change(&mut self, locale: Locale) {
        if locale == self.locale {
            return;
        }
        log::info!("Locale changed: {} -> {}", self.locale, locale);
        self.locale = locale;

        let tickets: Vec<RequestTicket> = self
            .slots
            .iter_mut()
            .filter_map(|slot| slot.view.set_locale(locale))
            .collect();
        for ticket in tickets {
            self.dispatch(ticket);
        }
    }

    fn handle_view_message(&mut self, msg: ViewMessage) {
        let ticket = match msg {
            ViewMessage::Mount(id) => self.slot_mut(id).and_then(|s| s.view.mount()),
            ViewMessage::Unmount(id) => {
                self.unmount(id);
                None
            }
            ViewMessage::SetParam { view, key, value } => {
                self.slot_mut(view).and_then(|s| s.view.set_param(&key, &value))
            }
            ViewMessage::RemoveParam { view, key } => {
                self.slot_mut(view).and_then(|s| s.view.remove_param(&key))
            }
            ViewMessage::Retry(id) => {
                self.invalidate_shared(id);
                self.slot_mut(id).and_then(|s| s.view.retry())
            }
        };

        if let Some(ticket) = ticket {
            self.dispatch(ticket);
        }
    }

    fn handle_internal_message(&mut self, msg: InternalMessage) {
        match msg {
            InternalMessage::Fetched { ticket, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);

                let Some(slot) = self.slots.iter_mut().find(|s| s.view.id() == ticket.view) else {
                    log::debug!("Result for removed view {}", ticket.view);
                    return;
                };

                match slot.view.resolve(ticket, result) {
                    Resolution::Committed => {
                        log::debug!(
                            "{} view {} -> {}",
                            slot.kind,
                            ticket.view,
                            slot.view.state().label()
                        );
                        if let (Some(cache), Some(key), Some(payload)) =
                            (self.shared.as_mut(), slot.cache_key.as_deref(), slot.view.state().payload())
                        {
                            cache.put(key, payload.clone());
                        }
                    }
                    Resolution::Stale | Resolution::Rejected => {}
                }
            }
        }
    }

    /// Serve a ticket from the shared cache or spawn a fetch for it
    fn dispatch(&mut self, ticket: RequestTicket) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.view.id() == ticket.view) else {
            return;
        };
        let request = slot.view.request().clone();

        if let Some(cache) = self.shared.as_mut() {
            match self.fetcher.cache_key(&request) {
                Ok(key) => {
                    if slot.cache_key.as_deref() != Some(key.as_str()) {
                        if let Some(old) = slot.cache_key.take() {
                            cache.release(&old);
                        }
                        cache.acquire(&key);
                        slot.cache_key = Some(key.clone());
                    }
                    if let Some(payload) = cache.get(&key) {
                        log::debug!("{} view {} served from shared cache", slot.kind, ticket.view);
                        slot.view.resolve(ticket, Ok(payload.clone()));
                        return;
                    }
                }
                Err(err) => {
                    slot.view.resolve(ticket, Err(err));
                    return;
                }
            }
        }

        log::debug!(
            "{} view {} dispatch #{} ({})",
            slot.kind,
            ticket.view,
            ticket.seq,
            request.locale
        );
        self.in_flight += 1;

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&request).await;
            // Receiver lives as long as the app; a send error means it shut down
            let _ = tx.send(Message::Internal(InternalMessage::Fetched { ticket, result }));
        });
    }

    fn unmount(&mut self, id: ViewId) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.view.id() == id) else {
            return;
        };
        slot.view.unmount();
        if let (Some(cache), Some(key)) = (self.shared.as_mut(), slot.cache_key.take()) {
            cache.release(&key);
        }
    }

    fn invalidate_shared(&mut self, id: ViewId) {
        let key = self.slot(id).and_then(|s| s.cache_key.clone());
        if let (Some(cache), Some(key)) = (self.shared.as_mut(), key) {
            cache.invalidate(&key);
        }
    }

    fn slot(&self, id: ViewId) -> Option<&ViewSlot> {
        self.slots.iter().find(|s| s.view.id() == id)
    }

    fn slot_mut(&mut self, id: ViewId) -> Option<&mut ViewSlot> {
        self.slots.iter_mut().find(|s| s.view.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, FetchResult};
    use crate::render::DisplayNode;
    use crate::resource::{ingest, Payload, ResourceRequest};
    use crate::state::ResourceState;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    const BASE: &str = "http://stub.test";

    type Responder = dyn Fn(&ResourceRequest) -> FetchResult<Value> + Send + Sync;

    /// Answers from a closure and records requested URLs
    struct StubFetcher {
        respond: Box<Responder>,
        calls: Arc<AtomicUsize>,
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        fn new(respond: impl Fn(&ResourceRequest) -> FetchResult<Value> + Send + Sync + 'static) -> Self {
            Self {
                respond: Box::new(respond),
                calls: Arc::new(AtomicUsize::new(0)),
                urls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ResourceFetcher for StubFetcher {
        async fn fetch(&self, request: &ResourceRequest) -> FetchResult<Payload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(request.url(BASE)?.to_string());
            let body = (self.respond)(request)?;
            ingest(body, request)
        }

        fn cache_key(&self, request: &ResourceRequest) -> FetchResult<String> {
            request.cache_key(BASE)
        }
    }

    /// Holds each locale's response until its gate is opened
    struct GatedFetcher {
        gates: HashMap<Locale, Arc<Semaphore>>,
        calls: Arc<AtomicUsize>,
    }

    impl GatedFetcher {
        fn new() -> Self {
            let gates = Locale::ALL
                .iter()
                .map(|l| (*l, Arc::new(Semaphore::new(0))))
                .collect();
            Self {
                gates,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn gate(&self, locale: Locale) -> Arc<Semaphore> {
            Arc::clone(&self.gates[&locale])
        }
    }

    impl ResourceFetcher for GatedFetcher {
        async fn fetch(&self, request: &ResourceRequest) -> FetchResult<Payload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate(request.locale);
            let _permit = gate.acquire().await.map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(json!([request.locale.code()]))
        }

        fn cache_key(&self, request: &ResourceRequest) -> FetchResult<String> {
            request.cache_key(BASE)
        }
    }

    fn history_body(request: &ResourceRequest) -> FetchResult<Value> {
        let title = match request.locale {
            Locale::En => "Founded",
            Locale::Ru => "Основан",
            Locale::Kg => "Негизделген",
        };
        Ok(json!({"results": [{"year": 1955, "title": title}]}))
    }

    fn no_sharing() -> CacheConfig {
        CacheConfig { shared: false }
    }

    #[tokio::test]
    async fn test_history_steps_loaded_and_rendered() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &no_sharing());
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(id)));
        assert!(app.render_view(id).unwrap().is_loading());
        app.settle().await;

        assert_eq!(
            app.view(id).unwrap().state(),
            &ResourceState::Loaded(json!([{"year": 1955, "title": "Founded"}]))
        );
        let urls = app.fetcher.urls.lock().unwrap().clone();
        assert_eq!(urls, vec![format!("{}/api/academy/history-steps/?lang=en", BASE)]);

        match app.render_view(id).unwrap().inner() {
            DisplayNode::Timeline(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].year, "1955");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_fetches_are_idempotent() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::Ru, &no_sharing());
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;
        let first = app.view(id).unwrap().state().clone();

        for _ in 0..3 {
            app.update(Message::View(ViewMessage::Retry(id)));
            app.settle().await;
            assert_eq!(app.view(id).unwrap().state(), &first);
        }
        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_server_error_then_retry() {
        let mut app = ContentApp::new(
            StubFetcher::new(|_| Err(FetchError::Http { status: 500 })),
            Locale::En,
            &no_sharing(),
        );
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        assert_eq!(
            app.view(id).unwrap().state(),
            &ResourceState::Failed(FetchError::Http { status: 500 })
        );
        let node = app.render_view(id).unwrap();
        let retry = node.retry_action().expect("error panel offers retry");
        assert_eq!(retry.view, id);

        app.update(Message::View(ViewMessage::Retry(retry.view)));
        assert!(app.view(id).unwrap().is_pending());
        app.settle().await;

        let urls = app.fetcher.urls.lock().unwrap().clone();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], urls[1]);
    }

    #[tokio::test]
    async fn test_late_result_of_old_locale_is_dropped() {
        let fetcher = GatedFetcher::new();
        let ru_gate = fetcher.gate(Locale::Ru);
        let en_gate = fetcher.gate(Locale::En);
        let mut app = ContentApp::new(fetcher, Locale::Ru, &no_sharing());
        let id = app.add_view(ResourceKind::News, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(id)));
        app.update(Message::Locale(Locale::En));
        assert_eq!(app.in_flight(), 2);

        en_gate.add_permits(1);
        app.process_next().await;
        assert_eq!(app.view(id).unwrap().state(), &ResourceState::Loaded(json!(["en"])));

        ru_gate.add_permits(1);
        app.process_next().await;
        assert_eq!(app.view(id).unwrap().state(), &ResourceState::Loaded(json!(["en"])));
        assert_eq!(app.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_early_result_of_old_locale_is_dropped() {
        let fetcher = GatedFetcher::new();
        let ru_gate = fetcher.gate(Locale::Ru);
        let en_gate = fetcher.gate(Locale::En);
        let mut app = ContentApp::new(fetcher, Locale::Ru, &no_sharing());
        let id = app.add_view(ResourceKind::News, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(id)));
        app.update(Message::Locale(Locale::En));

        ru_gate.add_permits(1);
        app.process_next().await;
        assert!(app.view(id).unwrap().is_pending());
        assert!(app.render_view(id).unwrap().is_loading());

        en_gate.add_permits(1);
        app.process_next().await;
        assert_eq!(app.view(id).unwrap().state(), &ResourceState::Loaded(json!(["en"])));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_view() {
        let fetcher = StubFetcher::new(|request| {
            if request.endpoint.as_str().contains("quotas") {
                Err(FetchError::Network("connection refused".into()))
            } else {
                Ok(json!([{"title": "Library"}]))
            }
        });
        let mut app = ContentApp::new(fetcher, Locale::Kg, &no_sharing());
        let quotas = app.add_view(ResourceKind::Quotas, Vec::<(String, String)>::new());
        let services = app.add_view(ResourceKind::StudentServices, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(quotas)));
        app.update(Message::View(ViewMessage::Mount(services)));
        app.settle().await;

        assert!(app.view(quotas).unwrap().state().error().is_some());
        assert_eq!(
            app.view(services).unwrap().state(),
            &ResourceState::Loaded(json!([{"title": "Library"}]))
        );
        let nodes = app.render();
        assert!(nodes[0].is_error());
        assert!(!nodes[1].is_error());
    }

    #[tokio::test]
    async fn test_empty_results_render_no_data() {
        let mut app = ContentApp::new(
            StubFetcher::new(|_| Ok(json!({"results": []}))),
            Locale::Ru,
            &no_sharing(),
        );
        let id = app.add_view(ResourceKind::Accreditations, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        let node = app.render_view(id).unwrap();
        assert!(node.is_no_content());
        assert!(!node.is_error());
        assert!(!node.is_loading());
    }

    #[tokio::test]
    async fn test_param_change_redispatches() {
        let fetcher = StubFetcher::new(|request| Ok(json!({"id": request.params["id"], "name": "Item"})));
        let mut app = ContentApp::new(fetcher, Locale::En, &no_sharing());
        let id = app.add_view(ResourceKind::NewsItem, [("id", "1")]);
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        app.update(Message::View(ViewMessage::SetParam {
            view: id,
            key: "id".into(),
            value: "2".into(),
        }));
        assert!(app.view(id).unwrap().is_pending());
        app.settle().await;

        let payload = app.view(id).unwrap().state().payload().unwrap().clone();
        assert_eq!(payload["id"], json!("2"));
        assert_eq!(payload["title"], json!("Item"));
    }

    #[tokio::test]
    async fn test_missing_placeholder_fails_without_network() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &no_sharing());
        let id = app.add_view(ResourceKind::Faculty, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        assert!(matches!(
            app.view(id).unwrap().state(),
            ResourceState::Failed(FetchError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_cache_serves_second_view() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &CacheConfig { shared: true });
        let first = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        let second = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(first)));
        app.settle().await;
        app.update(Message::View(ViewMessage::Mount(second)));
        assert_eq!(app.in_flight(), 0);

        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.view(first).unwrap().state(), app.view(second).unwrap().state());

        app.update(Message::View(ViewMessage::Unmount(first)));
        app.update(Message::View(ViewMessage::Unmount(second)));
        assert!(!app.view(first).unwrap().is_mounted());
        assert!(app.shared_cache().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shared_cache_keyed_by_locale() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &CacheConfig { shared: true });
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        app.update(Message::Locale(Locale::Ru));
        app.settle().await;

        let state = app.view(id).unwrap().state();
        assert_eq!(state.payload().unwrap()[0]["title"], json!("Основан"));
        assert_eq!(app.shared_cache().unwrap().len(), 1);
    }

    fn news_key(locale: Locale) -> String {
        ResourceKind::News.spec().request(locale).cache_key(BASE).unwrap()
    }

    #[tokio::test]
    async fn test_stale_result_never_shared() {
        let fetcher = GatedFetcher::new();
        let ru_gate = fetcher.gate(Locale::Ru);
        let en_gate = fetcher.gate(Locale::En);
        let calls = Arc::clone(&fetcher.calls);
        let mut app = ContentApp::new(fetcher, Locale::Ru, &CacheConfig { shared: true });
        let id = app.add_view(ResourceKind::News, Vec::<(String, String)>::new());

        app.update(Message::View(ViewMessage::Mount(id)));
        app.update(Message::Locale(Locale::En));
        assert_eq!(app.shared_cache().unwrap().refs(&news_key(Locale::Ru)), 0);

        en_gate.add_permits(1);
        app.process_next().await;
        assert_eq!(app.shared_cache().unwrap().get(&news_key(Locale::En)), Some(&json!(["en"])));

        ru_gate.add_permits(1);
        app.process_next().await;
        let cache = app.shared_cache().unwrap();
        assert_eq!(cache.get(&news_key(Locale::Ru)), None);
        assert_eq!(cache.get(&news_key(Locale::En)), Some(&json!(["en"])));
        assert_eq!(app.view(id).unwrap().state(), &ResourceState::Loaded(json!(["en"])));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        app.update(Message::View(ViewMessage::Retry(id)));
        assert_eq!(app.in_flight(), 1);
        app.settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(app.view(id).unwrap().state(), &ResourceState::Loaded(json!(["en"])));
    }

    #[tokio::test]
    async fn test_result_of_unmounted_view_never_shared() {
        let fetcher = GatedFetcher::new();
        let ru_gate = fetcher.gate(Locale::Ru);
        let mut app = ContentApp::new(fetcher, Locale::Ru, &CacheConfig { shared: true });
        let first = app.add_view(ResourceKind::News, Vec::<(String, String)>::new());
        let second = app.add_view(ResourceKind::News, Vec::<(String, String)>::new());
        let key = news_key(Locale::Ru);

        app.update(Message::View(ViewMessage::Mount(first)));
        app.update(Message::View(ViewMessage::Mount(second)));
        assert_eq!(app.in_flight(), 2);
        app.update(Message::View(ViewMessage::Unmount(first)));
        assert_eq!(app.shared_cache().unwrap().refs(&key), 1);

        ru_gate.add_permits(1);
        app.process_next().await;
        assert_eq!(app.view(first).unwrap().state(), &ResourceState::Idle);
        assert_eq!(app.shared_cache().unwrap().get(&key), None);

        app.process_next().await;
        assert_eq!(app.shared_cache().unwrap().get(&key), Some(&json!(["ru"])));
    }

    #[tokio::test]
    async fn test_shared_retry_reaches_network() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &CacheConfig { shared: true });
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;
        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);

        app.update(Message::View(ViewMessage::Retry(id)));
        assert!(app.view(id).unwrap().is_pending());
        app.settle().await;
        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(app.shared_cache().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_locale_round_trip_refetches_evicted_entry() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &CacheConfig { shared: true });
        let id = app.add_view(ResourceKind::HistorySteps, Vec::<(String, String)>::new());
        app.update(Message::View(ViewMessage::Mount(id)));
        app.settle().await;

        app.update(Message::Locale(Locale::Ru));
        app.settle().await;
        app.update(Message::Locale(Locale::En));
        app.settle().await;

        assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 3);
        let state = app.view(id).unwrap().state();
        assert_eq!(state.payload().unwrap()[0]["title"], json!("Founded"));
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let mut app = ContentApp::new(StubFetcher::new(history_body), Locale::En, &no_sharing());
        assert!(app.update(Message::None));
        app.sender().send(Message::Quit).unwrap();
        assert!(!app.process_next().await);
    }
}
