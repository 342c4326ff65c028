//! Сквозные сценарии поверх фейкового бэкенда в памяти: создание с
//! последующей перезагрузкой списка, неудачное удаление, вход и выход.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use panel_core::{
    ApiError, ApiResult, BufferNotifier, Category, CategoryInput, ListFilter, ListSource,
    ListState, ListStore, MemorySessionStorage, Mutated, MutationRunner, NoticeLevel, Page,
    PageMeta, SessionStore, parse_auth_body,
};

/// Бэкенд категорий в памяти с пагинацией и поиском, как у настоящего.
struct FakeBackend {
    rows: Mutex<Vec<Category>>,
    fail_delete: AtomicBool,
}

impl FakeBackend {
    fn new() -> Self {
        let backend = Self {
            rows: Mutex::new(Vec::new()),
            fail_delete: AtomicBool::new(false),
        };
        for (id, name) in [(1, "Minuman"), (2, "Makanan"), (3, "Snack")] {
            backend.push(id, name);
        }
        backend
    }

    fn push(&self, id: i64, name: &str) {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid ts");
        self.rows.lock().expect("rows poisoned").push(Category {
            id,
            nama_kategori: name.to_string(),
            deskripsi_kategori: None,
            created_at: now,
            updated_at: now,
        });
    }

    fn create(&self, input: &CategoryInput) -> ApiResult<Mutated<Category>> {
        let next_id = {
            let rows = self.rows.lock().expect("rows poisoned");
            rows.iter().map(|c| c.id).max().unwrap_or(0) + 1
        };
        self.push(next_id, &input.nama_kategori);
        let created = self
            .rows
            .lock()
            .expect("rows poisoned")
            .last()
            .cloned()
            .expect("just pushed");
        Ok(Mutated::new(created, "Kategori berhasil dibuat"))
    }

    fn delete(&self, id: i64) -> ApiResult<Mutated<()>> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        self.rows
            .lock()
            .expect("rows poisoned")
            .retain(|category| category.id != id);
        Ok(Mutated::new((), "Kategori dihapus"))
    }
}

#[async_trait]
impl ListSource<Category> for FakeBackend {
    async fn fetch_page(&self, filter: &ListFilter) -> ApiResult<Page<Category>> {
        let rows = self.rows.lock().expect("rows poisoned").clone();
        let needle = filter.s.clone().unwrap_or_default().to_lowercase();
        let matched: Vec<Category> = rows
            .into_iter()
            .filter(|category| {
                needle.is_empty() || category.nama_kategori.to_lowercase().contains(&needle)
            })
            .collect();

        let per_page = filter.per_page.unwrap_or(10).max(1);
        let page = filter.page.unwrap_or(1).max(1);
        let total = matched.len() as u64;
        let last_page = (total.div_ceil(per_page as u64)).max(1) as u32;
        let start = ((page - 1) * per_page) as usize;
        let items: Vec<Category> = matched
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        let from = (!items.is_empty()).then(|| start as u64 + 1);
        let to = (!items.is_empty()).then(|| start as u64 + items.len() as u64);
        Ok(Page {
            items,
            meta: PageMeta {
                current_page: page.min(last_page),
                per_page,
                total,
                last_page,
                from,
                to,
                next_page_url: (page < last_page).then(|| format!("?page={}", page + 1)),
                prev_page_url: (page > 1).then(|| format!("?page={}", page - 1)),
            },
        })
    }
}

fn setup() -> (Arc<FakeBackend>, Arc<ListStore<Category>>, Arc<BufferNotifier>) {
    let backend = Arc::new(FakeBackend::new());
    let notifier = Arc::new(BufferNotifier::new());
    let store = Arc::new(ListStore::new(
        backend.clone(),
        notifier.clone(),
        ListFilter::default(),
    ));
    (backend, store, notifier)
}

fn names(state: &ListState<Category>) -> Vec<String> {
    state
        .items
        .iter()
        .map(|category| category.nama_kategori.clone())
        .collect()
}

#[tokio::test]
async fn created_entity_appears_exactly_once_after_refetch() {
    let (backend, store, notifier) = setup();
    let filter = ListFilter::search("ko");

    store.refetch(Some(filter.clone()), false).await;
    assert!(!names(&store.state()).contains(&"Kopi".to_string()));

    let runner = MutationRunner::new(notifier.clone());
    let input = CategoryInput {
        nama_kategori: "Kopi".to_string(),
        deskripsi_kategori: None,
    };
    runner
        .run(async { backend.create(&input) })
        .await
        .expect("create must succeed");

    // мутация сама список не обновляет: нужен явный refetch с теми же
    // фильтрами; force — потому что фильтр уже применён
    store.refetch(Some(filter), true).await;

    let matches: Vec<String> = names(&store.state())
        .into_iter()
        .filter(|name| name == "Kopi")
        .collect();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_list_and_notifies_once() {
    let (backend, store, notifier) = setup();

    store.refetch(None, false).await;
    let before = names(&store.state());
    assert_eq!(before.len(), 3);
    notifier.drain();

    backend.fail_delete.store(true, Ordering::SeqCst);

    let runner = MutationRunner::new(notifier.clone());
    let result = runner.run(async { backend.delete(2) }).await;
    assert!(matches!(result, Err(ApiError::Network(_))));

    // видимый список не тронут, уведомление об ошибке ровно одно
    assert_eq!(names(&store.state()), before);
    let notices = notifier.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, NoticeLevel::Error);
}

#[tokio::test]
async fn successful_delete_disappears_after_explicit_refetch() {
    let (backend, store, notifier) = setup();
    store.refetch(None, false).await;

    let runner = MutationRunner::new(notifier.clone());
    runner
        .run(async { backend.delete(2) })
        .await
        .expect("delete must succeed");

    // до refetch кэш хука остаётся прежним
    assert_eq!(names(&store.state()).len(), 3);

    store.refetch(None, true).await;
    let after = names(&store.state());
    assert_eq!(after.len(), 2);
    assert!(!after.contains(&"Makanan".to_string()));
}

#[test]
fn login_success_fills_session_and_cookie() {
    #[derive(Clone, Default)]
    struct RecordingMirror(Arc<Mutex<Vec<Option<String>>>>);
    impl panel_core::TokenMirror for RecordingMirror {
        fn set(&self, token: &str) -> Result<(), String> {
            self.0
                .lock()
                .expect("mirror poisoned")
                .push(Some(token.to_string()));
            Ok(())
        }
        fn clear(&self) -> Result<(), String> {
            self.0.lock().expect("mirror poisoned").push(None);
            Ok(())
        }
    }

    let mirror = RecordingMirror::default();
    let session = SessionStore::new(
        Box::new(MemorySessionStorage::default()),
        Some(Box::new(mirror.clone())),
    );

    let body = r#"{
        "status": true,
        "access_token": "abc",
        "user": {
            "id": 3,
            "nama_depan": "Budi",
            "nama_belakang": "Santoso",
            "email": "budi@example.com",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }
    }"#;
    let payload = parse_auth_body(body).expect("login response must parse");
    session
        .login(payload.user, payload.access_token)
        .expect("login must persist");

    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("abc"));
    assert_eq!(
        mirror.0.lock().expect("mirror poisoned").clone(),
        vec![Some("abc".to_string())]
    );
}

#[test]
fn login_failure_leaves_session_unauthenticated() {
    let session = SessionStore::new(Box::new(MemorySessionStorage::default()), None);

    let body = r#"{"status": false, "message": "Invalid credentials"}"#;
    let result = parse_auth_body(body);
    match result {
        Err(ApiError::Api(message)) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Api error, got {other:?}"),
    }

    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
}
