use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use panel_client::PanelClient;
use panel_core::{
    CategoryInput, ListFilter, LoginInput, MemorySessionStorage, RegisterInput, SessionStore,
    TransactionInput, TransactionItemInput, TransactionKind,
};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

fn fresh_client() -> (PanelClient, Arc<SessionStore>) {
    let base_url =
        std::env::var("PANEL_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let session = Arc::new(SessionStore::new(
        Box::new(MemorySessionStorage::default()),
        None,
    ));
    (PanelClient::new(base_url, session.clone()), session)
}

#[tokio::test]
#[ignore = "requires running REST backend"]
async fn full_inventory_flow() {
    let (client, session) = fresh_client();

    let suffix = unique_suffix();
    let email = format!("panel_{suffix}@example.com");
    let password = "password123";

    let registered = client
        .auth
        .register(&RegisterInput {
            nama_depan: "Test".to_string(),
            nama_belakang: "Admin".to_string(),
            email: email.clone(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
            tanggal_lahir: None,
            jenis_kelamin: None,
        })
        .await
        .expect("register must succeed");
    assert!(!registered.access_token.is_empty());

    let login = client
        .auth
        .login(&LoginInput {
            email,
            password: password.to_string(),
        })
        .await
        .expect("login must succeed");
    session
        .login(login.user.clone(), login.access_token)
        .expect("session must persist");
    assert!(session.is_authenticated());

    let category = client
        .categories
        .create(&CategoryInput {
            nama_kategori: format!("Kategori {suffix}"),
            deskripsi_kategori: Some("smoke".to_string()),
        })
        .await
        .expect("create category must succeed")
        .value;

    let listed = client
        .categories
        .list(&ListFilter::search(format!("Kategori {suffix}")))
        .await
        .expect("list categories must succeed");
    assert!(listed.items.iter().any(|c| c.id == category.id));

    let transactions = client
        .transactions
        .list(&ListFilter::default())
        .await
        .expect("list transactions must succeed");
    assert!(transactions.meta.current_page >= 1);

    let created = client
        .transactions
        .create(&TransactionInput {
            jenis_transaksi: TransactionKind::In,
            catatan_transaksi: Some("smoke".to_string()),
            produk: vec![TransactionItemInput {
                produk_id: 1,
                jumlah_produk: 1,
            }],
        })
        .await;
    // товар с id=1 может отсутствовать в пустой базе; важно, что ошибка
    // приходит типизированной, а не паникой
    if let Ok(mutated) = created {
        assert!(!mutated.value.is_empty());
    }

    client
        .categories
        .delete(category.id)
        .await
        .expect("delete category must succeed");

    client.auth.logout().await.expect("logout must succeed");
    session.logout().expect("session must clear");
    assert!(!session.is_authenticated());
}
