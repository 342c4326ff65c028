//! CLI-клиент админ-панели инвентаря: вход, профиль, категории, товары
//! и складские транзакции поверх REST-бэкенда.

mod render;
mod session_file;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use panel_client::PanelClient;
use panel_core::{
    ApiError, CategoryInput, DataTable, Gender, ListFilter, ListSource, ListStore, LoginInput,
    MAX_PER_PAGE, MutationRunner, Notify, ProductInput, RegisterInput, SessionStore,
    TableUiState, TracingNotifier, TransactionInput, TransactionItemInput, TransactionKind, User,
    UserUpdateInput, Validate, format_date,
};
use tracing_subscriber::{EnvFilter, fmt};

use crate::session_file::FileSessionStorage;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

#[derive(Debug, Parser)]
#[command(name = "panel-cli", version, about = "CLI клиент админ-панели инвентаря")]
struct Cli {
    /// Адрес REST-бэкенда (иначе PANEL_API_URL или значение по умолчанию).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Вход по email и паролю.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Регистрация нового пользователя.
    Register {
        #[arg(long)]
        nama_depan: String,
        #[arg(long)]
        nama_belakang: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
        /// Дата рождения в формате YYYY-MM-DD.
        #[arg(long)]
        tanggal_lahir: Option<String>,
        /// Пол: Laki-laki или Perempuan.
        #[arg(long)]
        jenis_kelamin: Option<String>,
    },
    /// Выход: серверный logout и очистка локальной сессии.
    Logout,
    /// Профиль текущего пользователя.
    Profile,
    /// Обновление профиля; заданы только изменяемые поля.
    UpdateProfile {
        #[arg(long)]
        nama_depan: Option<String>,
        #[arg(long)]
        nama_belakang: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Новый пароль (минимум 8 символов).
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        password_confirmation: Option<String>,
        #[arg(long)]
        tanggal_lahir: Option<String>,
        #[arg(long)]
        jenis_kelamin: Option<String>,
    },
    /// Категории товаров.
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Товары.
    #[command(subcommand)]
    Products(ProductCommand),
    /// Складские транзакции.
    #[command(subcommand)]
    Transactions(TransactionCommand),
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Список категорий.
    List {
        /// Строка поиска.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = panel_core::DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Категория по идентификатору.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание категории.
    Create {
        #[arg(long)]
        nama: String,
        #[arg(long)]
        deskripsi: Option<String>,
    },
    /// Обновление категории.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        nama: String,
        #[arg(long)]
        deskripsi: Option<String>,
    },
    /// Удаление категории.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ProductCommand {
    /// Список товаров.
    List {
        /// Строка поиска.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = panel_core::DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Товар по идентификатору.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание товара.
    Create {
        #[arg(long)]
        kategori_id: i64,
        #[arg(long)]
        nama: String,
        #[arg(long)]
        deskripsi: Option<String>,
        #[arg(long, default_value_t = 0)]
        stok: i64,
        #[arg(long)]
        gambar: Option<String>,
    },
    /// Обновление товара.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        kategori_id: i64,
        #[arg(long)]
        nama: String,
        #[arg(long)]
        deskripsi: Option<String>,
        #[arg(long)]
        stok: i64,
        #[arg(long)]
        gambar: Option<String>,
    },
    /// Удаление товара.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum TransactionCommand {
    /// Список транзакций.
    List {
        /// Строка поиска.
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = panel_core::DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Проведение транзакции.
    Create {
        /// Тип: in (приход) или out (расход).
        #[arg(long)]
        jenis: String,
        #[arg(long)]
        catatan: Option<String>,
        /// Позиции в формате PRODUK_ID:JUMLAH; флаг можно повторять.
        #[arg(long = "produk", value_name = "ID:JUMLAH", required = true)]
        produk: Vec<String>,
    },
    /// Удаление транзакции.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

/// Уведомления мутаций печатаются в консоль сразу.
struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("Ошибка: {message}");
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let server = resolve_server(cli.server);

    let session = SessionStore::install(SessionStore::new(
        Box::new(FileSessionStorage::default()),
        None,
    ));
    session.set_expiry_hook(|| {
        eprintln!("Сессия истекла: выполните `panel-cli login ...` заново");
    });

    let client = PanelClient::new(server, session.clone());
    let console: Arc<dyn Notify> = Arc::new(ConsoleNotifier);
    // ошибки листинга показываются в самой таблице; канал уведомлений
    // для них уходит в лог, чтобы не печатать одно и то же дважды
    let quiet: Arc<dyn Notify> = Arc::new(TracingNotifier);

    match cli.command {
        Command::Login { email, password } => {
            let input = LoginInput { email, password };
            validate(&input)?;
            let payload = client.auth.login(&input).await.map_err(map_api_error)?;
            session
                .login(payload.user.clone(), payload.access_token)
                .map_err(|err| anyhow!("не удалось сохранить сессию: {err}"))?;
            println!("Вход выполнен");
            print_user(&payload.user);
        }
        Command::Register {
            nama_depan,
            nama_belakang,
            email,
            password,
            password_confirmation,
            tanggal_lahir,
            jenis_kelamin,
        } => {
            let input = RegisterInput {
                nama_depan,
                nama_belakang,
                email,
                password,
                password_confirmation,
                tanggal_lahir,
                jenis_kelamin: parse_gender(jenis_kelamin)?,
            };
            validate(&input)?;
            let payload = client.auth.register(&input).await.map_err(map_api_error)?;
            session
                .login(payload.user.clone(), payload.access_token)
                .map_err(|err| anyhow!("не удалось сохранить сессию: {err}"))?;
            println!("Регистрация успешна");
            print_user(&payload.user);
        }
        Command::Logout => {
            if let Err(err) = client.auth.logout().await {
                tracing::warn!(target: "panel::cli", "серверный logout не удался: {err}");
            }
            session
                .logout()
                .map_err(|err| anyhow!("не удалось очистить сессию: {err}"))?;
            println!("Выход выполнен");
        }
        Command::Profile => {
            let user = client.users.current_user().await.map_err(map_api_error)?;
            print_user(&user);
        }
        Command::UpdateProfile {
            nama_depan,
            nama_belakang,
            email,
            password,
            password_confirmation,
            tanggal_lahir,
            jenis_kelamin,
        } => {
            let input = UserUpdateInput {
                nama_depan,
                nama_belakang,
                email,
                password,
                password_confirmation,
                tanggal_lahir,
                jenis_kelamin: parse_gender(jenis_kelamin)?,
            };
            validate(&input)?;
            let current = client.users.current_user().await.map_err(map_api_error)?;
            let runner = MutationRunner::new(console.clone());
            let Ok(updated) = runner.run(client.users.update_user(current.id, &input)).await
            else {
                process::exit(1);
            };
            if let Err(err) = session.update_user(updated.clone()) {
                tracing::warn!(target: "panel::cli", "сессия не обновлена: {err}");
            }
            print_user(&updated);
        }
        Command::Categories(command) => match command {
            CategoryCommand::List {
                search,
                page,
                per_page,
            } => {
                show_list(
                    Arc::new(client.categories.clone()),
                    quiet.clone(),
                    &render::category_table(),
                    search,
                    page,
                    per_page,
                )
                .await;
            }
            CategoryCommand::Get { id } => {
                let category = client.categories.get(id).await.map_err(map_api_error)?;
                println!("id: {}", category.id);
                println!("название: {}", category.nama_kategori);
                if let Some(deskripsi) = &category.deskripsi_kategori {
                    println!("описание: {deskripsi}");
                }
                println!("создана: {}", format_date(&category.created_at));
            }
            CategoryCommand::Create { nama, deskripsi } => {
                let input = CategoryInput {
                    nama_kategori: nama,
                    deskripsi_kategori: deskripsi,
                };
                validate(&input)?;
                let runner = MutationRunner::new(console.clone());
                let Ok(category) = runner.run(client.categories.create(&input)).await else {
                    process::exit(1);
                };
                println!("id: {}", category.id);
            }
            CategoryCommand::Update {
                id,
                nama,
                deskripsi,
            } => {
                let input = CategoryInput {
                    nama_kategori: nama,
                    deskripsi_kategori: deskripsi,
                };
                validate(&input)?;
                let runner = MutationRunner::new(console.clone());
                if runner.run(client.categories.update(id, &input)).await.is_err() {
                    process::exit(1);
                }
            }
            CategoryCommand::Delete { id } => {
                let runner = MutationRunner::new(console.clone());
                if runner.run(client.categories.delete(id)).await.is_err() {
                    process::exit(1);
                }
            }
        },
        Command::Products(command) => match command {
            ProductCommand::List {
                search,
                page,
                per_page,
            } => {
                show_list(
                    Arc::new(client.products.clone()),
                    quiet.clone(),
                    &render::product_table(),
                    search,
                    page,
                    per_page,
                )
                .await;
            }
            ProductCommand::Get { id } => {
                let product = client.products.get(id).await.map_err(map_api_error)?;
                println!("id: {}", product.id);
                println!("название: {}", product.nama_produk);
                if let Some(kategori) = &product.kategori_produk {
                    println!("категория: {}", kategori.nama_kategori);
                }
                println!("остаток: {}", product.stok_produk);
                if let Some(url) = &product.gambar_produk_url {
                    println!("изображение: {url}");
                }
                println!("создан: {}", format_date(&product.created_at));
            }
            ProductCommand::Create {
                kategori_id,
                nama,
                deskripsi,
                stok,
                gambar,
            } => {
                let input = ProductInput {
                    kategori_produk_id: kategori_id,
                    nama_produk: nama,
                    deskripsi_produk: deskripsi,
                    stok_produk: stok,
                    gambar_produk: gambar,
                };
                validate(&input)?;
                let runner = MutationRunner::new(console.clone());
                let Ok(product) = runner.run(client.products.create(&input)).await else {
                    process::exit(1);
                };
                println!("id: {}", product.id);
            }
            ProductCommand::Update {
                id,
                kategori_id,
                nama,
                deskripsi,
                stok,
                gambar,
            } => {
                let input = ProductInput {
                    kategori_produk_id: kategori_id,
                    nama_produk: nama,
                    deskripsi_produk: deskripsi,
                    stok_produk: stok,
                    gambar_produk: gambar,
                };
                validate(&input)?;
                let runner = MutationRunner::new(console.clone());
                if runner.run(client.products.update(id, &input)).await.is_err() {
                    process::exit(1);
                }
            }
            ProductCommand::Delete { id } => {
                let runner = MutationRunner::new(console.clone());
                if runner.run(client.products.delete(id)).await.is_err() {
                    process::exit(1);
                }
            }
        },
        Command::Transactions(command) => match command {
            TransactionCommand::List {
                search,
                page,
                per_page,
            } => {
                show_list(
                    Arc::new(client.transactions.clone()),
                    quiet.clone(),
                    &render::transaction_table(),
                    search,
                    page,
                    per_page,
                )
                .await;
            }
            TransactionCommand::Create {
                jenis,
                catatan,
                produk,
            } => {
                let jenis_transaksi = TransactionKind::parse(&jenis)
                    .ok_or_else(|| anyhow!("--jenis: ожидается in или out"))?;
                let produk = produk
                    .iter()
                    .map(|raw| parse_transaction_item(raw))
                    .collect::<Result<Vec<_>>>()?;
                let input = TransactionInput {
                    jenis_transaksi,
                    catatan_transaksi: catatan,
                    produk,
                };
                validate(&input)?;
                let runner = MutationRunner::new(console.clone());
                let Ok(created) = runner.run(client.transactions.create(&input)).await else {
                    process::exit(1);
                };
                for transaction in created {
                    println!(
                        "id: {} ({}, позиций: {})",
                        transaction.id,
                        transaction.jenis_transaksi.label(),
                        transaction.detail_transaksis.len()
                    );
                }
            }
            TransactionCommand::Delete { id } => {
                let runner = MutationRunner::new(console.clone());
                if runner.run(client.transactions.delete(id)).await.is_err() {
                    process::exit(1);
                }
            }
        },
    }

    Ok(())
}

/// Загружает страницу через хук списка и печатает таблицу с пагинатором.
async fn show_list<T: Clone>(
    source: Arc<dyn ListSource<T>>,
    notifier: Arc<dyn Notify>,
    table: &DataTable<T>,
    search: Option<String>,
    page: u32,
    per_page: u32,
) {
    let filter = ListFilter {
        s: search,
        page: Some(page.max(1)),
        per_page: Some(per_page.clamp(1, MAX_PER_PAGE)),
    };
    let ui = TableUiState {
        search: filter.s.clone().unwrap_or_default(),
        ..TableUiState::default()
    };

    let store = ListStore::new(source, notifier, ListFilter::default());
    store.refetch(Some(filter), false).await;

    let state = store.state();
    render::print_table(table, &state, &ui);
    if state.error.is_none() {
        render::print_pager(&state.meta);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to init logging: {err}"))?;

    Ok(())
}

fn resolve_server(flag: Option<String>) -> String {
    let raw = flag
        .or_else(|| std::env::var("PANEL_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }
    format!("http://{server}")
}

fn validate(input: &impl Validate) -> Result<()> {
    input
        .validate()
        .context("входные данные не прошли проверку")?;
    Ok(())
}

fn parse_gender(raw: Option<String>) -> Result<Option<Gender>> {
    match raw {
        None => Ok(None),
        Some(raw) => Gender::parse(&raw)
            .map(Some)
            .ok_or_else(|| anyhow!("--jenis-kelamin: ожидается Laki-laki или Perempuan")),
    }
}

/// Разбирает позицию транзакции из строки `PRODUK_ID:JUMLAH`.
fn parse_transaction_item(raw: &str) -> Result<TransactionItemInput> {
    let (id, jumlah) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("--produk: ожидается формат ID:JUMLAH, получено «{raw}»"))?;
    Ok(TransactionItemInput {
        produk_id: id
            .trim()
            .parse()
            .with_context(|| format!("--produk: некорректный id в «{raw}»"))?,
        jumlah_produk: jumlah
            .trim()
            .parse()
            .with_context(|| format!("--produk: некорректное количество в «{raw}»"))?,
    })
}

fn map_api_error(err: ApiError) -> anyhow::Error {
    let message = match err {
        ApiError::Unauthorized => {
            "требуется авторизация: выполните `panel-cli login ...`".to_string()
        }
        ApiError::NotFound => "ресурс не найден".to_string(),
        ApiError::Validation { message, fields } => {
            let mut text = format!("данные отклонены сервером: {message}");
            for (field, errors) in fields {
                for error in errors {
                    text.push_str(&format!("\n  {field}: {error}"));
                }
            }
            text
        }
        ApiError::Api(message) => message,
        ApiError::Network(details) => format!("сеть недоступна: {details}"),
        ApiError::Decode(details) => format!("не удалось разобрать ответ сервера: {details}"),
    };
    anyhow!(message)
}

fn print_user(user: &User) {
    println!("id: {}", user.id);
    println!("имя: {}", user.full_name());
    println!("email: {}", user.email);
    if let Some(tanggal_lahir) = &user.tanggal_lahir {
        println!("дата рождения: {tanggal_lahir}");
    }
    if let Some(jenis_kelamin) = user.jenis_kelamin {
        println!("пол: {}", jenis_kelamin.as_str());
    }
    println!("создан: {}", format_date(&user.created_at));
}
