use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Пол пользователя в том виде, в каком его хранит бэкенд.
pub enum Gender {
    /// Мужской.
    #[serde(rename = "Laki-laki")]
    Male,
    /// Женский.
    #[serde(rename = "Perempuan")]
    Female,
}

impl Gender {
    /// Значение на проводе (`Laki-laki` / `Perempuan`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Laki-laki",
            Self::Female => "Perempuan",
        }
    }

    /// Разбирает значение с провода.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Laki-laki" => Some(Self::Male),
            "Perempuan" => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Направление складской транзакции.
pub enum TransactionKind {
    /// Приход товара на склад.
    #[serde(rename = "in")]
    In,
    /// Расход товара со склада.
    #[serde(rename = "out")]
    Out,
}

impl TransactionKind {
    /// Подпись для интерфейса.
    pub fn label(&self) -> &'static str {
        match self {
            Self::In => "приход",
            Self::Out => "расход",
        }
    }

    /// Разбирает значение с провода (`in` / `out`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пользователь панели.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Имя.
    pub nama_depan: String,
    /// Фамилия.
    pub nama_belakang: String,
    /// Email.
    pub email: String,
    /// Дата рождения (строка `YYYY-MM-DD`, как присылает бэкенд).
    #[serde(default)]
    pub tanggal_lahir: Option<String>,
    /// Пол.
    #[serde(default)]
    pub jenis_kelamin: Option<Gender>,
    /// Создан (UTC).
    pub created_at: DateTime<Utc>,
    /// Обновлён (UTC).
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Полное имя для отображения.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nama_depan, self.nama_belakang)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Категория товаров.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Название категории.
    pub nama_kategori: String,
    /// Описание категории.
    #[serde(default)]
    pub deskripsi_kategori: Option<String>,
    /// Создана (UTC).
    pub created_at: DateTime<Utc>,
    /// Обновлена (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Краткая форма категории, вложенная в товар.
pub struct CategoryRef {
    /// Идентификатор категории.
    pub id: i64,
    /// Название категории.
    pub nama_kategori: String,
    /// Описание категории.
    #[serde(default)]
    pub deskripsi_kategori: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Товар на складе.
pub struct Product {
    /// Идентификатор товара.
    pub id: i64,
    /// Идентификатор категории.
    pub kategori_produk_id: i64,
    /// Название товара.
    pub nama_produk: String,
    /// Описание товара.
    #[serde(default)]
    pub deskripsi_produk: Option<String>,
    /// Путь к изображению на сервере.
    #[serde(default)]
    pub gambar_produk: Option<String>,
    /// Абсолютный URL изображения.
    #[serde(default)]
    pub gambar_produk_url: Option<String>,
    /// Остаток на складе.
    pub stok_produk: i64,
    /// Вложенная категория (в некоторых ответах опускается).
    #[serde(default)]
    pub kategori_produk: Option<CategoryRef>,
    /// Создан (UTC).
    pub created_at: DateTime<Utc>,
    /// Обновлён (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Строка транзакции: товар и количество.
pub struct TransactionDetail {
    /// Идентификатор строки.
    pub id: i64,
    /// Идентификатор транзакции.
    pub transaksi_id: i64,
    /// Идентификатор товара.
    pub produk_id: i64,
    /// Количество единиц товара.
    pub jumlah_produk: i64,
    /// Снимок товара на момент ответа.
    #[serde(default)]
    pub produk: Option<Product>,
    /// Создана (UTC).
    pub created_at: DateTime<Utc>,
    /// Обновлена (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Складская транзакция (приход или расход).
pub struct Transaction {
    /// Идентификатор транзакции.
    pub id: i64,
    /// Направление: приход или расход.
    pub jenis_transaksi: TransactionKind,
    /// Кто провёл транзакцию.
    pub user_id: i64,
    /// Примечание.
    #[serde(default)]
    pub catatan_transaksi: Option<String>,
    /// Автор транзакции, если бэкенд его приложил.
    #[serde(default)]
    pub user: Option<User>,
    /// Строки транзакции.
    #[serde(default)]
    pub detail_transaksis: Vec<TransactionDetail>,
    /// Создана (UTC).
    pub created_at: DateTime<Utc>,
    /// Обновлена (UTC).
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Суммарное количество единиц по всем строкам.
    pub fn total_items(&self) -> i64 {
        self.detail_transaksis
            .iter()
            .map(|detail| detail.jumlah_produk)
            .sum()
    }
}

#[derive(Debug, Clone)]
/// Результат успешного входа или регистрации.
pub struct AuthPayload {
    /// Bearer-токен для последующих запросов.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Данные входа.
pub struct LoginInput {
    /// Email пользователя.
    #[validate(email)]
    pub email: String,
    /// Пароль.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Данные регистрации.
pub struct RegisterInput {
    /// Имя.
    #[validate(length(min = 2, max = 255))]
    pub nama_depan: String,
    /// Фамилия.
    #[validate(length(min = 2, max = 255))]
    pub nama_belakang: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Пароль.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Подтверждение пароля; должно совпадать с паролем.
    #[validate(must_match(other = "password"))]
    pub password_confirmation: String,
    /// Дата рождения (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_lahir: Option<String>,
    /// Пол.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenis_kelamin: Option<Gender>,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Данные создания/обновления категории.
pub struct CategoryInput {
    /// Название категории.
    #[validate(length(min = 2))]
    pub nama_kategori: String,
    /// Описание категории.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deskripsi_kategori: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Данные создания/обновления товара.
pub struct ProductInput {
    /// Категория товара.
    #[validate(range(min = 1))]
    pub kategori_produk_id: i64,
    /// Название товара.
    #[validate(length(min = 2))]
    pub nama_produk: String,
    /// Описание товара.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deskripsi_produk: Option<String>,
    /// Остаток на складе; отрицательным быть не может.
    #[validate(range(min = 0))]
    pub stok_produk: i64,
    /// Путь или URL изображения.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gambar_produk: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Строка создаваемой транзакции.
pub struct TransactionItemInput {
    /// Идентификатор товара.
    #[validate(range(min = 1))]
    pub produk_id: i64,
    /// Количество; строго положительное.
    #[validate(range(min = 1))]
    pub jumlah_produk: i64,
}

#[derive(Debug, Clone, Serialize, Validate)]
/// Данные создаваемой транзакции.
pub struct TransactionInput {
    /// Направление транзакции.
    pub jenis_transaksi: TransactionKind,
    /// Примечание.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catatan_transaksi: Option<String>,
    /// Строки; минимум одна.
    #[validate(length(min = 1), nested)]
    pub produk: Vec<TransactionItemInput>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
/// Данные обновления профиля; все поля необязательные.
pub struct UserUpdateInput {
    /// Имя.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub nama_depan: Option<String>,
    /// Фамилия.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub nama_belakang: Option<String>,
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Новый пароль (минимум 8 символов).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    /// Подтверждение нового пароля.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(must_match(other = "password"))]
    pub password_confirmation: Option<String>,
    /// Дата рождения.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_lahir: Option<String>,
    /// Пол.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenis_kelamin: Option<Gender>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn category_input_rejects_short_name() {
        let input = CategoryInput {
            nama_kategori: "a".to_string(),
            deskripsi_kategori: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn category_input_accepts_valid_name() {
        let input = CategoryInput {
            nama_kategori: "Minuman".to_string(),
            deskripsi_kategori: Some("Kopi dan teh".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn product_input_rejects_negative_stock() {
        let input = ProductInput {
            kategori_produk_id: 1,
            nama_produk: "Kopi Arabika".to_string(),
            deskripsi_produk: None,
            stok_produk: -1,
            gambar_produk: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn product_input_requires_category() {
        let input = ProductInput {
            kategori_produk_id: 0,
            nama_produk: "Kopi Arabika".to_string(),
            deskripsi_produk: None,
            stok_produk: 10,
            gambar_produk: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn transaction_input_requires_items() {
        let input = TransactionInput {
            jenis_transaksi: TransactionKind::In,
            catatan_transaksi: None,
            produk: Vec::new(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn transaction_input_rejects_zero_quantity() {
        let input = TransactionInput {
            jenis_transaksi: TransactionKind::Out,
            catatan_transaksi: None,
            produk: vec![TransactionItemInput {
                produk_id: 1,
                jumlah_produk: 0,
            }],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn register_input_requires_matching_passwords() {
        let mut input = RegisterInput {
            nama_depan: "Budi".to_string(),
            nama_belakang: "Santoso".to_string(),
            email: "budi@example.com".to_string(),
            password: "secret123".to_string(),
            password_confirmation: "secret124".to_string(),
            tanggal_lahir: None,
            jenis_kelamin: Some(Gender::Male),
        };
        assert!(input.validate().is_err());

        input.password_confirmation = "secret123".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn user_update_password_needs_eight_chars() {
        let input = UserUpdateInput {
            password: Some("short".to_string()),
            password_confirmation: Some("short".to_string()),
            ..UserUpdateInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn transaction_kind_round_trips_wire_values() {
        assert_eq!(TransactionKind::parse("in"), Some(TransactionKind::In));
        assert_eq!(TransactionKind::parse("out"), Some(TransactionKind::Out));
        assert_eq!(TransactionKind::parse("sideways"), None);

        let raw = serde_json::to_string(&TransactionKind::In).expect("serialize");
        assert_eq!(raw, r#""in""#);
    }

    #[test]
    fn gender_parses_wire_values() {
        assert_eq!(Gender::parse("Laki-laki"), Some(Gender::Male));
        assert_eq!(Gender::parse("Perempuan"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn optional_input_keys_are_omitted() {
        let input = CategoryInput {
            nama_kategori: "Snack".to_string(),
            deskripsi_kategori: None,
        };
        let raw = serde_json::to_string(&input).expect("serialize");
        assert_eq!(raw, r#"{"nama_kategori":"Snack"}"#);
    }
}
