use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;

use panel_core::{
    ApiError, ApiResult, AuthPayload, Category, CategoryInput, ListFilter, LoginInput, Mutated,
    Page, Product, ProductInput, RegisterInput, SessionStore, Transaction, TransactionInput,
    User, UserUpdateInput, parse_ack_body, parse_auth_body, parse_entity_body, parse_page_body,
};

const API_BASE_URL: &str = match option_env!("PANEL_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8000",
};

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn urlencode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

fn with_query(path: &str, filter: &ListFilter) -> String {
    let pairs = filter.query_pairs();
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

fn network_err(err: impl core::fmt::Display) -> ApiError {
    ApiError::Network(err.to_string())
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match SessionStore::global().token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

// общий хвост запроса: 401 сбрасывает сессию, остальное — в таксономию
async fn finish(response: Response) -> ApiResult<String> {
    let status = response.status();
    let body = response.text().await.map_err(network_err)?;
    if (200..300).contains(&status) {
        return Ok(body);
    }
    if status == 401 {
        SessionStore::global().handle_unauthorized();
    }
    Err(ApiError::from_status(status, &body))
}

async fn get(path: &str) -> ApiResult<String> {
    let response = authorized(Request::get(&endpoint(path)))
        .send()
        .await
        .map_err(network_err)?;
    finish(response).await
}

async fn post_json<B: Serialize>(path: &str, body: &B) -> ApiResult<String> {
    let response = authorized(Request::post(&endpoint(path)))
        .json(body)
        .map_err(network_err)?
        .send()
        .await
        .map_err(network_err)?;
    finish(response).await
}

async fn post_empty(path: &str) -> ApiResult<String> {
    let response = authorized(Request::post(&endpoint(path)))
        .send()
        .await
        .map_err(network_err)?;
    finish(response).await
}

async fn put_json<B: Serialize>(path: &str, body: &B) -> ApiResult<String> {
    let response = authorized(Request::put(&endpoint(path)))
        .json(body)
        .map_err(network_err)?
        .send()
        .await
        .map_err(network_err)?;
    finish(response).await
}

async fn delete(path: &str) -> ApiResult<String> {
    let response = authorized(Request::delete(&endpoint(path)))
        .send()
        .await
        .map_err(network_err)?;
    finish(response).await
}

pub(crate) async fn login(input: &LoginInput) -> ApiResult<AuthPayload> {
    parse_auth_body(&post_json("/api/auth/login", input).await?)
}

pub(crate) async fn register(input: &RegisterInput) -> ApiResult<AuthPayload> {
    parse_auth_body(&post_json("/api/auth/register", input).await?)
}

pub(crate) async fn logout() -> ApiResult<String> {
    parse_ack_body(&post_empty("/api/auth/logout").await?)
}

pub(crate) async fn current_user() -> ApiResult<User> {
    parse_entity_body(&get("/api/user").await?).map(|(user, _)| user)
}

pub(crate) async fn update_user(id: i64, input: &UserUpdateInput) -> ApiResult<Mutated<User>> {
    let body = put_json(&format!("/api/user/{id}"), input).await?;
    parse_entity_body(&body).map(|(user, message)| Mutated::new(user, message))
}

pub(crate) async fn list_categories(filter: &ListFilter) -> ApiResult<Page<Category>> {
    parse_page_body(&get(&with_query("/api/categories", filter)).await?)
}

pub(crate) async fn create_category(input: &CategoryInput) -> ApiResult<Mutated<Category>> {
    let body = post_json("/api/categories", input).await?;
    parse_entity_body(&body).map(|(category, message)| Mutated::new(category, message))
}

pub(crate) async fn update_category(
    id: i64,
    input: &CategoryInput,
) -> ApiResult<Mutated<Category>> {
    let body = put_json(&format!("/api/categories/{id}"), input).await?;
    parse_entity_body(&body).map(|(category, message)| Mutated::new(category, message))
}

pub(crate) async fn delete_category(id: i64) -> ApiResult<Mutated<()>> {
    let body = delete(&format!("/api/categories/{id}")).await?;
    parse_ack_body(&body).map(|message| Mutated::new((), message))
}

pub(crate) async fn list_products(filter: &ListFilter) -> ApiResult<Page<Product>> {
    parse_page_body(&get(&with_query("/api/products", filter)).await?)
}

pub(crate) async fn create_product(input: &ProductInput) -> ApiResult<Mutated<Product>> {
    let body = post_json("/api/products", input).await?;
    parse_entity_body(&body).map(|(product, message)| Mutated::new(product, message))
}

pub(crate) async fn update_product(id: i64, input: &ProductInput) -> ApiResult<Mutated<Product>> {
    let body = put_json(&format!("/api/products/{id}"), input).await?;
    parse_entity_body(&body).map(|(product, message)| Mutated::new(product, message))
}

pub(crate) async fn delete_product(id: i64) -> ApiResult<Mutated<()>> {
    let body = delete(&format!("/api/products/{id}")).await?;
    parse_ack_body(&body).map(|message| Mutated::new((), message))
}

pub(crate) async fn list_transactions(filter: &ListFilter) -> ApiResult<Page<Transaction>> {
    parse_page_body(&get(&with_query("/api/transactions", filter)).await?)
}

pub(crate) async fn create_transaction(
    input: &TransactionInput,
) -> ApiResult<Mutated<Vec<Transaction>>> {
    let body = post_json("/api/transactions", input).await?;
    parse_entity_body(&body).map(|(transactions, message)| Mutated::new(transactions, message))
}

pub(crate) async fn delete_transaction(id: i64) -> ApiResult<Mutated<()>> {
    let body = delete(&format!("/api/transactions/{id}")).await?;
    parse_ack_body(&body).map(|message| Mutated::new((), message))
}
