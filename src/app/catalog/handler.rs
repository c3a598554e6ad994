//! 商品处理器

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use tracing::info;

use super::{
    model::{parse_item_id, ItemDraft},
    store::ItemStore,
    view,
};
use crate::core::{
    error::CoreError,
    response::{redirect_home, PdfAttachment},
};
use crate::report::{self, REPORT_FILENAME};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }
}

pub async fn list_items(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let items = state
        .store
        .list_all()
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao buscar itens"))?;
    Ok(view::index(&items))
}

pub async fn show_create_form() -> Html<String> {
    view::create_form()
}

pub async fn create_item(
    State(state): State<AppState>,
    Form(draft): Form<ItemDraft>,
) -> Result<Redirect, CoreError> {
    let item = state
        .store
        .create(draft)
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao cadastrar item"))?;

    info!(id = item.id, "已创建商品");
    Ok(redirect_home())
}

pub async fn show_edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, CoreError> {
    let id = parse_item_id(&raw_id).ok_or_else(CoreError::not_found)?;

    let item = state
        .store
        .find_by_id(id)
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao buscar item"))?
        .ok_or_else(CoreError::not_found)?;

    Ok(view::edit_form(&item))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(draft): Form<ItemDraft>,
) -> Result<Redirect, CoreError> {
    let id = parse_item_id(&raw_id).ok_or_else(CoreError::not_found)?;

    state
        .store
        .update(id, draft)
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao atualizar item"))?;

    info!(id, "已更新商品");
    Ok(redirect_home())
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, CoreError> {
    let Some(id) = parse_item_id(&raw_id) else {
        return Ok(redirect_home());
    };

    let removed = state
        .store
        .delete(id)
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao deletar item"))?;

    info!(id, removed, "删除商品");
    Ok(redirect_home())
}

pub async fn download_report(State(state): State<AppState>) -> Result<PdfAttachment, CoreError> {
    let items = state
        .store
        .list_all()
        .await
        .map_err(|e| CoreError::from_store(e, "Erro ao gerar relatório"))?;

    let body = Body::from_stream(report::render(items));
    Ok(PdfAttachment::new(REPORT_FILENAME, body))
}
