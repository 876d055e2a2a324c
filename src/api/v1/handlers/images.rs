/*
 * Responsibility
 * - /images 系 CRUD handler
 * - /images/{id} は ownership route_layer を通過済み (所有者のみ到達する)
 * - 一覧/作成は Principal の sub を owner として扱う。sub がなければ 403
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::images::{CreateImageRequest, ImageResponse, UpdateImageRequest},
        extractors::PrincipalExtractor,
    },
    authz::{ImageId, Principal},
    error::AppError,
    repos::image_repo,
    state::AppState,
};

fn owner_of(principal: &Principal) -> Result<&str, AppError> {
    principal.subject().ok_or_else(|| {
        tracing::info!("request without subject claim denied");
        AppError::Forbidden
    })
}

pub async fn list_images(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let owner_id = owner_of(&principal)?;

    let rows = image_repo::list_by_owner(&state.db, owner_id).await?;

    Ok(Json(rows.into_iter().map(ImageResponse::from).collect()))
}

pub async fn create_image(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    Json(req): Json<CreateImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    let owner_id = owner_of(&principal)?;
    let bytes = req
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_IMAGE", msg))?;

    let image_id = ImageId::new_v4();
    let file_name = state.images.save(image_id, &bytes).await?;

    let row = match image_repo::create(&state.db, image_id, req.title.trim(), &file_name, owner_id)
        .await
    {
        Ok(row) => row,
        Err(err) => {
            if let Err(cleanup) = state.images.remove(&file_name).await {
                tracing::warn!(error = ?cleanup, %image_id, "orphaned image file");
            }
            return Err(err.into());
        }
    };

    tracing::info!(%image_id, "image created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> Result<Json<ImageResponse>, AppError> {
    let row = image_repo::get(&state.db, image_id)
        .await?
        .ok_or(AppError::not_found("image"))?;

    Ok(Json(row.into()))
}

pub async fn update_image(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
    Json(req): Json<UpdateImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_IMAGE", msg))?;

    let row = image_repo::update_title(&state.db, image_id, req.title.trim())
        .await?
        .ok_or(AppError::not_found("image"))?;

    Ok(Json(row.into()))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> Result<StatusCode, AppError> {
    let row = image_repo::delete(&state.db, image_id)
        .await?
        .ok_or(AppError::not_found("image"))?;

    // the row is gone; a leftover file is only logged
    if let Err(err) = state.images.remove(&row.file_name).await {
        tracing::warn!(error = ?err, %image_id, "failed to remove image file");
    }

    Ok(StatusCode::NO_CONTENT)
}
