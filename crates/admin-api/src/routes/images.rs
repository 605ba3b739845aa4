//! 이미지 업로드 API 라우트
//!
//! - `POST /api/upload` - multipart `image` 필드 업로드 (`edit-images` 필요)
//! - `GET /api/uploads/{file}` - 업로드된 파일 (공개, 읽기 전용)

use std::path::Path;
use std::sync::Arc;

use admin_core::AdminError;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{Authorized, ImagesPage};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::storage::PendingUpload;

/// multipart 필드 이름.
pub const IMAGE_FIELD: &str = "image";

/// 업로드 요청 최대 크기 (바이트).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 업로드 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// 업로드된 파일의 공개 URL
    pub url: String,
}

/// 이미지 업로드.
///
/// `image` 필드가 여러 개면 모두 저장하고 마지막 파일의 URL을 반환합니다.
/// 파일 이름은 쓰기 전에 모두 검증하므로 하나라도 잘못되면 아무것도 저장하지 않습니다.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "images",
    request_body(content_type = "multipart/form-data", description = "`image` 파일 필드"),
    responses(
        (status = 200, description = "업로드 완료", body = UploadResponse),
        (status = 400, description = "image 필드 없음 또는 잘못된 파일 이름", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    )
)]
pub async fn upload_image(
    Authorized(actor, _): Authorized<ImagesPage>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::Validation(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AdminError::Validation(e.body_text()))?;

        uploads.push(PendingUpload::new(&file_name, bytes)?);
    }

    if uploads.is_empty() {
        return Err(AdminError::Validation("image field is required".to_string()).into());
    }

    let url = state
        .uploads
        .save_all(&uploads)
        .await?
        .pop()
        .ok_or_else(|| AdminError::Internal("no upload stored".to_string()))?;

    info!(actor = actor.user_id, %url, "Image uploaded");
    Ok(Json(UploadResponse { url }))
}

/// 이미지 라우터 생성 (`/api` 아래에 병합).
pub fn images_router(upload_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/upload",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
}
