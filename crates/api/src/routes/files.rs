//! Direct file routes against the session's drive.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use cloudsync_core::drive::path::validate_file_name;
use cloudsync_core::drive::{DriveClient, DriveProvider, DriveResolver};
use cloudsync_shared::AppError;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::AuthSession;

/// Creates the file router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync/upload", post(upload_file))
        .route("/sync/download", get(download_file))
        .route("/sync/list", get(list_files))
        .route("/sync/files/{file_id}", get(file_metadata))
        .route("/sync/delete/{file_id}", delete(delete_file))
        .route("/sync/folder/upload", post(upload_to_folder))
        .route("/sync/folder/list", get(list_folder))
}

/// Request body for a root upload.
#[derive(Debug, Deserialize)]
struct UploadRequest {
    filename: String,
    #[serde(default)]
    content: String,
}

/// Query for downloads; one of the two is required.
#[derive(Debug, Default, Deserialize)]
struct DownloadQuery {
    file_id: Option<String>,
    filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    query: Option<String>,
    page_size: Option<u32>,
}

/// Request body for an upload into a folder path.
#[derive(Debug, Deserialize)]
struct FolderUploadRequest {
    folder_path: String,
    filename: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct FolderListQuery {
    folder_path: String,
    page_size: Option<u32>,
}

fn drive(state: &AppState, auth: &AuthSession) -> ApiResult<DriveClient> {
    state
        .drives
        .connect(auth.provider(), auth.access_token())
        .ok_or_else(|| AppError::UnsupportedProvider(auth.provider().to_string()).into())
}

fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")).into());
    }
    Ok(())
}

/// POST `/sync/upload` - Upload a file to the drive root.
async fn upload_file(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    require(&payload.filename, "filename")?;
    let client = drive(&state, &auth)?;

    let file = client
        .upload(&payload.filename, &payload.content)
        .await
        .map_err(|e| {
            error!(owner_id = auth.owner_id(), file = %payload.filename, error = %e, "upload failed");
            e
        })?;

    info!(owner_id = auth.owner_id(), file_id = %file.id, "file uploaded");
    Ok(Json(json!({ "success": true, "file": file })))
}

/// GET `/sync/download` - Download a file by ID or by name.
async fn download_file(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<impl IntoResponse> {
    let file_id = query.file_id.filter(|v| !v.trim().is_empty());
    let filename = query.filename.filter(|v| !v.trim().is_empty());

    let content = match (file_id, filename) {
        (Some(id), _) => drive(&state, &auth)?.download(&id).await?,
        (None, Some(name)) => drive(&state, &auth)?.download_by_name(&name).await?,
        (None, None) => {
            return Err(AppError::Validation("file_id or filename is required".to_string()).into());
        }
    };

    Ok(Json(json!({ "success": true, "content": content })))
}

/// GET `/sync/list` - List recent files, optionally filtered by name.
async fn list_files(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let client = drive(&state, &auth)?;
    let page_size = query.page_size.unwrap_or(state.listing.list_page_size);

    let files = client.list(query.query.as_deref(), Some(page_size)).await?;

    Ok(Json(json!({ "success": true, "files": files })))
}

/// GET `/sync/files/{file_id}` - Fetch file metadata.
async fn file_metadata(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(file_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let client = drive(&state, &auth)?;
    let file = client.metadata(&file_id).await?;

    Ok(Json(json!({ "success": true, "file": file })))
}

/// DELETE `/sync/delete/{file_id}` - Delete a file.
async fn delete_file(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(file_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let client = drive(&state, &auth)?;
    client.delete(&file_id).await?;

    info!(owner_id = auth.owner_id(), file_id = %file_id, "file deleted");
    Ok(Json(json!({
        "success": true,
        "message": format!("File {file_id} deleted")
    })))
}

/// POST `/sync/folder/upload` - Upload a file into a folder path, creating it if needed.
async fn upload_to_folder(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(payload): Json<FolderUploadRequest>,
) -> ApiResult<impl IntoResponse> {
    // Resolving may create the folder, so the name is checked first.
    validate_file_name(&payload.filename)?;
    let client = drive(&state, &auth)?;

    let folder = client.resolve_or_create_folder(&payload.folder_path).await?;
    let file = client
        .upload_into_folder(&folder.id, &payload.filename, &payload.content)
        .await?;

    info!(
        owner_id = auth.owner_id(),
        folder_id = %folder.id,
        file_id = %file.id,
        "file uploaded to folder"
    );
    Ok(Json(json!({ "success": true, "folder": folder, "file": file })))
}

/// GET `/sync/folder/list` - List the files in a folder path.
async fn list_folder(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(query): Query<FolderListQuery>,
) -> ApiResult<impl IntoResponse> {
    let client = drive(&state, &auth)?;
    let page_size = query.page_size.unwrap_or(state.listing.folder_page_size);

    let folder = client.resolve_or_create_folder(&query.folder_path).await?;
    let files = client.list_in_folder(&folder.id, Some(page_size)).await?;

    Ok(Json(json!({ "success": true, "folder": folder, "files": files })))
}
