//! PDF and image API handlers
//!
//! Resolves the request directory under the PDF or image root and delegates
//! to the file service. Binary responses are streamed straight from the
//! service; listings and counts are returned as JSON.

use crate::api::utils::{attachment, content_type_for, parse_page_number, require_filename};
use crate::error::{AppError, ErrorResponse};
use crate::services::paths::resolve_directory;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

/// Query for `GET /pdf`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PdfPageQuery {
    /// PDF file name inside the resolved directory
    #[param(value_type = String, required = true)]
    pub filename: Option<String>,
    /// Page to rasterize (1-based)
    // Kept raw so malformed input is reported as a validation error
    #[param(value_type = u32, required = true)]
    pub pagenumber: Option<String>,
    /// Optional subdirectory below the PDF root
    pub directoryname: Option<String>,
}

/// Query for `GET /pdf/list` and `GET /pdf/listdir`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryQuery {
    /// Optional subdirectory below the PDF root
    pub directoryname: Option<String>,
}

/// Query for `GET /pdf/numpages`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PdfFileQuery {
    /// PDF file name inside the resolved directory
    #[param(value_type = String, required = true)]
    pub filename: Option<String>,
    /// Optional subdirectory below the PDF root
    pub directoryname: Option<String>,
}

/// Query for `GET /image`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageQuery {
    /// Image file name inside the image root
    #[param(value_type = String, required = true)]
    pub filename: Option<String>,
}

/// GET /pdf - Stream one PDF page rasterized to PNG
#[utoipa::path(
    get,
    path = "/api/v1/utility/pdf",
    tag = "UTILITIES",
    params(PdfPageQuery),
    responses(
        (status = 200, description = "A streamed converted png image", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Missing or malformed query parameter", body = ErrorResponse),
        (status = 404, description = "PDF or page not found", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse),
    )
)]
pub async fn get_pdf_page(
    State(state): State<AppState>,
    Query(params): Query<PdfPageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filename = require_filename(params.filename.as_deref())?;
    let page = parse_page_number(params.pagenumber.as_deref())?;
    let dir = resolve_directory(&state.resources.pdf_root, params.directoryname.as_deref())?;

    debug!(dir = %dir.display(), filename, page, "Converting PDF page");
    let stream = state.files.convert_pdf_page(&dir, filename, page).await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (
                header::CONTENT_DISPOSITION,
                attachment(&format!("out-{}.png", page))?,
            ),
        ],
        Body::from_stream(stream),
    ))
}

/// GET /pdf/list - List the files in the PDF directory
#[utoipa::path(
    get,
    path = "/api/v1/utility/pdf/list",
    tag = "UTILITIES",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "An array of all the filenames within the pdfs folder", body = Vec<String>),
        (status = 400, description = "Invalid directory name", body = ErrorResponse),
        (status = 404, description = "Directory not found", body = ErrorResponse),
    )
)]
pub async fn list_pdf_files(
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let dir = resolve_directory(&state.resources.pdf_root, params.directoryname.as_deref())?;
    let files = state.files.list_filenames(&dir).await?;
    Ok(Json(files))
}

/// GET /pdf/listdir - List the subdirectories of the PDF directory
#[utoipa::path(
    get,
    path = "/api/v1/utility/pdf/listdir",
    tag = "UTILITIES",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "An array of all the directories within the pdfs folder", body = Vec<String>),
        (status = 400, description = "Invalid directory name", body = ErrorResponse),
        (status = 404, description = "Directory not found", body = ErrorResponse),
    )
)]
pub async fn list_pdf_directories(
    State(state): State<AppState>,
    Query(params): Query<DirectoryQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let dir = resolve_directory(&state.resources.pdf_root, params.directoryname.as_deref())?;
    let directories = state.files.list_directories(&dir).await?;
    Ok(Json(directories))
}

/// GET /pdf/numpages - Number of pages in a PDF
#[utoipa::path(
    get,
    path = "/api/v1/utility/pdf/numpages",
    tag = "UTILITIES",
    params(PdfFileQuery),
    responses(
        (status = 200, description = "Returns the number of pages in the pdf", body = u32),
        (status = 400, description = "Missing or invalid query parameter", body = ErrorResponse),
        (status = 404, description = "PDF not found", body = ErrorResponse),
    )
)]
pub async fn get_pdf_page_count(
    State(state): State<AppState>,
    Query(params): Query<PdfFileQuery>,
) -> Result<Json<u32>, AppError> {
    let filename = require_filename(params.filename.as_deref())?;
    let dir = resolve_directory(&state.resources.pdf_root, params.directoryname.as_deref())?;
    let pages = state.files.count_pages(&dir, filename).await?;
    Ok(Json(pages))
}

/// GET /image - Stream an image from the image root
#[utoipa::path(
    get,
    path = "/api/v1/utility/image",
    tag = "UTILITIES",
    params(ImageQuery),
    responses(
        (status = 200, description = "A streamed image", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 400, description = "Missing or invalid filename", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filename = require_filename(params.filename.as_deref())?;
    let disposition = attachment(filename)?;
    let content_type = content_type_for(filename)?;

    let stream = state
        .files
        .open_file_stream(&state.resources.image_root, filename)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    ))
}

/// GET /image/list - List the files in the image root
#[utoipa::path(
    get,
    path = "/api/v1/utility/image/list",
    tag = "UTILITIES",
    responses(
        (status = 200, description = "An array of all the filenames within the images folder", body = Vec<String>),
        (status = 404, description = "Image folder not found", body = ErrorResponse),
    )
)]
pub async fn list_image_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let files = state.files.list_filenames(&state.resources.image_root).await?;
    Ok(Json(files))
}
