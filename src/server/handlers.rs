//! server::handlers
//!
//! One handler per route. Handlers parse the query options, call the
//! facade, and render the result; they hold no logic of their own.
//!
//! Extractors are taken as `Result` so that their rejections (a malformed
//! query, an oversized body) are rendered in the envelope too.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use super::response::{self, ApiError, Format, Outcome};
use crate::core::types::Section;
use crate::service::SiteService;

/// Query options shared by all routes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Options {
    /// Output format: json (default) or yaml
    f: Option<String>,
    /// Section selector: all (default), frontmatter/fm, body/md
    o: Option<String>,
}

impl Options {
    /// The requested format. An unknown value is reported in JSON.
    fn format(&self) -> Result<Format, ApiError> {
        Format::from_query(self.f.as_deref()).map_err(|e| ApiError::new(Format::Json, e))
    }

    fn section(&self, format: Format) -> Result<Section, ApiError> {
        Section::from_query(self.o.as_deref()).map_err(|e| ApiError::new(format, e))
    }
}

type QueryOptions = Result<Query<Options>, QueryRejection>;

/// Extractor rejections that carry their own status and message.
trait Rejection {
    fn status(&self) -> StatusCode;
    fn body_text(&self) -> String;
}

macro_rules! impl_rejection {
    ($($ty:ty),*) => {$(
        impl Rejection for $ty {
            fn status(&self) -> StatusCode {
                <$ty>::status(self)
            }

            fn body_text(&self) -> String {
                <$ty>::body_text(self)
            }
        }
    )*};
}

impl_rejection!(BytesRejection, PathRejection, QueryRejection);

fn accept<T, R: Rejection>(extracted: Result<T, R>, format: Format) -> Result<T, ApiError> {
    extracted.map_err(|r| ApiError::rejected(format, r.status(), r.body_text()))
}

/// Query options and the format they select. A query that does not parse
/// is reported in JSON.
fn options(query: QueryOptions) -> Result<(Options, Format), ApiError> {
    let Query(options) = accept(query, Format::Json)?;
    let format = options.format()?;
    Ok((options, format))
}

/// GET /sites/
pub(crate) async fn list_sites(
    State(service): State<SiteService>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (_, format) = options(query)?;
    Ok(response::success(format, &service.list_sites()))
}

/// GET /sites/{site}/status
pub(crate) async fn status(
    State(service): State<SiteService>,
    site: Result<Path<String>, PathRejection>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (_, format) = options(query)?;
    let Path(site) = accept(site, format)?;
    let report = service
        .status(&site)
        .await
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::success(format, &report))
}

/// PUT /sites/{site}/update
pub(crate) async fn update(
    State(service): State<SiteService>,
    site: Result<Path<String>, PathRejection>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (_, format) = options(query)?;
    let Path(site) = accept(site, format)?;
    let outcome = service
        .update(&site)
        .await
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::success(
        format,
        &Outcome {
            result: "pulled",
            detail: outcome,
        },
    ))
}

/// PUT /sites/{site}/publish
pub(crate) async fn publish(
    State(service): State<SiteService>,
    site: Result<Path<String>, PathRejection>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (_, format) = options(query)?;
    let Path(site) = accept(site, format)?;
    let report = service
        .publish(&site)
        .await
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::success(
        format,
        &Outcome {
            result: "published",
            detail: report,
        },
    ))
}

/// GET /sites/{site}/files and /sites/{site}/files/
pub(crate) async fn tree(
    State(service): State<SiteService>,
    site: Result<Path<String>, PathRejection>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (_, format) = options(query)?;
    let Path(site) = accept(site, format)?;
    let node = service
        .list_tree(&site)
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::success(format, &node))
}

/// GET /sites/{site}/files/{*path}
pub(crate) async fn read_file(
    State(service): State<SiteService>,
    target: Result<Path<(String, String)>, PathRejection>,
    query: QueryOptions,
) -> Result<Response, ApiError> {
    let (options, format) = options(query)?;
    let section = options.section(format)?;
    let Path((site, path)) = accept(target, format)?;
    let bytes = service
        .read_file(&site, &path, section)
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::raw(&path, bytes))
}

/// POST /sites/{site}/files/{*path}
pub(crate) async fn write_file(
    State(service): State<SiteService>,
    target: Result<Path<(String, String)>, PathRejection>,
    query: QueryOptions,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let (options, format) = options(query)?;
    let section = options.section(format)?;
    let Path((site, path)) = accept(target, format)?;
    let body = accept(body, format)?;
    let record = service
        .write_file(&site, &path, section, body.to_vec())
        .await
        .map_err(|e| ApiError::new(format, e))?;
    Ok(response::success(
        format,
        &Outcome {
            result: "saved",
            detail: record,
        },
    ))
}
