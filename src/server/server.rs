use anyhow::{Context, Result};
use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::content::ServedFile;
use super::gate::subsonic_gate;
use super::params::ApiRequest;
use super::reply::{protocol_error, SubsonicReply};
use super::state::{GuardedCatalogStore, ServerState};
use super::{log_requests, ServerConfig};
use crate::catalog_store::{CatalogError, CatalogResult, CatalogStore, SqliteCatalogStore};
use crate::config::TlsSettings;
use crate::subsonic::{Payload, ProtocolError};
use crate::user::{AuthGate, CredentialStore};

const API_PREFIX: &str = "/rest";
const FALLBACK_IMAGE_MIME: &str = "application/octet-stream";

/// Runs a blocking catalog call off the async workers.
async fn run_catalog<T, F>(catalog_store: GuardedCatalogStore, f: F) -> CatalogResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn CatalogStore) -> CatalogResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(catalog_store.as_ref()))
        .await
        .map_err(|err| CatalogError::Internal(anyhow::anyhow!("Catalog task failed: {}", err)))?
}

async fn ping(Extension(api): Extension<ApiRequest>) -> SubsonicReply {
    SubsonicReply::ok(api.format, Payload::Empty)
}

async fn get_artists(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> SubsonicReply {
    let result = run_catalog(catalog_store, |catalog| catalog.list_indexed_artists()).await;
    SubsonicReply::from_result(api.format, result.map(Payload::ArtistIndex))
}

async fn get_indexes(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> SubsonicReply {
    let result = run_catalog(catalog_store, |catalog| catalog.get_indexes()).await;
    SubsonicReply::from_result(api.format, result.map(Payload::Indexes))
}

async fn get_artist(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> SubsonicReply {
    let id = match api.id() {
        Ok(id) => id.to_string(),
        Err(err) => return SubsonicReply::error(api.format, err),
    };
    let result = run_catalog(catalog_store, move |catalog| catalog.get_artist(&id)).await;
    SubsonicReply::from_result(api.format, result.map(Payload::Artist))
}

async fn get_album(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> SubsonicReply {
    let id = match api.id() {
        Ok(id) => id.to_string(),
        Err(err) => return SubsonicReply::error(api.format, err),
    };
    let result = run_catalog(catalog_store, move |catalog| catalog.get_album(&id)).await;
    SubsonicReply::from_result(api.format, result.map(Payload::Album))
}

async fn get_song(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> SubsonicReply {
    let id = match api.id() {
        Ok(id) => id.to_string(),
        Err(err) => return SubsonicReply::error(api.format, err),
    };
    let result = run_catalog(catalog_store, move |catalog| catalog.get_song(&id)).await;
    SubsonicReply::from_result(api.format, result.map(Payload::Song))
}

async fn get_cover_art(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
) -> Response {
    let id = match api.id() {
        Ok(id) => id.to_string(),
        Err(err) => return SubsonicReply::error(api.format, err).into_response(),
    };
    match run_catalog(catalog_store, move |catalog| catalog.get_cover_art(&id)).await {
        Ok(Some(image)) => {
            let mime = infer::get(&image)
                .map(|kind| kind.mime_type())
                .unwrap_or(FALLBACK_IMAGE_MIME);
            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], image).into_response()
        }
        Ok(None) => {
            SubsonicReply::error(api.format, ProtocolError::not_found("not found")).into_response()
        }
        Err(err) => SubsonicReply::error(api.format, protocol_error(err)).into_response(),
    }
}

/// Serves the audio file of a song, for both `stream` and `download`.
async fn stream_song(
    State(catalog_store): State<GuardedCatalogStore>,
    Extension(api): Extension<ApiRequest>,
    headers: HeaderMap,
) -> Response {
    let id = match api.id() {
        Ok(id) => id.to_string(),
        Err(err) => return SubsonicReply::error(api.format, err).into_response(),
    };
    let song = match run_catalog(catalog_store, move |catalog| catalog.get_song(&id)).await {
        Ok(song) => song,
        Err(err) => return SubsonicReply::error(api.format, protocol_error(err)).into_response(),
    };
    if song.file_path.as_os_str().is_empty() {
        debug!("Song {} has no file", song.id);
        return SubsonicReply::error(api.format, ProtocolError::not_found("not found"))
            .into_response();
    }

    debug!("Streaming song {} from {}", song.id, song.file_path.display());
    match ServedFile::open(&song.file_path).await {
        Ok(file) => file.respond(&headers).await,
        Err(err) => {
            error!("Cannot open {}: {}", song.file_path.display(), err);
            SubsonicReply::error(api.format, ProtocolError::not_found("file not found"))
                .into_response()
        }
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    credential_store: Arc<dyn CredentialStore>,
) -> Router {
    let state = ServerState::new(catalog_store, AuthGate::new(credential_store));

    let api_routes: Router = Router::new()
        .route("/ping.view", get(ping))
        .route("/getArtists.view", get(get_artists))
        .route("/getArtist.view", get(get_artist))
        .route("/getAlbum.view", get(get_album))
        .route("/getSong.view", get(get_song))
        .route("/getCoverArt.view", get(get_cover_art))
        .route("/getIndexes.view", get(get_indexes))
        .route("/stream.view", get(stream_song))
        .route("/download.view", get(stream_song))
        .route_layer(middleware::from_fn_with_state(state.clone(), subsonic_gate))
        .with_state(state);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            config.requests_logging_level,
            log_requests,
        ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: SqliteCatalogStore,
    tls: Option<TlsSettings>,
) -> Result<()> {
    let store = Arc::new(catalog_store);
    let address = SocketAddr::new(config.bind_address, config.port);
    let app = make_app(config, store.clone(), store)
        .into_make_service_with_connect_info::<SocketAddr>();

    match tls {
        Some(tls) => {
            let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &tls.cert_path,
                &tls.key_path,
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to load TLS certificate {:?} and key {:?}",
                    tls.cert_path, tls.key_path
                )
            })?;

            let handle = axum_server::Handle::new();
            tokio::spawn({
                let handle = handle.clone();
                async move {
                    shutdown_signal().await;
                    handle.graceful_shutdown(Some(Duration::from_secs(10)));
                }
            });

            info!("Listening on https://{}", address);
            axum_server::bind_rustls(address, rustls_config)
                .handle(handle)
                .serve(app)
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(address)
                .await
                .with_context(|| format!("Failed to bind {}", address))?;
            info!("Listening on http://{}", address);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    info!("Server stopped");
    Ok(())
}
