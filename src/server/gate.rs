//! Front door of every protocol operation.
//!
//! Runs before each matched route: rejects anything but GET, parses the
//! query string, checks the `u`/`p` credentials and writes the access log
//! line. Operations then read the parsed parameters from the `ApiRequest`
//! extension.

use super::params::ApiRequest;
use super::reply::{internal_server_error, SubsonicReply};
use crate::subsonic::{ProtocolError, ResponseFormat};
use crate::user::{AuthError, AuthGate, Credentials};
use axum::{
    body::Body,
    extract::{ConnectInfo, OriginalUri, Query, State},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::{error, info, warn};

pub async fn subsonic_gate(
    State(auth_gate): State<AuthGate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response();
    }

    let params: Vec<(String, String)> = match Query::try_from_uri(request.uri()) {
        Ok(Query(params)) => params,
        Err(err) => {
            error!("Failed to parse query parameters: {}", err);
            return internal_server_error();
        }
    };
    let format = ResponseFormat::from_params(&params);

    let credentials = match Credentials::from_params(&params) {
        Some(credentials) => credentials,
        None => return SubsonicReply::error(format, ProtocolError::credentials_missing()).into_response(),
    };

    let username = credentials.username.clone();
    let verdict = tokio::task::spawn_blocking(move || auth_gate.verify(&credentials)).await;
    match verdict {
        Ok(Ok(())) => {}
        Ok(Err(AuthError::Lookup(err))) => {
            error!("Credential lookup failed for user '{}': {:#}", username, err);
            return SubsonicReply::error(format, ProtocolError::wrong_credentials()).into_response();
        }
        Ok(Err(err)) => {
            warn!("Auth failure for user '{}': {}", username, err);
            return SubsonicReply::error(format, ProtocolError::wrong_credentials()).into_response();
        }
        Err(err) => {
            error!("Credential check task failed: {}", err);
            return SubsonicReply::error(format, ProtocolError::internal()).into_response();
        }
    }

    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    info!("{} {} {} {}", remote, username, request.method(), path);

    request.extensions_mut().insert(ApiRequest {
        params,
        username,
        format,
    });
    next.run(request).await
}
