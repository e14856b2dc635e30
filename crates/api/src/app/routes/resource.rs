//! Generic HTTP handlers for resource endpoints.
//!
//! Each record type is bound to a base path and a key parameter through
//! [`HttpResource`]; the handlers below are instantiated once per type.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | `GET` | `{base}/all` | list |
//! | `POST` | `{base}/post?field=…` | create |
//! | `GET` | `{base}?{key}=…` | get |
//! | `PUT` | `{base}?{key}=…` + JSON body | replace (only if the access table exposes it) |
//!
//! Every route is also served under each of [`HttpResource::ALIASES`].
//!
//! Input decoding failures are reported as `400` only after the guard has
//! allowed the caller, so a denied caller always sees `403`.

use std::collections::HashMap;
use std::fmt::Display;

use axum::{
    Json, Router,
    extract::{
        Extension, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};

use campusdesk_auth::{Operation, RoleSet};
use campusdesk_core::Record;
use campusdesk_records::{HelpRequest, MenuItem, Organization, RecommendationRequest};

use crate::app::errors;
use crate::app::services::SharedEndpoint;
use crate::context::PrincipalContext;

/// HTTP binding of a record type.
pub trait HttpResource: Record<Draft: DeserializeOwned> + Serialize + DeserializeOwned {
    const BASE_PATH: &'static str;
    /// Additional base paths existing clients already call.
    const ALIASES: &'static [&'static str] = &[];
    /// Query parameter carrying the key on get/replace.
    const KEY_PARAM: &'static str;
}

impl HttpResource for HelpRequest {
    const BASE_PATH: &'static str = "/api/helprequest";
    const KEY_PARAM: &'static str = "id";
}

impl HttpResource for RecommendationRequest {
    const BASE_PATH: &'static str = "/api/recommendationrequests";
    const KEY_PARAM: &'static str = "id";
}

impl HttpResource for Organization {
    const BASE_PATH: &'static str = "/api/ucsborganizations";
    const KEY_PARAM: &'static str = "orgCode";
}

impl HttpResource for MenuItem {
    const BASE_PATH: &'static str = "/api/ucsbdiningcommonsmenuitem";
    const ALIASES: &'static [&'static str] = &["/api/ucsbdiningcommmonsmenuitem"];
    const KEY_PARAM: &'static str = "id";
}

pub fn router<R: HttpResource>(endpoint: SharedEndpoint<R>) -> Router {
    let keyed = if endpoint.access().exposes(Operation::Replace) {
        get(get_by_key::<R>).put(replace::<R>)
    } else {
        get(get_by_key::<R>)
    };

    std::iter::once(R::BASE_PATH)
        .chain(R::ALIASES.iter().copied())
        .fold(Router::new(), |router, base| {
            router
                .route(&format!("{base}/all"), get(list::<R>))
                .route(&format!("{base}/post"), post(create::<R>))
                .route(base, keyed.clone())
        })
        .layer(Extension(endpoint))
}

pub async fn list<R: HttpResource>(
    Extension(endpoint): Extension<SharedEndpoint<R>>,
    principal: Option<Extension<PrincipalContext>>,
) -> axum::response::Response {
    match endpoint.list(caller(&principal)).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::endpoint_error_to_response(e),
    }
}

pub async fn create<R: HttpResource>(
    Extension(endpoint): Extension<SharedEndpoint<R>>,
    principal: Option<Extension<PrincipalContext>>,
    draft: Result<Query<R::Draft>, QueryRejection>,
) -> axum::response::Response {
    let caller = caller(&principal);

    let draft = match decoded(&endpoint, caller, Operation::Create, draft.map(|Query(d)| d)) {
        Ok(d) => d,
        Err(res) => return res,
    };

    match endpoint.create(caller, draft).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::endpoint_error_to_response(e),
    }
}

pub async fn get_by_key<R: HttpResource>(
    Extension(endpoint): Extension<SharedEndpoint<R>>,
    principal: Option<Extension<PrincipalContext>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> axum::response::Response {
    let caller = caller(&principal);

    let key = match decoded(&endpoint, caller, Operation::Get, key_param::<R>(params)) {
        Ok(k) => k,
        Err(res) => return res,
    };

    match endpoint.get(caller, &key).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::endpoint_error_to_response(e),
    }
}

pub async fn replace<R: HttpResource>(
    Extension(endpoint): Extension<SharedEndpoint<R>>,
    principal: Option<Extension<PrincipalContext>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
    payload: Result<Json<R>, JsonRejection>,
) -> axum::response::Response {
    let caller = caller(&principal);

    let key = match decoded(&endpoint, caller, Operation::Replace, key_param::<R>(params)) {
        Ok(k) => k,
        Err(res) => return res,
    };
    let payload = match decoded(&endpoint, caller, Operation::Replace, payload.map(|Json(p)| p)) {
        Ok(p) => p,
        Err(res) => return res,
    };

    match endpoint.replace(caller, &key, payload).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::endpoint_error_to_response(e),
    }
}

fn caller(principal: &Option<Extension<PrincipalContext>>) -> Option<&RoleSet> {
    principal.as_ref().map(|Extension(p)| p.roles())
}

/// Unwrap decoded input; on failure answer `403` if the guard denies, else `400`.
fn decoded<R: HttpResource, T, E: Display>(
    endpoint: &SharedEndpoint<R>,
    caller: Option<&RoleSet>,
    operation: Operation,
    input: Result<T, E>,
) -> Result<T, axum::response::Response> {
    input.map_err(|e| match endpoint.authorize(caller, operation) {
        Err(denied) => errors::endpoint_error_to_response(denied),
        Ok(()) => errors::bad_request(e.to_string()),
    })
}

fn key_param<R: HttpResource>(
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<R::Key, String> {
    let Query(params) = params.map_err(|e| e.to_string())?;

    let raw = params
        .get(R::KEY_PARAM)
        .ok_or_else(|| format!("missing required parameter '{}'", R::KEY_PARAM))?;

    raw.parse::<R::Key>().map_err(|e| e.to_string())
}
