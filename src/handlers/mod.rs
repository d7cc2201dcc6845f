pub mod products;
pub mod warehouses;

use axum::{
    async_trait,
    body::{to_bytes, Body},
    extract::{FromRequest, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    db::{CrudRepository, Storage},
    error::AppResult,
    AppState,
};

/// Same cap axum applies to its own body extractors.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Request parameters. A urlencoded form body is merged with the query
/// string; any other request is read from the query string alone.
#[derive(Debug)]
pub struct Params<T>(pub T);

fn has_form_body(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<T, S> FromRequest<S> for Params<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_form_body(&req) {
            let Query(params) =
                Query::try_from_uri(req.uri()).map_err(IntoResponse::into_response)?;
            return Ok(Self(params));
        }

        let (mut parts, body) = req.into_parts();
        let body = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response())?;

        let mut merged = parts.uri.query().unwrap_or_default().as_bytes().to_vec();
        if !merged.is_empty() && !body.is_empty() {
            merged.push(b'&');
        }
        merged.extend_from_slice(&body);
        parts.headers.remove(header::CONTENT_LENGTH);

        let req = Request::from_parts(parts, Body::from(merged));
        let Form(params) = <Form<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(params))
    }
}

pub async fn health<S: Storage>(
    State(state): State<AppState<S>>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let products = state.db.products().count().await?;
    let warehouses = state.db.warehouses().count().await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "warehouse-service",
            "products": products,
            "warehouses": warehouses,
        })),
    ))
}


#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };

    use super::test_support::*;

    #[tokio::test]
    async fn health_reports_row_counts() {
        let app = app();
        post_form(
            &app,
            "/products/add",
            "name=Bolt&productCategory=Hardware&productQuantity=500&productUnit=pcs",
        )
        .await;

        let health = get_json(&app, "/health").await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["products"], 1);
        assert_eq!(health["warehouses"], 0);
    }

    #[tokio::test]
    async fn params_are_read_from_query_string() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/products/add?name=Nut&productCategory=Hardware&productQuantity=3&productUnit=pcs")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Product with the name Nut saved!");
    }

    #[tokio::test]
    async fn params_split_between_query_and_body_are_merged() {
        let app = app();
        let (status, body) = post_form(
            &app,
            "/products/add?name=Bolt",
            "productCategory=Hardware&productQuantity=500&productUnit=pcs",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Product with the name Bolt saved!");

        let product = get_json(&app, "/products/1").await;
        assert_eq!(product["productCategory"], "Hardware");
        assert_eq!(product["productQuantity"], 500);
    }

    #[tokio::test]
    async fn unrelated_query_keys_do_not_hide_the_body() {
        let app = app();
        let (status, body) = post_form(
            &app,
            "/warehouse/add?source=ui",
            "name=Central&address=1+Main+St&postalCode=1010&city=Vienna&country=Austria",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Warehouse with the name Central saved!");
    }

    #[tokio::test]
    async fn missing_params_are_client_errors() {
        let app = app();
        let (status, _) = post_form(&app, "/products/add", "name=Bolt").await;
        assert!(status.is_client_error(), "got {}", status);

        let (status, _) = post_form(
            &app,
            "/products/add",
            "name=Bolt&productCategory=Hardware&productQuantity=lots&productUnit=pcs",
        )
        .await;
        assert!(status.is_client_error(), "got {}", status);

        let health = get_json(&app, "/health").await;
        assert_eq!(health["products"], 0);
    }
}
