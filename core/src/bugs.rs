use reqwest::Method;
use serde_json::Value;

use crate::catalog::get_products;
use crate::client::{RequestBody, ZentaoClient};
use crate::error::{Result, ZentaoError};
use crate::model::{decode_list, to_fields, Bug, BugResolution, BugStatus, ListShape};
use crate::tasks::now_iso;

/// Bugs assigned to the session account within one product.
///
/// Without a product id the first product the account can see is used.
pub async fn get_my_bugs(
    client: &ZentaoClient,
    status: BugStatus,
    product_id: Option<u64>,
) -> Result<Vec<Bug>> {
    let product_id = match product_id {
        Some(id) => id,
        None => {
            let products = get_products(client).await?;
            let first = products.first().ok_or_else(|| {
                ZentaoError::Validation("no products available; pass a product id".to_string())
            })?;
            tracing::debug!(
                target: "zentao.http",
                stage = "bugs.default_product",
                product_id = first.id
            );
            first.id
        }
    };

    let query = [
        ("assignedTo", client.username().to_string()),
        ("status", status.as_str().to_string()),
        ("product", product_id.to_string()),
    ];
    let value = match client.get("get_my_bugs", "/bugs", &query).await {
        Ok(value) => value,
        Err(ZentaoError::Request(err)) if err.message().contains("Need product id") => {
            return Err(ZentaoError::Validation(
                "listing bugs requires a product id".to_string(),
            ));
        }
        Err(err) => return Err(err),
    };
    let (bugs, _) = decode_list::<Bug>("get_my_bugs", &value, "bugs", ListShape::Strict)?;
    Ok(bugs)
}

/// Fetches one bug; deployments answer either `{bug: {..}}` or the bare object.
pub async fn get_bug_detail(client: &ZentaoClient, bug_id: u64) -> Result<Bug> {
    let path = format!("/bugs/{}", bug_id);
    let value = client.get("get_bug_detail", &path, &[]).await?;
    let candidate = match &value {
        Value::Object(map) => match map.get("bug") {
            Some(bug @ Value::Object(_)) => Some(bug.clone()),
            _ if map.get("id").is_some_and(Value::is_number) => Some(value.clone()),
            _ => None,
        },
        _ => None,
    };
    candidate
        .and_then(|v| serde_json::from_value::<Bug>(v).ok())
        .ok_or_else(|| {
            ZentaoError::response_shape(format!("get_bug_detail bug={bug_id}"), &value)
        })
}

/// Marks a bug resolved by the session account.
pub async fn resolve_bug(
    client: &ZentaoClient,
    bug_id: u64,
    resolution: &BugResolution,
) -> Result<Value> {
    let mut body = serde_json::Map::new();
    body.insert("status".to_string(), Value::String("resolved".to_string()));
    body.insert("assignedTo".to_string(), Value::String(client.username().to_string()));
    body.extend(to_fields("bug resolution", resolution)?);
    body.insert("resolvedDate".to_string(), Value::String(now_iso()));

    let path = format!("/bugs/{}", bug_id);
    client
        .send("resolve_bug", Method::PUT, &path, &[], RequestBody::Json(Value::Object(body)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{client_for, mock_token};
    use crate::model::Resolution;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn defaults_to_first_product() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _p = server
            .mock("GET", "/api.php/v1/products")
            .with_status(200)
            .with_body(r#"{"products":[{"id":3,"name":"App"},{"id":4,"name":"Web"}]}"#)
            .create_async()
            .await;
        let m = server
            .mock("GET", "/api.php/v1/bugs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("assignedTo".into(), "alice".into()),
                Matcher::UrlEncoded("status".into(), "active".into()),
                Matcher::UrlEncoded("product".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"bugs":[{"id":11,"title":"Crash","status":"active"}]}"#)
            .create_async()
            .await;

        let bugs = get_my_bugs(&client_for(&server), BugStatus::Active, None).await.unwrap();
        assert_eq!(bugs[0].title, "Crash");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn no_products_is_validation_error() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _p = server
            .mock("GET", "/api.php/v1/products")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let err = get_my_bugs(&client_for(&server), BugStatus::All, None).await.unwrap_err();
        assert!(matches!(err, ZentaoError::Validation(_)));
    }

    #[tokio::test]
    async fn bug_detail_accepts_both_shapes() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let _a = server
            .mock("GET", "/api.php/v1/bugs/1")
            .with_status(200)
            .with_body(r#"{"bug":{"id":1,"title":"wrapped"}}"#)
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/api.php/v1/bugs/2")
            .with_status(200)
            .with_body(r#"{"id":2,"title":"bare"}"#)
            .create_async()
            .await;
        let _c = server
            .mock("GET", "/api.php/v1/bugs/3")
            .with_status(200)
            .with_body(r#"{"id":"3","title":"string id"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(get_bug_detail(&client, 1).await.unwrap().title, "wrapped");
        assert_eq!(get_bug_detail(&client, 2).await.unwrap().title, "bare");
        assert!(matches!(
            get_bug_detail(&client, 3).await.unwrap_err(),
            ZentaoError::ResponseShape { .. }
        ));
    }

    #[tokio::test]
    async fn resolve_sends_resolution_fields() {
        let mut server = Server::new_async().await;
        let _t = mock_token(&mut server).await;
        let m = server
            .mock("PUT", "/api.php/v1/bugs/8")
            .match_body(Matcher::PartialJson(json!({
                "status": "resolved",
                "assignedTo": "alice",
                "resolution": "fixed",
                "resolvedBuild": "trunk"
            })))
            .with_status(200)
            .with_body(r#"{"id":8,"status":"resolved"}"#)
            .create_async()
            .await;

        let resolution = BugResolution {
            resolution: Resolution::Fixed,
            resolved_build: Some("trunk".to_string()),
            duplicate_bug: None,
            comment: None,
        };
        resolve_bug(&client_for(&server), 8, &resolution).await.unwrap();
        m.assert_async().await;
    }
}
