//! One-shot listing endpoints: executions, products and projects.

use crate::client::ZentaoClient;
use crate::error::Result;
use crate::model::{decode_list, Execution, ListShape, Product, Project};

pub async fn list_executions(client: &ZentaoClient) -> Result<Vec<Execution>> {
    let value = client.get("list_executions", "/executions", &[]).await?;
    let (executions, _) =
        decode_list::<Execution>("list_executions", &value, "executions", ListShape::Lenient)?;
    Ok(executions)
}

/// Executions, optionally narrowed to those that are or belong to `project_id`.
pub async fn get_executions(
    client: &ZentaoClient,
    project_id: Option<u64>,
) -> Result<Vec<Execution>> {
    let executions = list_executions(client).await?;
    Ok(match project_id {
        Some(project_id) => executions
            .into_iter()
            .filter(|e| e.belongs_to_project(project_id))
            .collect(),
        None => executions,
    })
}

pub async fn get_products(client: &ZentaoClient) -> Result<Vec<Product>> {
    let value = client.get("get_products", "/products", &[]).await?;
    let (products, _) =
        decode_list::<Product>("get_products", &value, "products", ListShape::Strict)?;
    tracing::debug!(target: "zentao.http", stage = "products.out", products = products.len());
    Ok(products)
}

/// Uncached project listing; callers normally go through the project cache.
pub async fn fetch_projects(client: &ZentaoClient) -> Result<Vec<Project>> {
    let value = client.get("get_projects", "/projects", &[]).await?;
    let (projects, _) =
        decode_list::<Project>("get_projects", &value, "projects", ListShape::Strict)?;
    Ok(projects)
}
