//! Design sources: where the design tree of a run comes from.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::DccError;
use crate::figma::{to_design_node, FigmaClient, FigmaFile, FigmaNodeData, FigmaNodesResponse};
use crate::resource::FigmaInfo;
use crate::types::DesignNode;
use crate::Result;

/// Produces the design tree for one analysis run.
#[async_trait]
pub trait DesignSource: Send + Sync {
    async fn fetch(&self) -> Result<DesignNode>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Design tree stored as JSON on disk.
///
/// Accepts a bare Figma node, a files-endpoint response (`{"document": ...}`)
/// or a nodes-endpoint response (`{"nodes": {"<id>": {"document": ...}}}`).
#[derive(Debug, Clone)]
pub struct FileDesignSource {
    pub path: PathBuf,
    pub node_id: Option<String>,
}

impl FileDesignSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            node_id: None,
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }
}

#[async_trait]
impl DesignSource for FileDesignSource {
    async fn fetch(&self) -> Result<DesignNode> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DccError::Config(format!(
                    "Design file not found: {}",
                    self.path.display()
                ))
            } else {
                DccError::Io(e)
            }
        })?;
        let value: Value = serde_json::from_str(&raw)?;
        let node = parse_design_document(value, self.node_id.as_deref())?;
        let design = to_design_node(&node);
        debug!(
            path = %self.path.display(),
            nodes = design.node_count(),
            "loaded design file"
        );
        Ok(design)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Design tree fetched live from the Figma REST API.
#[derive(Debug, Clone)]
pub struct FigmaDesignSource {
    client: FigmaClient,
    target: FigmaInfo,
}

impl FigmaDesignSource {
    pub fn new(client: FigmaClient, target: FigmaInfo) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl DesignSource for FigmaDesignSource {
    async fn fetch(&self) -> Result<DesignNode> {
        let file_key = &self.target.file_key;
        info!(file_key = %file_key, node_id = ?self.target.node_id, "fetching design from Figma");
        let node = match &self.target.node_id {
            Some(node_id) => {
                let mut response = self
                    .client
                    .fetch_nodes(file_key, std::slice::from_ref(node_id))
                    .await?;
                response
                    .nodes
                    .remove(node_id)
                    .map(|wrapper| wrapper.document)
                    .ok_or_else(|| {
                        DccError::figma_api(
                            None,
                            format!("Node {} not found in Figma response", node_id),
                        )
                    })?
            }
            None => self.client.fetch_file(file_key).await?.document,
        };
        Ok(to_design_node(&node))
    }

    fn describe(&self) -> String {
        match &self.target.node_id {
            Some(node_id) => format!("figma:{}#{}", self.target.file_key, node_id),
            None => format!("figma:{}", self.target.file_key),
        }
    }
}

/// Extracts the root node from any of the supported design document shapes.
pub fn parse_design_document(value: Value, node_id: Option<&str>) -> Result<FigmaNodeData> {
    if value.get("nodes").is_some() {
        let mut response: FigmaNodesResponse = serde_json::from_value(value)?;
        let wrapper = match node_id {
            Some(id) => response.nodes.remove(id).ok_or_else(|| {
                DccError::data_shape(format!("design document node {}", id), "node not present")
            })?,
            None => {
                let first = response.nodes.keys().next().cloned().ok_or_else(|| {
                    DccError::data_shape("design document", "nodes response is empty")
                })?;
                response
                    .nodes
                    .remove(&first)
                    .ok_or_else(|| DccError::data_shape("design document", "nodes response is empty"))?
            }
        };
        return Ok(wrapper.document);
    }

    let root = if value.get("document").is_some() {
        let file: FigmaFile = serde_json::from_value(value)?;
        file.document
    } else {
        serde_json::from_value(value)?
    };

    match node_id {
        Some(id) => find_node(root, id).ok_or_else(|| {
            DccError::data_shape(format!("design document node {}", id), "node not present")
        }),
        None => Ok(root),
    }
}

fn find_node(root: FigmaNodeData, id: &str) -> Option<FigmaNodeData> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.id == id {
            return Some(node);
        }
        stack.extend(node.children);
    }
    None
}
