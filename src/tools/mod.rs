//! Named, self-describing operations that expose services to automation
//! clients.

pub mod dashboard;

use serde::Serialize;

/// Public description of a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}
