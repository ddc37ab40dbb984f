//! Fixed deployment parameters for the application created with every project.
//!
//! The template doubles as the body of Qovery's create-application request.
//! Fields left out of a YAML override keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read application template: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse application template: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationTemplate {
    pub name: String,
    pub git_repository: GitRepository,
    pub build_mode: String,
    pub dockerfile_path: String,
    /// Millicores.
    pub cpu: u32,
    /// MiB.
    pub memory: u32,
    pub ports: Vec<PortMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitRepository {
    pub url: String,
    pub branch: String,
    pub root_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMapping {
    pub internal_port: u16,
    pub external_port: u16,
    pub publicly_accessible: bool,
    pub protocol: String,
}

impl Default for ApplicationTemplate {
    fn default() -> Self {
        Self {
            name: "strapi".to_string(),
            git_repository: GitRepository::default(),
            build_mode: "DOCKER".to_string(),
            dockerfile_path: "Dockerfile".to_string(),
            cpu: 1000,
            memory: 2048,
            ports: vec![PortMapping::default()],
        }
    }
}

impl Default for GitRepository {
    fn default() -> Self {
        Self {
            url: "https://github.com/Qovery/strapi.git".to_string(),
            branch: "main".to_string(),
            root_path: "/".to_string(),
        }
    }
}

impl Default for PortMapping {
    fn default() -> Self {
        Self {
            internal_port: 1337,
            external_port: 443,
            publicly_accessible: true,
            protocol: "HTTP".to_string(),
        }
    }
}

impl ApplicationTemplate {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }
}
