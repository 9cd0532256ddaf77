//! 配置模块，负责字段命名空间表的加载
//!
//! 命名空间表是校验器和两个SQL方言共用的唯一事实来源：
//! `namespace -> 允许的属性名列表`，`"*"` 表示任意属性（tag命名空间）。
//! 进程启动时构造一次，之后只读。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 配置加载错误
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "配置错误: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

/// 字段命名空间表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// 命名空间到允许属性列表的映射
    #[serde(flatten)]
    pub namespaces: HashMap<String, Vec<String>>,
}

impl SchemaConfig {
    /// 从JSON文件加载命名空间表，
    /// 格式：`{"costs": ["provider", "service", ...], "tags": ["*"]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::new(format!(
                "配置文件不存在: {}",
                path_ref.display()
            )));
        }

        let content = fs::read_to_string(path_ref).map_err(|e| {
            ConfigError::new(format!("无法读取配置文件 {}: {}", path_ref.display(), e))
        })?;

        let namespaces: HashMap<String, Vec<String>> =
            serde_json::from_str(&content).map_err(|e| {
                ConfigError::new(format!(
                    "无法解析JSON配置文件 {}: {}",
                    path_ref.display(),
                    e
                ))
            })?;

        Ok(SchemaConfig { namespaces })
    }

    /// 命名空间是否存在
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// 属性在给定命名空间下是否允许；`"*"` 通配所有属性
    pub fn allows_attribute(&self, namespace: &str, attribute: &str) -> bool {
        match self.namespaces.get(namespace) {
            Some(attrs) => {
                attrs.iter().any(|a| a == "*") || attrs.iter().any(|a| a == attribute)
            }
            None => false,
        }
    }

    /// 获取所有命名空间映射
    pub fn get_namespaces(&self) -> &HashMap<String, Vec<String>> {
        &self.namespaces
    }
}

impl Default for SchemaConfig {
    /// 内置的默认命名空间表
    fn default() -> Self {
        fn attrs(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        let mut namespaces = HashMap::new();
        namespaces.insert(
            "costs".to_string(),
            attrs(&[
                "provider", "service", "region", "account_id", "category",
                "subcategory", "resource_id", "amount", "currency", "date",
                "tag", "charge_type",
            ]),
        );
        namespaces.insert(
            "resources".to_string(),
            attrs(&[
                "provider", "service", "region", "account_id", "resource_id",
                "name", "type", "state", "tag",
            ]),
        );
        namespaces.insert(
            "financial_commitments".to_string(),
            attrs(&[
                "provider", "commitment_id", "commitment_type", "service",
                "region", "account_id", "amount", "utilization",
            ]),
        );
        namespaces.insert("tags".to_string(), attrs(&["*"]));
        namespaces.insert(
            "network_flows".to_string(),
            attrs(&[
                "source_region", "destination_region", "source_vpc",
                "destination_vpc", "service", "amount",
            ]),
        );

        Self { namespaces }
    }
}
