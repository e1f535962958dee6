//! Core types for Azure Resource Manager operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A Cognitive Services account held in the soft-deleted state.
///
/// Soft-deleted accounts keep their name reserved until purged, which is
/// why a redeploy under the same name must purge them first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftDeletedAccount {
    /// Account name (e.g. "content-understanding-abc123")
    pub name: String,
    /// Azure location the account lived in
    pub location: String,
    /// Account kind (e.g. "AIServices")
    #[serde(default)]
    pub kind: String,
    /// Full ARM id of the deleted-account record
    #[serde(default)]
    pub id: String,
}

/// A live resource inside a resource group, as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureResource {
    /// Full ARM resource id
    pub id: String,
    /// Resource name
    pub name: String,
    /// Resource type (e.g. "Microsoft.Storage/storageAccounts")
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Azure location
    #[serde(default)]
    pub location: String,
}

/// Deployment apply strategy.
///
/// Only incremental mode is offered: resources declared in the template are
/// created or updated, resources the template does not mention are left
/// alone. Reconciliation of leftovers is the deployer's job, not the
/// template engine's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentMode {
    /// Add/update declared resources, never remove undeclared ones
    #[default]
    Incremental,
}

impl DeploymentMode {
    /// The value the provider CLI expects for `--mode`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Incremental => "Incremental",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deployment record as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment name (unique within its resource group)
    #[serde(default)]
    pub name: String,
    /// Nested deployment properties
    #[serde(default)]
    pub properties: DeploymentProperties,
}

impl Deployment {
    /// Provisioning state reported by the provider ("Succeeded", "Failed", ...).
    pub fn provisioning_state(&self) -> &str {
        &self.properties.provisioning_state
    }
}

/// Properties block of a deployment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProperties {
    /// Provider-side provisioning state
    #[serde(default)]
    pub provisioning_state: String,
    /// Absolute timestamp of the last state change, if reported
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A single declared output of a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    /// Declared output type ("String", "Int", ...)
    #[serde(rename = "type", default)]
    pub value_type: String,
    /// The output value itself
    #[serde(default)]
    pub value: serde_json::Value,
}

/// The declared outputs of a deployment, keyed by output name.
///
/// Ordered map so reports print outputs deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentOutputs(pub BTreeMap<String, OutputValue>);

impl DeploymentOutputs {
    /// An empty output map.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the deployment declared no outputs (or none were retrieved).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared outputs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate outputs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OutputValue)> {
        self.0.iter()
    }

    /// Fetch an output as a string, if present and string-typed.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.value.as_str())
    }

    /// Insert an output value (mainly useful for tests and fixtures).
    pub fn insert(&mut self, key: impl Into<String>, value: OutputValue) {
        self.0.insert(key.into(), value);
    }
}

impl OutputValue {
    /// Convenience constructor for a string-typed output.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value_type: "String".to_string(),
            value: serde_json::Value::String(value.into()),
        }
    }

    /// Render the value for display: bare strings stay bare, everything
    /// else is compact JSON.
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_mode_str() {
        assert_eq!(DeploymentMode::Incremental.as_str(), "Incremental");
        assert_eq!(DeploymentMode::default(), DeploymentMode::Incremental);
    }

    #[test]
    fn test_soft_deleted_account_parse() {
        let json = r#"{
            "id": "/subscriptions/0000/providers/Microsoft.CognitiveServices/locations/westus/resourceGroups/rg-document-intelligence/deletedAccounts/content-understanding-abc123",
            "kind": "AIServices",
            "location": "westus",
            "name": "content-understanding-abc123"
        }"#;
        let account: SoftDeletedAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.name, "content-understanding-abc123");
        assert_eq!(account.location, "westus");
        assert_eq!(account.kind, "AIServices");
    }

    #[test]
    fn test_azure_resource_parse() {
        let json = r#"{
            "id": "/subscriptions/0000/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/stdocs",
            "name": "stdocs",
            "type": "Microsoft.Storage/storageAccounts",
            "location": "westus"
        }"#;
        let resource: AzureResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.name, "stdocs");
        assert_eq!(resource.resource_type, "Microsoft.Storage/storageAccounts");
    }

    #[test]
    fn test_deployment_parse() {
        let json = r#"{
            "name": "main",
            "properties": {
                "provisioningState": "Succeeded",
                "timestamp": "2025-03-04T10:00:00Z"
            }
        }"#;
        let deployment: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(deployment.name, "main");
        assert_eq!(deployment.provisioning_state(), "Succeeded");
    }

    #[test]
    fn test_outputs_get_str() {
        let json = r#"{
            "endpoint": { "type": "String", "value": "https://example.cognitiveservices.azure.com/" },
            "resourceId": { "type": "String", "value": "/subscriptions/0000/x" },
            "retention": { "type": "Int", "value": 7 }
        }"#;
        let outputs: DeploymentOutputs = serde_json::from_str(json).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(
            outputs.get_str("endpoint"),
            Some("https://example.cognitiveservices.azure.com/")
        );
        assert_eq!(outputs.get_str("retention"), None);
        assert_eq!(outputs.0["retention"].display_value(), "7");
    }

    #[test]
    fn test_outputs_ordering() {
        let mut outputs = DeploymentOutputs::empty();
        outputs.insert("zeta", OutputValue::string("z"));
        outputs.insert("alpha", OutputValue::string("a"));
        let keys: Vec<&str> = outputs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
