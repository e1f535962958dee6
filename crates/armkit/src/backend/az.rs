//! Real Azure CLI backend using `az` commands.

use crate::backend::Provider;
use crate::error::{Error, Result};
use crate::types::{
    AzureResource, Deployment, DeploymentMode, DeploymentOutputs, SoftDeletedAccount,
};
use std::path::Path;
use std::process::Command;

/// Backend that executes real `az` commands.
pub struct AzCli {
    /// Path to the az executable
    az_path: String,
}

impl AzCli {
    /// Create a new AzCli backend.
    ///
    /// Returns an error if the Azure CLI is not installed.
    pub fn new() -> Result<Self> {
        let az_path = find_az()?;
        Ok(Self { az_path })
    }

    /// Run an az command and return output.
    fn run_az(&self, args: &[&str]) -> Result<std::process::Output> {
        let output = Command::new(&self.az_path)
            .args(args)
            .output()
            .map_err(|e| Error::CommandFailed {
                message: format!("failed to execute az: {}", e),
                stderr: String::new(),
            })?;
        Ok(output)
    }

    /// Run an az command and check for success.
    fn run_az_checked(&self, args: &[&str], what: Option<&str>) -> Result<String> {
        let output = self.run_az(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::from_az_output(&stderr, what));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Provider for AzCli {
    fn is_available(&self) -> bool {
        self.run_az(&["version", "--output", "json"])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn group_exists(&self, group: &str) -> Result<bool> {
        let stdout =
            self.run_az_checked(&["group", "exists", "--name", group, "--output", "json"], Some(group))?;
        parse_bool(&stdout)
    }

    fn group_create(&self, group: &str, location: &str) -> Result<()> {
        self.run_az_checked(
            &[
                "group", "create", "--name", group, "--location", location, "--output", "json",
            ],
            Some(group),
        )?;
        Ok(())
    }

    fn list_soft_deleted(&self, kind: &str, location: &str) -> Result<Vec<SoftDeletedAccount>> {
        let stdout = self.run_az_checked(
            &[
                "cognitiveservices",
                "account",
                "list-deleted",
                "--output",
                "json",
            ],
            None,
        )?;
        let accounts: Vec<SoftDeletedAccount> = serde_json::from_str(&stdout)?;
        Ok(filter_soft_deleted(accounts, kind, location))
    }

    fn purge_account(&self, name: &str, group: &str, location: &str) -> Result<()> {
        self.run_az_checked(
            &[
                "cognitiveservices",
                "account",
                "purge",
                "--name",
                name,
                "--resource-group",
                group,
                "--location",
                location,
            ],
            Some(name),
        )?;
        Ok(())
    }

    fn deployment_show(&self, group: &str, name: &str) -> Result<Option<Deployment>> {
        let output = self.run_az(&[
            "deployment",
            "group",
            "show",
            "--resource-group",
            group,
            "--name",
            name,
            "--output",
            "json",
        ])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = Error::from_az_output(&stderr, Some(name));
            if err.is_ignorable() {
                return Ok(None);
            }
            return Err(err);
        }

        let deployment: Deployment = serde_json::from_slice(&output.stdout)?;
        Ok(Some(deployment))
    }

    fn resource_list(&self, group: &str) -> Result<Vec<AzureResource>> {
        let stdout = self.run_az_checked(
            &[
                "resource",
                "list",
                "--resource-group",
                group,
                "--output",
                "json",
            ],
            Some(group),
        )?;
        let resources: Vec<AzureResource> = serde_json::from_str(&stdout)?;
        Ok(resources)
    }

    fn resource_delete(&self, resource_id: &str) -> Result<()> {
        let output = self.run_az(&["resource", "delete", "--ids", resource_id])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = Error::from_az_output(&stderr, Some(resource_id));
            // Already gone is the outcome we wanted
            if err.is_ignorable() {
                return Ok(());
            }
            return Err(err);
        }

        Ok(())
    }

    fn deployment_create(
        &self,
        group: &str,
        template: &Path,
        name: &str,
        mode: DeploymentMode,
    ) -> Result<Deployment> {
        let stdout = self.run_az_checked(
            &[
                "deployment",
                "group",
                "create",
                "--resource-group",
                group,
                "--template-file",
                template.to_str().unwrap_or(""),
                "--name",
                name,
                "--mode",
                mode.as_str(),
                "--output",
                "json",
            ],
            Some(name),
        )?;
        let deployment: Deployment = serde_json::from_str(&stdout)?;
        Ok(deployment)
    }

    fn deployment_outputs(&self, group: &str, name: &str) -> Result<DeploymentOutputs> {
        let stdout = self.run_az_checked(
            &[
                "deployment",
                "group",
                "show",
                "--resource-group",
                group,
                "--name",
                name,
                "--query",
                "properties.outputs",
                "--output",
                "json",
            ],
            Some(name),
        )?;
        parse_outputs(&stdout)
    }
}

/// Find the az executable path.
fn find_az() -> Result<String> {
    // Check common locations
    let paths = [
        "/usr/bin/az",
        "/usr/local/bin/az",
        "/opt/homebrew/bin/az", // macOS Homebrew
    ];

    for path in &paths {
        if std::path::Path::new(path).exists() {
            return Ok(path.to_string());
        }
    }

    // Try which
    let output = Command::new("which")
        .arg("az")
        .output()
        .map_err(|_| Error::CliMissing)?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Ok(path);
        }
    }

    Err(Error::CliMissing)
}

/// Parse the bare JSON boolean `az group exists` prints.
fn parse_bool(stdout: &str) -> Result<bool> {
    serde_json::from_str(stdout.trim())
        .map_err(|_| Error::Parse(format!("expected true/false, got: {}", stdout.trim())))
}

/// Keep only the deleted accounts matching the given kind and location.
///
/// `list-deleted` is subscription-wide, so accounts from unrelated projects
/// and regions show up in the same listing.
fn filter_soft_deleted(
    accounts: Vec<SoftDeletedAccount>,
    kind: &str,
    location: &str,
) -> Vec<SoftDeletedAccount> {
    accounts
        .into_iter()
        .filter(|a| a.kind.eq_ignore_ascii_case(kind) && a.location.eq_ignore_ascii_case(location))
        .collect()
}

/// Parse the `properties.outputs` query result. Deployments without
/// declared outputs print `null`.
fn parse_outputs(stdout: &str) -> Result<DeploymentOutputs> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(DeploymentOutputs::empty());
    }
    let outputs: DeploymentOutputs = serde_json::from_str(trimmed)?;
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true\n").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_filter_soft_deleted() {
        let accounts = vec![
            SoftDeletedAccount {
                name: "content-understanding-abc123".to_string(),
                location: "westus".to_string(),
                kind: "AIServices".to_string(),
                id: String::new(),
            },
            SoftDeletedAccount {
                name: "speech-service".to_string(),
                location: "westus".to_string(),
                kind: "SpeechServices".to_string(),
                id: String::new(),
            },
            SoftDeletedAccount {
                name: "other-region".to_string(),
                location: "eastus".to_string(),
                kind: "AIServices".to_string(),
                id: String::new(),
            },
        ];

        let matched = filter_soft_deleted(accounts, "AIServices", "westus");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "content-understanding-abc123");
    }

    #[test]
    fn test_filter_soft_deleted_case_insensitive() {
        let accounts = vec![SoftDeletedAccount {
            name: "cu".to_string(),
            location: "WestUS".to_string(),
            kind: "aiservices".to_string(),
            id: String::new(),
        }];
        assert_eq!(filter_soft_deleted(accounts, "AIServices", "westus").len(), 1);
    }

    #[test]
    fn test_parse_outputs_null() {
        assert!(parse_outputs("null\n").unwrap().is_empty());
        assert!(parse_outputs("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_outputs_values() {
        let json = r#"{
            "contentUnderstandingEndpoint": {
                "type": "String",
                "value": "https://cu-docs.cognitiveservices.azure.com/"
            }
        }"#;
        let outputs = parse_outputs(json).unwrap();
        assert_eq!(
            outputs.get_str("contentUnderstandingEndpoint"),
            Some("https://cu-docs.cognitiveservices.azure.com/")
        );
    }
}
