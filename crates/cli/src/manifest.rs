use std::{fs, path::Path};

use everypay_gpay_types::{EverypayConfig, MANIFEST_FILE_NAME};
use serde::{Deserialize, Serialize};

/// EveryPay manifest file (everypay.yaml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Configuration shared with the Google Pay button
    #[serde(default)]
    pub everypay: EverypayConfig,
}

impl Manifest {
    /// Load manifest from the specified everypay.yaml file path
    pub fn load(manifest_file_path: &Path) -> Result<Self, String> {
        if !manifest_file_path.exists() {
            return Err(format!(
                "{} not found at {}",
                MANIFEST_FILE_NAME,
                manifest_file_path.display()
            ));
        }

        let content = fs::read_to_string(manifest_file_path)
            .map_err(|e| format!("Failed to read {}: {}", manifest_file_path.display(), e))?;

        serde_yml::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {}", manifest_file_path.display(), e))
    }
}

/// API credentials after command line and environment overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_username: String,
    pub api_secret: String,
    pub api_url: String,
}

impl Credentials {
    /// Flags (and their environment variables) win over the manifest
    pub fn resolve(
        config: &EverypayConfig,
        api_username: Option<&str>,
        api_secret: Option<&str>,
        api_url: Option<&str>,
    ) -> Result<Self, String> {
        fn pick(flag: Option<&str>, manifest: &Option<String>) -> Option<String> {
            flag.or(manifest.as_deref())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        let api_username = pick(api_username, &config.api_username).ok_or(
            "Missing API username. Set EVERYPAY_API_USERNAME, pass --api-username or add apiUsername to the manifest",
        )?;
        let api_secret = pick(api_secret, &config.api_secret).ok_or(
            "Missing API secret. Set EVERYPAY_API_SECRET or pass --api-secret",
        )?;
        let api_url = pick(api_url, &config.api_url).ok_or(
            "Missing API URL. Set EVERYPAY_API_URL, pass --api-url or add apiUrl to the manifest",
        )?;

        url::Url::parse(&api_url).map_err(|e| format!("Invalid API URL '{}': {}", api_url, e))?;

        Ok(Self {
            api_username,
            api_secret,
            api_url,
        })
    }
}
