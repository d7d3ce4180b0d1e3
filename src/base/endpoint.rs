//! Address constants of the local cloud emulator.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Account placeholder the emulator accepts for every request.
pub const DEFAULT_ACCOUNT_ID: &str = "000000000000";
/// Host and port the emulator's edge service listens on.
pub const DEFAULT_HOST: &str = "localhost:4566";
/// URL scheme of the edge service.
pub const DEFAULT_SCHEME: &str = "http";
/// Region synthesized ARNs are placed in.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Where the local emulator lives, and which account/region it pretends to be.
///
/// Every concrete value the indexer synthesizes is composed from these
/// fields, so pointing the resolver at a different emulator address only
/// requires a different `LocalEndpoint`.
///
/// Can be deserialized from a `custom.localstack` block; missing fields
/// fall back to the defaults:
///
/// ```yaml
/// custom:
///   localstack:
///     host: localstack:4566
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalEndpoint {
    /// Account id placed in queue URLs and ARNs.
    pub account_id: SmolStr,
    /// `host:port` of the emulator.
    pub host: SmolStr,
    /// URL scheme, normally `http`.
    pub scheme: SmolStr,
    /// Region placed in ARNs.
    pub region: SmolStr,
}

impl Default for LocalEndpoint {
    fn default() -> Self {
        Self {
            account_id: SmolStr::new_static(DEFAULT_ACCOUNT_ID),
            host: SmolStr::new_static(DEFAULT_HOST),
            scheme: SmolStr::new_static(DEFAULT_SCHEME),
            region: SmolStr::new_static(DEFAULT_REGION),
        }
    }
}

impl LocalEndpoint {
    /// Create an endpoint with the default emulator constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account id.
    pub fn with_account(mut self, account_id: impl AsRef<str>) -> Self {
        self.account_id = SmolStr::new(account_id);
        self
    }

    /// Set the `host:port` of the emulator.
    pub fn with_host(mut self, host: impl AsRef<str>) -> Self {
        self.host = SmolStr::new(host);
        self
    }

    /// Set the URL scheme.
    pub fn with_scheme(mut self, scheme: impl AsRef<str>) -> Self {
        self.scheme = SmolStr::new(scheme);
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl AsRef<str>) -> Self {
        self.region = SmolStr::new(region);
        self
    }

    /// Queue URL as served by the emulator: `http://localhost:4566/000000000000/name`.
    pub fn queue_url(&self, queue_name: &str) -> String {
        format!(
            "{}://{}/{}/{}",
            self.scheme, self.host, self.account_id, queue_name
        )
    }

    /// ARN for a service in the emulator's account and region.
    pub fn arn(&self, service: &str, resource: &str) -> String {
        format!(
            "arn:aws:{}:{}:{}:{}",
            service, self.region, self.account_id, resource
        )
    }
}
