//! Storage keys owned by the wallet core.

/// bincode-encoded encrypted vault.
pub const VAULT: &str = "vault";

/// Varint-encoded vault format version.
pub const VAULT_VERSION: &str = "vault-version";

/// JSON account ledger.
pub const WALLET: &str = "wallet";

/// Name of the selected network.
pub const NETWORK_SELECTED: &str = "network/selected";

/// JSON network name → config mapping.
pub const NETWORK_CONFIG: &str = "network/config";

/// Node-count cap.
pub const NETWORK_COUNT: &str = "network/count";
