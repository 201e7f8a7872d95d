//! System-wide constants for the Milk ledger.

/// Default token name.
pub const DEFAULT_NAME: &str = "Milk Token";

/// Default token symbol.
pub const DEFAULT_SYMBOL: &str = "MTK";

/// Default number of decimal places (matches the paired chain's 18-decimal token).
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest decimals value for which `10^decimals` still fits in 256 bits.
pub const MAX_DECIMALS: u8 = 77;

/// Width of an account identifier in bytes.
pub const ACCOUNT_ID_BYTES: usize = 20;

/// Width of the cross-chain amount payload: one big-endian 256-bit word.
pub const PAYLOAD_WORD_BYTES: usize = 32;

/// Default administrator account used when no config file is supplied.
pub const DEFAULT_ADMIN_ACCOUNT: [u8; ACCOUNT_ID_BYTES] = [0xad; ACCOUNT_ID_BYTES];

/// Default account of the ledger itself (the game reserve).
pub const DEFAULT_LEDGER_ACCOUNT: [u8; ACCOUNT_ID_BYTES] = [0x4d; ACCOUNT_ID_BYTES];

/// Domain separator prefixed to every event-log hash chain link.
pub const EVENT_LOG_DOMAIN: &[u8] = b"milk:event-log:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Milk";
