//! Registry type definitions.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 20-byte account address; identities, owners and delegates are all addresses
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Whether this is the null address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ParseHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(parse_fixed_hex::<20>(s)?))
    }
}

/// 32-byte tag used for delegate types and attribute names
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bytes32(pub [u8; 32]);

impl Bytes32 {
    /// The empty tag
    pub const ZERO: Bytes32 = Bytes32([0u8; 32]);

    /// Left-aligned, zero-padded UTF-8 text (`encodeBytes32String` layout)
    ///
    /// Returns `None` if the text does not fit in 32 bytes.
    pub fn from_short_str(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() > 32 {
            return None;
        }
        let mut out = [0u8; 32];
        out[..bytes.len()].copy_from_slice(bytes);
        Some(Self(out))
    }

    /// Whether this is the empty tag
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Text up to the first zero byte, if it is valid UTF-8
    pub fn to_short_str(&self) -> Option<&str> {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(32);
        std::str::from_utf8(&self.0[..end]).ok()
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_short_str() {
            Some(text) if !text.is_empty() => write!(f, "Bytes32({:?})", text),
            _ => write!(f, "Bytes32({})", self),
        }
    }
}

impl FromStr for Bytes32 {
    type Err = ParseHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(parse_fixed_hex::<32>(s)?))
    }
}

/// Hex parsing failure for fixed-width values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHexError {
    /// Not hexadecimal
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Wrong byte length
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

fn parse_fixed_hex<const N: usize>(s: &str) -> std::result::Result<[u8; N], ParseHexError> {
    let trimmed = s.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(hex_part).map_err(|e| ParseHexError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(ParseHexError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// Hex strings for JSON, raw fixed-width bytes for bincode.
macro_rules! impl_fixed_serde {
    ($ty:ident, $len:expr) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let text = String::deserialize(deserializer)?;
                    text.parse().map_err(de::Error::custom)
                } else {
                    <[u8; $len]>::deserialize(deserializer).map($ty)
                }
            }
        }
    };
}

impl_fixed_serde!(Address, 20);
impl_fixed_serde!(Bytes32, 32);

/// Ledger position of the last change to an identity (block height class)
///
/// Zero means the identity was never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangePointer(pub u64);

impl ChangePointer {
    /// Pointer of an identity that was never changed
    pub const GENESIS: ChangePointer = ChangePointer(0);

    /// Big-endian `uint256` encoding used inside signed payloads
    pub fn to_uint256(&self) -> [u8; 32] {
        uint256(self.0)
    }

    /// Whether this pointer terminates a history walk
    pub fn is_genesis(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ChangePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Left-pad a `u64` into a big-endian 32-byte word
pub fn uint256(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Execution context of one transaction, supplied by the host ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    /// Authenticated account submitting the transaction
    pub sender: Address,
    /// Unique ledger position of this transaction
    pub position: ChangePointer,
    /// Ledger time in Unix seconds
    pub timestamp: u64,
}

/// Events emitted by successful mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// Controller of `identity` reassigned
    ControllerChanged {
        identity: Address,
        owner: Address,
        previous_change: ChangePointer,
    },
    /// Delegate grant created, refreshed or revoked (`valid_to == 0`)
    DelegateChanged {
        identity: Address,
        delegate_type: Bytes32,
        delegate: Address,
        valid_to: u64,
        previous_change: ChangePointer,
    },
    /// Attribute asserted or revoked (`valid_to == 0`)
    AttributeChanged {
        identity: Address,
        name: Bytes32,
        #[serde(with = "hex_bytes")]
        value: Vec<u8>,
        valid_to: u64,
        previous_change: ChangePointer,
    },
}

impl RegistryEvent {
    /// Identity the event belongs to
    pub fn identity(&self) -> Address {
        match self {
            RegistryEvent::ControllerChanged { identity, .. }
            | RegistryEvent::DelegateChanged { identity, .. }
            | RegistryEvent::AttributeChanged { identity, .. } => *identity,
        }
    }

    /// Pointer value the identity had before this event
    pub fn previous_change(&self) -> ChangePointer {
        match self {
            RegistryEvent::ControllerChanged { previous_change, .. }
            | RegistryEvent::DelegateChanged { previous_change, .. }
            | RegistryEvent::AttributeChanged { previous_change, .. } => *previous_change,
        }
    }

    /// Expiry carried by delegate and attribute events
    pub fn valid_to(&self) -> Option<u64> {
        match self {
            RegistryEvent::ControllerChanged { .. } => None,
            RegistryEvent::DelegateChanged { valid_to, .. }
            | RegistryEvent::AttributeChanged { valid_to, .. } => Some(*valid_to),
        }
    }

    /// Short event name
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::ControllerChanged { .. } => "ControllerChanged",
            RegistryEvent::DelegateChanged { .. } => "DelegateChanged",
            RegistryEvent::AttributeChanged { .. } => "AttributeChanged",
        }
    }
}

/// A committed event together with the transaction that emitted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub position: ChangePointer,
    pub timestamp: u64,
    pub event: RegistryEvent,
}

/// `0x` hex for JSON, plain byte sequence for bincode
pub mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            let hex_part = text.strip_prefix("0x").unwrap_or(&text);
            hex::decode(hex_part).map_err(de::Error::custom)
        } else {
            <Vec<u8>>::deserialize(deserializer)
        }
    }
}
