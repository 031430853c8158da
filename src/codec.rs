//! Conversions between compact hex, colon-separated hex and raw bytes
//!
//! Device addresses and link keys show up in all three forms: the
//! registry stores peer addresses as compact hex names and keys as raw
//! bytes, BlueZ uses colon-separated directory names and compact hex
//! keys.

/// Insert `:` between consecutive two-character groups.
///
/// Empty input is returned unchanged. Case is preserved.
///
/// ```
/// use btdualboot::codec::hex_with_separators;
/// assert_eq!(hex_with_separators("AABBCCDDEEFF"), "AA:BB:CC:DD:EE:FF");
/// ```
pub fn hex_with_separators(compact: &str) -> String {
    let chars: Vec<char> = compact.chars().collect();
    chars
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// Render bytes as uppercase two-digit pairs joined by `:`.
///
/// ```
/// use btdualboot::codec::hex_from_bytes;
/// assert_eq!(hex_from_bytes(b"\xAA\xBB\xCC\xDD\xEE\xFF"), "AA:BB:CC:DD:EE:FF");
/// ```
pub fn hex_from_bytes(bytes: &[u8]) -> String {
    hex_with_separators(&hex::encode_upper(bytes))
}

/// Decode compact or colon-separated hex in either case.
pub fn bytes_from_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let compact: String = text.chars().filter(|c| *c != ':').collect();
    hex::decode(compact)
}

/// Render bytes as space-separated uppercase octets, as typed into the
/// registry editor's hex mode.
pub fn octets(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
