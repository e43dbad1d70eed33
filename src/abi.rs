use alloy::sol;
use alloy::sol_types::SolCall;
use alloy_primitives::U256;
use tracing::debug;

pub const DEFAULT_DECIMALS: u8 = 18;

sol! {
    function name() external view returns (string);
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
}

/// Decode the return data of a `string`-returning view such as `name()` or `symbol()`.
///
/// Tokens that predate the final ERC-20 text return a left-aligned `bytes32`
/// instead of a dynamic string; those are read as null-padded ASCII.
pub fn decode_string_return(data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }

    match nameCall::abi_decode_returns(data) {
        Ok(value) => value.trim_end_matches('\0').to_string(),
        Err(e) if data.len() == 32 => {
            debug!("Not a dynamic string ({}), reading as bytes32", e);
            bytes_to_ascii(data)
        }
        Err(e) => {
            debug!("Failed to decode string return of {} bytes: {}", data.len(), e);
            String::new()
        }
    }
}

/// Decode the return data of `decimals()`. An empty return (`0x`) means 18.
///
/// Only the first word is read. A value that does not fit a `uint8` also means 18.
pub fn decode_decimals(data: &[u8]) -> u8 {
    if data.is_empty() {
        return DEFAULT_DECIMALS;
    }

    let word = &data[..data.len().min(32)];
    match U256::try_from_be_slice(word) {
        Some(value) if value <= U256::from(u8::MAX) => value.to::<u8>(),
        _ => {
            debug!("Out of range decimals return 0x{}", alloy_primitives::hex::encode(word));
            DEFAULT_DECIMALS
        }
    }
}

/// Convert a hex string to ASCII text, two characters per byte. Null bytes are dropped.
pub fn hex_to_ascii(hex: &str) -> String {
    let hex = hex.trim_start_matches("0x");
    hex.as_bytes()
        .chunks_exact(2)
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
        .filter(|byte| *byte != 0)
        .map(char::from)
        .collect()
}

fn bytes_to_ascii(data: &[u8]) -> String {
    hex_to_ascii(&alloy_primitives::hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    fn encode_ascii(text: &str) -> String {
        text.bytes().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn hex_to_ascii_round_trips() {
        let encoded = encode_ascii("USDC");
        assert_eq!(encoded, "55534443");
        assert_eq!(hex_to_ascii(&encoded), "USDC");
        assert_eq!(hex_to_ascii(&format!("0x{encoded}")), "USDC");
    }

    #[test]
    fn hex_to_ascii_drops_null_bytes() {
        assert_eq!(hex_to_ascii("0x00005553004443000000"), "USDC");
        assert_eq!(hex_to_ascii("0x0000"), "");
    }

    #[test]
    fn decodes_dynamic_string() {
        let data = hex::decode(concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000004",
            "5553444300000000000000000000000000000000000000000000000000000000",
        ))
        .unwrap();
        assert_eq!(decode_string_return(&data), "USDC");
    }

    #[test]
    fn decodes_bytes32_symbol() {
        let data =
            hex::decode("4d4b520000000000000000000000000000000000000000000000000000000000")
                .unwrap();
        assert_eq!(decode_string_return(&data), "MKR");
    }

    #[test]
    fn empty_string_return_is_empty() {
        assert_eq!(decode_string_return(&[]), "");
        assert_eq!(decode_string_return(&[0x01, 0x02]), "");
    }

    #[test]
    fn empty_decimals_default_to_18() {
        assert_eq!(decode_decimals(&[]), 18);
    }

    #[test]
    fn decodes_decimals_word() {
        let data = U256::from(6).to_be_bytes::<32>();
        assert_eq!(decode_decimals(&data), 6);
        assert_eq!(decode_decimals(&[0x08]), 8);
    }

    #[test]
    fn oversized_decimals_fall_back_to_default() {
        assert_eq!(decode_decimals(&[0x01, 0x00]), 18);
        assert_eq!(decode_decimals(&U256::from(256).to_be_bytes::<32>()), 18);
        assert_eq!(decode_decimals(&U256::MAX.to_be_bytes::<32>()), 18);
        assert_eq!(decode_decimals(&U256::from(255).to_be_bytes::<32>()), 255);
    }
}
