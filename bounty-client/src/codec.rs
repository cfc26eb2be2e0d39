//! Binary encoding and decoding helpers
//!
//! Account records and instruction arguments use Borsh: little-endian
//! fixed-width integers and 4-byte length-prefixed UTF-8 strings, behind an
//! 8-byte discriminator header. These helpers add the discriminator and
//! bound checks the raw serializer does not enforce.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::ClientError;

/// Rejects a string that would exceed its declared on-chain byte bound.
///
/// Bounds are byte lengths, not character counts.
pub fn check_str_bound(field: &str, value: &str, max: usize) -> Result<(), ClientError> {
    if value.len() > max {
        return Err(ClientError::Encoding(format!(
            "{field} is {} bytes, maximum is {max}",
            value.len()
        )));
    }
    Ok(())
}

/// Encodes an instruction payload: 8-byte discriminator followed by the
/// Borsh-serialized arguments in declaration order.
pub fn encode_instruction<T: BorshSerialize>(
    discriminator: [u8; 8],
    args: &T,
) -> Result<Vec<u8>, ClientError> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|e| ClientError::Encoding(e.to_string()))?;
    Ok(data)
}

/// Decodes an account record from raw account bytes.
///
/// The buffer must begin with `expected` discriminator bytes. Trailing zero
/// padding from the fixed on-chain allocation is ignored; a buffer that ends
/// before the record does is an `AccountParse` error.
pub fn decode_account<T: BorshDeserialize>(
    expected: &[u8; 8],
    data: &[u8],
) -> Result<T, ClientError> {
    if data.len() < 8 {
        return Err(ClientError::AccountParse(format!(
            "account data too short: {} bytes",
            data.len()
        )));
    }
    if &data[..8] != expected {
        return Err(ClientError::AccountParse(
            "account discriminator mismatch".to_string(),
        ));
    }
    let mut slice = data;
    T::deserialize(&mut slice).map_err(|e| ClientError::AccountParse(e.to_string()))
}

/// Decodes base64 account data as returned by the RPC node.
pub fn decode_base64(data_base64: &str) -> Result<Vec<u8>, ClientError> {
    STANDARD
        .decode(data_base64)
        .map_err(|e| ClientError::AccountParse(format!("invalid base64 account data: {e}")))
}
