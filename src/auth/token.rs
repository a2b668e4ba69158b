//! Signed access tokens.
//!
//! A token is a minimal HS256 JWT: `base64(header).base64(payload).base64(signature)`,
//! every segment URL-safe base64 without padding. The signature is an
//! HMAC-SHA256 over the first two encoded segments joined by a single `.`.
//!
//! ```text
//! header:  {"alg":"HS256","typ":"JWT"}
//! payload: {"user_id":42,"exp":1700000000}
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;
use std::fmt;

use super::secret::Secret;
use crate::config::token_lifetime_secs;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = '.';

/// JOSE header. Always `HS256` / `JWT` for tokens this server issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    pub typ: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub user_id: i64,
    /// Expiry as unix epoch seconds
    pub exp: i64,
}

/// A parsed or freshly generated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub header: Header,
    pub payload: Payload,
    pub signature: Vec<u8>,
    /// Encoded form, exactly as issued or received
    pub raw: String,
}

/// Outcome of checking a token against a secret.
///
/// Callers outside this module only see a boolean; the distinction exists
/// for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Expired,
    SignatureInvalid,
}

/// Token parsing/encoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Wrong number of segments, an empty segment, or no separator at all
    MalformedToken,
    /// Invalid base64 or JSON in a segment
    Encoding(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::MalformedToken => write!(f, "malformed token"),
            TokenError::Encoding(err) => write!(f, "token encoding error: {}", err),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::Encoding(err.to_string())
    }
}

impl From<base64::DecodeError> for TokenError {
    fn from(err: base64::DecodeError) -> Self {
        TokenError::Encoding(err.to_string())
    }
}

/// Generate a token for `user_id`, expiring 12 hours from now.
pub fn generate(user_id: i64, secret: &Secret) -> Result<Token, TokenError> {
    generate_at(user_id, secret, Utc::now().timestamp())
}

/// Generate a token as if the current time were `now` (epoch seconds).
pub fn generate_at(user_id: i64, secret: &Secret, now: i64) -> Result<Token, TokenError> {
    let header = Header::default();
    let payload = Payload {
        user_id,
        exp: now + token_lifetime_secs(),
    };

    let header_json = serde_json::to_vec(&header)?;
    let payload_json = serde_json::to_vec(&payload)?;
    let message = format!(
        "{}{}{}",
        URL_SAFE_NO_PAD.encode(header_json),
        SEPARATOR,
        URL_SAFE_NO_PAD.encode(payload_json)
    );

    let signature = sign(message.as_bytes(), secret)?;
    let raw = format!("{}{}{}", message, SEPARATOR, URL_SAFE_NO_PAD.encode(&signature));

    Ok(Token {
        header,
        payload,
        signature,
        raw,
    })
}

/// Parse an encoded token. Does not check the signature or expiry.
pub fn parse(raw: &str) -> Result<Token, TokenError> {
    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    let &[header_b64, payload_b64, signature_b64] = parts.as_slice() else {
        return Err(TokenError::MalformedToken);
    };
    if parts.iter().any(|part| part.is_empty()) {
        return Err(TokenError::MalformedToken);
    }

    let header: Header = decode_json(header_b64)?;
    let payload: Payload = decode_json(payload_b64)?;
    let signature = URL_SAFE_NO_PAD.decode(signature_b64)?;

    Ok(Token {
        header,
        payload,
        signature,
        raw: raw.to_string(),
    })
}

impl Token {
    /// True if the token was signed with `secret` and has not yet expired.
    ///
    /// Expired and forged tokens are deliberately indistinguishable here.
    pub fn is_valid(&self, secret: &Secret) -> Result<bool, TokenError> {
        let validity = self.validity(secret, Utc::now().timestamp())?;
        Ok(validity == Validity::Valid)
    }

    /// Check the signature over `raw`, then the expiry against `now`.
    pub fn validity(&self, secret: &Secret, now: i64) -> Result<Validity, TokenError> {
        let (signed, _) = self
            .raw
            .rsplit_once(SEPARATOR)
            .ok_or(TokenError::MalformedToken)?;

        // verify_slice compares in constant time
        if new_mac(secret)?
            .chain_update(signed.as_bytes())
            .verify_slice(&self.signature)
            .is_err()
        {
            return Ok(Validity::SignatureInvalid);
        }

        if now < self.payload.exp {
            Ok(Validity::Valid)
        } else {
            Ok(Validity::Expired)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn new_mac(secret: &Secret) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| TokenError::Encoding(format!("invalid signing key: {}", e)))
}

fn sign(message: &[u8], secret: &Secret) -> Result<Vec<u8>, TokenError> {
    Ok(new_mac(secret)?
        .chain_update(message)
        .finalize()
        .into_bytes()
        .to_vec())
}

fn decode_json<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SECRET_LEN;

    const NOW: i64 = 1_700_000_000;

    fn secret() -> Secret {
        Secret::from_bytes([0x5a; SECRET_LEN])
    }

    fn other_secret() -> Secret {
        Secret::from_bytes([0xa5; SECRET_LEN])
    }

    fn segment(raw: &str, index: usize) -> &str {
        raw.split('.').nth(index).unwrap()
    }

    #[test]
    fn test_generate_concrete_payload() {
        let token = generate_at(42, &secret(), NOW).unwrap();

        let payload = URL_SAFE_NO_PAD.decode(segment(&token.raw, 1)).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            format!(r#"{{"user_id":42,"exp":{}}}"#, NOW + 43_200)
        );

        let header = URL_SAFE_NO_PAD.decode(segment(&token.raw, 0)).unwrap();
        assert_eq!(
            String::from_utf8(header).unwrap(),
            r#"{"alg":"HS256","typ":"JWT"}"#
        );
    }

    #[test]
    fn test_generate_signs_first_two_segments() {
        let token = generate_at(42, &secret(), NOW).unwrap();
        let (signed, signature_b64) = token.raw.rsplit_once('.').unwrap();

        let expected = sign(signed.as_bytes(), &secret()).unwrap();
        assert_eq!(token.signature, expected);
        assert_eq!(URL_SAFE_NO_PAD.decode(signature_b64).unwrap(), expected);
        assert_eq!(token.signature.len(), 32);
        assert!(!token.raw.contains('='));
    }

    #[test]
    fn test_round_trip() {
        for user_id in [0, 1, 42, -7, i64::from(i32::MAX), 9_007_199_254_740_991] {
            let token = generate(user_id, &secret()).unwrap();
            let parsed = parse(&token.raw).unwrap();
            assert_eq!(parsed, token);
            assert_eq!(parsed.header, Header::default());
            assert_eq!(parsed.payload.user_id, user_id);
        }
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let token = generate(42, &secret()).unwrap();
        assert!(token.is_valid(&secret()).unwrap());
        assert!(parse(&token.raw).unwrap().is_valid(&secret()).unwrap());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = generate(42, &secret()).unwrap();
        assert!(!token.is_valid(&other_secret()).unwrap());
        assert_eq!(
            token.validity(&other_secret(), NOW).unwrap(),
            Validity::SignatureInvalid
        );
    }

    #[test]
    fn test_expired_token_is_invalid() {
        // Signed correctly, but issued 13 hours ago
        let issued = Utc::now().timestamp() - 13 * 60 * 60;
        let token = generate_at(42, &secret(), issued).unwrap();
        assert!(!token.is_valid(&secret()).unwrap());
        assert_eq!(
            token.validity(&secret(), token.payload.exp + 1).unwrap(),
            Validity::Expired
        );
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let token = generate_at(42, &secret(), NOW).unwrap();
        let exp = token.payload.exp;
        assert_eq!(token.validity(&secret(), exp - 1).unwrap(), Validity::Valid);
        assert_eq!(token.validity(&secret(), exp).unwrap(), Validity::Expired);
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let token = generate(42, &secret()).unwrap();
        let mut payload = URL_SAFE_NO_PAD.decode(segment(&token.raw, 1)).unwrap();

        // Flip the low bit of the '2' in 42, giving user_id 43
        let pos = payload.iter().position(|&b| b == b'2').unwrap();
        payload[pos] ^= 0x01;
        let forged = format!(
            "{}.{}.{}",
            segment(&token.raw, 0),
            URL_SAFE_NO_PAD.encode(&payload),
            segment(&token.raw, 2)
        );

        let parsed = parse(&forged).unwrap();
        assert_eq!(parsed.payload.user_id, 43);
        assert!(!parsed.is_valid(&secret()).unwrap());
    }

    #[test]
    fn test_any_payload_bit_flip_is_invalid() {
        let token = generate(42, &secret()).unwrap();
        let payload = URL_SAFE_NO_PAD.decode(segment(&token.raw, 1)).unwrap();

        for byte in 0..payload.len() {
            for bit in 0..8 {
                let mut flipped = payload.clone();
                flipped[byte] ^= 1 << bit;
                let forged = format!(
                    "{}.{}.{}",
                    segment(&token.raw, 0),
                    URL_SAFE_NO_PAD.encode(&flipped),
                    segment(&token.raw, 2)
                );

                // Most flips break the JSON; the ones that survive must not verify
                if let Ok(parsed) = parse(&forged) {
                    assert!(
                        !parsed.is_valid(&secret()).unwrap(),
                        "flip of bit {} in byte {} went unnoticed",
                        bit,
                        byte
                    );
                }
            }
        }
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let token = generate(42, &secret()).unwrap();
        let mut signature = token.signature.clone();
        signature[0] ^= 0x80;
        let forged = format!(
            "{}.{}.{}",
            segment(&token.raw, 0),
            segment(&token.raw, 1),
            URL_SAFE_NO_PAD.encode(&signature)
        );
        assert!(!parse(&forged).unwrap().is_valid(&secret()).unwrap());
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            parse("not.a.valid.token.too.many.parts"),
            Err(TokenError::MalformedToken)
        );
        assert_eq!(parse("onlyonepart"), Err(TokenError::MalformedToken));
        assert_eq!(parse(""), Err(TokenError::MalformedToken));
        assert_eq!(parse("two.parts"), Err(TokenError::MalformedToken));
        assert_eq!(parse("a..c"), Err(TokenError::MalformedToken));
        assert_eq!(parse(".."), Err(TokenError::MalformedToken));
    }

    #[test]
    fn test_parse_bad_encoding() {
        let token = generate(42, &secret()).unwrap();

        let bad_base64 = format!("!!!.{}.{}", segment(&token.raw, 1), segment(&token.raw, 2));
        assert!(matches!(parse(&bad_base64), Err(TokenError::Encoding(_))));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        let bad_json = format!("{}.{}.{}", segment(&token.raw, 0), not_json, segment(&token.raw, 2));
        assert!(matches!(parse(&bad_json), Err(TokenError::Encoding(_))));

        let bad_signature = format!("{}.{}.@@", segment(&token.raw, 0), segment(&token.raw, 1));
        assert!(matches!(parse(&bad_signature), Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_validity_guards_missing_separator() {
        let mut token = generate(42, &secret()).unwrap();
        token.raw = "noseparator".to_string();
        assert_eq!(token.is_valid(&secret()), Err(TokenError::MalformedToken));
    }

    #[test]
    fn test_display_is_raw() {
        let token = generate(7, &secret()).unwrap();
        assert_eq!(token.to_string(), token.raw);
        assert_eq!(token.as_str(), token.raw);
    }
}
