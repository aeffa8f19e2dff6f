use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims of the access token issued by the backend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: &str, name: &str, email: &str, ttl: Duration) -> Self {
        Self {
            sub: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identity() {
        let claims = Claims::new("17", "Sam", "sam@example.com", Duration::minutes(5));
        let token = encode_token(&claims, "secret").unwrap();
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "17");
        assert_eq!(decoded.email, "sam@example.com");
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let claims = Claims::new("17", "Sam", "sam@example.com", Duration::minutes(-10));
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
