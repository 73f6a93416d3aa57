//! Signed session tokens.
//!
//! A token is `base64url(claims json) "." hex(hmac_sha256(secret, payload))`.
//! The server keeps no session table: anything that verifies and has not
//! expired is accepted.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeDelta, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use recipe_box_core::{AdminId, UserId};

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Which collection the token subject belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// The signed contents of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user or admin, depending on `role`.
    pub sub: i32,
    pub role: Role,
    /// Expiry as unix seconds.
    pub exp: i64,
}

impl Claims {
    /// The admin this token was issued to, if it is an admin token.
    #[must_use]
    pub const fn admin_id(&self) -> Option<AdminId> {
        match self.role {
            Role::Admin => Some(AdminId::new(self.sub)),
            Role::User => None,
        }
    }

    /// The user this token was issued to, if it is a user token.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self.role {
            Role::User => Some(UserId::new(self.sub)),
            Role::Admin => None,
        }
    }
}

/// Issues and verifies session tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
    ttl: TimeDelta,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: SecretString, ttl_hours: i64) -> Self {
        Self {
            secret,
            ttl: TimeDelta::try_hours(ttl_hours).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Issue a token for a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if the claims cannot be encoded.
    pub fn issue_for_user(&self, id: UserId) -> Result<String, AuthError> {
        self.issue(Role::User, id.as_i32())
    }

    /// Issue a token for a logged-in admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if the claims cannot be encoded.
    pub fn issue_for_admin(&self, id: AdminId) -> Result<String, AuthError> {
        self.issue(Role::Admin, id.as_i32())
    }

    fn issue(&self, role: Role, sub: i32) -> Result<String, AuthError> {
        let exp = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenSigning("expiry out of range".to_owned()))?
            .timestamp();

        self.sign(&Claims { sub, role, exp })
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let json = serde_json::to_vec(claims).map_err(|e| AuthError::TokenSigning(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::TokenSigning(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked in constant time before the payload is decoded.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed or the
    /// signature does not match, and `AuthError::TokenExpired` if it is past
    /// its expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::InvalidToken)?;

        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from("k3y-m4t3r14l-f0r-t3sts-0nly-9z8y7x"), 1)
    }

    #[test]
    fn test_issued_token_verifies() {
        let signer = signer();
        let token = signer.issue_for_admin(AdminId::new(3)).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.admin_id(), Some(AdminId::new(3)));
        assert_eq!(claims.user_id(), None);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let token = signer.issue_for_user(UserId::new(1)).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        // Re-encode claims claiming admin, keep the user's signature.
        let forged_claims = Claims {
            sub: 1,
            role: Role::Admin,
            exp: Utc::now().timestamp() + 3600,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{forged_payload}.{signature}");

        assert!(matches!(signer.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().issue_for_user(UserId::new(1)).unwrap();
        let other = TokenSigner::new(SecretString::from("d1ff3r3nt-k3y-m4t3r14l-abcdefghij"), 1);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let token = signer
            .sign(&Claims {
                sub: 1,
                role: Role::User,
                exp: Utc::now().timestamp() - 1,
            })
            .unwrap();
        assert!(matches!(signer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = signer();
        for token in ["", "no-dot", "abc.zz-not-hex", "."] {
            assert!(matches!(signer.verify(token), Err(AuthError::InvalidToken)), "{token:?}");
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", signer());
        assert!(!output.contains("k3y-m4t3r14l"));
    }
}
