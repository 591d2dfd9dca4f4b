use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::auth::error::AccountError;
use crate::config::HashingConfig;

/// Salted one-way hashing of credentials with a tunable Argon2id cost.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(config: &HashingConfig) -> Result<Self, AccountError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| {
            error!(error = %e, "invalid argon2 parameters");
            AccountError::Hashing(e.to_string())
        })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password(&self, plain: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AccountError::Hashing(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Cost parameters are read from the stored PHC string, not from `self`.
    pub fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, AccountError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AccountError::Hashing(e.to_string())
        })?;
        // bcrypt and other non-argon2 hashes are not accepted
        if Algorithm::try_from(parsed.algorithm).is_err() {
            error!(algorithm = %parsed.algorithm, "unsupported password hash algorithm");
            return Err(AccountError::Hashing(format!(
                "unsupported hash algorithm {}",
                parsed.algorithm
            )));
        }
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialHasher {
        CredentialHasher::new(&HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher
            .hash_password("correct-horse-battery-staple")
            .expect("hashing should succeed");
        assert!(!hasher
            .verify_password("wrong-password", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hashes_from_other_cost_settings_still_verify() {
        let old = cheap().hash_password("legacy").unwrap();
        let stronger = CredentialHasher::new(&HashingConfig {
            memory_kib: 128,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify_password("legacy", &old).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap()
            .verify_password("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(matches!(err, AccountError::Hashing(_)));
    }

    #[test]
    fn verify_errors_on_bcrypt_hash() {
        let bcrypt = "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
        let err = cheap().verify_password("anything", bcrypt).unwrap_err();
        assert!(matches!(err, AccountError::Hashing(_)));
    }

    #[test]
    fn verify_errors_on_foreign_phc_algorithm() {
        let hash = concat!(
            "$scrypt$ln=16,r=8,p=1$aM15713r3Xsvxbi31lqr1Q",
            "$nFNh2CVHVjNldFVKDHDlm4CbdRSCdEBsjjJxD+iCs5E"
        );
        let err = cheap().verify_password("anything", hash).unwrap_err();
        assert!(matches!(err, AccountError::Hashing(_)));
    }

    #[test]
    fn rejects_impossible_parameters() {
        let err = CredentialHasher::new(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, AccountError::Hashing(_)));
    }
}
