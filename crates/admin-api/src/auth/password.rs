//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 단방향 해싱 및 상수 시간 검증.

use admin_core::AdminError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

impl From<PasswordError> for AdminError {
    fn from(err: PasswordError) -> Self {
        AdminError::Internal(err.to_string())
    }
}

/// 비밀번호 해싱.
///
/// 솔트는 자동으로 생성되며 PHC 형식 문자열(`$argon2id$...`)에 포함됩니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 불일치하거나 저장된 해시 형식이 잘못된 경우 모두 `false`를 반환합니다.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 가입되지 않은 이메일로 로그인할 때 대신 검증하는 해시.
///
/// `Argon2::default()`와 같은 파라미터여야 두 경로의 비용이 같습니다.
const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$GLjTP1sE/OPsbpNfKVmTeQ$eNxxn2LjzVV3zuu8qpyHuvr6QC/I0gdrAFyAWFSN60s";

/// 로그인 자격 증명 검증.
///
/// 계정이 없어도 Argon2 검증을 한 번 수행하므로 응답 시간으로 가입 여부를 알 수 없습니다.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = verify_password(password, UNKNOWN_ACCOUNT_HASH);
            false
        }
    }
}

/// 비밀번호와 확인 입력 비교.
pub fn passwords_match(password: &str, password_confirm: &str) -> Result<(), AdminError> {
    if password != password_confirm {
        return Err(AdminError::Validation("passwords do not match".to_string()));
    }
    if password.is_empty() {
        return Err(AdminError::Validation("password must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "TestPassword123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash));
        assert!(!verify_password("WrongPassword123!", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("Password1", &hash1));
        assert!(verify_password("Password1", &hash2));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("password", "not-a-valid-hash"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글패스워드123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn test_unknown_account_never_verifies() {
        assert!(!verify_login("anything", None));
        assert!(!verify_login("", None));

        let hash = hash_password("secret").unwrap();
        assert!(verify_login("secret", Some(&hash)));
        assert!(!verify_login("other", Some(&hash)));
    }

    #[test]
    fn test_unknown_account_hash_costs_a_full_verification() {
        let parsed = PasswordHash::new(UNKNOWN_ACCOUNT_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");

        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("secret", "secret").is_ok());
        assert!(matches!(
            passwords_match("secret", "Secret"),
            Err(AdminError::Validation(_))
        ));
        assert!(passwords_match("", "").is_err());
    }
}
