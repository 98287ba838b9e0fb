use super::*;

#[test]
fn maps_plain_codes() {
    assert_eq!(CredentialError::from_backend_message("EMAIL_NOT_FOUND"), CredentialError::UnknownAccount);
    assert_eq!(
        CredentialError::from_backend_message("INVALID_LOGIN_CREDENTIALS"),
        CredentialError::InvalidCredentials
    );
    assert_eq!(CredentialError::from_backend_message("INVALID_PASSWORD"), CredentialError::InvalidCredentials);
    assert_eq!(CredentialError::from_backend_message("EMAIL_EXISTS"), CredentialError::EmailInUse);
    assert_eq!(CredentialError::from_backend_message("USER_DISABLED"), CredentialError::UserDisabled);
    assert_eq!(CredentialError::from_backend_message("INVALID_IDP_RESPONSE"), CredentialError::InvalidIdpResponse);
}

#[test]
fn maps_codes_with_detail() {
    assert_eq!(
        CredentialError::from_backend_message("WEAK_PASSWORD : Password should be at least 6 characters"),
        CredentialError::WeakPassword("Password should be at least 6 characters".into())
    );
    assert_eq!(
        CredentialError::from_backend_message("TOO_MANY_ATTEMPTS_TRY_LATER : Access temporarily disabled"),
        CredentialError::TooManyAttempts
    );
}

#[test]
fn unknown_code_is_kept_verbatim() {
    assert_eq!(
        CredentialError::from_backend_message(" API_KEY_INVALID "),
        CredentialError::Backend("API_KEY_INVALID".into())
    );
}

#[test]
fn error_codes_match_auth_error_endpoint() {
    assert_eq!(CredentialError::InvalidCredentials.error_code(), "credentialssignin");
    assert_eq!(CredentialError::EmailInUse.error_code(), "emailcreateaccount");
    assert_eq!(CredentialError::UserDisabled.error_code(), "accessdenied");
    let cfg = ConfigError::MissingIdentity { missing: vec!["FIREBASE_API_KEY"] };
    assert_eq!(AuthError::from(cfg).error_code(), "configuration");
}

#[test]
fn auth_error_is_transparent_over_credential() {
    let err = AuthError::from(CredentialError::UnknownAccount);
    assert_eq!(err.to_string(), "no account exists for this email");
}

#[test]
fn oob_code_errors_map_to_verification() {
    for message in ["INVALID_OOB_CODE", "EXPIRED_OOB_CODE : The action code has expired."] {
        let err = CredentialError::from_backend_message(message);
        assert_eq!(err, CredentialError::InvalidActionCode);
        assert_eq!(err.error_code(), "verification");
    }
}
