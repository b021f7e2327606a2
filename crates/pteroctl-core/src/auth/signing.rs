use crate::api::ApiError;

/// Build the pre-1.0 `public_key.signature` authorization value.
///
/// The panel dropped HMAC request signing in favour of bearer tokens, so this
/// always fails without looking at its arguments. Use
/// [`PanelClient`](crate::PanelClient) with an application API token instead.
#[deprecated(note = "HMAC request signing was removed from the panel; use a bearer API token")]
pub fn legacy_auth_header(
    _public_key: &str,
    _private_key: &str,
    _url: &str,
    _body: &str,
) -> Result<String, ApiError> {
    Err(ApiError::Unsupported(
        "legacy HMAC request signing is no longer supported".into(),
    ))
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_signing_always_fails() {
        let inputs = [
            ("", "", "", ""),
            (
                "pubkey",
                "privkey",
                "https://panel.example.com/api/admin/users",
                "",
            ),
            (
                "pubkey",
                "privkey",
                "https://panel.example.com/api/admin/users",
                r#"{"email":"a@b.c"}"#,
            ),
        ];
        for (public_key, private_key, url, body) in inputs {
            match legacy_auth_header(public_key, private_key, url, body) {
                Err(ApiError::Unsupported(message)) => {
                    assert!(message.contains("no longer supported"))
                }
                other => panic!("expected Unsupported, got {:?}", other),
            }
        }
    }
}
