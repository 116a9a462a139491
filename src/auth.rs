//!
//! Login exchange against `/_open/auth`
//!
use crate::{Error, Result, URLExt};
use serde::{Deserialize, Serialize};

const LOGIN_POSTFIX: &str = "/_open/auth";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub jwt: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse").finish_non_exhaustive()
    }
}

/// Exchange username and password for a bearer token.
///
/// The token is returned as is and is meant to be used for a single
/// statistics request.
pub async fn login(
    client: &reqwest::Client,
    base_url: &url::Url,
    username: &str,
    password: &str,
) -> Result<String> {
    let url = base_url.base_str();
    let json = serde_json::to_string(&LoginRequest { username, password }).map_err(|source| {
        Error::Decode {
            url: url.to_string(),
            source,
        }
    })?;

    tracing::debug!("POST {}", base_url.endpoint(LOGIN_POSTFIX));

    let result = client
        .post(base_url.endpoint(LOGIN_POSTFIX))
        .header("content-type", "application/json")
        .body(json)
        .send()
        .await
        .map_err(|source| Error::Connectivity {
            url: url.to_string(),
            source,
        })?;

    let status = result.status();
    let text = result.text().await.map_err(|source| Error::Connectivity {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        tracing::debug!("login returned {}", text);
        return Err(Error::WebServer {
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    let login = serde_json::from_str::<LoginResponse>(&text).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })?;
    Ok(login.jwt)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn login_request_body() {
        let body = serde_json::to_value(LoginRequest {
            username: "root",
            password: "p\"w",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"username": "root", "password": "p\"w"})
        );
    }

    #[test]
    fn login_response_ignores_extra_fields() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"jwt": "abc.def.ghi", "must_change_password": false}"#)
                .unwrap();
        assert_eq!(resp.jwt, "abc.def.ghi");
        assert!(!format!("{resp:?}").contains("abc.def.ghi"));
    }

    #[test]
    fn login_response_requires_jwt() {
        assert!(serde_json::from_str::<LoginResponse>(r#"{"error": true}"#).is_err());
    }
}
