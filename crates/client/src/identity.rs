//! Managed identity provider.
//!
//! `CognitoIdentity` talks to a Cognito user pool through its JSON API
//! (`X-Amz-Target` dispatch, `application/x-amz-json-1.1` bodies) with the
//! `USER_PASSWORD_AUTH` and `REFRESH_TOKEN_AUTH` flows.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spacedash_shared::{AuthError, Role, User};

use crate::config::IdentityConfig;

/// Tokens issued at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Expired, or expiring within `margin`.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        now + margin >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// `false` means a confirmation code was sent.
    pub user_confirmed: bool,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpOutcome, AuthError>;

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError>;

    async fn sign_in(&self, username: &str, password: &str) -> Result<Tokens, AuthError>;

    /// New tokens from a refresh token. The refresh token itself may be kept.
    async fn refresh(&self, refresh_token: &str) -> Result<Tokens, AuthError>;

    /// Invalidate every token issued to the user.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    async fn current_user(&self, tokens: &Tokens) -> Result<User, AuthError>;
}

/// Decode the claims of a JWT without verifying it. Verification is the API's
/// job; the client only reads display data and expiry.
pub fn decode_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Role from ID token claims: `cognito:groups` containing `SystemAdmin`, or a
/// `custom:role` attribute.
pub fn role_from_claims(claims: &Value) -> Role {
    let in_group = claims
        .get("cognito:groups")
        .and_then(Value::as_array)
        .map(|groups| groups.iter().any(|g| g.as_str() == Some("SystemAdmin")))
        .unwrap_or(false);
    if in_group {
        return Role::SystemAdmin;
    }
    claims
        .get("custom:role")
        .and_then(Value::as_str)
        .map(|role| Role::from(role.to_string()))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    #[serde(default)]
    user_confirmed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType {
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    username: String,
    #[serde(default)]
    user_attributes: Vec<AttributeType>,
}

#[derive(Debug, Deserialize)]
struct ProviderFault {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

#[derive(Clone)]
pub struct CognitoIdentity {
    client: Client,
    endpoint: String,
    client_id: String,
}

impl CognitoIdentity {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint_url(),
            client_id: config.client_id.clone(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, target: &str, body: Value) -> Result<T, AuthError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-amz-json-1.1")
            .header(
                "X-Amz-Target",
                format!("AWSCognitoIdentityProviderService.{target}"),
            )
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AuthError::Network(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            let fault: ProviderFault = serde_json::from_str(&text).unwrap_or(ProviderFault {
                kind: String::new(),
                message: text.clone(),
            });
            // Faults arrive as "com.amazonaws...#NotAuthorizedException" or bare names.
            let code = fault
                .kind
                .rsplit('#')
                .next()
                .unwrap_or_default()
                .to_string();
            crate::log_warn!("{target} failed ({status}): {code}");
            return Err(AuthError::Provider {
                code,
                message: if fault.message.is_empty() {
                    status.to_string()
                } else {
                    fault.message
                },
            });
        }

        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| AuthError::Deserialize(e.to_string()))
    }

    async fn initiate_auth(
        &self,
        flow: &str,
        params: Value,
        keep_refresh: Option<&str>,
    ) -> Result<Tokens, AuthError> {
        let resp: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                json!({
                    "AuthFlow": flow,
                    "ClientId": self.client_id,
                    "AuthParameters": params,
                }),
            )
            .await?;

        if let Some(challenge) = resp.challenge_name {
            return Err(AuthError::ChallengeRequired(challenge));
        }
        let result = resp
            .authentication_result
            .ok_or_else(|| AuthError::Deserialize("missing AuthenticationResult".to_string()))?;

        Ok(Tokens {
            access_token: result.access_token,
            id_token: result.id_token,
            refresh_token: result
                .refresh_token
                .or_else(|| keep_refresh.map(str::to_string)),
            expires_at: Utc::now() + Duration::seconds(result.expires_in),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl IdentityProvider for CognitoIdentity {
    async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        let mut attributes = vec![json!({"Name": "email", "Value": req.email})];
        if let Some(first) = &req.first_name {
            attributes.push(json!({"Name": "given_name", "Value": first}));
        }
        if let Some(last) = &req.last_name {
            attributes.push(json!({"Name": "family_name", "Value": last}));
        }

        let resp: SignUpResponse = self
            .call(
                "SignUp",
                json!({
                    "ClientId": self.client_id,
                    "Username": req.username,
                    "Password": req.password,
                    "UserAttributes": attributes,
                }),
            )
            .await?;
        Ok(SignUpOutcome {
            user_confirmed: resp.user_confirmed,
        })
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError> {
        self.call::<Value>(
            "ConfirmSignUp",
            json!({
                "ClientId": self.client_id,
                "Username": username,
                "ConfirmationCode": code,
            }),
        )
        .await?;
        Ok(())
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<Tokens, AuthError> {
        self.initiate_auth(
            "USER_PASSWORD_AUTH",
            json!({"USERNAME": username, "PASSWORD": password}),
            None,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Tokens, AuthError> {
        self.initiate_auth(
            "REFRESH_TOKEN_AUTH",
            json!({"REFRESH_TOKEN": refresh_token}),
            Some(refresh_token),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.call::<Value>("GlobalSignOut", json!({"AccessToken": access_token}))
            .await?;
        Ok(())
    }

    async fn current_user(&self, tokens: &Tokens) -> Result<User, AuthError> {
        let resp: GetUserResponse = self
            .call("GetUser", json!({"AccessToken": tokens.access_token}))
            .await?;

        let attr = |name: &str| {
            resp.user_attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone())
        };
        let role = decode_claims(&tokens.id_token)
            .map(|claims| role_from_claims(&claims))
            .unwrap_or_default();

        Ok(User {
            username: resp.username.clone(),
            email: attr("email").unwrap_or_default(),
            first_name: attr("given_name"),
            last_name: attr("family_name"),
            role: Some(role),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn claims_decode_from_unverified_jwt() {
        let token = jwt(json!({"sub": "u-1", "cognito:groups": ["Editors", "SystemAdmin"]}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims["sub"], "u-1");
        assert_eq!(role_from_claims(&claims), Role::SystemAdmin);

        assert_eq!(decode_claims("garbage"), None);
    }

    #[test]
    fn role_falls_back_to_custom_attribute_then_member() {
        assert_eq!(
            role_from_claims(&json!({"custom:role": "SystemAdmin"})),
            Role::SystemAdmin
        );
        assert_eq!(role_from_claims(&json!({})), Role::Member);
    }

    #[test]
    fn tokens_report_upcoming_expiry() {
        let now = Utc::now();
        let tokens = Tokens {
            access_token: "a".to_string(),
            id_token: "i".to_string(),
            refresh_token: None,
            expires_at: now + Duration::seconds(30),
        };
        assert!(tokens.expires_within(Duration::seconds(60), now));
        assert!(!tokens.expires_within(Duration::seconds(10), now));
    }
}
