use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const CLIENT_NAME: &str = "jellysync";
pub const DEVICE_NAME: &str = "jellysync-cli";

/// How this tool identifies itself in the `X-Emby-Authorization` header
///
/// The device ID is derived from server and login so that two accounts on the
/// same server get separate sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client: String,
    pub device: String,
    pub device_id: String,
    pub version: String,
}

impl ClientIdentity {
    pub fn for_account(server_url: &str, server_username: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        server_url.hash(&mut hasher);
        server_username.hash(&mut hasher);

        Self {
            client: CLIENT_NAME.to_string(),
            device: DEVICE_NAME.to_string(),
            device_id: format!("{}-{:016x}", CLIENT_NAME, hasher.finish()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Header value, with the session token once logged in
    pub fn authorization_header(&self, token: Option<&str>) -> String {
        let mut header = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            self.client, self.device, self.device_id, self.version
        );
        if let Some(token) = token {
            header.push_str(&format!(", Token=\"{}\"", token));
        }
        header
    }
}

/// Body of `POST /Users/AuthenticateByName`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateByName<'a> {
    pub username: &'a str,
    pub pw: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub access_token: Option<String>,
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let identity = ClientIdentity::for_account("http://a:8096", "alice");
        let anonymous = identity.authorization_header(None);
        assert!(anonymous.starts_with("MediaBrowser Client=\"jellysync\""));
        assert!(anonymous.contains(&format!("DeviceId=\"{}\"", identity.device_id)));
        assert!(!anonymous.contains("Token="));

        let with_token = identity.authorization_header(Some("abc123"));
        assert!(with_token.ends_with(", Token=\"abc123\""));
    }

    #[test]
    fn test_device_id_per_account() {
        let alice = ClientIdentity::for_account("http://a:8096", "alice");
        let bob = ClientIdentity::for_account("http://a:8096", "bob");
        assert_ne!(alice.device_id, bob.device_id);
        assert_eq!(alice, ClientIdentity::for_account("http://a:8096", "alice"));
    }

    #[test]
    fn test_authenticate_body_and_result() {
        let body = serde_json::to_value(AuthenticateByName { username: "alice", pw: "pw" }).unwrap();
        assert_eq!(body, serde_json::json!({"Username": "alice", "Pw": "pw"}));

        let result: AuthenticationResult = serde_json::from_str(
            r#"{"User": {"Name": "alice", "Id": "u-1", "Policy": {}}, "AccessToken": "tok", "ServerId": "s"}"#,
        )
        .unwrap();
        assert_eq!(result.access_token.as_deref(), Some("tok"));
        assert_eq!(result.user.unwrap().id, "u-1");
    }
}
