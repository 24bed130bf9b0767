use serde::{Deserialize, Serialize};

/// Request body for signup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Request body for signin.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after signup.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub token: String,
}

/// Response returned after signin.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_accepts_camel_case() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"username":"a@b.com","firstName":"A","lastName":"B","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "a@b.com");
        assert_eq!(req.first_name, "A");
        assert_eq!(req.last_name, "B");
    }

    #[test]
    fn signup_response_shape() {
        let json = serde_json::to_value(SignupResponse {
            message: "User created successfully".into(),
            token: "t".into(),
        })
        .unwrap();
        assert_eq!(json["message"], "User created successfully");
        assert_eq!(json["token"], "t");
    }
}
