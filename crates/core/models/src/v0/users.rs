auto_derived!(
    /// Signed in user, as reported by the identity provider
    pub struct User {
        /// Subject identifier
        pub sub: String,
        /// Display name
        pub name: String,
        /// Email address
        #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
        pub email: Option<String>,
        /// Avatar URL
        #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
        pub picture: Option<String>,
    }

    /// Whether the current user may triage issues
    #[derive(Default)]
    pub struct AdminStatus {
        pub is_admin: bool,
    }

    /// Identity providers available for sign in
    #[derive(Eq, Copy)]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum LoginProvider {
        Google,
        Github,
    }
);

impl LoginProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginProvider::Google => "google",
            LoginProvider::Github => "github",
        }
    }
}

impl std::str::FromStr for LoginProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(LoginProvider::Google),
            "github" => Ok(LoginProvider::Github),
            other => Err(format!("unknown provider `{other}`")),
        }
    }
}
