use campusfix_models::v0::LoginProvider;

/// Where the browser must be sent to sign in with a provider
pub fn login_url(base_url: &str, provider: LoginProvider) -> String {
    format!(
        "{}/auth/login/{}",
        base_url.trim_end_matches('/'),
        provider.as_str()
    )
}
