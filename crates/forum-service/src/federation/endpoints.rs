use forum_core::IdentityProvider;

/// Fixed endpoints of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize: &'static str,
    pub token: &'static str,
    pub profile: &'static str,
    /// Scopes requested when the configuration names none
    pub default_scopes: &'static [&'static str],
}

impl ProviderEndpoints {
    pub const fn for_provider(provider: IdentityProvider) -> Self {
        match provider {
            IdentityProvider::Google => Self {
                authorize: "https://accounts.google.com/o/oauth2/v2/auth",
                token: "https://oauth2.googleapis.com/token",
                profile: "https://www.googleapis.com/oauth2/v2/userinfo",
                default_scopes: &["profile", "email"],
            },
            IdentityProvider::GitHub => Self {
                authorize: "https://github.com/login/oauth/authorize",
                token: "https://github.com/login/oauth/access_token",
                profile: "https://api.github.com/user",
                default_scopes: &["user:email"],
            },
            IdentityProvider::Facebook => Self {
                authorize: "https://www.facebook.com/v3.2/dialog/oauth",
                token: "https://graph.facebook.com/v3.2/oauth/access_token",
                profile: "https://graph.facebook.com/me?fields=id,name,email",
                default_scopes: &["email"],
            },
        }
    }
}
