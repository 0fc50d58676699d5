use serde::{Deserialize, Serialize};

/// A sign-up request. The password is in plain text and is hashed before it reaches the database.
#[derive(Clone, Deserialize)]
pub struct NewRegistration {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub referrer_id: Option<i64>,
}

impl NewRegistration {
    pub fn new<S: Into<String>>(email: S, full_name: S, password: S) -> Self {
        Self { email: email.into(), full_name: full_name.into(), password: password.into(), referrer_id: None }
    }

    pub fn with_referrer(mut self, referrer_id: i64) -> Self {
        self.referrer_id = Some(referrer_id);
        self
    }
}

impl std::fmt::Debug for NewRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRegistration")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"****")
            .field("referrer_id", &self.referrer_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralLink {
    pub referral_link: String,
    /// The user's id, as a string. This is what goes into the `ref` query parameter.
    pub referral_code: String,
}

impl ReferralLink {
    pub fn new(base_url: &str, user_id: i64) -> Self {
        let referral_link = crate::ale_api::accounts_api::referral_link(base_url, user_id);
        Self { referral_link, referral_code: user_id.to_string() }
    }
}
