/// A normalized subscriber address: trimmed and lower-cased.
///
/// The only format rule is the presence of an `@`. Anything stricter would
/// turn away addresses the landing page has always accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(format!("{} is not a valid subscriber email.", s));
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
