use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    #[default]
    Sms,
    Email,
}

impl VerificationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationMethod::Sms => "SMS",
            VerificationMethod::Email => "Email",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TwoFactorSettings {
    /// The code every simulated delivery "sends".
    pub code: String,
    pub ttl: Duration,
    pub max_attempts: u32,
}

impl Default for TwoFactorSettings {
    fn default() -> Self {
        Self {
            code: "123456".to_string(),
            ttl: Duration::seconds(300),
            max_attempts: 3,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum VerificationError {
    InvalidFormat,
    CodeNotSent,
    CodeExpired,
    InvalidCode { attempts_remaining: u32 },
    TooManyAttempts,
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::InvalidFormat => {
                write!(f, "Please enter a 6-digit verification code")
            }
            VerificationError::CodeNotSent => {
                write!(f, "No verification code has been sent. Please request a code.")
            }
            VerificationError::CodeExpired => {
                write!(f, "Verification code has expired. Please request a new code.")
            }
            VerificationError::InvalidCode { .. } => {
                write!(f, "Invalid verification code. Please try again.")
            }
            VerificationError::TooManyAttempts => {
                write!(f, "Too many failed attempts. Please request a new code.")
            }
        }
    }
}

impl std::error::Error for VerificationError {}

/// Simulated one-time-code challenge guarding the third booking step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TwoFactorChallenge {
    pub method: VerificationMethod,
    pub code_sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub attempts: u32,
    pub verified: bool,
    pub error: Option<String>,
}

impl TwoFactorChallenge {
    pub fn send(
        &mut self,
        method: VerificationMethod,
        now: DateTime<Utc>,
        settings: &TwoFactorSettings,
    ) {
        self.method = method;
        self.code_sent = true;
        self.sent_at = Some(now);
        self.expires_at = Some(now + settings.ttl);
        self.error = None;
    }

    pub fn resend(
        &mut self,
        method: VerificationMethod,
        now: DateTime<Utc>,
        settings: &TwoFactorSettings,
    ) {
        self.code_sent = false;
        self.attempts = 0;
        self.error = None;
        self.send(method, now, settings);
    }

    pub fn seconds_left(&self, now: DateTime<Utc>) -> i64 {
        match (self.code_sent, self.expires_at) {
            (true, Some(expires_at)) => (expires_at - now).num_seconds().max(0),
            _ => 0,
        }
    }

    pub fn verify(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        settings: &TwoFactorSettings,
    ) -> Result<(), VerificationError> {
        if self.verified {
            return Ok(());
        }

        let result = self.check(code, now, settings);
        self.error = result.as_ref().err().map(|e| e.to_string());
        result
    }

    fn check(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        settings: &TwoFactorSettings,
    ) -> Result<(), VerificationError> {
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(VerificationError::InvalidFormat);
        }
        if !self.code_sent {
            return Err(VerificationError::CodeNotSent);
        }
        if self.seconds_left(now) == 0 {
            self.code_sent = false;
            self.attempts = 0;
            return Err(VerificationError::CodeExpired);
        }

        if code == settings.code {
            self.verified = true;
            return Ok(());
        }

        self.attempts += 1;
        if self.attempts >= settings.max_attempts {
            self.code_sent = false;
            self.attempts = 0;
            return Err(VerificationError::TooManyAttempts);
        }

        Err(VerificationError::InvalidCode {
            attempts_remaining: settings.max_attempts - self.attempts,
        })
    }
}

/// Renders a countdown as `m:ss`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `j***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

/// Keeps the last four digits only.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return "***".to_string();
    }
    let last4: String = digits[digits.len() - 4..].iter().collect();
    format!("***-{}", last4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent_challenge(now: DateTime<Utc>) -> (TwoFactorChallenge, TwoFactorSettings) {
        let settings = TwoFactorSettings::default();
        let mut challenge = TwoFactorChallenge::default();
        challenge.send(VerificationMethod::Sms, now, &settings);
        (challenge, settings)
    }

    #[test]
    fn test_correct_code_verifies() {
        let now = Utc::now();
        let (mut challenge, settings) = sent_challenge(now);

        assert_eq!(challenge.verify("123456", now, &settings), Ok(()));
        assert!(challenge.verified);
        assert!(challenge.error.is_none());
    }

    #[test]
    fn test_three_wrong_codes_force_resend() {
        let now = Utc::now();
        let (mut challenge, settings) = sent_challenge(now);

        assert_eq!(
            challenge.verify("000000", now, &settings),
            Err(VerificationError::InvalidCode { attempts_remaining: 2 })
        );
        assert_eq!(challenge.attempts, 1);
        assert_eq!(
            challenge.verify("111111", now, &settings),
            Err(VerificationError::InvalidCode { attempts_remaining: 1 })
        );
        assert_eq!(challenge.attempts, 2);
        assert_eq!(
            challenge.verify("222222", now, &settings),
            Err(VerificationError::TooManyAttempts)
        );

        assert!(!challenge.code_sent);
        assert_eq!(challenge.attempts, 0);
        assert_eq!(
            challenge.error.as_deref(),
            Some("Too many failed attempts. Please request a new code.")
        );

        // Even the right code is refused until a new one is requested.
        assert_eq!(
            challenge.verify("123456", now, &settings),
            Err(VerificationError::CodeNotSent)
        );
        challenge.resend(VerificationMethod::Sms, now, &settings);
        assert_eq!(challenge.verify("123456", now, &settings), Ok(()));
    }

    #[test]
    fn test_malformed_code_does_not_cost_an_attempt() {
        let now = Utc::now();
        let (mut challenge, settings) = sent_challenge(now);

        assert_eq!(
            challenge.verify("12345", now, &settings),
            Err(VerificationError::InvalidFormat)
        );
        assert_eq!(
            challenge.verify("12a456", now, &settings),
            Err(VerificationError::InvalidFormat)
        );
        assert_eq!(challenge.attempts, 0);
        assert!(challenge.code_sent);
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let now = Utc::now();
        let (mut challenge, settings) = sent_challenge(now);
        let later = now + Duration::seconds(301);

        assert_eq!(challenge.seconds_left(later), 0);
        assert_eq!(
            challenge.verify("123456", later, &settings),
            Err(VerificationError::CodeExpired)
        );
        assert!(!challenge.code_sent);
        assert!(!challenge.verified);
    }

    #[test]
    fn test_resend_resets_countdown_and_attempts() {
        let now = Utc::now();
        let (mut challenge, settings) = sent_challenge(now);
        let _ = challenge.verify("000000", now, &settings);
        assert_eq!(challenge.attempts, 1);

        let later = now + Duration::seconds(120);
        assert_eq!(challenge.seconds_left(later), 180);

        challenge.resend(VerificationMethod::Email, later, &settings);
        assert_eq!(challenge.attempts, 0);
        assert_eq!(challenge.method, VerificationMethod::Email);
        assert_eq!(challenge.seconds_left(later), 300);
        assert!(challenge.error.is_none());
    }

    #[test]
    fn test_unsent_challenge_has_no_countdown() {
        let challenge = TwoFactorChallenge::default();
        assert_eq!(challenge.seconds_left(Utc::now()), 0);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(-3), "0:00");
    }

    #[test]
    fn test_masking() {
        assert_eq!(mask_email("john.doe@example.com"), "j***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_phone("+1 (555) 123-4567"), "***-4567");
        assert_eq!(mask_phone("12"), "***");
    }
}
