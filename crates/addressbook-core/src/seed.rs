//! Seed data for an empty store
//!
//! The first time the store is opened with no contacts it asks a
//! [`SeedSource`] for a batch of sample records. The default source is the
//! public random-user service; tests and offline setups plug in their own.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::Contact;

/// Seed value sent to the random-user service so every run gets the same people
const DEFAULT_SEED: &str = "contacts";

/// Errors from a seed source. Seeding failures never abort initialization.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Could not reach the service
    #[error("Seed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than 200
    #[error("Seed source returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected JSON
    #[error("Could not parse seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can supply sample contacts
///
/// Returned contacts carry placeholder ids; the store assigns `1..=N`
/// in the order they are returned.
pub trait SeedSource {
    fn fetch(&self, count: usize) -> Result<Vec<Contact>, SeedError>;
}

/// A source that never yields anything (seeding disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSeed;

impl SeedSource for NoSeed {
    fn fetch(&self, _count: usize) -> Result<Vec<Contact>, SeedError> {
        Ok(Vec::new())
    }
}

/// Fetches contacts from a randomuser.me compatible endpoint
#[derive(Debug, Clone)]
pub struct RandomUserSource {
    base_url: String,
    seed: String,
    timeout: Duration,
}

impl RandomUserSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            seed: DEFAULT_SEED.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.seed_url.clone()).with_timeout(Duration::from_secs(config.seed_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    /// Full request URL for `count` users
    pub fn request_url(&self, count: usize) -> String {
        format!(
            "{}?results={}&exc=login,location&nat=us&noinfo&seed={}",
            self.base_url, count, self.seed
        )
    }
}

impl SeedSource for RandomUserSource {
    fn fetch(&self, count: usize) -> Result<Vec<Contact>, SeedError> {
        let url = self.request_url(count);
        debug!(%url, "Fetching seed contacts");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent("Mozilla/5.0 (compatible; addressbook/1.0)")
            .build()?;

        let response = client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(SeedError::Status(response.status().as_u16()));
        }

        let body = response.text()?;
        parse_random_users(&body)
    }
}

// ==================== Wire format ====================

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
    results: Vec<RandomUser>,
}

#[derive(Debug, Deserialize)]
struct RandomUser {
    name: RandomUserName,
    dob: RandomUserDob,
    email: Option<String>,
    phone: Option<String>,
    picture: Option<RandomUserPicture>,
}

#[derive(Debug, Deserialize)]
struct RandomUserName {
    first: Option<String>,
    last: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RandomUserDob {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RandomUserPicture {
    medium: Option<String>,
}

/// Parse a random-user response body into contacts
///
/// Birth dates are instants; they are reduced to the UTC calendar date.
pub fn parse_random_users(body: &str) -> Result<Vec<Contact>, SeedError> {
    let response: RandomUserResponse = serde_json::from_str(body)?;

    Ok(response
        .results
        .into_iter()
        .enumerate()
        .map(|(i, user)| Contact {
            id: i as i64 + 1,
            first_name: user.name.first,
            last_name: user.name.last,
            phone_number: user.phone,
            email: user.email,
            birth_date: Some(user.dob.date.date_naive()),
            image: user
                .picture
                .and_then(|p| p.medium)
                .unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"{
        "results": [
            {
                "gender": "female",
                "name": { "title": "Ms", "first": "Jennie", "last": "Nichols" },
                "email": "jennie.nichols@example.com",
                "dob": { "date": "1992-03-08T15:13:16.688Z", "age": 30 },
                "phone": "(272) 790-0888",
                "cell": "(489) 330-2385",
                "picture": {
                    "large": "https://randomuser.me/api/portraits/women/75.jpg",
                    "medium": "https://randomuser.me/api/portraits/med/women/75.jpg",
                    "thumbnail": "https://randomuser.me/api/portraits/thumb/women/75.jpg"
                },
                "nat": "US"
            },
            {
                "name": { "first": "Brad", "last": "Gibson" },
                "email": "brad.gibson@example.com",
                "dob": { "date": "1993-07-20T23:59:59Z" },
                "phone": "011-962-7516"
            }
        ]
    }"#;

    #[test]
    fn test_parse_random_users() {
        let contacts = parse_random_users(SAMPLE).unwrap();
        assert_eq!(contacts.len(), 2);

        let jennie = &contacts[0];
        assert_eq!(jennie.id, 1);
        assert_eq!(jennie.first_name.as_deref(), Some("Jennie"));
        assert_eq!(jennie.last_name.as_deref(), Some("Nichols"));
        assert_eq!(jennie.phone_number.as_deref(), Some("(272) 790-0888"));
        assert_eq!(jennie.birth_date, NaiveDate::from_ymd_opt(1992, 3, 8));
        assert_eq!(
            jennie.image,
            "https://randomuser.me/api/portraits/med/women/75.jpg"
        );
    }

    #[test]
    fn test_parse_missing_picture_defaults_to_empty() {
        let contacts = parse_random_users(SAMPLE).unwrap();
        assert_eq!(contacts[1].id, 2);
        assert!(contacts[1].image.is_empty());
        assert_eq!(contacts[1].birth_date, NaiveDate::from_ymd_opt(1993, 7, 20));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_random_users("<html>rate limited</html>"),
            Err(SeedError::Parse(_))
        ));
        assert!(matches!(
            parse_random_users(r#"{"error": "Uh oh"}"#),
            Err(SeedError::Parse(_))
        ));
    }

    #[test]
    fn test_request_url() {
        let source = RandomUserSource::new("https://randomuser.me/api/");
        assert_eq!(
            source.request_url(20),
            "https://randomuser.me/api/?results=20&exc=login,location&nat=us&noinfo&seed=contacts"
        );

        let source = source.with_seed("other");
        assert!(source.request_url(5).ends_with("results=5&exc=login,location&nat=us&noinfo&seed=other"));
    }

    #[test]
    fn test_unreachable_source_is_an_error() {
        // Port 9 (discard) on localhost is closed on any sane test machine
        let source = RandomUserSource::new("http://127.0.0.1:9/api/")
            .with_timeout(Duration::from_secs(2));
        assert!(matches!(source.fetch(3), Err(SeedError::Http(_))));
    }

    #[test]
    fn test_no_seed_is_empty() {
        assert!(NoSeed.fetch(20).unwrap().is_empty());
    }
}
