//! Search pattern and attribute selection for the user search.
//!
//! A search term is split on whitespace and each token becomes one
//! alternative of a case-insensitive substring match. Tokens are escaped
//! before they reach a regex engine, so user input cannot smuggle in
//! pattern syntax.

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// A searchable attribute of the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SearchAttribute {
    Firstname,
    Lastname,
    Username,
    Email,
    Organisation,
    City,
    Country,
    FieldOfActivity,
    ResearchInterest,
}

impl SearchAttribute {
    /// Attributes searched when the caller does not request a specific set.
    pub fn default_set() -> Vec<SearchAttribute> {
        vec![
            SearchAttribute::Firstname,
            SearchAttribute::Lastname,
            SearchAttribute::Username,
            SearchAttribute::Email,
        ]
    }

    /// Column name of this attribute in a relational backend.
    pub fn column(&self) -> &'static str {
        match self {
            SearchAttribute::Firstname => "firstname",
            SearchAttribute::Lastname => "lastname",
            SearchAttribute::Username => "username",
            SearchAttribute::Email => "email",
            SearchAttribute::Organisation => "organisation",
            SearchAttribute::City => "city",
            SearchAttribute::Country => "country",
            SearchAttribute::FieldOfActivity => "field_of_activity",
            SearchAttribute::ResearchInterest => "research_interest",
        }
    }

    /// The values this attribute contributes for matching on `user`.
    pub fn values<'a>(&self, user: &'a User) -> Vec<&'a str> {
        match self {
            SearchAttribute::Firstname => vec![user.firstname.as_str()],
            SearchAttribute::Lastname => vec![user.lastname.as_str()],
            SearchAttribute::Username => vec![user.username.as_str()],
            SearchAttribute::Email => vec![user.email.as_str()],
            SearchAttribute::Organisation => user.organisation.as_deref().into_iter().collect(),
            SearchAttribute::City => user.city.as_deref().into_iter().collect(),
            SearchAttribute::Country => user.country.as_deref().into_iter().collect(),
            SearchAttribute::FieldOfActivity => vec![user.field_of_activity.as_str()],
            SearchAttribute::ResearchInterest => {
                user.research_interest.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Whitespace-tokenized search term.
///
/// A blank term produces an empty token list, which compiles to a pattern
/// matching every record. The HTTP boundary short-circuits blank terms
/// before they reach a store; the degenerate behaviour is kept here because
/// it is the documented contract of the search itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    tokens: Vec<String>,
}

impl SearchPattern {
    pub fn new(term: &str) -> Self {
        Self {
            tokens: term.split_whitespace().map(str::to_owned).collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Escaped alternation over the tokens, e.g. `ali|arch`.
    pub fn alternation(&self) -> String {
        self.tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Compile to a case-insensitive regex for in-process matching.
    ///
    /// # Errors
    ///
    /// Fails only if the regex engine rejects the (escaped) pattern.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!("(?i){}", self.alternation()))
    }
}

/// A compiled-down search request: what to look for and where.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub pattern: SearchPattern,
    pub attributes: Vec<SearchAttribute>,
}

impl SearchQuery {
    pub fn new(term: &str, attributes: Option<Vec<SearchAttribute>>) -> Self {
        Self {
            pattern: SearchPattern::new(term),
            attributes: attributes.unwrap_or_else(SearchAttribute::default_set),
        }
    }
}
