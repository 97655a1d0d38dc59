//! Route path constants, grouped the way the routers are.

pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

pub mod auth {
    pub const REGISTER: &str = "/auth/register";
    pub const LOGIN: &str = "/auth/login";
    pub const TOKEN: &str = "/auth/token";
    pub const VALIDATE: &str = "/auth/validate";
    pub const SECURITY_QUESTION: &str = "/auth/security-question";
    pub const SECURITY_ANSWER: &str = "/auth/security-answer";
}

pub mod users {
    pub const USERS: &str = "/users";
    pub const USER_BY_ID: &str = "/users/:id";
    pub const ROLE: &str = "/users/:id/role";
    pub const RESEARCH_INTERESTS: &str = "/users/:id/research-interests";
    pub const QUERY: &str = "/users/query";
    pub const PASSWORD: &str = "/users/:id/password";
    pub const DELETE: &str = "/users/delete";
}

pub mod validation {
    pub const USERNAME: &str = "/validation/username";
    pub const EMAIL: &str = "/validation/email";
}

pub mod meta {
    pub const SECURITY_QUESTIONS: &str = "/meta/security-questions";
    pub const RESEARCH_INTERESTS: &str = "/meta/research-interests";
}
