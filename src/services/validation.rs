use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Field name -> first failing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` unless `field` already has an error.
    pub fn add(&mut self, field: &str, message: &str) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Read access to a form's current input values.
pub trait FormData {
    fn field(&self, name: &str) -> &str;
}

#[derive(Debug, Clone)]
pub enum Rule {
    Required(&'static str),
    Email(&'static str),
    MinLength(usize, &'static str),
    /// Required whenever the named field is non-empty.
    RequiredWhen(&'static str, &'static str),
    /// Must equal the named field.
    Matches(&'static str, &'static str),
}

impl Rule {
    fn check(&self, value: &str, form: &dyn FormData) -> Option<&'static str> {
        match self {
            Rule::Required(msg) => value.is_empty().then_some(*msg),
            Rule::Email(msg) => (!value.is_empty() && !is_valid_email(value)).then_some(*msg),
            Rule::MinLength(min, msg) => (value.chars().count() < *min).then_some(*msg),
            Rule::RequiredWhen(other, msg) => {
                (!form.field(other).is_empty() && value.is_empty()).then_some(*msg)
            }
            Rule::Matches(other, msg) => (value != form.field(other)).then_some(*msg),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Checks every field and collects all failures.
    pub fn validate(&self, form: &dyn FormData) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (name, rules) in &self.fields {
            let value = form.field(name);
            if let Some(msg) = rules.iter().find_map(|rule| rule.check(value, form)) {
                errors.add(name, msg);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub fn sign_in_schema() -> Schema {
    Schema::new()
        .field(
            "email",
            vec![
                Rule::Required("Email is required"),
                Rule::Email("Use a valid mail"),
            ],
        )
        .field("password", vec![Rule::Required("Password is required")])
}

pub fn sign_up_schema() -> Schema {
    Schema::new()
        .field("name", vec![Rule::Required("Name is required")])
        .field(
            "email",
            vec![
                Rule::Required("Email is required"),
                Rule::Email("Use a valid mail"),
            ],
        )
        .field("password", vec![Rule::MinLength(6, "Minimum 6 characters")])
}

pub fn profile_schema() -> Schema {
    Schema::new()
        .field("name", vec![Rule::Required("Name is required")])
        .field(
            "email",
            vec![
                Rule::Required("Email is required"),
                Rule::Email("Use a valid mail"),
            ],
        )
        .field(
            "password",
            vec![Rule::RequiredWhen("old_password", "New password required")],
        )
        .field(
            "password_confirmation",
            vec![
                Rule::RequiredWhen("old_password", "New password confirmation required"),
                Rule::Matches("password", "The new password must match"),
            ],
        )
}
