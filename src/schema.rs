//! Structural validation of request payloads and fetched resources.
//!
//! Validators walk a `serde_json::Value`, collect every violation with its
//! path, and only then build the typed value. Checks are limited to types,
//! required fields, enum membership and string formats.

use serde_json::{Map, Value};
use std::fmt;

use crate::model::project::{CreateProject, Visibility};
use crate::model::work_item::{CreateWorkItem, WorkItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<String>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for Violations {}

#[derive(Clone, Copy)]
enum Format {
    Plain,
    NonEmpty,
    DateTime,
    Email,
    Url,
}

struct Checker<'a> {
    object: &'a Map<String, Value>,
    prefix: String,
    violations: &'a mut Vec<String>,
}

impl<'a> Checker<'a> {
    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    fn string(&mut self, key: &str, format: Format, required: bool) {
        let path = self.path(key);
        match self.object.get(key) {
            None | Some(Value::Null) if !required => {}
            None | Some(Value::Null) => self.violations.push(format!("{path}: required")),
            Some(Value::String(s)) => {
                if let Some(problem) = check_format(s, format) {
                    self.violations.push(format!("{path}: {problem}"));
                }
            }
            Some(_) => self.violations.push(format!("{path}: expected string")),
        }
    }

    fn number(&mut self, key: &str) {
        let path = self.path(key);
        match self.object.get(key) {
            Some(Value::Number(_)) => {}
            None | Some(Value::Null) => self.violations.push(format!("{path}: required")),
            Some(_) => self.violations.push(format!("{path}: expected number")),
        }
    }

    /// Run `f` against a nested object. Returns without calling `f` if the key is absent and optional.
    fn object<F>(&mut self, key: &str, required: bool, f: F)
    where
        F: FnOnce(&mut Checker<'_>),
    {
        let path = self.path(key);
        match self.object.get(key) {
            None | Some(Value::Null) if !required => {}
            None | Some(Value::Null) => self.violations.push(format!("{path}: required")),
            Some(Value::Object(inner)) => {
                let mut nested = Checker {
                    object: inner,
                    prefix: path,
                    violations: &mut *self.violations,
                };
                f(&mut nested);
            }
            Some(_) => self.violations.push(format!("{path}: expected object")),
        }
    }
}

fn check_format(value: &str, format: Format) -> Option<&'static str> {
    match format {
        Format::Plain => None,
        Format::NonEmpty if value.is_empty() => Some("must not be empty"),
        Format::NonEmpty => None,
        Format::DateTime if chrono::DateTime::parse_from_rfc3339(value).is_err() => {
            Some("invalid datetime")
        }
        Format::DateTime => None,
        Format::Email if !is_email(value) => Some("invalid email"),
        Format::Email => None,
        Format::Url if reqwest::Url::parse(value).is_err() => Some("invalid url"),
        Format::Url => None,
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn with_object<T, F>(value: &Value, f: F) -> Result<T, Violations>
where
    F: FnOnce(&mut Checker<'_>) -> Option<T>,
{
    let Value::Object(object) = value else {
        return Err(Violations(vec!["expected object".into()]));
    };
    let mut violations = Vec::new();
    let mut checker = Checker {
        object,
        prefix: String::new(),
        violations: &mut violations,
    };
    let result = f(&mut checker);
    match result {
        Some(value) if violations.is_empty() => Ok(value),
        _ => Err(Violations(violations)),
    }
}

fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str)
}

pub fn validate_create_project(payload: &Value) -> Result<CreateProject, Violations> {
    with_object(payload, |c| {
        c.string("name", Format::NonEmpty, true);
        c.string("description", Format::Plain, false);
        let visibility = match c.object.get("visibility") {
            Some(Value::String(v)) => Visibility::parse(v),
            _ => None,
        };
        if visibility.is_none() {
            c.violations
                .push("visibility: Visibility must be either 'private' or 'public'".into());
        }
        Some(CreateProject {
            name: str_field(payload, "name")?.to_string(),
            description: str_field(payload, "description").map(String::from),
            visibility: visibility?,
        })
    })
}

pub fn validate_create_work_item(payload: &Value) -> Result<CreateWorkItem, Violations> {
    with_object(payload, |c| {
        c.string("title", Format::Plain, true);
        c.string("description", Format::Plain, false);
        c.string("workItemType", Format::NonEmpty, true);
        Some(CreateWorkItem {
            title: str_field(payload, "title")?.to_string(),
            description: str_field(payload, "description").map(String::from),
            work_item_type: str_field(payload, "workItemType")?.to_string(),
        })
    })
}

fn identity(c: &mut Checker<'_>) {
    c.string("displayName", Format::Plain, true);
    c.string("uniqueName", Format::Email, true);
}

/// Check the shape of a `GET workitems/{id}` response and keep only the known fields.
pub fn validate_work_item(response: &Value) -> Result<WorkItem, Violations> {
    let checked = with_object(response, |c| {
        c.number("id");
        c.number("rev");
        c.object("fields", true, |f| {
            for key in [
                "System.AreaPath",
                "System.TeamProject",
                "System.IterationPath",
                "System.WorkItemType",
                "System.State",
                "System.Reason",
                "System.Title",
            ] {
                f.string(key, Format::Plain, true);
            }
            f.string("System.CreatedDate", Format::DateTime, true);
            f.object("System.CreatedBy", true, identity);
            f.string("System.ChangedDate", Format::DateTime, true);
            f.object("System.ChangedBy", true, identity);
            f.string("Microsoft.VSTS.Common.ClosedDate", Format::DateTime, false);
            f.object("Microsoft.VSTS.Common.ClosedBy", false, identity);
            f.number("Microsoft.VSTS.Common.Priority");
            f.string("System.Description", Format::Plain, false);
        });
        c.object("_links", true, |l| {
            l.object("html", true, |h| h.string("href", Format::Url, true));
        });
        c.string("url", Format::Url, true);
        Some(())
    });
    checked?;
    serde_json::from_value(response.clone()).map_err(|e| Violations(vec![e.to_string()]))
}
