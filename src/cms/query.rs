//! Predicate-based search queries
//!
//! A [`Query`] renders to the query-string parameters of the
//! `documents/search` endpoint:
//!
//! ```ignore
//! Query::new(Predicate::at("document.type", "posts"))
//!     .fetch(["posts.title"])
//!     .page_size(1)
//!     .order_by(Ordering::desc("document.first_publication_date"));
//! // q=[[at(document.type, "posts")]]&fetch=posts.title&pageSize=1
//! // &orderings=[document.first_publication_date desc]
//! ```

use std::fmt;

/// A single search predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals value
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, {})]", path, quote(value))
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering on a document field
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Ordering {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => write!(f, "{}", self.field),
            Direction::Desc => write!(f, "{} desc", self.field),
        }
    }
}

/// A search against the CMS
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
    pub orderings: Vec<Ordering>,
    /// Document id to resume after (ordering-relative cursor)
    pub after: Option<String>,
}

impl Query {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
            ..Self::default()
        }
    }

    /// Restrict returned `data` to these `type.field` paths
    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn after(mut self, document_id: &str) -> Self {
        self.after = Some(document_id.to_string());
        self
    }

    /// The `q` parameter
    pub fn q(&self) -> String {
        let predicates: String = self.predicates.iter().map(|p| p.to_string()).collect();
        format!("[{}]", predicates)
    }

    /// Query-string parameters, excluding `ref` and `access_token`
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.q())];

        if !self.fetch.is_empty() {
            params.push(("fetch", self.fetch.join(",")));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if !self.orderings.is_empty() {
            let orderings: Vec<String> = self.orderings.iter().map(|o| o.to_string()).collect();
            params.push(("orderings", format!("[{}]", orderings.join(","))));
        }
        if let Some(ref after) = self.after {
            params.push(("after", after.clone()));
        }

        params
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert_eq!(
            Predicate::at("document.type", "posts").to_string(),
            r#"[at(document.type, "posts")]"#
        );
        assert_eq!(
            Predicate::at("my.posts.uid", r#"say "hi""#).to_string(),
            r#"[at(my.posts.uid, "say \"hi\"")]"#
        );
    }

    #[test]
    fn test_query_params() {
        let query = Query::new(Predicate::at("document.type", "posts"))
            .fetch(["posts.title", "posts.author"])
            .page_size(1)
            .order_by(Ordering::desc("document.last_publication_date"))
            .after("YF0Q");

        let params = query.params();
        assert_eq!(
            params,
            vec![
                ("q", r#"[[at(document.type, "posts")]]"#.to_string()),
                ("fetch", "posts.title,posts.author".to_string()),
                ("pageSize", "1".to_string()),
                (
                    "orderings",
                    "[document.last_publication_date desc]".to_string()
                ),
                ("after", "YF0Q".to_string()),
            ]
        );
    }
}
