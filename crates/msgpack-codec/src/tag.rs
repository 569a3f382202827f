//! Record field tags: `name[,omitempty]`.
//!
//! A tag renames a field on the wire and optionally drops it from the
//! encoded map when its value is empty. Segments are comma separated and
//! trimmed; an empty name keeps the declared field name.

use crate::error::{Error, Result};

const OMITEMPTY: &str = "omitempty";

/// Parsed field tag. Never written to the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Wire name override. `None` keeps the declared field name.
    pub name: Option<String>,
    pub omit_if_empty: bool,
}

/// Wire name and options of one field, borrowed from its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub name: &'a str,
    pub omit_if_empty: bool,
}

impl FieldTag {
    pub fn parse(tag: &str) -> Result<FieldTag> {
        let (name, omit_if_empty) = split(tag)?;
        Ok(FieldTag {
            name: (!name.is_empty()).then(|| name.to_string()),
            omit_if_empty,
        })
    }

    /// Resolves the wire name of a field declared as `declared`, with an
    /// optional tag.
    pub fn resolve<'a>(declared: &'a str, tag: Option<&'a str>) -> Result<ResolvedField<'a>> {
        let Some(tag) = tag else {
            return Ok(ResolvedField {
                name: declared,
                omit_if_empty: false,
            });
        };
        let (name, omit_if_empty) = split(tag)?;
        Ok(ResolvedField {
            name: if name.is_empty() { declared } else { name },
            omit_if_empty,
        })
    }

    /// The wire name for a field declared as `declared`.
    pub fn resolve_name<'a>(&'a self, declared: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(declared)
    }
}

fn split(tag: &str) -> Result<(&str, bool)> {
    let mut segments = tag.split(',').map(str::trim);
    let name = segments.next().unwrap_or_default();
    let mut omit_if_empty = false;
    for option in segments {
        match option {
            OMITEMPTY => omit_if_empty = true,
            "" => {
                return Err(Error::InvalidFieldTag {
                    tag: tag.to_string(),
                    reason: "empty option",
                })
            }
            _ => {
                return Err(Error::InvalidFieldTag {
                    tag: tag.to_string(),
                    reason: "unknown option",
                })
            }
        }
    }
    Ok((name, omit_if_empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_and_option() {
        assert_eq!(
            FieldTag::parse("model,omitempty").unwrap(),
            FieldTag {
                name: Some("model".into()),
                omit_if_empty: true
            }
        );
        assert_eq!(
            FieldTag::parse(" year ").unwrap(),
            FieldTag {
                name: Some("year".into()),
                omit_if_empty: false
            }
        );
    }

    #[test]
    fn empty_name_keeps_declared() {
        let tag = FieldTag::parse(",omitempty").unwrap();
        assert_eq!(tag.name, None);
        assert!(tag.omit_if_empty);
        assert_eq!(tag.resolve_name("Brand"), "Brand");

        let field = FieldTag::resolve("Brand", Some(" , omitempty ")).unwrap();
        assert_eq!(field.name, "Brand");
        assert!(field.omit_if_empty);
    }

    #[test]
    fn untagged_field_uses_declared_name() {
        let field = FieldTag::resolve("Year", None).unwrap();
        assert_eq!(
            field,
            ResolvedField {
                name: "Year",
                omit_if_empty: false
            }
        );
        assert_eq!(FieldTag::parse("").unwrap(), FieldTag::default());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = FieldTag::parse("name,string").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldTag { reason: "unknown option", .. }
        ));
        assert_eq!(err.category(), crate::ErrorCategory::FieldTag);
        assert!(FieldTag::resolve("x", Some("x,")).is_err());
    }
}
