use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown field '{{{0}}}' in name template")]
    UnknownField(String),

    #[error("Unclosed '{{' in name template")]
    Unclosed,

    #[error("Unmatched '}}' in name template")]
    Unmatched,

    #[error("Invalid format spec '{spec}' for field '{field}'")]
    InvalidSpec { field: String, spec: String },
}

/// Values available to a [`NameTemplate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFields {
    pub lane: u32,
    pub side_number: u32,
    pub column: u32,
    pub row: u32,
}

impl TileFields {
    /// `a` for side 1, `b` for side 2
    #[must_use]
    pub fn side_letter(&self) -> char {
        if self.side_number == 1 {
            'a'
        } else {
            'b'
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Lane,
    SideLetter,
    SideNumber,
    Column,
    Row,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "lane" => Some(Self::Lane),
            "side_letter" => Some(Self::SideLetter),
            "side_number" => Some(Self::SideNumber),
            "column" => Some(Self::Column),
            "row" => Some(Self::Row),
            _ => None,
        }
    }

    /// Integer value of the field; `None` for the side letter
    fn number(self, fields: &TileFields) -> Option<u32> {
        match self {
            Self::Lane => Some(fields.lane),
            Self::SideLetter => None,
            Self::SideNumber => Some(fields.side_number),
            Self::Column => Some(fields.column),
            Self::Row => Some(fields.row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        width: usize,
        zero_pad: bool,
    },
}

/// Tile naming template such as `L{lane}{side_letter}_tile_{side_number}{column}{row:02d}`.
///
/// Integer fields accept a `:Nd` or `:0Nd` width spec. `{{` and `}}` are
/// literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    segments: Vec<Segment>,
}

impl NameTemplate {
    /// Parse a template string
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` for unknown fields, unbalanced braces, or
    /// unsupported format specs.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::Unmatched),
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => body.push(ch),
                            None => return Err(TemplateError::Unclosed),
                        }
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_field(&body)?);
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn render(&self, fields: &TileFields) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field {
                    field,
                    width,
                    zero_pad,
                } => match field.number(fields) {
                    None => out.push(fields.side_letter()),
                    Some(value) if *zero_pad => {
                        out.push_str(&format!("{value:0width$}", width = *width));
                    }
                    Some(value) => out.push_str(&format!("{value:>width$}", width = *width)),
                },
            }
        }
        out
    }
}

fn parse_field(body: &str) -> Result<Segment, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    let field =
        Field::from_name(name).ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;

    let Some(spec) = spec else {
        return Ok(Segment::Field {
            field,
            width: 0,
            zero_pad: false,
        });
    };

    let invalid = || TemplateError::InvalidSpec {
        field: name.to_string(),
        spec: spec.to_string(),
    };

    if field == Field::SideLetter {
        return Err(invalid());
    }

    let digits = spec.strip_suffix('d').unwrap_or(spec);
    let zero_pad = digits.starts_with('0');
    let width = if digits.is_empty() {
        0
    } else {
        digits.parse::<usize>().map_err(|_| invalid())?
    };

    Ok(Segment::Field {
        field,
        width,
        zero_pad,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: TileFields = TileFields {
        lane: 2,
        side_number: 2,
        column: 3,
        row: 7,
    };

    #[test]
    fn test_default_template() {
        let template =
            NameTemplate::parse("L{lane}{side_letter}_tile_{side_number}{column}{row:02d}")
                .unwrap();
        assert_eq!(template.render(&FIELDS), "L2b_tile_2307");
    }

    #[test]
    fn test_prefixed_template() {
        let template =
            NameTemplate::parse("fc_009_L{lane}{side_letter}_tile_{side_number}{column}{row:02d}")
                .unwrap();
        assert_eq!(template.render(&FIELDS), "fc_009_L2b_tile_2307");
    }

    #[test]
    fn test_width_and_escapes() {
        let template = NameTemplate::parse("{{{row:3d}}}-{column:03}").unwrap();
        assert_eq!(template.render(&FIELDS), "{  7}-003");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            NameTemplate::parse("{swath}").unwrap_err(),
            TemplateError::UnknownField("swath".to_string())
        );
        assert_eq!(NameTemplate::parse("{row").unwrap_err(), TemplateError::Unclosed);
        assert_eq!(NameTemplate::parse("row}").unwrap_err(), TemplateError::Unmatched);
        assert!(matches!(
            NameTemplate::parse("{side_letter:02d}").unwrap_err(),
            TemplateError::InvalidSpec { .. }
        ));
        assert!(matches!(
            NameTemplate::parse("{row:xd}").unwrap_err(),
            TemplateError::InvalidSpec { .. }
        ));
    }
}
