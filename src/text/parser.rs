//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Recursive-descent parser over the GTOa grammar.
//!
//! Consumes the flat [`PosToken`] stream from `lexer::tokenize` and builds a
//! [`crate::model::File`] directly; there is no separate untyped AST stage.

use crate::document::DataType;
use crate::error::{Error, Location, Result};
use crate::half_float::float_to_half;
use crate::model::{Component, File, Object, Property, Value, DEFAULT_DIMS};
use crate::text::lexer::{PosToken, Token};

/// Parses a complete token stream into a [`File`].
pub fn parse(tokens: &[PosToken]) -> Result<File> {
    Parser { tokens, pos: 0 }.parse_file()
}

struct Parser<'a> {
    tokens: &'a [PosToken],
    pos: usize,
}

enum Item {
    Scalar(Token),
    Group(Vec<Token>),
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a PosToken> {
        self.tokens.get(self.pos)
    }

    fn location(&self) -> Location {
        match self.current() {
            Some(t) => Location::LineCol(t.line, t.column),
            None => self.tokens.last().map(|t| Location::LineCol(t.line, t.column)).unwrap_or(Location::Unknown),
        }
    }

    fn advance(&mut self) -> Option<&'a PosToken> {
        let token = self.current();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &[&str]) -> Error {
        Error::UnexpectedToken {
            location: self.location(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn expect(&mut self, expected: &Token, description: &str) -> Result<()> {
        match self.current() {
            Some(t) if &t.token == expected => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&[description])),
        }
    }

    fn expect_ident(&mut self, text: &str) -> Result<()> {
        match self.current() {
            Some(PosToken { token: Token::Ident(s), .. }) if s == text => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&[text])),
        }
    }

    fn peek_ident_is(&self, text: &str) -> bool {
        matches!(self.current(), Some(PosToken { token: Token::Ident(s), .. }) if s == text)
    }

    fn is_eof(&self) -> bool {
        self.current().is_none()
    }

    /// `name := identifier | quoted-string`
    fn parse_name(&mut self) -> Result<String> {
        match self.current().map(|t| t.token.clone()) {
            Some(Token::Ident(s)) => {
                self.advance();
                Ok(s)
            }
            Some(Token::QuotedString(s)) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected(&["a name"])),
        }
    }

    /// `file := "GTOa" "(" integer ")" object*`
    fn parse_file(&mut self) -> Result<File> {
        self.expect_ident("GTOa")?;
        self.expect(&Token::LParen, "(")?;
        let version = self.parse_uint()?;
        self.expect(&Token::RParen, ")")?;

        let mut objects = Vec::new();
        while !self.is_eof() {
            objects.push(self.parse_object()?);
        }

        Ok(File { version, flags: 0, objects })
    }

    /// `object := name ":" protocol ("(" integer ")")? "{" component* "}"`
    fn parse_object(&mut self) -> Result<Object> {
        let name = self.parse_name()?;
        self.expect(&Token::Colon, ":")?;
        let protocol = self.parse_name()?;
        let protocol_version = if self.current().map(|t| &t.token) == Some(&Token::LParen) {
            self.advance();
            let version = self.parse_uint()?;
            self.expect(&Token::RParen, ")")?;
            version
        } else {
            1
        };

        self.expect(&Token::LBrace, "{")?;
        let mut components = Vec::new();
        while self.current().map(|t| &t.token) != Some(&Token::RBrace) {
            components.push(self.parse_component()?);
        }
        self.expect(&Token::RBrace, "}")?;

        Ok(Object { name, protocol, protocol_version, components })
    }

    /// `component := name ("as" string-literal-or-identifier)? "{" property* "}"`
    fn parse_component(&mut self) -> Result<Component> {
        let name = self.parse_name()?;
        let interpretation = if self.peek_ident_is("as") {
            self.advance();
            self.parse_name()?
        } else {
            String::new()
        };

        self.expect(&Token::LBrace, "{")?;
        let mut properties = Vec::new();
        while self.current().map(|t| &t.token) != Some(&Token::RBrace) {
            properties.push(self.parse_property()?);
        }
        self.expect(&Token::RBrace, "}")?;

        Ok(Component { name, interpretation, child_level: 0, properties })
    }

    /// `property := type ("[" integer "]")? name ("as" interpretation)? "=" value`
    fn parse_property(&mut self) -> Result<Property> {
        let kind = self.parse_type()?;

        let width = if self.current().map(|t| &t.token) == Some(&Token::LBracket) {
            self.advance();
            let width = self.parse_uint()?;
            self.expect(&Token::RBracket, "]")?;
            width
        } else {
            1
        };

        let name = self.parse_name()?;
        let interpretation = if self.peek_ident_is("as") {
            self.advance();
            self.parse_name()?
        } else {
            String::new()
        };

        self.expect(&Token::Equals, "=")?;
        let (value, size) = self.parse_value(kind, width)?;

        Ok(Property { name, interpretation, width, size, dims: DEFAULT_DIMS, value })
    }

    fn parse_type(&mut self) -> Result<DataType> {
        let location = self.location();
        match self.current().map(|t| t.token.clone()) {
            Some(Token::Ident(name)) => {
                self.advance();
                DataType::from_keyword(&name).ok_or(Error::UnknownType { location, name })
            }
            _ => Err(self.unexpected(&["a type keyword"])),
        }
    }

    fn parse_uint(&mut self) -> Result<u32> {
        let location = self.location();
        match self.current().map(|t| t.token.clone()) {
            Some(Token::Number(text)) => {
                self.advance();
                text.parse::<u32>().map_err(|_| Error::SyntaxError { location })
            }
            _ => Err(self.unexpected(&["an integer"])),
        }
    }

    /// `value := scalar | "[" (scalar | "[" scalar+ "]")* "]"`
    fn parse_value(&mut self, kind: DataType, width: u32) -> Result<(Value, u32)> {
        if self.current().map(|t| &t.token) != Some(&Token::LBracket) {
            if width > 1 {
                return Err(Error::WidthMismatch { location: self.location(), width, found: 1 });
            }
            let scalar = self.parse_scalar_token()?;
            let value = build_value(kind, vec![scalar], self.location())?;
            return Ok((value, 1));
        }

        self.advance(); // consume outer '['
        let mut items = Vec::new();
        while self.current().map(|t| &t.token) != Some(&Token::RBracket) {
            if self.current().map(|t| &t.token) == Some(&Token::LBracket) {
                self.advance();
                let mut scalars = Vec::new();
                while self.current().map(|t| &t.token) != Some(&Token::RBracket) {
                    scalars.push(self.parse_scalar_token()?);
                }
                self.expect(&Token::RBracket, "]")?;
                if scalars.is_empty() {
                    return Err(self.unexpected(&["at least one scalar in group"]));
                }
                items.push(Item::Group(scalars));
            } else {
                items.push(Item::Scalar(self.parse_scalar_token()?));
            }
        }
        self.expect(&Token::RBracket, "]")?;

        let all_groups = !items.is_empty() && items.iter().all(|i| matches!(i, Item::Group(_)));

        let (flat, size) = if all_groups {
            let group_width = width.max(1);
            let mut flat = Vec::new();
            let mut groups = 0u32;
            for item in items {
                if let Item::Group(scalars) = item {
                    if scalars.len() as u32 != group_width {
                        return Err(Error::WidthMismatch {
                            location: self.location(),
                            width: group_width,
                            found: scalars.len(),
                        });
                    }
                    flat.extend(scalars);
                    groups += 1;
                }
            }
            (flat, groups)
        } else {
            let mut flat = Vec::new();
            for item in items {
                match item {
                    Item::Scalar(tok) => flat.push(tok),
                    Item::Group(scalars) => flat.extend(scalars),
                }
            }
            if width > 1 {
                if flat.len() % width as usize != 0 {
                    return Err(Error::WidthMismatch { location: self.location(), width, found: flat.len() });
                }
                let size = flat.len() as u32 / width;
                (flat, size)
            } else {
                let size = flat.len() as u32;
                (flat, size)
            }
        };

        let value = build_value(kind, flat, self.location())?;
        Ok((value, size))
    }

    fn parse_scalar_token(&mut self) -> Result<Token> {
        match self.current().map(|t| t.token.clone()) {
            Some(t @ Token::Number(_)) | Some(t @ Token::QuotedString(_)) | Some(t @ Token::Ident(_)) => {
                self.advance();
                Ok(t)
            }
            _ => Err(self.unexpected(&["a scalar value"])),
        }
    }
}

fn parse_special_float(text: &str) -> Option<f64> {
    match text {
        "nan" => Some(f64::NAN),
        "inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn build_value(kind: DataType, tokens: Vec<Token>, location: Location) -> Result<Value> {
    Ok(match kind {
        DataType::Int => Value::Int(
            tokens
                .into_iter()
                .map(|t| as_number(&t, location)?.parse::<i32>().map_err(|_| Error::SyntaxError { location }))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::Int64 => Value::Int64(
            tokens
                .into_iter()
                .map(|t| as_number(&t, location)?.parse::<i64>().map_err(|_| Error::SyntaxError { location }))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::Short => Value::Short(
            tokens
                .into_iter()
                .map(|t| as_number(&t, location)?.parse::<u16>().map_err(|_| Error::SyntaxError { location }))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::Byte => Value::Byte(
            tokens
                .into_iter()
                .map(|t| as_number(&t, location)?.parse::<u8>().map_err(|_| Error::SyntaxError { location }))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::Bool => Value::Bool(
            tokens
                .into_iter()
                .map(|t| Ok(as_number(&t, location)?.parse::<i64>().map_err(|_| Error::SyntaxError { location })? != 0))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::Float => Value::Float(tokens.into_iter().map(|t| parse_float(&t, location)).collect::<Result<Vec<_>>>()?),
        DataType::Double => {
            Value::Double(tokens.into_iter().map(|t| parse_double(&t, location)).collect::<Result<Vec<_>>>()?)
        }
        DataType::Half => Value::Half(
            tokens
                .into_iter()
                .map(|t| parse_float(&t, location).map(float_to_half))
                .collect::<Result<Vec<_>>>()?,
        ),
        DataType::String => Value::String(
            tokens
                .into_iter()
                .map(|t| match t {
                    Token::QuotedString(s) => Ok(s),
                    _ => Err(Error::UnexpectedToken { location, expected: vec!["a quoted string".to_string()] }),
                })
                .collect::<Result<Vec<_>>>()?,
        ),
    })
}

fn as_number(token: &Token, location: Location) -> Result<&str> {
    match token {
        Token::Number(text) => Ok(text.as_str()),
        _ => Err(Error::UnexpectedToken { location, expected: vec!["a number".to_string()] }),
    }
}

fn parse_float(token: &Token, location: Location) -> Result<f32> {
    match token {
        Token::Number(text) => text.parse::<f32>().map_err(|_| Error::SyntaxError { location }),
        Token::Ident(text) => parse_special_float(text).map(|v| v as f32).ok_or(Error::UnexpectedToken {
            location,
            expected: vec!["a float literal".to_string()],
        }),
        _ => Err(Error::UnexpectedToken { location, expected: vec!["a float literal".to_string()] }),
    }
}

fn parse_double(token: &Token, location: Location) -> Result<f64> {
    match token {
        Token::Number(text) => text.parse::<f64>().map_err(|_| Error::SyntaxError { location }),
        Token::Ident(text) => parse_special_float(text).ok_or(Error::UnexpectedToken {
            location,
            expected: vec!["a double literal".to_string()],
        }),
        _ => Err(Error::UnexpectedToken { location, expected: vec!["a double literal".to_string()] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lexer::tokenize;

    fn parse_str(input: &str) -> Result<File> {
        parse(&tokenize(input).unwrap())
    }

    #[test]
    fn test_empty_file() {
        let file = parse_str("GTOa (4)\n\n").unwrap();
        assert_eq!(file.version, 4);
        assert!(file.objects.is_empty());
    }

    #[test]
    fn test_single_scalar_property() {
        let file = parse_str(
            r#"GTOa (4)

            cube : polygon {
                points {
                    int count = 8
                }
            }
            "#,
        )
        .unwrap();

        let object = &file.objects[0];
        assert_eq!(object.name, "cube");
        assert_eq!(object.protocol, "polygon");
        assert_eq!(object.protocol_version, 1);

        let component = &object.components[0];
        assert_eq!(component.name, "points");

        let property = &component.properties[0];
        assert_eq!(property.name, "count");
        assert_eq!(property.width, 1);
        assert_eq!(property.size, 1);
        assert_eq!(property.value, Value::Int(vec![8]));
    }

    #[test]
    fn test_grouped_vector_property() {
        let file = parse_str(
            r#"GTOa (4)

            cube : polygon {
                points {
                    float[3] position = [ [0.0 0.0 0.0] [1.0 0.0 0.0] ]
                }
            }
            "#,
        )
        .unwrap();

        let property = &file.objects[0].components[0].properties[0];
        assert_eq!(property.width, 3);
        assert_eq!(property.size, 2);
        assert_eq!(property.value, Value::Float(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_flat_vector_property_divisible_by_width() {
        let file = parse_str(
            r#"GTOa (4)

            cube : polygon {
                points {
                    float[3] position = [ 0.0 0.0 0.0 1.0 0.0 0.0 ]
                }
            }
            "#,
        )
        .unwrap();

        let property = &file.objects[0].components[0].properties[0];
        assert_eq!(property.size, 2);
    }

    #[test]
    fn test_width_mismatch_is_reported() {
        let result = parse_str(
            r#"GTOa (4)

            cube : polygon {
                points {
                    float[3] position = [ 0.0 0.0 ]
                }
            }
            "#,
        );
        assert!(matches!(result, Err(Error::WidthMismatch { width: 3, found: 2, .. })));
    }

    #[test]
    fn test_as_interpretation_on_component_and_property() {
        let file = parse_str(
            r#"GTOa (4)

            scene : thing {
                "pen:42:7:user" as paint {
                    string note as description = "hello"
                }
            }
            "#,
        )
        .unwrap();

        let component = &file.objects[0].components[0];
        assert_eq!(component.name, "pen:42:7:user");
        assert_eq!(component.interpretation, "paint");

        let property = &component.properties[0];
        assert_eq!(property.interpretation, "description");
        assert_eq!(property.value, Value::String(vec!["hello".to_string()]));
    }

    #[test]
    fn test_nan_and_inf_float_literals() {
        let file = parse_str(
            r#"GTOa (4)

            o : p {
                c {
                    float f = nan
                    double d = -inf
                }
            }
            "#,
        )
        .unwrap();

        let properties = &file.objects[0].components[0].properties;
        match &properties[0].value {
            Value::Float(v) => assert!(v[0].is_nan()),
            _ => panic!("expected Float"),
        }
        assert_eq!(properties[1].value, Value::Double(vec![f64::NEG_INFINITY]));
    }

    #[test]
    fn test_object_with_explicit_protocol_version() {
        let file = parse_str(
            r#"GTOa (4)

            o : polygon (3) {
            }
            "#,
        )
        .unwrap();
        assert_eq!(file.objects[0].protocol_version, 3);
    }
}
