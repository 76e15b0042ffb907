//! Parsing of CQL type names such as `map<varint, frozen<list<text>>>`.

use std::str::FromStr;

use crate::data_type::DataType;
use crate::error::Error;
use crate::kind::ScalarKind;

impl FromStr for DataType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { rest: input };
        let parsed = parser.parse_type().and_then(|data_type| {
            parser.skip_whitespace();
            parser.rest.is_empty().then_some(data_type)
        });
        parsed.ok_or_else(|| {
            log::debug!("unsupported type name {:?}", input);
            Error::UnsupportedTypeName(input.to_string())
        })
    }
}

struct Parser<'a> {
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn identifier(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (ident, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(ident)
    }

    /// Parses `<t1, t2, ...>`, returning an empty list when no bracket follows.
    fn parameters(&mut self) -> Option<Vec<DataType>> {
        if !self.eat('<') {
            return Some(Vec::new());
        }
        let mut params = vec![self.parse_type()?];
        while self.eat(',') {
            params.push(self.parse_type()?);
        }
        self.eat('>').then_some(params)
    }

    fn parse_type(&mut self) -> Option<DataType> {
        let name = self.identifier()?.to_ascii_lowercase();
        let params = self.parameters()?;

        if let Some(kind) = ScalarKind::from_name(&name) {
            return params.is_empty().then_some(DataType::Scalar(kind));
        }

        let mut params = params.into_iter();
        let data_type = match (name.as_str(), params.len()) {
            ("frozen", 1) => params.next()?,
            ("list", 1) => DataType::collection(params.next()?),
            ("set", 1) => DataType::set(params.next()?),
            ("map", 2) => {
                let key = params.next()?;
                DataType::map(key, params.next()?)
            }
            ("tuple", n) if n > 0 => DataType::tuple(params),
            _ => return None,
        };
        Some(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> DataType {
        input.parse().unwrap()
    }

    #[test]
    fn scalar_names() {
        for kind in ScalarKind::all() {
            assert_eq!(parse(kind.name()), DataType::Scalar(kind));
        }
        assert_eq!(parse(" VarChar "), DataType::varchar());
    }

    #[test]
    fn parameterized_names() {
        assert_eq!(
            parse("map<varint, varchar>"),
            DataType::map(DataType::varint(), DataType::varchar())
        );
        assert_eq!(parse("set<uuid>"), DataType::set(DataType::uuid()));
        assert_eq!(
            parse("tuple< int ,text >"),
            DataType::tuple([DataType::int(), DataType::text()])
        );
        assert_eq!(
            parse("map<text, frozen<list<set<int>>>>"),
            DataType::map(
                DataType::text(),
                DataType::collection(DataType::set(DataType::int()))
            )
        );
    }

    #[test]
    fn display_parses_back() {
        let data_type = DataType::map(
            DataType::tuple([DataType::int(), DataType::set(DataType::ascii())]),
            DataType::collection(DataType::decimal()),
        );
        assert_eq!(parse(&data_type.to_string()), data_type);
    }

    #[test]
    fn rejects_malformed_names() {
        for input in [
            "",
            "custom",
            "string",
            "int<text>",
            "list",
            "list<int",
            "map<int>",
            "set<int, int>",
            "tuple<>",
            "list<int> trailing",
            "map<int,>",
        ] {
            let err = input.parse::<DataType>().unwrap_err();
            assert_eq!(err, Error::UnsupportedTypeName(input.to_string()), "{}", input);
        }
        assert_eq!(
            "string".parse::<DataType>().unwrap_err().to_string(),
            "Unsupported type 'string'"
        );
    }
}
