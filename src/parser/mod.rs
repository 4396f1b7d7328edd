//! Line parser for hailstone records
//!
//! Each non-blank line has the shape `X, Y, Z @ A, B, C`. Whitespace around the
//! separators is free-form; anything else is a malformed record.

use thiserror::Error;

use crate::hailstone::{Hailstone, Vec3};

/// Malformed record, with the offending line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: malformed record: {message}\n  | {line_content}")]
pub struct ParseError {
    pub line_number: usize,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            message: message.into(),
            line_content: line_content.into(),
        }
    }
}

/// Parse a single signed decimal coordinate
pub fn parse_coordinate(s: &str) -> Result<i64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty coordinate".to_string());
    }
    s.parse::<i64>()
        .map_err(|e| format!("invalid coordinate '{}': {}", s, e))
}

/// Parse a comma-separated triple such as `19, 13, 30`
pub fn parse_triple(s: &str) -> Result<Vec3, String> {
    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != 3 {
        return Err(format!(
            "expected 3 comma-separated values, found {} in '{}'",
            fields.len(),
            s.trim()
        ));
    }

    Ok(Vec3::new(
        parse_coordinate(fields[0])?,
        parse_coordinate(fields[1])?,
        parse_coordinate(fields[2])?,
    ))
}

/// Parse one `position @ velocity` record
pub fn parse_hailstone(line: &str) -> Result<Hailstone, String> {
    let (position, velocity) = line
        .split_once('@')
        .ok_or_else(|| "missing '@' between position and velocity".to_string())?;

    if velocity.contains('@') {
        return Err("more than one '@' in record".to_string());
    }

    Ok(Hailstone::new(parse_triple(position)?, parse_triple(velocity)?))
}

/// Parse every record in `content`, in input order
///
/// Blank lines are skipped. The first malformed line aborts parsing; there is
/// no partial result.
pub fn parse_hailstones(content: &str) -> Result<Vec<Hailstone>, ParseError> {
    let mut hailstones = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1; // 1-indexed

        if line.trim().is_empty() {
            continue;
        }

        match parse_hailstone(line) {
            Ok(hailstone) => hailstones.push(hailstone),
            Err(msg) => return Err(ParseError::new(line_number, msg, line)),
        }
    }

    Ok(hailstones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EXAMPLE: &str = "19, 13, 30 @ -2,  1, -2
18, 19, 22 @ -1, -1, -2
20, 25, 34 @ -2, -2, -4
12, 31, 28 @ -1, -2, -1
20, 19, 15 @  1, -5, -3
";

    #[test]
    fn test_parse_example() {
        let stones = parse_hailstones(EXAMPLE).unwrap();
        assert_eq!(stones.len(), 5);
        assert_eq!(
            stones[0],
            Hailstone::new(Vec3::new(19, 13, 30), Vec3::new(-2, 1, -2))
        );
        assert_eq!(
            stones[4],
            Hailstone::new(Vec3::new(20, 19, 15), Vec3::new(1, -5, -3))
        );
    }

    #[rstest]
    #[case("19,13,30@-2,1,-2")]
    #[case("  19 , 13 ,30 @ -2, 1 ,  -2  ")]
    #[case("19,\t13,\t30\t@\t-2,\t1,\t-2")]
    fn test_whitespace_is_tolerated(#[case] line: &str) {
        assert_eq!(
            parse_hailstone(line).unwrap(),
            Hailstone::new(Vec3::new(19, 13, 30), Vec3::new(-2, 1, -2))
        );
    }

    #[test]
    fn test_large_coordinates() {
        let stone =
            parse_hailstone("230027994633462, 224850925980115, 371222163921552 @ -171, -159, 8")
                .unwrap();
        assert_eq!(stone.position.x, 230027994633462);
        assert_eq!(stone.velocity.z, 8);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "\n1, 2, 3 @ 4, 5, 6\n   \n7, 8, 9 @ 0, 0, 0\n\n";
        assert_eq!(parse_hailstones(input).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_yields_no_hailstones() {
        assert!(parse_hailstones("").unwrap().is_empty());
    }

    #[rstest]
    #[case("1,2")]
    #[case("1,2,3 @ 4,5")]
    #[case("1,2,3,4 @ 4,5,6")]
    #[case("1,2,x @ 4,5,6")]
    #[case("1,2,3 @ 4,5,6 @ 7,8,9")]
    #[case("1,,3 @ 4,5,6")]
    #[case("1.5,2,3 @ 4,5,6")]
    fn test_malformed_records(#[case] line: &str) {
        assert!(parse_hailstone(line).is_err());
    }

    #[test]
    fn test_error_reports_line_number() {
        let input = "1, 2, 3 @ 4, 5, 6\n\n1,2\n";
        let err = parse_hailstones(input).unwrap_err();
        assert_eq!(err.line_number, 3);
        assert_eq!(err.line_content, "1,2");
        assert!(err.to_string().contains("malformed record"));
    }
}
