//! Plain-text policy snapshots.
//!
//! ```text
//! qlearner-policy 1 <dimensions> <num_actions>
//! <f_1> ... <f_k> <q_1> ... <q_n>
//! ```
//!
//! One record per state. Floats use the shortest representation that parses
//! back to the same bits, so a save/load cycle is exact.

use std::io::{self, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::{Error, Result};

const MAGIC: &str = "qlearner-policy";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub features: Vec<f32>,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicySnapshot {
    pub dimensions: usize,
    pub num_actions: usize,
    /// Records paired with the line they were read from.
    pub records: Vec<(usize, PolicyRecord)>,
}

pub fn write<'a, W, I>(
    out: &mut W,
    dimensions: usize,
    num_actions: usize,
    records: I,
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a [f32], &'a [f32])>,
{
    writeln!(out, "{} {} {} {}", MAGIC, VERSION, dimensions, num_actions)?;
    for (features, values) in records {
        debug_assert_eq!(features.len(), dimensions);
        debug_assert_eq!(values.len(), num_actions);
        writeln!(out, "{}", features.iter().chain(values).join(" "))?;
    }
    Ok(())
}

/// Parses a snapshot. `path` is only used to label errors.
pub fn parse(path: &Path, text: &str) -> Result<PolicySnapshot> {
    let malformed = |line: usize, reason: String| Error::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| malformed(1, "missing header".to_string()))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 4 || fields[0] != MAGIC {
        return Err(malformed(
            header_line,
            format!("expected '{} <version> <dimensions> <actions>'", MAGIC),
        ));
    }
    let parse_count = |token: &str, what: &str| {
        token
            .parse::<usize>()
            .map_err(|_| malformed(header_line, format!("bad {} '{}'", what, token)))
    };
    let version = parse_count(fields[1], "version")?;
    if version != VERSION as usize {
        return Err(malformed(
            header_line,
            format!("unsupported version {}", version),
        ));
    }
    let dimensions = parse_count(fields[2], "dimensions")?;
    let num_actions = parse_count(fields[3], "action count")?;
    if num_actions == 0 {
        return Err(malformed(header_line, "action count is zero".to_string()));
    }

    let mut records = Vec::new();
    for (line, content) in lines {
        let values = content
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| malformed(line, format!("'{}' is not a number", token)))
            })
            .collect::<Result<Vec<f32>>>()?;
        if values.len() != dimensions + num_actions {
            return Err(malformed(
                line,
                format!(
                    "expected {} fields, found {}",
                    dimensions + num_actions,
                    values.len()
                ),
            ));
        }
        let mut features = values;
        let values = features.split_off(dimensions);
        records.push((line, PolicyRecord { features, values }));
    }

    Ok(PolicySnapshot {
        dimensions,
        num_actions,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<PolicySnapshot> {
        parse(Path::new("test.policy"), text)
    }

    #[test]
    fn test_write_then_parse() {
        let states = [vec![0.0, 1.5], vec![-3.0, 2.0]];
        let rows = [vec![0.1f32, 1.0 / 3.0, -7.25], vec![1e-30, 0.0, 12345.678]];
        let mut buf = Vec::new();
        write(
            &mut buf,
            2,
            3,
            states
                .iter()
                .zip(&rows)
                .map(|(s, q)| (s.as_slice(), q.as_slice())),
        )
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("qlearner-policy 1 2 3\n"));
        let snapshot = parse_str(&text).unwrap();
        assert_eq!(2, snapshot.dimensions);
        assert_eq!(3, snapshot.num_actions);
        assert_eq!(2, snapshot.records.len());
        for ((_, record), (s, q)) in snapshot.records.iter().zip(states.iter().zip(&rows)) {
            assert_eq!(s, &record.features);
            // Exact bit equality, not approximate
            assert_eq!(q, &record.values);
        }
    }

    #[test]
    fn test_empty_policy() {
        let snapshot = parse_str("qlearner-policy 1 0 4\n").unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(4, snapshot.num_actions);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let snapshot = parse_str("\nqlearner-policy 1 1 2\n\n1 0.5 0.25\n\n").unwrap();
        assert_eq!(1, snapshot.records.len());
        assert_eq!(4, snapshot.records[0].0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let cases = [
            ("", 1),
            ("not-a-policy 1 2 2\n", 1),
            ("qlearner-policy 2 1 1\n", 1),
            ("qlearner-policy 1 x 1\n", 1),
            ("qlearner-policy 1 1 0\n", 1),
            ("qlearner-policy 1 1 2\n1 2\n", 2),
            ("qlearner-policy 1 1 2\n1 2 3\n1 2 3 4\n", 3),
            ("qlearner-policy 1 1 2\n1 two 3\n", 2),
        ];
        for (text, expected_line) in cases {
            match parse_str(text) {
                Err(Error::Malformed { line, .. }) => {
                    assert_eq!(expected_line, line, "wrong line for {:?}", text)
                }
                other => panic!("expected malformed for {:?}, got {:?}", text, other),
            }
        }
    }
}
