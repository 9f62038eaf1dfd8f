use std::cmp::Ordering;

/// A run of either ASCII digits or non-digits.
#[derive(Debug, PartialEq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Chunk<'a> {
    fn as_str(&self) -> &'a str {
        match self {
            Chunk::Digits(s) | Chunk::Text(s) => s,
        }
    }
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

fn chunks(s: &str) -> Chunks<'_> {
    Chunks { rest: s }
}

/// Compare two digit runs by numeric value without parsing (no overflow).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric-aware string ordering: `<1.2` sorts before `<1.10`.
///
/// Strings that compare equal numerically (`1.02` vs `1.2`) fall back to
/// byte order, so this is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);

    loop {
        let ord = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => cmp_digits(x, y),
            (Some(x), Some(y)) => x.as_str().cmp(y.as_str()),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<&str>) -> Vec<&str> {
        items.sort_by(|a, b| natural_cmp(a, b));
        items
    }

    #[test]
    fn test_chunks() {
        let parts: Vec<_> = chunks("<1.10-rc2").collect();
        assert_eq!(
            parts,
            vec![
                Chunk::Text("<"),
                Chunk::Digits("1"),
                Chunk::Text("."),
                Chunk::Digits("10"),
                Chunk::Text("-rc"),
                Chunk::Digits("2"),
            ]
        );
    }

    #[test]
    fn test_numeric_segments() {
        assert_eq!(sorted(vec!["<1.10", "<1.2"]), vec!["<1.2", "<1.10"]);
        assert_eq!(
            sorted(vec!["<8.5.10", "<8.5.2", "<8.10.0", "<8.4.8"]),
            vec!["<8.4.8", "<8.5.2", "<8.5.10", "<8.10.0"]
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(sorted(vec!["<1.2-rc1", "<1.2"]), vec!["<1.2", "<1.2-rc1"]);
    }

    #[test]
    fn test_leading_zero_tie_is_broken_by_bytes() {
        assert_eq!(natural_cmp("<1.02", "<1.2"), Ordering::Less);
        assert_eq!(natural_cmp("<1.2", "<1.02"), Ordering::Greater);
        assert_eq!(natural_cmp("<1.2", "<1.2"), Ordering::Equal);
    }

    #[test]
    fn test_large_numbers_do_not_overflow() {
        assert_eq!(
            natural_cmp("<1.99999999999999999999999", "<1.100000000000000000000000"),
            Ordering::Less
        );
    }
}
