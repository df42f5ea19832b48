use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    #[error("none of the {attempted} price range label(s) could be parsed")]
    NoValidRange { attempted: usize },
}

/// Parse a `"$<min>-<max>"` label into integer bounds.
///
/// The `$` signs are dropped and the rest split on `-`; the first two parts
/// must be integers. Surrounding whitespace is ignored.
pub fn parse_price_range(label: &str) -> Option<(i64, i64)> {
    let cleaned = label.replace('$', "");
    let mut parts = cleaned.split('-');
    let min = parts.next()?.trim().parse().ok()?;
    let max = parts.next()?.trim().parse().ok()?;
    Some((min, max))
}

/// Smallest lower bound and largest upper bound over all parsable labels.
/// Malformed labels are skipped.
pub fn price_range_bounds<I, S>(labels: I) -> Result<(i64, i64), RangeParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut attempted = 0usize;
    let mut bounds: Option<(i64, i64)> = None;

    for label in labels {
        attempted += 1;
        let Some((lo, hi)) = parse_price_range(label.as_ref()) else {
            log::debug!("ignoring malformed price range label {:?}", label.as_ref());
            continue;
        };
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(lo), max.max(hi)),
            None => (lo, hi),
        });
    }

    bounds.ok_or(RangeParseError::NoValidRange { attempted })
}
