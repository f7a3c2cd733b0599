use anyhow::bail;

/// Longest field width, wider fields can not appear in a file name
const MAX_WIDTH: usize = 255;

/// Expands printf-like path pattern (as used by `<input-path-pattern>`)
/// with a 1-based test number. Supports `%d`, `%Nd`, `%0Nd` and `%%`.
pub fn format_path(pattern: &str, number: usize) -> anyhow::Result<String> {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut zero_pad = false;
        let mut width = 0usize;
        loop {
            match chars.next() {
                Some('%') if width == 0 && !zero_pad => {
                    out.push('%');
                    break;
                }
                Some('0') if width == 0 && !zero_pad => zero_pad = true,
                Some(d @ '0'..='9') => {
                    let digit = d as usize - '0' as usize;
                    width = match width
                        .checked_mul(10)
                        .and_then(|w| w.checked_add(digit))
                        .filter(|&w| w <= MAX_WIDTH)
                    {
                        Some(width) => width,
                        None => bail!("field width is too large in {:?}", pattern),
                    };
                }
                Some('d') => {
                    let num = number.to_string();
                    let fill = if zero_pad { '0' } else { ' ' };
                    for _ in num.len()..width {
                        out.push(fill);
                    }
                    out.push_str(&num);
                    break;
                }
                Some(other) => bail!("unsupported conversion %{} in {:?}", other, pattern),
                None => bail!("unterminated conversion in {:?}", pattern),
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::format_path;

    #[test]
    fn polygon_patterns() {
        assert_eq!(format_path("tests/%02d", 7).unwrap(), "tests/07");
        assert_eq!(format_path("tests/%02d.a", 123).unwrap(), "tests/123.a");
        assert_eq!(format_path("tests/%d", 5).unwrap(), "tests/5");
        assert_eq!(format_path("t/%3d", 5).unwrap(), "t/  5");
        assert_eq!(format_path("100%%/%03d", 5).unwrap(), "100%/005");
    }

    #[test]
    fn bad_patterns() {
        assert!(format_path("tests/%s", 1).is_err());
        assert!(format_path("tests/%0", 1).is_err());
        assert!(format_path("tests/%99999999999999999999d", 1).is_err());
        assert!(format_path("tests/%0999999999d", 1).is_err());
        assert_eq!(format_path("%0255d", 1).unwrap().len(), 255);
    }
}
