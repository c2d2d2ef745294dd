/// How a live value is printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Fixed { decimals: usize, suffix: &'static str },
    /// `38.6k` from 1000 upward, plain integer below
    Compact,
    Integer { suffix: &'static str },
    Percent,
}

impl ValueFormat {
    pub const fn fixed(decimals: usize) -> Self {
        ValueFormat::Fixed {
            decimals,
            suffix: "",
        }
    }

    pub const fn integer() -> Self {
        ValueFormat::Integer { suffix: "" }
    }

    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Fixed { decimals, suffix } => format!("{:.*}{}", decimals, value, suffix),
            ValueFormat::Compact => {
                if value >= 1000.0 {
                    format!("{:.1}k", value / 1000.0)
                } else {
                    format!("{}", value.round())
                }
            }
            ValueFormat::Integer { suffix } => format!("{}{}", value.round(), suffix),
            ValueFormat::Percent => format!("{:.0}%", value),
        }
    }
}

/// `1500` → `1,500`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        assert_eq!(ValueFormat::fixed(1).render(53.6), "53.6");
        assert_eq!(
            ValueFormat::Fixed { decimals: 1, suffix: "B" }.render(26.1),
            "26.1B"
        );
        assert_eq!(ValueFormat::Compact.render(63_400.0), "63.4k");
        assert_eq!(ValueFormat::Compact.render(999.4), "999");
        assert_eq!(ValueFormat::Integer { suffix: "ms" }.render(179.6), "180ms");
        assert_eq!(ValueFormat::integer().render(0.0), "0");
        assert_eq!(ValueFormat::Percent.render(45.0), "45%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1500.0), "1,500");
        assert_eq!(group_thousands(887.0), "887");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
    }
}
