use std::str::FromStr;
use std::time::Duration;

/// Interval syntax for `--interval`: any run of `<number><unit>` pairs with
/// units s/m/h/d, e.g. `90`, `30m`, `1h15m30s`. A bare trailing number is
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut number = String::new();
        let mut saw_component = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                number.push(c);
            } else if c.is_whitespace() {
                continue;
            } else {
                let value: u64 = number
                    .parse()
                    .map_err(|_| format!("expected a number before '{}'", c))?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("invalid duration unit: {}", c)),
                };
                total_seconds += value * unit;
                number.clear();
                saw_component = true;
            }
        }

        if !number.is_empty() {
            total_seconds += number
                .parse::<u64>()
                .map_err(|_| "invalid number in duration".to_string())?;
            saw_component = true;
        }

        if !saw_component {
            return Err("duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

impl HumanDuration {
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: &str) -> u64 {
        s.parse::<HumanDuration>().unwrap().as_secs()
    }

    #[test]
    fn test_bare_number_is_seconds() {
        assert_eq!(secs("90"), 90);
        assert_eq!(secs("0"), 0);
    }

    #[test]
    fn test_units() {
        assert_eq!(secs("45s"), 45);
        assert_eq!(secs("30m"), 1800);
        assert_eq!(secs("1h"), 3600);
        assert_eq!(secs("2d"), 172_800);
    }

    #[test]
    fn test_combined() {
        assert_eq!(secs("1h30m"), 5400);
        assert_eq!(secs("1h15m30s"), 4530);
        assert_eq!(secs("1m 30"), 90);
    }

    #[test]
    fn test_rejects_junk() {
        assert!("".parse::<HumanDuration>().is_err());
        assert!("abc".parse::<HumanDuration>().is_err());
        assert!("5x".parse::<HumanDuration>().is_err());
        assert!("h".parse::<HumanDuration>().is_err());
    }
}
