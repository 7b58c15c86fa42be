use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Returns the value of the named environment variable, if it is set and
/// not blank.
pub fn get_optional_variable(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parses the named environment variable, falling back to `default` when
/// it is unset. Panics if it is set but cannot be parsed.
pub fn parse_variable_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match get_optional_variable(name) {
        Some(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("parse {} ({:?}): {}", name, value, e)),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{get_optional_variable, parse_variable_or};

    #[test]
    fn blank_variables_count_as_unset() {
        std::env::set_var("FIELDMARK_TEST_BLANK", "  ");

        assert_eq!(get_optional_variable("FIELDMARK_TEST_BLANK"), None);
        assert_eq!(parse_variable_or("FIELDMARK_TEST_BLANK", 7u64), 7);
    }

    #[test]
    fn set_variables_are_parsed() {
        std::env::set_var("FIELDMARK_TEST_PARSED", "250");

        assert_eq!(parse_variable_or("FIELDMARK_TEST_PARSED", 5000u64), 250);
    }

    #[test]
    #[should_panic(expected = "parse FIELDMARK_TEST_GARBAGE")]
    fn unparseable_variables_panic() {
        std::env::set_var("FIELDMARK_TEST_GARBAGE", "soon");

        parse_variable_or("FIELDMARK_TEST_GARBAGE", 5000u64);
    }
}
