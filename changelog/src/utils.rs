use once_cell::sync::Lazy;
use regex::Regex;

pub static GROUP_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*`(?P<name>[^`]+)`\*\*$").expect("Failed to compile group label regex")
});
