/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is so that a missing env var is visible
/// in the loaded value instead of silently becoming an empty string.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Implementation with a pluggable lookup, testable without mutating the
/// process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find('}') {
            Some(end) if end > 0 => {
                let name = &after_open[..end];
                match lookup(name) {
                    Some(value) => result.push_str(&value),
                    // Unresolved: keep the placeholder literally.
                    None => result.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after_open[end + 1..];
            },
            // "${}" or unterminated "${..." — emit literally and move on.
            _ => {
                result.push_str(&rest[start..]);
                return result;
            },
        }
    }

    result.push_str(rest);
    result
}
